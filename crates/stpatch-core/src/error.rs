use std::path::PathBuf;

use strum::Display;
use thiserror::Error;

/// Which side of a hook a symbol belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HookRole {
    #[strum(serialize = "target")]
    Target,
    #[strum(serialize = "replacement")]
    Replacement,
}

/// Broad failure category, used for diagnostics and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    #[strum(serialize = "configuration error")]
    Config,
    #[strum(serialize = "hook file error")]
    HookSpec,
    #[strum(serialize = "resolution error")]
    Resolution,
    #[strum(serialize = "ROM integrity error")]
    RomIntegrity,
    #[strum(serialize = "I/O error")]
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("File {} could not be opened: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Hook file line {line} is {len} characters long (maximum {max})")]
    LineTooLong { line: usize, len: usize, max: usize },

    #[error("Invalid line {line} in hook file: {content:?}")]
    InvalidHookLine { line: usize, content: String },

    #[error(
        "Invalid target size '{size}' on hook file line {line}: must be a non-zero integer divisible by 4"
    )]
    InvalidHookSize { line: usize, size: String },

    #[error("Hook file has more than the maximum {max} hooks")]
    TooManyHooks { max: usize },

    #[error("Invalid address for hook {role} function {name} in map file: {line:?}")]
    UnresolvedSymbol {
        role: HookRole,
        name: String,
        line: String,
    },

    #[error("Hook target function {name} (0x{address:08X}) must not come from the custom segment")]
    TargetInAuxiliarySegment { name: String, address: u32 },

    #[error("Hook replacement function {name} (0x{address:08X}) must come from the custom segment")]
    ReplacementNotInAuxiliarySegment { name: String, address: u32 },

    #[error("No address found for hook {role} function {name} in map file")]
    HookUnresolved { role: HookRole, name: String },

    #[error("Hook targets {first} and {second} overlap")]
    OverlappingHooks { first: String, second: String },

    #[error("ROM image is too small ({len} bytes)")]
    RomTooSmall { len: usize },

    #[error("New ROM is truncated: expected at least 0x{expected:X} bytes, got 0x{actual:X}")]
    RomTruncated { expected: usize, actual: usize },

    #[error(
        "Found a difference between the base ROM and the new ROM outside of the expected area (byte at 0x{offset:X} changed from {baseline:02x} to {modified:02x})"
    )]
    UnexpectedRomDifference {
        offset: usize,
        baseline: u8,
        modified: u8,
    },

    #[error("Replacement code for {name} at ROM offset 0x{offset:X} lies outside the new ROM")]
    ReplacementOutOfRom { name: String, offset: u32 },

    #[error("Input savestate ended unexpectedly at offset 0x{offset:X}")]
    SavestateTruncated { offset: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileOpen { .. } => ErrorKind::Config,
            Error::LineTooLong { .. }
            | Error::InvalidHookLine { .. }
            | Error::InvalidHookSize { .. }
            | Error::TooManyHooks { .. } => ErrorKind::HookSpec,
            Error::UnresolvedSymbol { .. }
            | Error::TargetInAuxiliarySegment { .. }
            | Error::ReplacementNotInAuxiliarySegment { .. }
            | Error::HookUnresolved { .. }
            | Error::OverlappingHooks { .. } => ErrorKind::Resolution,
            Error::RomTooSmall { .. }
            | Error::RomTruncated { .. }
            | Error::UnexpectedRomDifference { .. }
            | Error::ReplacementOutOfRom { .. } => ErrorKind::RomIntegrity,
            Error::SavestateTruncated { .. } | Error::Io(_) | Error::Json(_) => ErrorKind::Io,
        }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileOpen { source, .. } | Error::Io(source) => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
