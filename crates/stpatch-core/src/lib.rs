//! # stpatch-core
//!
//! Core library for injecting custom code into N64 emulator savestates.
//!
//! This crate provides:
//! - Translation between ROM file offsets, RDRAM addresses and savestate offsets
//! - Hook file parsing and symbol-map resolution
//! - Verification that a rebuilt ROM only differs from the stock ROM in its
//!   appended custom segment
//! - The streaming injection engine that rewrites a savestate
//!
//! ## Example
//!
//! ```ignore
//! use stpatch_core::{PatchConfig, Patcher};
//!
//! let config = PatchConfig::builder()
//!     .input_savestate("basest.us.st")
//!     .output_savestate("build/us/sm64.us.st")
//!     .build();
//!
//! let outcome = Patcher::new(config).run()?;
//! println!("patched {} words", outcome.summary.words_patched);
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod hook;
pub mod inject;
pub mod patcher;
pub mod report;
pub mod rom;
pub mod savestate;

pub use config::{PatchConfig, PatchConfigBuilder};
pub use error::{Error, ErrorKind, HookRole, Result};
pub use hook::{HookRecord, HookTable, MAX_HOOKS};
pub use inject::{InjectionEngine, InjectionSummary};
pub use patcher::{PatchOutcome, Patcher};
pub use report::PatchReport;
pub use rom::{RomDiff, RomImage, verify_rom_diff};
pub use savestate::{StagedOutput, open_savestate};
