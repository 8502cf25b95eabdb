//! Run configuration
//!
//! Defaults match the layout of an sm64 decomp build tree.

use std::path::PathBuf;

/// Default path of the stock ROM
pub const DEFAULT_BASE_ROM: &str = "baserom.us.z64";
/// Default path of the rebuilt ROM
pub const DEFAULT_ROM: &str = "build/us/sm64.us.z64";
/// Default path of the input savestate
pub const DEFAULT_INPUT_SAVESTATE: &str = "basest.us.st";
/// Default path of the output savestate
pub const DEFAULT_OUTPUT_SAVESTATE: &str = "build/us/sm64.us.st";
/// Default path of the hook file
pub const DEFAULT_HOOKS: &str = "sm64_hooks.us.txt";
/// Default path of the linker map
pub const DEFAULT_MAP: &str = "build/us/sm64.us.map";

/// Configuration for a patch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    /// Unmodified ROM
    pub base_rom: PathBuf,
    /// Newly built ROM, differing only in the appended custom segment
    pub rom: PathBuf,
    pub input_savestate: PathBuf,
    pub output_savestate: PathBuf,
    pub hooks: PathBuf,
    pub map: PathBuf,
    /// Optional JSON report of the run
    pub report: Option<PathBuf>,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            base_rom: PathBuf::from(DEFAULT_BASE_ROM),
            rom: PathBuf::from(DEFAULT_ROM),
            input_savestate: PathBuf::from(DEFAULT_INPUT_SAVESTATE),
            output_savestate: PathBuf::from(DEFAULT_OUTPUT_SAVESTATE),
            hooks: PathBuf::from(DEFAULT_HOOKS),
            map: PathBuf::from(DEFAULT_MAP),
            report: None,
        }
    }
}

impl PatchConfig {
    /// Create a new configuration builder
    pub fn builder() -> PatchConfigBuilder {
        PatchConfigBuilder::default()
    }
}

/// Builder for PatchConfig
#[derive(Debug, Clone, Default)]
pub struct PatchConfigBuilder {
    base_rom: Option<PathBuf>,
    rom: Option<PathBuf>,
    input_savestate: Option<PathBuf>,
    output_savestate: Option<PathBuf>,
    hooks: Option<PathBuf>,
    map: Option<PathBuf>,
    report: Option<PathBuf>,
}

impl PatchConfigBuilder {
    pub fn base_rom<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.base_rom = Some(path.into());
        self
    }

    pub fn rom<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.rom = Some(path.into());
        self
    }

    pub fn input_savestate<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.input_savestate = Some(path.into());
        self
    }

    pub fn output_savestate<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_savestate = Some(path.into());
        self
    }

    pub fn hooks<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.hooks = Some(path.into());
        self
    }

    pub fn map<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.map = Some(path.into());
        self
    }

    /// Write a JSON report after a successful run
    pub fn report<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.report = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> PatchConfig {
        let default = PatchConfig::default();
        PatchConfig {
            base_rom: self.base_rom.unwrap_or(default.base_rom),
            rom: self.rom.unwrap_or(default.rom),
            input_savestate: self.input_savestate.unwrap_or(default.input_savestate),
            output_savestate: self.output_savestate.unwrap_or(default.output_savestate),
            hooks: self.hooks.unwrap_or(default.hooks),
            map: self.map.unwrap_or(default.map),
            report: self.report,
        }
    }
}
