//! Orchestration of a full patch run.
//!
//! The run proceeds in a fixed order:
//! 1. Parse the hook file and resolve it against the linker map
//! 2. Load both ROMs and verify that they only differ in the appended segment
//! 3. Stream the input savestate through the injection engine into a staged
//!    output
//! 4. Write the optional report, then move the output into place
//!
//! Any error aborts the run; the staged output is discarded and an existing
//! output savestate is left untouched.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::PatchConfig;
use crate::error::{Error, Result};
use crate::hook::HookTable;
use crate::inject::{InjectionEngine, InjectionSummary};
use crate::report::PatchReport;
use crate::rom::{RomDiff, RomImage, verify_rom_diff};
use crate::savestate::{StagedOutput, open_savestate};

/// Result of a successful run
#[derive(Debug)]
pub struct PatchOutcome {
    pub hooks: HookTable,
    pub entry_point: u32,
    pub diff: RomDiff,
    pub summary: InjectionSummary,
    pub output: PathBuf,
}

pub struct Patcher {
    config: PatchConfig,
}

impl Patcher {
    pub fn new(config: PatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Parse the hook file and resolve every hook against the map file
    pub fn load_hooks(&self) -> Result<HookTable> {
        let mut hooks = HookTable::parse(open_text(&self.config.hooks)?)?;
        info!(
            "Loaded {} hooks from {}",
            hooks.len(),
            self.config.hooks.display()
        );

        if !hooks.is_empty() {
            hooks.resolve(open_text(&self.config.map)?)?;
        }
        Ok(hooks)
    }

    /// Load the base and new ROMs
    pub fn load_roms(&self) -> Result<(RomImage, RomImage)> {
        let baseline = RomImage::load(&self.config.base_rom)?;
        let modified = RomImage::load(&self.config.rom)?;
        Ok((baseline, modified))
    }

    /// Run the whole patch, writing the output savestate on success
    pub fn run(&self) -> Result<PatchOutcome> {
        let mut hooks = self.load_hooks()?;

        let (baseline, modified) = self.load_roms()?;
        let diff = verify_rom_diff(&baseline, &modified)?;
        let entry_point = modified.entry_point();

        let mut input = open_savestate(&self.config.input_savestate)?;
        let mut output = StagedOutput::create(&self.config.output_savestate)?;

        let summary =
            InjectionEngine::new(&mut hooks, &modified, diff).run(&mut input, &mut output)?;

        // A failed report discards the staged output along with it
        if let Some(path) = &self.config.report {
            PatchReport::new(&hooks, entry_point, &diff, summary.clone()).save(path)?;
            info!("Report saved to {}", path.display());
        }

        let output = output.commit()?;
        info!(
            "Wrote {} (0x{:X} bytes decompressed)",
            output.display(),
            summary.bytes_written
        );

        Ok(PatchOutcome {
            hooks,
            entry_point,
            diff,
            summary,
            output,
        })
    }
}

fn open_text(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}
