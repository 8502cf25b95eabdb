//! Verify command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use stpatch_core::{PatchConfig, Patcher, verify_rom_diff};

use super::hex_utils::format_hex_address;

/// Run the verify command
pub fn run(base_rom: &Path, rom: &Path) -> Result<()> {
    let config = PatchConfig::builder().base_rom(base_rom).rom(rom).build();
    println!("Base ROM: {}", base_rom.display());
    println!("ROM: {}", rom.display());

    let (baseline, modified) = Patcher::new(config).load_roms()?;
    let diff = verify_rom_diff(&baseline, &modified).context("ROM verification failed")?;

    println!();
    println!("Entry point: {}", format_hex_address(modified.entry_point()));
    println!("Base ROM end: 0x{:X}", diff.baseline_end);
    println!("New ROM end:  0x{:X}", diff.modified_end);
    println!(
        "Custom segment: 0x{:X} bytes appended",
        diff.appended_len()
    );
    println!("ROMs only differ in the expected area");

    Ok(())
}
