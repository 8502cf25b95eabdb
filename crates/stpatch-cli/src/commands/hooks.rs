//! Hooks command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use stpatch_core::{HookTable, PatchConfig, Patcher, address};

use super::hex_utils::format_hex_address;

/// Run the hooks command
pub fn run(hooks: &Path, map: &Path) -> Result<()> {
    let config = PatchConfig::builder().hooks(hooks).map(map).build();
    println!("Hook file: {}", hooks.display());
    println!("Map file: {}", map.display());

    let table = Patcher::new(config)
        .load_hooks()
        .context("Failed to load hooks")?;

    if table.is_empty() {
        println!("No hooks declared");
        return Ok(());
    }

    print_hooks(&table);
    Ok(())
}

/// Print resolved hooks, one per line
pub fn print_hooks(table: &HookTable) {
    println!("Loaded hooks:");
    for hook in table {
        let target = hook.target_address.unwrap_or_default();
        let replacement = hook.replacement_address.unwrap_or_default();
        println!(
            "\t{} ({}) <-- {} ({}), max 0x{:X} bytes, savestate offset 0x{:X}",
            hook.target_name,
            format_hex_address(target),
            hook.replacement_name,
            format_hex_address(replacement),
            hook.max_patch_size,
            address::to_savestate_offset(target)
        );
    }
}
