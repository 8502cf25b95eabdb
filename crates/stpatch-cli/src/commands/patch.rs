//! Patch command implementation.

use anyhow::{Context, Result};
use stpatch_core::{PatchConfig, PatchOutcome, Patcher};

use super::hex_utils::format_hex_address;
use super::hooks::print_hooks;

/// Run the patch command
pub fn run(config: PatchConfig) -> Result<()> {
    println!("Patching ST.");
    println!("Base ROM: {}", config.base_rom.display());
    println!("ROM: {}", config.rom.display());
    println!("Input ST: {}", config.input_savestate.display());
    println!("Output ST: {}", config.output_savestate.display());
    println!("Hook file: {}", config.hooks.display());
    println!("Map file: {}", config.map.display());

    let outcome = Patcher::new(config)
        .run()
        .context("Savestate injection failed")?;

    if !outcome.hooks.is_empty() {
        print_hooks(&outcome.hooks);
    }

    for line in injection_progress(&outcome) {
        println!("{}", line);
    }

    let summary = &outcome.summary;
    println!(
        "Injected 0x{:X} bytes from ROM offset 0x{:X} to 0x{:X}",
        summary.aux_bytes_written, outcome.diff.baseline_end, outcome.diff.modified_end
    );
    println!(
        "Hooks injected: {}/{} ({} words)",
        summary.hooks_injected,
        outcome.hooks.len(),
        summary.words_patched
    );
    println!("Savestate injection succeeded!");
    println!("Output saved to: {}", outcome.output.display());

    Ok(())
}

/// Progress messages of a run, in the order the engine reached them
fn injection_progress(outcome: &PatchOutcome) -> Vec<String> {
    let records = outcome.hooks.records();
    let mut lines: Vec<String> = outcome
        .summary
        .started_hooks
        .iter()
        .filter_map(|&index| records.get(index).map(|hook| (index, hook)))
        .map(|(index, hook)| {
            format!(
                "Began injecting hook #{} from {} to {}",
                index + 1,
                format_hex_address(hook.replacement_address.unwrap_or_default()),
                format_hex_address(hook.target_address.unwrap_or_default())
            )
        })
        .collect();

    lines.push(format!(
        "Injecting from offset 0x{:X} to offset 0x{:X}",
        outcome.diff.baseline_end, outcome.diff.modified_end
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use stpatch_core::{HookRecord, HookTable, InjectionSummary, RomDiff};

    fn hook(target: &str, target_address: u32) -> HookRecord {
        let mut hook = HookRecord::new(target, format!("{}_custom", target), 0x10);
        hook.target_address = Some(target_address);
        hook.replacement_address = Some(0x8040_0000);
        hook.injection_started = true;
        hook
    }

    #[test]
    fn test_injection_progress_follows_engine_order() {
        let mut hooks = HookTable::new();
        hooks.push(hook("func_a", 0x8030_0000)).unwrap();
        hooks.push(hook("func_b", 0x8024_6050)).unwrap();

        let outcome = PatchOutcome {
            hooks,
            entry_point: 0x8024_6000,
            diff: RomDiff {
                baseline_end: 0x7F_0000,
                modified_end: 0x7F_2000,
            },
            summary: InjectionSummary {
                hooks_injected: 2,
                started_hooks: vec![1, 0],
                ..InjectionSummary::default()
            },
            output: PathBuf::from("out.st"),
        };

        assert_eq!(
            injection_progress(&outcome),
            vec![
                "Began injecting hook #2 from 0x80400000 to 0x80246050".to_string(),
                "Began injecting hook #1 from 0x80400000 to 0x80300000".to_string(),
                "Injecting from offset 0x7F0000 to offset 0x7F2000".to_string(),
            ]
        );
    }
}
