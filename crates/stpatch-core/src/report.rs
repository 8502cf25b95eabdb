use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::address;
use crate::error::Result;
use crate::hook::HookTable;
use crate::inject::InjectionSummary;
use crate::rom::RomDiff;

/// Report of a patch run, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct PatchReport {
    pub entry_point: String,
    pub injected_range: InjectedRange,
    pub hooks: Vec<HookEntry>,
    pub summary: InjectionSummary,
}

/// ROM range copied into the custom segment
#[derive(Debug, Clone, Serialize)]
pub struct InjectedRange {
    pub rom_start: String,
    pub rom_end: String,
    pub savestate_offset: String,
}

/// One resolved hook with its addresses in every coordinate space
#[derive(Debug, Clone, Serialize)]
pub struct HookEntry {
    pub target: String,
    pub replacement: String,
    pub max_size: String,
    pub target_address: String,
    pub target_savestate_offset: String,
    pub replacement_address: String,
    pub replacement_rom_offset: String,
    pub injected: bool,
}

impl PatchReport {
    pub fn new(
        hooks: &HookTable,
        entry_point: u32,
        diff: &RomDiff,
        summary: InjectionSummary,
    ) -> Self {
        let hooks = hooks
            .iter()
            .map(|hook| {
                let target = hook.target_address.unwrap_or_default();
                let replacement = hook.replacement_address.unwrap_or_default();
                HookEntry {
                    target: hook.target_name.clone(),
                    replacement: hook.replacement_name.clone(),
                    max_size: format!("0x{:X}", hook.max_patch_size),
                    target_address: format!("0x{:08X}", target),
                    target_savestate_offset: format!(
                        "0x{:X}",
                        address::to_savestate_offset(target)
                    ),
                    replacement_address: format!("0x{:08X}", replacement),
                    replacement_rom_offset: format!(
                        "0x{:X}",
                        address::to_rom_offset(replacement, entry_point)
                    ),
                    injected: hook.injection_started,
                }
            })
            .collect();

        Self {
            entry_point: format!("0x{:08X}", entry_point),
            injected_range: InjectedRange {
                rom_start: format!("0x{:X}", diff.baseline_end),
                rom_end: format!("0x{:X}", diff.modified_end),
                savestate_offset: format!("0x{:X}", address::aux_segment_savestate_offset()),
            },
            hooks,
            summary,
        }
    }

    /// Save report to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
