//! Resolution of hook names against a linker map file
//!
//! A map line matches a symbol when the line ends with the symbol's name.
//! The address is the leading integer token of the line, e.g.
//!
//! ```text
//!                 0x0000000080246050                func_80246050
//! ```

use std::io::BufRead;

use tracing::{debug, info};

use super::utils::{decode_line, parse_map_address};
use super::{HookRecord, HookTable, MAX_LINE_LEN};
use crate::address::{self, layout::rdram};
use crate::error::{Error, HookRole, Result};

impl HookTable {
    /// Resolve every hook's target and replacement address from a map stream.
    ///
    /// Each map line resolves at most one hook: the first one, in declaration
    /// order, whose target or replacement name ends the line. A name shared
    /// by several hooks therefore only resolves for the first of them. Later
    /// matches for the same hook overwrite earlier ones.
    pub fn resolve<R: BufRead>(&mut self, reader: R) -> Result<()> {
        if self.is_empty() {
            debug!("No hooks declared, skipping map resolution");
            return Ok(());
        }

        for line in reader.split(b'\n') {
            let line = line?;
            let line = decode_line(&line);
            if line.len() < 2 || line.len() > MAX_LINE_LEN {
                continue;
            }

            for hook in self.records_mut() {
                if line.ends_with(hook.target_name.as_str()) {
                    let addr = symbol_address(&line, HookRole::Target, &hook.target_name)?;
                    check_target_placement(hook, addr)?;
                    debug!("Resolved target {} = 0x{:08X}", hook.target_name, addr);
                    hook.target_address = Some(addr);
                    break;
                }
                if line.ends_with(hook.replacement_name.as_str()) {
                    let addr =
                        symbol_address(&line, HookRole::Replacement, &hook.replacement_name)?;
                    if !address::is_in_aux_segment(addr) {
                        return Err(Error::ReplacementNotInAuxiliarySegment {
                            name: hook.replacement_name.clone(),
                            address: addr,
                        });
                    }
                    debug!(
                        "Resolved replacement {} = 0x{:08X}",
                        hook.replacement_name, addr
                    );
                    hook.replacement_address = Some(addr);
                    break;
                }
            }
        }

        self.ensure_resolved()?;
        self.ensure_disjoint()?;

        info!("Resolved {} hooks", self.len());
        Ok(())
    }
}

fn symbol_address(line: &str, role: HookRole, name: &str) -> Result<u32> {
    parse_map_address(line).ok_or_else(|| Error::UnresolvedSymbol {
        role,
        name: name.to_string(),
        line: line.to_string(),
    })
}

fn check_target_placement(hook: &HookRecord, addr: u32) -> Result<()> {
    let end = u64::from(addr) + u64::from(hook.max_patch_size);
    if address::is_in_aux_segment(addr) || end > u64::from(rdram::AUX_SEGMENT_BASE) {
        return Err(Error::TargetInAuxiliarySegment {
            name: hook.target_name.clone(),
            address: addr,
        });
    }
    Ok(())
}
