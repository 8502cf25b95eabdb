//! Savestate injection engine
//!
//! The decompressed savestate is streamed one word at a time through three
//! phases:
//!
//! ```text
//!  savestate offset 0 ........ aux segment offset ........ aux + appended ...... EOF
//!  |  1. copy, hook words  |  2. modified ROM words     |  3. verbatim tail   |
//!  |     substituted       |     (input skipped)        |                     |
//! ```
//!
//! Savestates hold RDRAM words in host (little-endian) order while the ROM is
//! big-endian, so every word taken from the ROM is byte-swapped on output.

use std::io::{self, ErrorKind as IoErrorKind, Read, Write};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::address::{self, layout::rdram};
use crate::error::{Error, HookRole, Result};
use crate::hook::HookTable;
use crate::rom::{RomDiff, RomImage};

/// Counters collected while streaming a savestate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectionSummary {
    /// Hooks that had at least one word rewritten
    pub hooks_injected: usize,
    /// Table indices of injected hooks, in the order injection began
    pub started_hooks: Vec<usize>,
    pub words_patched: u64,
    pub aux_bytes_written: u64,
    pub tail_bytes_copied: u64,
    pub bytes_written: u64,
}

pub struct InjectionEngine<'a> {
    hooks: &'a mut HookTable,
    modified: &'a RomImage,
    diff: RomDiff,
    entry_point: u32,
    input_pos: u64,
    output_pos: u64,
    summary: InjectionSummary,
}

impl<'a> InjectionEngine<'a> {
    pub fn new(hooks: &'a mut HookTable, modified: &'a RomImage, diff: RomDiff) -> Self {
        let entry_point = modified.entry_point();
        Self {
            hooks,
            modified,
            diff,
            entry_point,
            input_pos: 0,
            output_pos: 0,
            summary: InjectionSummary::default(),
        }
    }

    /// Stream `input` into `output`, consuming the engine
    pub fn run<R: Read, W: Write>(
        mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<InjectionSummary> {
        self.hooks.ensure_resolved()?;

        debug!(
            "Entry point 0x{:08X}, custom segment at savestate offset 0x{:X}",
            self.entry_point,
            address::aux_segment_savestate_offset()
        );

        self.patch_main_memory(input, output)?;
        self.append_aux_segment(input, output)?;
        self.copy_tail(input, output)?;

        self.summary.hooks_injected = self.summary.started_hooks.len();
        self.summary.bytes_written = self.output_pos;
        Ok(self.summary)
    }

    /// Phase 1: copy RDRAM below the custom segment, substituting hooked words
    fn patch_main_memory<R: Read, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        while self.current_mem_address() < rdram::AUX_SEGMENT_BASE {
            let mut word = self.read_input_word(input)?;
            let mem_addr = self.current_mem_address();

            if let Some(index) = self.hooks.find_target(mem_addr) {
                word = self.replacement_word(index, mem_addr)?.to_le_bytes();
                self.summary.words_patched += 1;
            }

            self.write_output(output, &word)?;
        }

        info!(
            "Patched {} hook words below 0x{:08X}",
            self.summary.words_patched,
            rdram::AUX_SEGMENT_BASE
        );
        Ok(())
    }

    fn replacement_word(&mut self, index: usize, mem_addr: u32) -> Result<u32> {
        let hook = &mut self.hooks.records_mut()[index];
        let target = hook.target_address.ok_or_else(|| Error::HookUnresolved {
            role: HookRole::Target,
            name: hook.target_name.clone(),
        })?;
        let replacement = hook.replacement_address.ok_or_else(|| Error::HookUnresolved {
            role: HookRole::Replacement,
            name: hook.replacement_name.clone(),
        })?;

        let rom_offset = address::to_rom_offset(replacement, self.entry_point)
            .wrapping_add(mem_addr - target);
        let word = self
            .modified
            .read_word(rom_offset as usize)
            .ok_or_else(|| Error::ReplacementOutOfRom {
                name: hook.replacement_name.clone(),
                offset: rom_offset,
            })?;

        if !hook.injection_started {
            debug!(
                "Began injecting hook #{} from 0x{:08X} to 0x{:08X}",
                index + 1,
                replacement,
                target
            );
            hook.injection_started = true;
            self.summary.started_hooks.push(index);
        }

        Ok(word)
    }

    /// Phase 2: replace the custom segment with the ROM's appended bytes
    fn append_aux_segment<R: Read, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        debug!(
            "Injecting from offset 0x{:X} to offset 0x{:X}",
            self.diff.baseline_end, self.diff.modified_end
        );

        let mut rom_offset = self.diff.baseline_end;
        while rom_offset < self.diff.modified_end {
            let Some(word) = self.modified.read_word(rom_offset) else {
                warn!("New ROM ends mid-word at offset 0x{:X}", rom_offset);
                break;
            };

            self.write_output(output, &word.to_le_bytes())?;
            self.summary.aux_bytes_written += 4;
            self.read_input_word(input)?;
            rom_offset += 4;
        }

        Ok(())
    }

    /// Phase 3: copy the remaining savestate unchanged
    fn copy_tail<R: Read, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        let copied = io::copy(input, output)?;
        self.input_pos += copied;
        self.output_pos += copied;
        self.summary.tail_bytes_copied = copied;
        debug!("Copied 0x{:X} trailing savestate bytes", copied);
        Ok(())
    }

    /// RDRAM address of the word about to be written
    fn current_mem_address(&self) -> u32 {
        address::to_mem_address(self.output_pos as u32)
    }

    fn read_input_word<R: Read>(&mut self, input: &mut R) -> Result<[u8; 4]> {
        let mut word = [0u8; 4];
        input.read_exact(&mut word).map_err(|e| {
            if e.kind() == IoErrorKind::UnexpectedEof {
                Error::SavestateTruncated {
                    offset: self.input_pos,
                }
            } else {
                Error::Io(e)
            }
        })?;
        self.input_pos += 4;
        Ok(word)
    }

    fn write_output<W: Write>(&mut self, output: &mut W, word: &[u8; 4]) -> Result<()> {
        output.write_all(word)?;
        self.output_pos += 4;
        Ok(())
    }
}
