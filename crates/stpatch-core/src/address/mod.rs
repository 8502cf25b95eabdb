//! Address translation between ROM file offsets, RDRAM addresses and
//! savestate offsets.
//!
//! All functions are total over `u32` and use wrapping arithmetic; inputs
//! are only masked, never range-checked.

pub mod layout;

use layout::{rdram, rom, savestate};

/// RDRAM address -> offset in the decompressed savestate
pub fn to_savestate_offset(mem_addr: u32) -> u32 {
    (mem_addr & !rdram::SEGMENT_MASK).wrapping_add(savestate::RDRAM_OFFSET)
}

/// Savestate offset -> RDRAM address
pub fn to_mem_address(savestate_offset: u32) -> u32 {
    (savestate_offset | rdram::KSEG0_BIT).wrapping_sub(savestate::RDRAM_OFFSET)
}

/// Link-time RDRAM address -> file offset in the ROM image
pub fn to_rom_offset(mem_addr: u32, rom_entry_point: u32) -> u32 {
    mem_addr
        .wrapping_sub(rom_entry_point)
        .wrapping_add(rom::HEADER_SIZE)
        & !rdram::KSEG0_BIT
}

/// ROM file offset -> link-time RDRAM address
pub fn rom_offset_to_mem_address(rom_offset: u32, rom_entry_point: u32) -> u32 {
    rom_offset
        .wrapping_sub(rom::HEADER_SIZE)
        .wrapping_add(rom_entry_point)
        | rdram::KSEG0_BIT
}

/// Whether an address lies in the custom code segment window
pub fn is_in_aux_segment(mem_addr: u32) -> bool {
    mem_addr >= rdram::AUX_SEGMENT_BASE
}

/// Savestate offset at which the custom code segment begins
pub fn aux_segment_savestate_offset() -> u32 {
    to_savestate_offset(rdram::AUX_SEGMENT_BASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: u32 = 0x8024_6000;

    #[test]
    fn test_to_savestate_offset() {
        assert_eq!(to_savestate_offset(0x8000_0000), 0x1B0);
        assert_eq!(to_savestate_offset(0x8024_6050), 0x0024_6200);
        // Uncached KSEG1 mirror maps to the same offset
        assert_eq!(to_savestate_offset(0xA024_6050), 0x0024_6200);
        assert_eq!(aux_segment_savestate_offset(), 0x0040_01B0);
    }

    #[test]
    fn test_to_mem_address() {
        assert_eq!(to_mem_address(0x1B0), 0x8000_0000);
        assert_eq!(to_mem_address(0x0040_01B0), rdram::AUX_SEGMENT_BASE);
        // The savestate header precedes RDRAM
        assert!(to_mem_address(0) < 0x8000_0000);
    }

    #[test]
    fn test_savestate_round_trip() {
        for addr in (0x8000_0000u32..rdram::AUX_SEGMENT_END).step_by(0x1_2344) {
            assert_eq!(to_mem_address(to_savestate_offset(addr)), addr);
        }
        assert_eq!(
            to_mem_address(to_savestate_offset(rdram::AUX_SEGMENT_END - 4)),
            rdram::AUX_SEGMENT_END - 4
        );
    }

    #[test]
    fn test_to_rom_offset() {
        assert_eq!(to_rom_offset(ENTRY, ENTRY), 0x1000);
        assert_eq!(to_rom_offset(ENTRY + 0x40, ENTRY), 0x1040);
        assert_eq!(to_rom_offset(0x8040_0000, ENTRY), 0x0040_0000 - 0x0024_6000 + 0x1000);
    }

    #[test]
    fn test_rom_round_trip() {
        for offset in (0x1000u32..0x0200_0000).step_by(0x3_0004) {
            let addr = rom_offset_to_mem_address(offset, ENTRY);
            assert_eq!(to_rom_offset(addr, ENTRY), offset);
        }
    }

    #[test]
    fn test_is_in_aux_segment() {
        assert!(!is_in_aux_segment(0x803F_FFFC));
        assert!(is_in_aux_segment(0x8040_0000));
        assert!(is_in_aux_segment(0x8050_1234));
    }
}
