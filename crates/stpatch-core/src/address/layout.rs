//! Memory layout constants for the N64 RDRAM, ROM and savestate images
//!
//! This module centralizes the fixed constants used to translate between
//! the three coordinate spaces. Constants are organized by image type.

/// RDRAM (live memory) layout
pub mod rdram {
    /// Word size (4 bytes / 32-bit integer)
    pub const WORD: u32 = 4;

    /// Start of the custom code segment (Expansion Pak RAM)
    pub const AUX_SEGMENT_BASE: u32 = 0x8040_0000;

    /// End of the custom code segment (exclusive)
    pub const AUX_SEGMENT_END: u32 = 0x8080_0000;

    /// Segment bits of a virtual address
    pub const SEGMENT_MASK: u32 = 0xF000_0000;

    /// KSEG0 marker bit of a live (cached, unmapped) address
    pub const KSEG0_BIT: u32 = 0x8000_0000;
}

/// Savestate layout (decompressed stream)
pub mod savestate {
    /// Offset of the RDRAM snapshot from the start of the savestate
    pub const RDRAM_OFFSET: u32 = 0x1B0;
}

/// ROM image layout (big-endian .z64)
pub mod rom {
    /// Size of the ROM header and boot code, skipped by the diff check
    pub const HEADER_SIZE: u32 = 0x1000;

    /// Offset of the big-endian runtime entry address
    pub const ENTRY_POINT_OFFSET: usize = 0x8;

    /// Trailing padding value of an unused ROM area
    pub const PADDING_BYTE: u8 = 0xFF;
}
