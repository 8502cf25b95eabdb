//! Translate command implementation.

use anyhow::{Result, bail};
use clap::ValueEnum;
use stpatch_core::address;

use super::hex_utils::{format_hex_address, parse_hex_address};

/// Coordinate space of an address given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AddressSpace {
    /// RDRAM address as seen by the CPU (e.g. 0x80246000)
    Memory,
    /// Offset in the decompressed savestate
    Savestate,
    /// File offset in the ROM image
    Rom,
}

/// Run the translate command
pub fn run(value: &str, from: AddressSpace, entry: Option<&str>) -> Result<()> {
    let value = parse_hex_address(value)?;
    let entry = entry.map(parse_hex_address).transpose()?;

    let mem_addr = match from {
        AddressSpace::Memory => value,
        AddressSpace::Savestate => address::to_mem_address(value),
        AddressSpace::Rom => match entry {
            Some(entry) => address::rom_offset_to_mem_address(value, entry),
            None => bail!("--entry is required to translate a ROM offset"),
        },
    };

    println!("Memory:    {}", format_hex_address(mem_addr));
    println!(
        "Savestate: 0x{:X}",
        address::to_savestate_offset(mem_addr)
    );
    match entry {
        Some(entry) => println!(
            "ROM:       0x{:X} (entry {})",
            address::to_rom_offset(mem_addr, entry),
            format_hex_address(entry)
        ),
        None => println!("ROM:       (pass --entry to compute)"),
    }
    if address::is_in_aux_segment(mem_addr) {
        println!();
        println!("Address lies in the custom code segment");
    }

    Ok(())
}
