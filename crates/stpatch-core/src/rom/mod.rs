//! Big-endian N64 ROM images and the baseline/modified diff check.

mod verify;

use std::fs;
use std::path::Path;

use crate::address::layout::rom;
use crate::error::{Error, Result};

pub use verify::{RomDiff, verify_rom_diff};

/// A ROM image loaded into memory
#[derive(Debug, Clone)]
pub struct RomImage {
    data: Vec<u8>,
    padded_end: usize,
}

impl RomImage {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < rom::ENTRY_POINT_OFFSET + 4 {
            return Err(Error::RomTooSmall { len: data.len() });
        }
        let padded_end = find_padded_end(&data);
        Ok(Self { data, padded_end })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Runtime entry address from the ROM header
    pub fn entry_point(&self) -> u32 {
        // from_bytes guarantees the header word is present
        self.read_word(rom::ENTRY_POINT_OFFSET).unwrap_or_default()
    }

    /// Offset just past the last byte that is not trailing padding
    pub fn padded_end(&self) -> usize {
        self.padded_end
    }

    /// Read the big-endian word at `offset`, if the image holds all 4 bytes
    pub fn read_word(&self, offset: usize) -> Option<u32> {
        let end = offset.checked_add(4)?;
        let bytes = self.data.get(offset..end)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

fn find_padded_end(data: &[u8]) -> usize {
    data.iter()
        .rposition(|&b| b != rom::PADDING_BYTE)
        .map_or(0, |pos| pos + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(len: usize, content: &[u8]) -> Vec<u8> {
        let mut data = vec![rom::PADDING_BYTE; len];
        data[..content.len()].copy_from_slice(content);
        data
    }

    #[test]
    fn test_entry_point_is_big_endian() {
        let rom = RomImage::from_bytes(image(
            0x20,
            &[0x80, 0x37, 0x12, 0x40, 0, 0, 0, 0x0F, 0x80, 0x24, 0x60, 0x00],
        ))
        .unwrap();
        assert_eq!(rom.entry_point(), 0x8024_6000);
    }

    #[test]
    fn test_padded_end() {
        let mut data = image(0x40, &[0x12; 0x10]);
        data[0x1A] = 0x00;
        let rom = RomImage::from_bytes(data).unwrap();
        assert_eq!(rom.padded_end(), 0x1B);
    }

    #[test]
    fn test_padded_end_without_padding() {
        let rom = RomImage::from_bytes(vec![0u8; 0x20]).unwrap();
        assert_eq!(rom.padded_end(), 0x20);
    }

    #[test]
    fn test_padded_end_all_padding() {
        let rom = RomImage::from_bytes(vec![rom::PADDING_BYTE; 0x20]).unwrap();
        assert_eq!(rom.padded_end(), 0);
    }

    #[test]
    fn test_read_word() {
        let rom = RomImage::from_bytes(image(0x10, &[0; 12])).unwrap();
        assert_eq!(rom.read_word(0xC), Some(0xFFFF_FFFF));
        assert_eq!(rom.read_word(0xD), None);
        assert_eq!(rom.read_word(usize::MAX), None);
    }

    #[test]
    fn test_rom_too_small() {
        assert!(matches!(
            RomImage::from_bytes(vec![0; 8]),
            Err(Error::RomTooSmall { len: 8 })
        ));
    }
}
