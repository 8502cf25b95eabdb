//! Check that a rebuilt ROM only differs from the stock ROM past the stock
//! image's padded end (the appended custom segment).

use serde::Serialize;
use tracing::{debug, info};

use super::RomImage;
use crate::address::layout::rom;
use crate::error::{Error, Result};

/// Logical ends of both images, as found by the diff check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RomDiff {
    pub baseline_end: usize,
    pub modified_end: usize,
}

impl RomDiff {
    /// Number of bytes appended after the baseline's padded end
    pub fn appended_len(&self) -> usize {
        self.modified_end.saturating_sub(self.baseline_end)
    }
}

/// Compare both images between the header and the baseline's padded end.
///
/// The header is skipped since the ROM checksum legitimately changes.
pub fn verify_rom_diff(baseline: &RomImage, modified: &RomImage) -> Result<RomDiff> {
    let diff = RomDiff {
        baseline_end: baseline.padded_end(),
        modified_end: modified.padded_end(),
    };
    debug!(
        "Base ROM ends at 0x{:X}, new ROM ends at 0x{:X}",
        diff.baseline_end, diff.modified_end
    );

    if modified.len() < diff.baseline_end {
        return Err(Error::RomTruncated {
            expected: diff.baseline_end,
            actual: modified.len(),
        });
    }

    let start = (rom::HEADER_SIZE as usize).min(diff.baseline_end);
    let base = &baseline.as_bytes()[start..diff.baseline_end];
    let new = &modified.as_bytes()[start..diff.baseline_end];

    if let Some(pos) = base.iter().zip(new).position(|(a, b)| a != b) {
        return Err(Error::UnexpectedRomDifference {
            offset: start + pos,
            baseline: base[pos],
            modified: new[pos],
        });
    }

    info!(
        "ROM diff verified: 0x{:X} bytes appended (0x{:X}..0x{:X})",
        diff.appended_len(),
        diff.baseline_end,
        diff.modified_end
    );
    Ok(diff)
}
