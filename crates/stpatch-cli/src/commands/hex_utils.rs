//! Hex address parsing and formatting utilities.

use anyhow::{Result, anyhow};

/// Parse a 32-bit hex address string (with or without 0x prefix).
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_hex_address("0x80246000").unwrap(), 0x80246000);
/// assert_eq!(parse_hex_address("1000").unwrap(), 0x1000);
/// assert_eq!(parse_hex_address("0X1000").unwrap(), 0x1000);
/// ```
pub fn parse_hex_address(s: &str) -> Result<u32> {
    let digits = s
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .replace('_', "");
    u32::from_str_radix(&digits, 16).map_err(|e| anyhow!("Invalid hex address '{}': {}", s, e))
}

/// Format an address as an 8-digit hex string with 0x prefix.
pub fn format_hex_address(addr: u32) -> String {
    format!("0x{:08X}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_address_with_prefix() {
        assert_eq!(parse_hex_address("0x1000").unwrap(), 0x1000);
        assert_eq!(parse_hex_address("0X1000").unwrap(), 0x1000);
        assert_eq!(parse_hex_address("0x8040_0000").unwrap(), 0x8040_0000);
    }

    #[test]
    fn test_parse_hex_address_without_prefix() {
        assert_eq!(parse_hex_address("1000").unwrap(), 0x1000);
        assert_eq!(parse_hex_address("DEADBEEF").unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_parse_hex_address_invalid() {
        assert!(parse_hex_address("GHIJK").is_err());
        assert!(parse_hex_address("0xZZZ").is_err());
        assert!(parse_hex_address("0x180000000").is_err());
        assert!(parse_hex_address("").is_err());
    }

    #[test]
    fn test_format_hex_address() {
        assert_eq!(format_hex_address(0x8040_0000), "0x80400000");
        assert_eq!(format_hex_address(0x1B0), "0x000001B0");
    }
}
