//! Line and integer parsing helpers for hook and map files

use std::borrow::Cow;

/// Decode one raw line, dropping a trailing `\r`.
///
/// Bytes that are not valid UTF-8 are replaced, so a stray byte in an object
/// path never stops a symbol on another line from matching.
pub fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

/// Parse the longest leading unsigned integer of `s` using C `strtoul`
/// base detection (`0x`/`0X` hex, leading `0` octal, otherwise decimal).
///
/// Leading whitespace is skipped. Returns the value and the unparsed rest,
/// or `None` if no digits were found or the value overflows `u64`.
pub fn parse_leading_integer(s: &str) -> Option<(u64, &str)> {
    let s = s.trim_start();

    let (radix, digits) = if let Some(rest) = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()))
    {
        (16, rest)
    } else if s.starts_with('0') {
        (8, s)
    } else {
        (10, s)
    };

    let len = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }

    let value = u64::from_str_radix(&digits[..len], radix).ok()?;
    Some((value, &digits[len..]))
}

/// Parse a whole token as an unsigned integer with C base detection
pub fn parse_integer_token(token: &str) -> Option<u64> {
    match parse_leading_integer(token) {
        Some((value, rest)) if rest.is_empty() && !token.starts_with(char::is_whitespace) => {
            Some(value)
        }
        _ => None,
    }
}

/// Parse the leading address of a map file line
pub fn parse_map_address(line: &str) -> Option<u32> {
    let (value, _) = parse_leading_integer(line)?;
    u32::try_from(value).ok().filter(|&addr| addr != 0)
}
