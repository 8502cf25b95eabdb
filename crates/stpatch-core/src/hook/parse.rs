//! Hook file parsing
//!
//! Each non-empty line declares one hook:
//!
//! ```text
//! <target function> <replacement function> <max size>
//! ```
//!
//! The size accepts decimal, `0x` hex or leading-`0` octal and must be a
//! non-zero multiple of 4. Lines starting with `#` are comments.

use std::io::BufRead;

use tracing::debug;

use super::utils::{decode_line, parse_integer_token};
use super::{HookRecord, HookTable, MAX_LINE_LEN};
use crate::address::layout::rdram::WORD;
use crate::error::{Error, Result};

impl HookTable {
    /// Build a hook table from a hook file stream
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = HookTable::new();

        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let line = decode_line(&line);
            let line_no = index + 1;

            if line.len() > MAX_LINE_LEN {
                return Err(Error::LineTooLong {
                    line: line_no,
                    len: line.len(),
                    max: MAX_LINE_LEN,
                });
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut record = parse_hook_line(trimmed, line_no)?;
            record.line = line_no;
            debug!(
                "Hook line {}: {} <- {} (max 0x{:X} bytes)",
                line_no, record.target_name, record.replacement_name, record.max_patch_size
            );
            table.push(record)?;
        }

        Ok(table)
    }
}

fn parse_hook_line(line: &str, line_no: usize) -> Result<HookRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [target, replacement, size] = fields[..] else {
        return Err(Error::InvalidHookLine {
            line: line_no,
            content: line.to_string(),
        });
    };

    let max_patch_size = parse_integer_token(size)
        .and_then(|value| u32::try_from(value).ok())
        .filter(|&value| value != 0 && value % WORD == 0)
        .ok_or_else(|| Error::InvalidHookSize {
            line: line_no,
            size: size.to_string(),
        })?;

    Ok(HookRecord::new(target, replacement, max_patch_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hook::MAX_HOOKS;

    fn parse(text: &str) -> Result<HookTable> {
        HookTable::parse(text.as_bytes())
    }

    #[test]
    fn test_parse_hook_file() {
        let table = parse(
            "func_80246050 custom_func_a 0x10\n\
             \n\
             # comment line\n\
             func_802F3C80\tcustom_func_b   64\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let hooks = table.records();
        assert_eq!(hooks[0].target_name, "func_80246050");
        assert_eq!(hooks[0].replacement_name, "custom_func_a");
        assert_eq!(hooks[0].max_patch_size, 0x10);
        assert_eq!(hooks[0].line, 1);
        assert_eq!(hooks[0].target_address, None);
        assert_eq!(hooks[1].target_name, "func_802F3C80");
        assert_eq!(hooks[1].max_patch_size, 64);
        assert_eq!(hooks[1].line, 4);
    }

    #[test]
    fn test_parse_empty_file() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n\n   \n").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        for size in ["0", "6", "0x2", "abc", "16abc", "-16", "0x100000000"] {
            let err = parse(&format!("target replacement {}\n", size)).unwrap_err();
            assert!(
                matches!(err, Error::InvalidHookSize { line: 1, .. }),
                "size {} gave {:?}",
                size,
                err
            );
            assert_eq!(err.kind(), ErrorKind::HookSpec);
        }
    }

    #[test]
    fn test_accepts_word_multiples() {
        for size in ["4", "8", "0x20", "0X400", "020"] {
            let table = parse(&format!("target replacement {}\n", size)).unwrap();
            assert_eq!(table.records()[0].max_patch_size % 4, 0);
        }
    }

    #[test]
    fn test_rejects_wrong_field_count() {
        assert!(matches!(
            parse("only_two fields\n"),
            Err(Error::InvalidHookLine { line: 1, .. })
        ));
        assert!(matches!(
            parse("a b 4\none two three four\n"),
            Err(Error::InvalidHookLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_long_line() {
        let line = format!("{} replacement 4\n", "t".repeat(MAX_LINE_LEN));
        assert!(matches!(
            parse(&line),
            Err(Error::LineTooLong { line: 1, .. })
        ));
    }

    #[test]
    fn test_accepts_line_at_length_limit() {
        let target = "t".repeat(MAX_LINE_LEN - " r 4".len());
        let table = parse(&format!("{} r 4\n", target)).unwrap();
        assert_eq!(table.records()[0].target_name, target);
    }

    #[test]
    fn test_crlf_and_non_utf8_lines() {
        let table = HookTable::parse(&b"# \xFF note\r\nfunc_a custom_a 0x10\r\n"[..]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].max_patch_size, 0x10);
    }

    #[test]
    fn test_rejects_too_many_hooks() {
        let text: String = (0..=MAX_HOOKS)
            .map(|i| format!("target_{} replacement_{} 4\n", i, i))
            .collect();
        assert!(matches!(parse(&text), Err(Error::TooManyHooks { .. })));
    }
}
