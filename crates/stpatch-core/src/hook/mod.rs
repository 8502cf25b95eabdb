//! Hook table: parsing of the hook file and resolution of hook
//! names against a linker map.
//!
//! A hook redirects a stock function (the target) to a replacement function
//! linked into the custom segment. During injection, up to `max_patch_size`
//! bytes starting at the target address are overwritten with the
//! replacement's code.

mod parse;
mod symbol_map;
mod utils;

use crate::error::{Error, HookRole, Result};

/// Maximum number of hooks in one table
pub const MAX_HOOKS: usize = 1024;

/// Maximum length of a hook or map file line, in characters
pub const MAX_LINE_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRecord {
    pub target_name: String,
    pub replacement_name: String,
    pub target_address: Option<u32>,
    pub replacement_address: Option<u32>,
    pub max_patch_size: u32,
    /// Set once the first word of the target range has been rewritten
    pub injection_started: bool,
    /// 1-based line in the hook file
    pub line: usize,
}

impl HookRecord {
    pub fn new(
        target_name: impl Into<String>,
        replacement_name: impl Into<String>,
        max_patch_size: u32,
    ) -> Self {
        Self {
            target_name: target_name.into(),
            replacement_name: replacement_name.into(),
            target_address: None,
            replacement_address: None,
            max_patch_size,
            injection_started: false,
            line: 0,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.target_address.is_some() && self.replacement_address.is_some()
    }

    /// Whether `mem_addr` lies in `[target, target + max_patch_size)`
    pub fn covers(&self, mem_addr: u32) -> bool {
        match self.target_address {
            Some(start) => {
                let start = u64::from(start);
                let addr = u64::from(mem_addr);
                start <= addr && addr < start + u64::from(self.max_patch_size)
            }
            None => false,
        }
    }

    /// Exclusive end of the target range
    pub fn target_end(&self) -> Option<u64> {
        self.target_address
            .map(|start| u64::from(start) + u64::from(self.max_patch_size))
    }
}

/// Ordered collection of hooks, in declaration order
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    records: Vec<HookRecord>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook, enforcing the table capacity
    pub fn push(&mut self, record: HookRecord) -> Result<()> {
        if self.records.len() == MAX_HOOKS {
            return Err(Error::TooManyHooks { max: MAX_HOOKS });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HookRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[HookRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [HookRecord] {
        &mut self.records
    }

    /// Index of the hook whose target range contains `mem_addr`
    pub fn find_target(&self, mem_addr: u32) -> Option<usize> {
        self.records.iter().position(|hook| hook.covers(mem_addr))
    }

    /// Fail with the first hook (in declaration order) missing an address
    pub fn ensure_resolved(&self) -> Result<()> {
        for hook in &self.records {
            if hook.target_address.is_none() {
                return Err(Error::HookUnresolved {
                    role: HookRole::Target,
                    name: hook.target_name.clone(),
                });
            }
            if hook.replacement_address.is_none() {
                return Err(Error::HookUnresolved {
                    role: HookRole::Replacement,
                    name: hook.replacement_name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Reject target ranges that overlap each other
    pub fn ensure_disjoint(&self) -> Result<()> {
        let mut ranges: Vec<(u64, u64, &str)> = self
            .records
            .iter()
            .filter_map(|hook| {
                let start = u64::from(hook.target_address?);
                Some((start, hook.target_end()?, hook.target_name.as_str()))
            })
            .collect();
        ranges.sort_by_key(|&(start, _, _)| start);

        for pair in ranges.windows(2) {
            let (_, first_end, first) = pair[0];
            let (second_start, _, second) = pair[1];
            if second_start < first_end {
                return Err(Error::OverlappingHooks {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HookTable {
    type Item = &'a HookRecord;
    type IntoIter = std::slice::Iter<'a, HookRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
