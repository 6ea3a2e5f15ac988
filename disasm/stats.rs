//! Mnemonic frequencies of a listing.

use std::{cmp::Reverse, collections::BTreeMap, fmt};

/// Counts of the mnemonics found in a listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every instruction line of a listing.
    pub fn from_listing(text: &str) -> Self {
        let mut stats = Self::new();
        for line in text.lines() {
            stats.add_line(line);
        }
        stats
    }

    /// Count the mnemonic of `line`.
    ///
    /// Returns `false` if the line is not an instruction line or the
    /// instruction was not decoded.
    pub fn add_line(&mut self, line: &str) -> bool {
        let Some(key) = mnemonic_key(line) else {
            return false;
        };
        *self.counts.entry(key).or_default() += 1;
        self.total += 1;
        true
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Keys with their counts, most frequent first.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut list: Vec<_> = self.counts.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        list.sort_by_key(|&(key, count)| (Reverse(count), key));
        list
    }
}

/// Extract the counted key from `"{addr:08X}: {raw} {mnemonic} ..."`.
fn mnemonic_key(line: &str) -> Option<String> {
    let (address, rest) = line.split_once(": ")?;
    if address.len() != 8 || !address.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let mut fields = rest.split_whitespace();
    let raw = fields.next()?;
    if !raw.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let mnemonic = fields.next()?;
    if !mnemonic.bytes().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut key = mnemonic.to_owned();
    if fields.last().map_or(false, |i| i.starts_with('#')) {
        key.push_str("_i");
    }
    Some(key)
}

impl fmt::Display for Statistics {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return writeln!(fmt, "No ARM instructions found in file");
        }
        writeln!(fmt, "Instruction statistics:")?;
        writeln!(fmt)?;
        for (key, count) in self.sorted() {
            let pct = count as f64 / self.total as f64 * 100.0;
            writeln!(fmt, "{key}: {count} ({pct:.2}%)")?;
        }
        Ok(())
    }
}
