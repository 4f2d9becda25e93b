use crate::error::{Error, Result};
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Occurrence counts per symbol. Symbols with a zero count are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize + Symbol",
    deserialize = "S: Deserialize<'de> + Symbol"
))]
pub struct FrequencyTable<S: Symbol> {
    counts: BTreeMap<S, u64>,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Counts every symbol of `stream`.
    pub fn tally(stream: impl IntoIterator<Item = S>) -> Result<Self> {
        Self::try_from_iter(stream.into_iter().map(|s| (s, 1)))
    }

    /// Collects `(symbol, count)` pairs, adding up repeated symbols.
    pub fn try_from_iter(iter: impl IntoIterator<Item = (S, u64)>) -> Result<Self> {
        let mut table = Self::new();
        for (s, count) in iter {
            table.insert(s, count)?;
        }

        Ok(table)
    }

    /// Adds `count` occurrences of `symbol`. Fails if the symbol's count
    /// would no longer fit in a `u64`.
    pub fn insert(&mut self, symbol: S, count: u64) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        let entry = self.counts.entry(symbol).or_default();
        *entry = entry.checked_add(count).ok_or(Error::WeightOverflow)?;

        Ok(())
    }

    pub fn get(&self, symbol: &S) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols with a nonzero count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> Result<u64> {
        self.counts
            .values()
            .try_fold(0u64, |acc, &c| acc.checked_add(c))
            .ok_or(Error::WeightOverflow)
    }

    /// Iterates in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, u64)> + '_ {
        self.counts.iter().map(|(s, &c)| (s, c))
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable<u8> {
    /// Builds a byte table from an array of counts indexed by byte value.
    /// Entries past index 255 are ignored.
    pub fn from_counts(counts: &[u64]) -> Self {
        Self {
            counts: counts
                .iter()
                .zip(0..=u8::MAX)
                .filter(|&(&count, _)| count > 0)
                .map(|(&count, byte)| (byte, count))
                .collect(),
        }
    }
}

impl<S: Symbol> IntoIterator for FrequencyTable<S> {
    type Item = (S, u64);
    type IntoIter = btree_map::IntoIter<S, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_symbols() {
        let t = FrequencyTable::tally("abracadabra".chars()).unwrap();
        assert_eq!(t.get(&'a'), 5);
        assert_eq!(t.get(&'b'), 2);
        assert_eq!(t.get(&'z'), 0);
        assert_eq!(t.len(), 5);
        assert_eq!(t.total().unwrap(), 11);
    }

    #[test]
    fn zero_counts_are_dropped() {
        let t = FrequencyTable::<u8>::try_from_iter([(1, 0), (2, 3), (3, 0)]).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.iter().collect::<Vec<_>>(), vec![(&2, 3)]);
    }

    #[test]
    fn from_counts_indexes_by_byte() {
        let mut counts = vec![0u64; 256];
        counts[b'A' as usize] = 5;
        counts[b'z' as usize] = 1;
        let t = FrequencyTable::from_counts(&counts);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(&b'A'), 5);
        assert_eq!(t.get(&b'z'), 1);
    }

    #[test]
    fn iterates_in_symbol_order() {
        let t = FrequencyTable::tally([3u8, 1, 2, 1]).unwrap();
        let order: Vec<u8> = t.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn count_overflow_is_an_error() {
        let mut t = FrequencyTable::new();
        t.insert(1u8, u64::MAX).unwrap();
        assert!(matches!(t.insert(1, 1), Err(Error::WeightOverflow)));
        assert_eq!(t.get(&1), u64::MAX);
    }

    #[test]
    fn total_overflow_is_an_error() {
        let t = FrequencyTable::<u8>::try_from_iter([(1, u64::MAX), (2, 1)]).unwrap();
        assert!(matches!(t.total(), Err(Error::WeightOverflow)));
    }

    #[test]
    fn serde_roundtrip() {
        let t = FrequencyTable::tally(b"hello".iter().copied()).unwrap();
        let bytes = rmp_serde::to_vec(&t).unwrap();
        let back: FrequencyTable<u8> = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, t);
    }
}
