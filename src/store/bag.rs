/*!
 * Bag Store
 * Unordered multiset of tokens with remaining counts
 */

use super::traits::{Matched, PendingSnapshot, TokenStore};
use crate::core::types::Token;
use ahash::HashMap;

/// Unordered multiset of tokens
///
/// Entries always hold a positive count; an entry whose count reaches zero
/// is removed.
#[derive(Debug, Default, Clone)]
pub struct BagStore {
    counts: HashMap<Token, usize>,
    total: usize,
}

impl BagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining count for a token
    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Take one instance of `expected` if any is present
    pub fn take(&mut self, expected: &str) -> Option<Matched> {
        let remaining = self.counts.get_mut(expected)?;
        *remaining -= 1;
        let token = if *remaining == 0 {
            self.counts.remove_entry(expected).map(|(token, _)| token)?
        } else {
            expected.to_owned()
        };
        self.total -= 1;
        Some(Matched::exact(token))
    }

    /// Number of distinct tokens
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}

impl TokenStore for BagStore {
    fn insert(&mut self, token: Token) {
        *self.counts.entry(token).or_insert(0) += 1;
        self.total += 1;
    }

    fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }

    #[inline]
    fn len(&self) -> usize {
        self.total
    }

    /// Bags have no head
    fn head(&self) -> Option<&str> {
        None
    }

    fn snapshot(&self) -> PendingSnapshot {
        let mut counts: Vec<(Token, usize)> =
            self.counts.iter().map(|(t, n)| (t.clone(), *n)).collect();
        counts.sort_unstable();
        PendingSnapshot::Bag(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_track_duplicates() {
        let mut bag = BagStore::new();
        for t in ["a", "b", "a"] {
            bag.insert(t.to_string());
        }
        assert_eq!(bag.count("a"), 2);
        assert_eq!(bag.len(), 3);
        assert_eq!(bag.distinct(), 2);
    }

    #[test]
    fn test_take_removes_exhausted_entry() {
        let mut bag = BagStore::new();
        bag.insert("a".into());
        bag.insert("a".into());

        assert!(bag.take("a").is_some());
        assert_eq!(bag.count("a"), 1);
        assert!(bag.take("a").is_some());
        assert_eq!(bag.distinct(), 0);
        assert!(bag.take("a").is_none());
        assert!(bag.is_empty());
    }

    #[test]
    fn test_snapshot_sorted() {
        let mut bag = BagStore::new();
        for t in ["z", "a", "z"] {
            bag.insert(t.to_string());
        }
        assert_eq!(
            bag.snapshot(),
            PendingSnapshot::Bag(vec![("a".into(), 1), ("z".into(), 2)])
        );
    }
}
