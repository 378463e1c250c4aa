/*!
 * Ordered Store
 * Arrival-ordered token sequence
 */

use super::traits::{Matched, PendingSnapshot, TokenStore};
use crate::core::types::Token;
use std::collections::VecDeque;

/// Arrival-ordered token sequence
///
/// Only the head can be taken by a strict match. A loose match takes the
/// first occurrence of the target and drops everything in front of it;
/// dropped tokens are gone for good.
#[derive(Debug, Default, Clone)]
pub struct OrderedStore {
    tokens: VecDeque<Token>,
}

impl OrderedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the head if it equals `expected`
    pub fn take_head(&mut self, expected: &str) -> Option<Matched> {
        if self.tokens.front().map(String::as_str) != Some(expected) {
            return None;
        }
        self.tokens.pop_front().map(Matched::exact)
    }

    /// Remove the first occurrence of `expected` together with every token before it
    pub fn take_through(&mut self, expected: &str) -> Option<Matched> {
        let pos = self.tokens.iter().position(|t| t == expected)?;
        let discarded = self.tokens.drain(..pos).count();
        self.tokens.pop_front().map(|token| Matched { token, discarded })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl TokenStore for OrderedStore {
    #[inline]
    fn insert(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    fn clear(&mut self) {
        self.tokens.clear();
    }

    #[inline]
    fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    fn head(&self) -> Option<&str> {
        self.tokens.front().map(String::as_str)
    }

    fn snapshot(&self) -> PendingSnapshot {
        PendingSnapshot::Ordered(self.tokens.iter().cloned().collect())
    }
}
