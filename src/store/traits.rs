/*!
 * Store Traits
 * Common interface over the ordered and bag token stores
 */

use crate::core::types::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token removed from a store by a successful match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    /// The consumed token
    pub token: Token,
    /// Tokens dropped ahead of the match (loose matching only)
    pub discarded: usize,
}

impl Matched {
    #[inline]
    pub fn exact(token: Token) -> Self {
        Self {
            token,
            discarded: 0,
        }
    }
}

/// Storage behind a command channel
///
/// Implementations are not synchronized; callers hold the channel lock.
pub trait TokenStore: Send + 'static {
    /// Add one token
    fn insert(&mut self, token: Token);

    /// Remove every token
    fn clear(&mut self);

    /// Number of stored tokens (counting duplicates)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Token at the head, for stores that have one
    fn head(&self) -> Option<&str>;

    /// Copy of the pending tokens for diagnostics
    fn snapshot(&self) -> PendingSnapshot;
}

/// Point-in-time view of a store's pending tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tokens", rename_all = "snake_case")]
pub enum PendingSnapshot {
    /// Tokens in arrival order
    Ordered(Vec<Token>),
    /// Distinct tokens with their remaining counts, sorted by token
    Bag(Vec<(Token, usize)>),
}

impl PendingSnapshot {
    /// Total number of pending tokens
    pub fn len(&self) -> usize {
        match self {
            PendingSnapshot::Ordered(tokens) => tokens.len(),
            PendingSnapshot::Bag(counts) => counts.iter().map(|(_, n)| n).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as JSON for structured diagnostics
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Human-readable dump format used by `dump_pending_to_stderr`
impl fmt::Display for PendingSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[faircmd][pending={}] {{", self.len())?;
        match self {
            PendingSnapshot::Ordered(tokens) => {
                for token in tokens {
                    write!(f, " {:?}", token)?;
                }
            }
            PendingSnapshot::Bag(counts) => {
                for (token, count) in counts {
                    write!(f, " {:?}: {}", token, count)?;
                }
            }
        }
        f.write_str(" }")
    }
}
