/*!
 * Consumption Log
 * Append-only record of tokens removed by successful waits
 */

use crate::core::types::Token;
use serde::{Deserialize, Serialize};

/// Tokens consumed by successful waits, in consumption order
///
/// Tokens skipped by a loose match are never recorded.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumptionLog {
    tokens: Vec<Token>,
}

impl ConsumptionLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Copy of the recorded tokens
    pub fn snapshot(&self) -> Vec<Token> {
        self.tokens.clone()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
