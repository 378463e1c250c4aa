/*!
 * Strict Channel
 * Ordered script where a wait only matches the head
 */

use super::traits::CommandChannel;
use crate::core::errors::CommandResult;
use crate::core::sync::{ConsistencyModel, Guarded, SharedConfig, WaitConfig};
use crate::core::types::Token;
use crate::monitoring::ChannelStats;
use crate::store::{OrderedStore, PendingSnapshot};

/// Deterministic FIFO channel for CI and protocol tests
///
/// A wait succeeds only when its token is at the head of the sequence.
/// Anything else at the head burns one attempt of the fail budget, so a
/// script that disagrees with the code fails instead of reordering.
pub struct StrictChannel {
    engine: Guarded<OrderedStore>,
}

impl StrictChannel {
    pub fn new(config: WaitConfig) -> Self {
        Self {
            engine: Guarded::new(ConsistencyModel::Strict, OrderedStore::new(), config, false),
        }
    }
}

impl Default for StrictChannel {
    fn default() -> Self {
        Self::new(WaitConfig::default())
    }
}

impl CommandChannel for StrictChannel {
    fn model(&self) -> ConsistencyModel {
        ConsistencyModel::Strict
    }

    fn shared_config(&self) -> &SharedConfig {
        self.engine.config()
    }

    fn reset(&self) {
        self.engine.reset();
    }

    fn feed<I>(&self, tokens: I)
    where
        I: IntoIterator,
        I::Item: Into<Token>,
    {
        self.engine.feed(tokens);
    }

    fn wait_for(&self, caller: &str, expected: &str) -> CommandResult<()> {
        self.engine
            .wait_with("strict", caller, expected, OrderedStore::take_head)
    }

    fn pending(&self) -> PendingSnapshot {
        self.engine.pending()
    }

    fn stats(&self) -> ChannelStats {
        self.engine.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_only() {
        let channel = StrictChannel::new(WaitConfig::default().with_fail_budget(3));
        channel.feed(["a", "b", "c"]);

        assert!(channel.wait_for("t", "b").unwrap_err().is_exhausted());
        channel.wait_for("t", "a").unwrap();
        channel.wait_for("t", "b").unwrap();
        channel.wait_for("t", "c").unwrap();
        assert!(channel.pending().is_empty());
    }

    #[test]
    fn test_push_appends_to_tail() {
        let channel = StrictChannel::default();
        channel.feed(["a"]);
        channel.push("b");
        assert_eq!(
            channel.pending(),
            PendingSnapshot::Ordered(vec!["a".into(), "b".into()])
        );
    }
}
