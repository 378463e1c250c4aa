/*!
 * Presence Channel
 * Unordered bag where a wait matches any present instance
 */

use super::traits::CommandChannel;
use crate::core::errors::{CommandError, CommandResult};
use crate::core::sync::{ConsistencyModel, Guarded, SharedConfig, WaitConfig};
use crate::core::types::{caller_label, Token};
use crate::monitoring::ChannelStats;
use crate::store::{BagStore, PendingSnapshot};
use std::io::{self, BufRead};
use std::thread;

/// Order-insensitive channel for availability checks
///
/// A wait succeeds as soon as one instance of its token exists, no matter
/// when it arrived. Each success takes exactly one instance.
pub struct PresenceChannel {
    engine: Guarded<BagStore>,
}

impl PresenceChannel {
    pub fn new(config: WaitConfig) -> Self {
        Self {
            engine: Guarded::new(ConsistencyModel::Presence, BagStore::new(), config, false),
        }
    }

    /// Remaining instances of `token`
    pub fn count(&self, token: &str) -> usize {
        self.engine.with_ledger(|ledger| ledger.store.count(token))
    }

    /// Wait for a whole line equal to `expected` on `reader`
    ///
    /// Reads bypass the bag entirely. Each non-matching line burns one
    /// attempt; end of input fails with `InputClosed`.
    pub fn wait_for_line<R: BufRead>(
        &self,
        caller: &str,
        expected: &str,
        reader: &mut R,
    ) -> CommandResult<()> {
        let fail_budget = self.engine.config().fail_budget();
        let mut remaining = fail_budget;
        let mut line = String::new();

        loop {
            line.clear();
            let read = match reader.read_line(&mut line) {
                Ok(n) => n,
                Err(e) => {
                    self.engine.record_failure();
                    return Err(e.into());
                }
            };
            if read == 0 {
                let err = CommandError::InputClosed {
                    caller: caller_label(caller).to_string(),
                    expected: expected.to_string(),
                };
                self.engine.report_failure(&err, &self.engine.pending());
                return Err(err);
            }

            let entered = line.trim_end_matches(['\n', '\r']);
            if entered == expected {
                return Ok(());
            }

            remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                let err = CommandError::Exhausted {
                    caller: caller_label(caller).to_string(),
                    expected: expected.to_string(),
                    seen: Some(entered.to_string()),
                    fail_budget,
                    model: ConsistencyModel::Presence,
                };
                self.engine.report_failure(&err, &self.engine.pending());
                return Err(err);
            }

            let idle = self.engine.config().idle();
            if idle.is_zero() {
                thread::yield_now();
            } else {
                thread::sleep(idle);
            }
        }
    }

    /// `wait_for_line` on stdin
    pub fn wait_for_stdin_line(&self, caller: &str, expected: &str) -> CommandResult<()> {
        self.wait_for_line(caller, expected, &mut io::stdin().lock())
    }
}

impl Default for PresenceChannel {
    fn default() -> Self {
        Self::new(WaitConfig::default())
    }
}

impl CommandChannel for PresenceChannel {
    fn model(&self) -> ConsistencyModel {
        ConsistencyModel::Presence
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
            .wait_with("presence", caller, expected, BagStore::take)
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
    use std::io::Cursor;

    #[test]
    fn test_order_irrelevant() {
        let channel = PresenceChannel::default();
        channel.feed(["world", "hello"]);
        channel.wait_for("t", "hello").unwrap();
        channel.wait_for("t", "world").unwrap();
        assert!(channel.pending().is_empty());
    }

    #[test]
    fn test_line_wait_matches_whole_line() {
        let channel = PresenceChannel::default();
        let mut input = Cursor::new("hello there\nhello\n");
        channel.wait_for_line("t", "hello", &mut input).unwrap();
    }

    #[test]
    fn test_line_wait_input_closed() {
        let channel = PresenceChannel::default();
        let mut input = Cursor::new("nope\r\n");
        let err = channel.wait_for_line("t", "hello", &mut input).unwrap_err();
        assert_eq!(
            err,
            CommandError::InputClosed {
                caller: "t".into(),
                expected: "hello".into()
            }
        );
        assert_eq!(channel.stats().failed_waits, 1);
    }

    #[test]
    fn test_line_wait_budget() {
        let channel = PresenceChannel::new(WaitConfig::default().with_fail_budget(2));
        let mut input = Cursor::new("a\nb\nhello\n");
        let err = channel.wait_for_line("t", "hello", &mut input).unwrap_err();
        assert!(err.to_string().contains("the last line read was \"b\""));
        match err {
            CommandError::Exhausted { seen, .. } => assert_eq!(seen.as_deref(), Some("b")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
