/*!
 * Channel Traits
 * The capability set shared by every consistency model
 */

use crate::core::errors::CommandResult;
use crate::core::sync::{ConsistencyModel, SharedConfig, WaitConfig};
use crate::core::types::Token;
use crate::monitoring::ChannelStats;
use crate::store::PendingSnapshot;
use std::time::Duration;

/// A token channel that producers feed and consumers wait on
///
/// Implementations must be:
/// - **Thread-safe**: every method may be called from any thread
/// - **Broadcasting**: every mutation wakes every blocked waiter
/// - **Atomic per match**: a successful wait removes exactly one occurrence
///
/// Wake-up order among waiters is unspecified; all waiters re-check after
/// every mutation and the first to match wins.
pub trait CommandChannel: Send + Sync {
    /// Consistency model implemented by this channel
    fn model(&self) -> ConsistencyModel;

    /// Live configuration
    fn shared_config(&self) -> &SharedConfig;

    /// Empty the store (and the consumption log, where kept); wake all waiters
    fn reset(&self);

    /// Append tokens in argument order; wake all waiters
    fn feed<I>(&self, tokens: I)
    where
        I: IntoIterator,
        I::Item: Into<Token>;

    /// Block until `expected` can be consumed under this channel's rule
    ///
    /// `caller` only labels diagnostics.
    fn wait_for(&self, caller: &str, expected: &str) -> CommandResult<()>;

    /// Copy of the pending tokens
    fn pending(&self) -> PendingSnapshot;

    /// Traffic counters
    fn stats(&self) -> ChannelStats;

    /// Append one token
    fn push(&self, token: impl Into<Token>) {
        self.feed(std::iter::once(token.into()));
    }

    /// Replace the fail budget and idle duration
    fn configure(&self, config: WaitConfig) {
        self.shared_config().store(config);
    }

    /// Current fail budget and idle duration
    fn config(&self) -> WaitConfig {
        self.shared_config().load()
    }

    fn set_fail_budget(&self, fail_budget: u32) {
        self.shared_config().set_fail_budget(fail_budget);
    }

    fn set_idle(&self, idle: Duration) {
        self.shared_config().set_idle(idle);
    }

    /// Write the pending tokens to stderr
    ///
    /// Diagnostics only; never drive program logic from this output.
    fn dump_pending_to_stderr(&self) {
        eprintln!("{}", self.pending());
    }
}
