/*!
 * Hybrid Channel
 *
 * Human + machine channel: an ordered script merged with live stdin input.
 *
 * - Strict waits behave exactly like `StrictChannel`
 * - Loose waits accept a match anywhere in the sequence and **discard every
 *   token in front of it**. Discarded tokens are not recorded and cannot be
 *   recovered; a loose wait can therefore swallow tokens another waiter was
 *   about to consume.
 * - Every token consumed by a successful wait is appended to a consumption
 *   log, which can be rendered as replay code for a deterministic test.
 *
 * # Example
 *
 * ```
 * use faircmd::{CommandChannel, HybridChannel, ReplayMode, WaitConfig};
 *
 * let channel = HybridChannel::new(WaitConfig::deterministic());
 * channel.feed(["x", "y", "hello"]);
 * channel.wait_for_loose("demo", "hello").unwrap();
 *
 * assert_eq!(channel.snapshot_consumed(), vec!["hello".to_string()]);
 * assert_eq!(
 *     channel.emit_replay_code(ReplayMode::Preload, ""),
 *     "channel.feed([\"hello\"]);\n"
 * );
 * ```
 */

use super::traits::CommandChannel;
use crate::core::errors::CommandResult;
use crate::core::sync::{ConsistencyModel, Guarded, SharedConfig, WaitConfig};
use crate::core::types::Token;
use crate::feeder::LiveFeeder;
use crate::monitoring::ChannelStats;
use crate::record::{emit_replay_code, ReplayMode};
use crate::store::{Matched, OrderedStore, PendingSnapshot};
use std::io::{self, BufRead};
use std::sync::Arc;

/// Ordered channel with live input, loose waits and consumption recording
pub struct HybridChannel {
    engine: Arc<Guarded<OrderedStore>>,
    feeder: LiveFeeder<OrderedStore>,
}

impl HybridChannel {
    pub fn new(config: WaitConfig) -> Self {
        let engine = Arc::new(Guarded::new(
            ConsistencyModel::Hybrid,
            OrderedStore::new(),
            config,
            true,
        ));
        Self {
            feeder: LiveFeeder::new(engine.clone()),
            engine,
        }
    }

    /// Wait for `expected` anywhere in the sequence, discarding what precedes it
    pub fn wait_for_loose(&self, caller: &str, expected: &str) -> CommandResult<()> {
        self.engine
            .wait_with("loose", caller, expected, take_loose)
    }

    /// Start pumping stdin lines into the channel; no-op if already running
    pub fn start_live_feeder(&self) -> io::Result<bool> {
        self.feeder.start()
    }

    /// Start pumping lines from a custom source; no-op if already running
    pub fn start_live_feeder_with<R, F>(&self, make_source: F) -> io::Result<bool>
    where
        R: BufRead,
        F: FnOnce() -> R + Send + 'static,
    {
        self.feeder.start_with(make_source)
    }

    /// Stop the live feeder without joining its thread; no-op if not running
    pub fn stop_live_feeder(&self) -> bool {
        self.feeder.stop()
    }

    pub fn is_feeder_running(&self) -> bool {
        self.feeder.is_running()
    }

    /// Tokens consumed by successful waits so far
    pub fn snapshot_consumed(&self) -> Vec<Token> {
        self.engine.with_ledger(|ledger| {
            ledger
                .consumed
                .as_ref()
                .map(|log| log.snapshot())
                .unwrap_or_default()
        })
    }

    /// Forget the consumption log; the store is untouched
    pub fn clear_consumed(&self) {
        self.engine.with_ledger(|ledger| {
            if let Some(log) = ledger.consumed.as_mut() {
                log.clear();
            }
        });
    }

    /// Render the consumption log as pasteable replay code
    pub fn emit_replay_code(&self, mode: ReplayMode, variable: &str) -> String {
        self.engine.with_ledger(|ledger| {
            let tokens = ledger
                .consumed
                .as_ref()
                .map(|log| log.as_slice())
                .unwrap_or_default();
            emit_replay_code(tokens, mode, variable)
        })
    }
}

fn take_loose(store: &mut OrderedStore, expected: &str) -> Option<Matched> {
    store
        .take_head(expected)
        .or_else(|| store.take_through(expected))
}

impl Default for HybridChannel {
    fn default() -> Self {
        Self::new(WaitConfig::default())
    }
}

impl CommandChannel for HybridChannel {
    fn model(&self) -> ConsistencyModel {
        ConsistencyModel::Hybrid
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
