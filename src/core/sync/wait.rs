/*!
 * Guarded Wait Engine
 *
 * One lock, one condition variable and one store: the shared machinery
 * behind every command channel. Producers mutate the store under the lock
 * and broadcast; consumers poll a match rule under the lock and idle with
 * the lock released between polls.
 *
 * # Retry Protocol
 *
 * Each wait starts with a budget read from the live configuration:
 *
 * 1. **Match**: the rule succeeds, the token is removed and the wait returns
 * 2. **Empty store**: nothing to look at yet. With a zero idle duration the
 *    waiter blocks on the condition variable, otherwise it sleeps for the
 *    idle duration. Neither consumes budget, except that a blocked waiter
 *    which sees no notification at all for `EMPTY_STORE_WAIT` counts that
 *    silent window as one attempt so a drained script fails instead of
 *    hanging.
 * 3. **Mismatch**: tokens exist but the rule rejects them. One attempt is
 *    consumed; at zero the wait fails, otherwise it backs off for
 *    `MISMATCH_BACKOFF` and polls again.
 */

use super::config::{ConsistencyModel, SharedConfig, WaitConfig};
use crate::core::errors::{CommandError, CommandResult};
use crate::core::limits::{EMPTY_STORE_WAIT, MISMATCH_BACKOFF};
use crate::core::types::{caller_label, Token};
use crate::monitoring::{ChannelMetrics, ChannelStats, WaitSpan};
use crate::record::ConsumptionLog;
use crate::store::{Matched, PendingSnapshot, TokenStore};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::thread;
use tracing::{error, trace};

/// State protected by the channel lock
#[derive(Debug)]
pub struct Ledger<S> {
    pub store: S,
    /// Present only on channels that record consumption
    pub consumed: Option<ConsumptionLog>,
}

/// Guarded store with the wait/match/retry protocol
pub struct Guarded<S: TokenStore> {
    model: ConsistencyModel,
    state: Mutex<Ledger<S>>,
    signal: Condvar,
    config: SharedConfig,
    metrics: ChannelMetrics,
}

impl<S: TokenStore> Guarded<S> {
    /// Create an engine around `store`; `record` enables the consumption log
    pub fn new(model: ConsistencyModel, store: S, config: WaitConfig, record: bool) -> Self {
        Self {
            model,
            state: Mutex::new(Ledger {
                store,
                consumed: record.then(ConsumptionLog::new),
            }),
            signal: Condvar::new(),
            config: SharedConfig::new(config),
            metrics: ChannelMetrics::new(),
        }
    }

    #[inline]
    pub fn model(&self) -> ConsistencyModel {
        self.model
    }

    #[inline]
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn stats(&self) -> ChannelStats {
        self.metrics.snapshot()
    }

    /// Empty the store and the consumption log, then wake every waiter
    pub fn reset(&self) {
        let mut ledger = self.state.lock();
        ledger.store.clear();
        if let Some(log) = ledger.consumed.as_mut() {
            log.clear();
        }
        self.signal.notify_all();
    }

    /// Append tokens in order and wake every waiter
    pub fn feed<I>(&self, tokens: I)
    where
        I: IntoIterator,
        I::Item: Into<Token>,
    {
        self.feed_if(|| true, tokens);
    }

    /// Append tokens only if `gate` still holds once the lock is taken
    ///
    /// Returns whether the tokens were fed.
    pub fn feed_if<I>(&self, gate: impl FnOnce() -> bool, tokens: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Token>,
    {
        let mut ledger = self.state.lock();
        if !gate() {
            return false;
        }
        let mut count = 0usize;
        for token in tokens {
            ledger.store.insert(token.into());
            count += 1;
        }
        self.metrics.record_fed(count);
        trace!(model = self.model.as_str(), count, pending = ledger.store.len(), "tokens fed");
        self.signal.notify_all();
        true
    }

    /// Run `f` against the ledger under the lock without waking anyone
    pub fn with_ledger<R>(&self, f: impl FnOnce(&mut Ledger<S>) -> R) -> R {
        let mut ledger = self.state.lock();
        f(&mut ledger)
    }

    pub fn pending(&self) -> PendingSnapshot {
        self.state.lock().store.snapshot()
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Block until `rule` matches `expected`, or fail once the budget is spent
    ///
    /// `rule` runs under the lock and must remove the token it reports.
    pub fn wait_with<F>(
        &self,
        rule_name: &'static str,
        caller: &str,
        expected: &str,
        mut rule: F,
    ) -> CommandResult<()>
    where
        F: FnMut(&mut S, &str) -> Option<Matched>,
    {
        let mut span = WaitSpan::new(self.model, rule_name, caller, expected);
        let fail_budget = self.config.fail_budget();
        let mut remaining = fail_budget;
        let mut attempts = 0u32;

        let mut ledger = self.state.lock();
        loop {
            if let Some(matched) = rule(&mut ledger.store, expected) {
                let discarded = matched.discarded;
                if let Some(log) = ledger.consumed.as_mut() {
                    log.record(matched.token);
                }
                self.metrics.record_consumed(discarded);
                self.signal.notify_all();
                drop(ledger);
                span.record_matched(attempts, discarded);
                return Ok(());
            }

            if ledger.store.is_empty() {
                let idle = self.config.idle();
                if !idle.is_zero() {
                    MutexGuard::unlocked(&mut ledger, || thread::sleep(idle));
                    continue;
                }
                if !self
                    .signal
                    .wait_for(&mut ledger, EMPTY_STORE_WAIT)
                    .timed_out()
                {
                    continue;
                }
                // Silent window: no producer touched the store.
                if !ledger.store.is_empty() {
                    continue;
                }
            }

            attempts += 1;
            remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                let err = CommandError::Exhausted {
                    caller: caller_label(caller).to_string(),
                    expected: expected.to_string(),
                    seen: ledger.store.head().map(str::to_owned),
                    fail_budget,
                    model: self.model,
                };
                let pending = ledger.store.snapshot();
                drop(ledger);
                span.record_failed(attempts);
                self.report_failure(&err, &pending);
                return Err(err);
            }

            MutexGuard::unlocked(&mut ledger, || thread::sleep(MISMATCH_BACKOFF));
        }
    }

    /// Write failure detail to the diagnostics channel before it is returned
    pub(crate) fn report_failure(&self, err: &CommandError, pending: &PendingSnapshot) {
        self.metrics.record_failure();
        error!(model = self.model.as_str(), pending = pending.len(), "{}", err);
        eprintln!("[faircmd][ERROR] {}", err);
        eprintln!("{}", pending);
    }

    /// Count a failure that did not go through `wait_with`
    pub(crate) fn record_failure(&self) {
        self.metrics.record_failure();
    }
}
