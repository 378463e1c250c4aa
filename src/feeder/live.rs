/*!
 * Live Feeder
 *
 * Background thread that reads lines from a live source (stdin by default),
 * splits them on whitespace and feeds the tokens into a channel, merging
 * them with anything preloaded or pushed.
 *
 * # Stop Semantics
 *
 * A blocking line read cannot be interrupted by a flag, so `stop()` does not
 * join the thread; it clears the run flag and detaches. The flag is cleared
 * under the channel lock and re-checked under the same lock before every
 * feed, so once `stop()` returns no further token from this run reaches the
 * store while the feeder stays stopped. The detached thread itself lingers until its pending read returns,
 * then exits without feeding the line it got, unless the feeder has been
 * restarted in the meantime.
 *
 * # Restart Hand-off
 *
 * Each run owns its own flag, and the feeder as a whole carries a `live`
 * flag. A thread from a stopped run that is still parked in a read when the
 * feeder is restarted forwards the one line it gets to the channel, then
 * exits. On a shared source such as stdin the new run only acquires the
 * stream once that thread lets go, so no typed line is lost across a
 * restart. Without a restart the line is dropped as above.
 */

use super::script::tokenize_line;
use crate::core::limits::{FEEDER_EOF_BACKOFF, FEEDER_THREAD_NAME};
use crate::core::sync::Guarded;
use crate::store::TokenStore;
use parking_lot::Mutex;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// A running feeder thread and its private run flag
struct FeederRun {
    running: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

/// Two-state (stopped, running) handle for the background line feeder
pub struct LiveFeeder<S: TokenStore> {
    engine: Arc<Guarded<S>>,
    run: Mutex<Option<FeederRun>>,
    /// Set while any run is active; shared with every run's thread
    live: Arc<AtomicBool>,
}

impl<S: TokenStore> LiveFeeder<S> {
    pub fn new(engine: Arc<Guarded<S>>) -> Self {
        Self {
            engine,
            run: Mutex::new(None),
            live: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start feeding from stdin; no-op if already running
    pub fn start(&self) -> io::Result<bool> {
        self.start_with(|| io::stdin().lock())
    }

    /// Start feeding from the source built by `make_source`; no-op if already running
    ///
    /// The source is constructed on the feeder thread. Returns `Ok(false)`
    /// when a feeder was already running.
    pub fn start_with<R, F>(&self, make_source: F) -> io::Result<bool>
    where
        R: BufRead,
        F: FnOnce() -> R + Send + 'static,
    {
        let mut run = self.run.lock();
        if run.is_some() {
            debug!("live feeder already running");
            return Ok(false);
        }

        let running = Arc::new(AtomicBool::new(true));
        let handle = {
            let running = running.clone();
            let live = self.live.clone();
            let engine = self.engine.clone();
            thread::Builder::new()
                .name(FEEDER_THREAD_NAME.to_string())
                .spawn(move || pump_lines(engine, running, live, make_source()))?
        };
        self.engine
            .with_ledger(|_| self.live.store(true, Ordering::Release));

        *run = Some(FeederRun {
            running,
            _handle: handle,
        });
        info!(model = self.engine.model().as_str(), "live feeder started");
        Ok(true)
    }

    /// Stop feeding and detach the thread; no-op if not running
    ///
    /// Returns whether a running feeder was stopped.
    pub fn stop(&self) -> bool {
        let Some(run) = self.run.lock().take() else {
            return false;
        };
        self.engine.with_ledger(|_| {
            run.running.store(false, Ordering::Release);
            self.live.store(false, Ordering::Release);
        });
        // Dropping the handle detaches the thread.
        drop(run);
        info!(model = self.engine.model().as_str(), "live feeder stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.run.lock().is_some()
    }
}

impl<S: TokenStore> Drop for LiveFeeder<S> {
    fn drop(&mut self) {
        if self.is_running() {
            debug!("live feeder dropped while running, stopping");
            self.stop();
        }
    }
}

fn pump_lines<S, R>(
    engine: Arc<Guarded<S>>,
    running: Arc<AtomicBool>,
    live: Arc<AtomicBool>,
    mut source: R,
) where
    S: TokenStore,
    R: BufRead,
{
    let mut line = String::new();
    while running.load(Ordering::Acquire) {
        line.clear();
        match source.read_line(&mut line) {
            Ok(0) => {
                // End of input; some devices produce more later.
                thread::sleep(FEEDER_EOF_BACKOFF);
            }
            Ok(_) => {
                let tokens = tokenize_line(&line);
                if tokens.is_empty() {
                    continue;
                }
                let count = tokens.len();
                let accept = || running.load(Ordering::Acquire) || live.load(Ordering::Acquire);
                if !engine.feed_if(accept, tokens) {
                    debug!(dropped = count, "line arrived after stop, dropped");
                    break;
                }
                if !running.load(Ordering::Acquire) {
                    debug!(count, "line handed to restarted feeder");
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "live input read failed, retrying");
                thread::sleep(FEEDER_EOF_BACKOFF);
            }
        }
    }
    debug!("live feeder thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync::{ConsistencyModel, WaitConfig};
    use crate::store::OrderedStore;
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn engine() -> Arc<Guarded<OrderedStore>> {
        Arc::new(Guarded::new(
            ConsistencyModel::Hybrid,
            OrderedStore::new(),
            WaitConfig::default(),
            true,
        ))
    }

    fn wait_for_pending(engine: &Guarded<OrderedStore>, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while engine.pending_len() < n && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_feeds_tokenized_lines() {
        let engine = engine();
        let feeder = LiveFeeder::new(engine.clone());
        assert!(feeder
            .start_with(|| Cursor::new("hello world\n  again \n"))
            .unwrap());

        wait_for_pending(&engine, 3);
        assert_eq!(
            engine.pending(),
            crate::store::PendingSnapshot::Ordered(vec![
                "hello".into(),
                "world".into(),
                "again".into()
            ])
        );
        assert!(feeder.stop());
    }

    #[test]
    fn test_start_and_stop_idempotent() {
        let engine = engine();
        let feeder = LiveFeeder::new(engine);
        assert!(!feeder.stop());
        assert!(feeder.start_with(|| Cursor::new("")).unwrap());
        assert!(!feeder.start_with(|| Cursor::new("ignored\n")).unwrap());
        assert!(feeder.is_running());
        assert!(feeder.stop());
        assert!(!feeder.stop());
        assert!(!feeder.is_running());
    }
}
