/*!
 * Limits and Constants
 *
 * Centralized location for the default budgets, pacing intervals and
 * thresholds used by the command channels.
 */

use std::time::Duration;

// =============================================================================
// WAIT PROTOCOL
// =============================================================================

/// Default number of unsuccessful polls a wait tolerates before failing
pub const DEFAULT_FAIL_BUDGET: u32 = 1000;

/// Fail budget used by the interactive preset (humans type slowly)
pub const INTERACTIVE_FAIL_BUDGET: u32 = 100_000;

/// Idle duration used by the interactive preset
pub const INTERACTIVE_IDLE: Duration = Duration::from_millis(5);

/// Fixed backoff after a mismatch on a non-empty store
/// [PERF] Long enough to let a producer or a competing consumer take the lock
pub const MISMATCH_BACKOFF: Duration = Duration::from_millis(1);

/// Longest a waiter blocks on an empty store without any notification
/// before the silent window is counted as one failed attempt
pub const EMPTY_STORE_WAIT: Duration = Duration::from_millis(10);

/// Waits slower than this are reported with a warning
pub const SLOW_WAIT_THRESHOLD: Duration = Duration::from_secs(1);

// =============================================================================
// LIVE FEEDER
// =============================================================================

/// Pause after end-of-input or a read error before polling the source again
pub const FEEDER_EOF_BACKOFF: Duration = Duration::from_millis(10);

/// Name given to the background feeder thread
pub const FEEDER_THREAD_NAME: &str = "faircmd-feeder";

// =============================================================================
// REPLAY EMISSION
// =============================================================================

/// Default variable name for `ReplayMode::Vector`
pub const DEFAULT_REPLAY_VARIABLE: &str = "script";
