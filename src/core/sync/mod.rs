/*!
 * Synchronization
 *
 * The wait/notify machinery shared by every command channel:
 * - `Guarded`: one lock + one condition variable around one token store
 * - `SharedConfig`: fail budget and idle duration, readable on every poll
 * - `ConsistencyModel`: which matching semantics a channel uses
 *
 * # Use Cases
 *
 * - **Scripted tests**: block until the script reaches a token, fail fast
 *   when the script and the code disagree
 * - **Interactive demos**: poll gently while a human types tokens
 */

mod config;
mod wait;

pub use config::{ConsistencyModel, SharedConfig, WaitConfig, ENV_FAIL_BUDGET, ENV_IDLE_MS};
pub use wait::{Guarded, Ledger};
