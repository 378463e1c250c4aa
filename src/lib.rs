/*!
 * faircmd
 *
 * Token-driven coordination for tests and demos: threads block until a
 * named command token is available, then consume it. No fixed sleeps.
 *
 * Three consistency models share one interface (`CommandChannel`):
 * strict ordered, unordered presence, and a hybrid that merges a script
 * with live stdin input and records what it consumed.
 */

pub mod channel;
pub mod core;
pub mod feeder;
pub mod monitoring;
pub mod record;
pub mod store;

// Re-exports
pub use channel::{Channel, CommandChannel, HybridChannel, PresenceChannel, StrictChannel};
pub use crate::core::errors::{CommandError, CommandResult};
pub use crate::core::sync::{ConsistencyModel, WaitConfig};
pub use crate::core::types::{normalize_token, Token};
pub use feeder::{load_script, load_script_file, tokenize_line, LiveFeeder};
pub use monitoring::{init_tracing, ChannelStats};
pub use record::{emit_replay_code, parse_replay, ReplayError, ReplayMode};
pub use store::PendingSnapshot;
