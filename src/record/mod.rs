/*!
 * Consumption Recording
 *
 * Keeps the tokens actually consumed by successful waits and renders them
 * as pasteable source so an interactive session can be replayed as a
 * deterministic script.
 */

mod consumed;
mod replay;

pub use consumed::ConsumptionLog;
pub use replay::{emit_replay_code, escape_literal, parse_replay, ReplayError, ReplayMode};
