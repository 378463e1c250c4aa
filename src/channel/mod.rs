/*!
 * Command Channels
 *
 * Three interchangeable consistency models behind one capability set
 * (reset, configure, feed, wait, inspect):
 *
 * - `StrictChannel`: ordered, a wait matches only the head
 * - `PresenceChannel`: unordered bag, a wait matches any present instance
 * - `HybridChannel`: ordered with a live stdin feeder, loose waits and a
 *   consumption log for replay
 *
 * `Channel` selects one of them at construction time and dispatches
 * statically.
 *
 * # Example
 *
 * ```
 * use faircmd::{CommandChannel, StrictChannel, WaitConfig};
 *
 * let channel = StrictChannel::new(WaitConfig::deterministic());
 * channel.feed(["go", "promote", "stop"]);
 *
 * channel.wait_for("worker", "go").unwrap();
 * channel.wait_for("worker", "promote").unwrap();
 * channel.wait_for("worker", "stop").unwrap();
 * ```
 */

mod dispatch;
mod hybrid;
mod presence;
mod strict;
mod traits;

pub use dispatch::{Channel, ENV_MODE};
pub use hybrid::HybridChannel;
pub use presence::PresenceChannel;
pub use strict::StrictChannel;
pub use traits::CommandChannel;
