/*!
 * Guarded Token Stores
 *
 * Storage backends for command tokens. Stores are plain data structures;
 * mutual exclusion and wake-ups are provided by the wait engine that owns
 * them (see `core::sync::Guarded`).
 *
 * - `OrderedStore`: arrival-ordered sequence (strict and hybrid channels)
 * - `BagStore`: unordered multiset with per-token counts (presence channel)
 */

mod bag;
mod ordered;
mod traits;

pub use bag::BagStore;
pub use ordered::OrderedStore;
pub use traits::{Matched, PendingSnapshot, TokenStore};
