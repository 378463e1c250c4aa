/*!
 * Monitoring
 * Structured tracing for waits and lightweight per-channel counters
 */

mod metrics;
mod tracer;

pub use metrics::{ChannelMetrics, ChannelStats};
pub use tracer::{generate_trace_id, init_tracing, WaitSpan};
