/*!
 * Wait Tracing
 * Structured tracing for waits using the tracing crate
 *
 * Features:
 * - Trace ID per wait for correlating producer and consumer logs
 * - JSON-formatted logs for structured parsing
 * - Slow-wait warnings with attempt counts
 *
 * All output goes to stderr so diagnostics never mix with a host program's
 * primary output stream.
 */

use crate::core::limits::SLOW_WAIT_THRESHOLD;
use crate::core::sync::ConsistencyModel;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Environment variable enabling JSON log output
pub const ENV_TRACE_JSON: &str = "FAIRCMD_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - FAIRCMD_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling this more than once is harmless; only the first call installs
/// a subscriber.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "tracing initialized");
    }
}

/// Generate a unique trace ID for wait correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one wait from first poll to match or failure
pub struct WaitSpan {
    span: tracing::Span,
    start: Instant,
    trace_id: String,
    finished: bool,
}

impl WaitSpan {
    pub fn new(model: ConsistencyModel, rule: &'static str, caller: &str, expected: &str) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "wait",
            trace_id = %trace_id,
            model = model.as_str(),
            rule = rule,
            caller = caller,
            expected = expected,
            attempts = tracing::field::Empty,
            result = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            trace_id,
            finished: false,
        }
    }

    /// Get the trace ID for this wait
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Record a successful match
    pub fn record_matched(&mut self, attempts: u32, discarded: usize) {
        self.span.record("attempts", attempts);
        self.span.record("result", "matched");
        self.finished = true;
        let _entered = self.span.enter();
        debug!(attempts, discarded, "wait matched");
    }

    /// Record a failed wait
    pub fn record_failed(&mut self, attempts: u32) {
        self.span.record("attempts", attempts);
        self.span.record("result", "failed");
        self.finished = true;
    }
}

impl Drop for WaitSpan {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if self.finished && elapsed > SLOW_WAIT_THRESHOLD {
            let _entered = self.span.enter();
            warn!(
                trace_id = %self.trace_id,
                elapsed_ms = elapsed.as_millis() as u64,
                slow = true,
                "slow wait detected"
            );
        }
    }
}
