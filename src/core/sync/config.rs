/*!
 * Wait Configuration
 *
 * Runtime configuration for the wait protocol and consistency model selection
 */

use crate::core::limits::{DEFAULT_FAIL_BUDGET, INTERACTIVE_FAIL_BUDGET, INTERACTIVE_IDLE};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Environment variable overriding the fail budget
pub const ENV_FAIL_BUDGET: &str = "FAIRCMD_FAIL_BUDGET";
/// Environment variable overriding the idle duration (milliseconds)
pub const ENV_IDLE_MS: &str = "FAIRCMD_IDLE_MS";

/// Consistency model selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyModel {
    /// Ordered sequence, a wait matches only the head
    Strict,
    /// Unordered multiset, a wait matches any present instance
    Presence,
    /// Ordered sequence with live input, loose waits and a consumption log
    Hybrid,
}

impl ConsistencyModel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConsistencyModel::Strict => "strict",
            ConsistencyModel::Presence => "presence",
            ConsistencyModel::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ConsistencyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsistencyModel {
    type Err = String;

    /// Accepts the model names plus the historical aliases
    /// `machine` (strict) and `split` (presence)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "machine" => Ok(ConsistencyModel::Strict),
            "presence" | "split" => Ok(ConsistencyModel::Presence),
            "hybrid" => Ok(ConsistencyModel::Hybrid),
            other => Err(format!("unknown consistency model: {}", other)),
        }
    }
}

/// Wait configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Unsuccessful polls a wait tolerates before failing
    pub fail_budget: u32,
    /// Zero blocks on notification, positive sleeps then re-polls
    pub idle: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            fail_budget: DEFAULT_FAIL_BUDGET,
            idle: Duration::ZERO,
        }
    }
}

impl WaitConfig {
    /// Configuration for scripted CI runs: block on notification
    pub const fn deterministic() -> Self {
        Self {
            fail_budget: DEFAULT_FAIL_BUDGET,
            idle: Duration::ZERO,
        }
    }

    /// Configuration for human-driven demos: large budget, gentle polling
    pub const fn interactive() -> Self {
        Self {
            fail_budget: INTERACTIVE_FAIL_BUDGET,
            idle: INTERACTIVE_IDLE,
        }
    }

    pub fn with_fail_budget(mut self, fail_budget: u32) -> Self {
        self.fail_budget = fail_budget;
        self
    }

    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    /// Overlay `FAIRCMD_FAIL_BUDGET` and `FAIRCMD_IDLE_MS` onto the defaults
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Overlay environment overrides onto this configuration
    ///
    /// Unparsable values are logged and ignored.
    pub fn overlay_env(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_FAIL_BUDGET) {
            match raw.trim().parse::<u32>() {
                Ok(n) => self.fail_budget = n,
                Err(e) => warn!(var = ENV_FAIL_BUDGET, value = %raw, error = %e, "ignoring invalid override"),
            }
        }
        if let Ok(raw) = std::env::var(ENV_IDLE_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.idle = Duration::from_millis(ms),
                Err(e) => warn!(var = ENV_IDLE_MS, value = %raw, error = %e, "ignoring invalid override"),
            }
        }
        self
    }
}

/// Live configuration shared by every wait on a channel
///
/// A wait reads the fail budget when it starts and the idle duration on
/// every poll, so idle changes reach in-flight waits. Both values live under
/// one lock: a reader never sees half of a `store`.
#[derive(Debug)]
pub struct SharedConfig {
    inner: RwLock<WaitConfig>,
}

impl SharedConfig {
    pub fn new(config: WaitConfig) -> Self {
        Self {
            inner: RwLock::new(clamp(config)),
        }
    }

    /// Replace both values at once
    pub fn store(&self, config: WaitConfig) {
        *self.inner.write() = clamp(config);
    }

    /// Current values
    #[inline]
    pub fn load(&self) -> WaitConfig {
        *self.inner.read()
    }

    /// Set the fail budget; zero is clamped to one
    pub fn set_fail_budget(&self, fail_budget: u32) {
        self.inner.write().fail_budget = fail_budget.max(1);
    }

    pub fn set_idle(&self, idle: Duration) {
        self.inner.write().idle = idle;
    }

    #[inline]
    pub fn fail_budget(&self) -> u32 {
        self.inner.read().fail_budget
    }

    #[inline]
    pub fn idle(&self) -> Duration {
        self.inner.read().idle
    }
}

fn clamp(config: WaitConfig) -> WaitConfig {
    config.with_fail_budget(config.fail_budget.max(1))
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(WaitConfig::default())
    }
}
