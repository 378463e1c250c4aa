/*!
 * Channel Selection
 *
 * Picks a consistency model at construction time.
 *
 * # Design: Enum Dispatch
 *
 * The three channels are alternative strategies rather than subtypes, and
 * `CommandChannel` has generic methods, so selection is an enum with one
 * arm per model instead of a trait object.
 */

use super::hybrid::HybridChannel;
use super::presence::PresenceChannel;
use super::strict::StrictChannel;
use super::traits::CommandChannel;
use crate::core::errors::CommandResult;
use crate::core::sync::{ConsistencyModel, SharedConfig, WaitConfig};
use crate::core::types::Token;
use crate::monitoring::ChannelStats;
use crate::store::PendingSnapshot;
use tracing::{info, warn};

/// Environment variable selecting the consistency model
pub const ENV_MODE: &str = "FAIRCMD_MODE";

/// A command channel of any consistency model
pub enum Channel {
    Strict(StrictChannel),
    Presence(PresenceChannel),
    Hybrid(HybridChannel),
}

impl Channel {
    /// Create a channel for `model`
    pub fn new(model: ConsistencyModel, config: WaitConfig) -> Self {
        match model {
            ConsistencyModel::Strict => Channel::Strict(StrictChannel::new(config)),
            ConsistencyModel::Presence => Channel::Presence(PresenceChannel::new(config)),
            ConsistencyModel::Hybrid => Channel::Hybrid(HybridChannel::new(config)),
        }
    }

    /// Create a channel from `FAIRCMD_MODE`, `FAIRCMD_FAIL_BUDGET` and `FAIRCMD_IDLE_MS`
    ///
    /// Falls back to `default_model` when the mode is unset or invalid.
    pub fn from_env(default_model: ConsistencyModel) -> Self {
        let model = match std::env::var(ENV_MODE) {
            Ok(raw) => raw.parse::<ConsistencyModel>().unwrap_or_else(|e| {
                warn!(var = ENV_MODE, error = %e, fallback = %default_model, "ignoring invalid model");
                default_model
            }),
            Err(_) => default_model,
        };
        let config = WaitConfig::from_env();
        info!(model = %model, fail_budget = config.fail_budget, idle_ms = config.idle.as_millis() as u64, "channel configured");
        Self::new(model, config)
    }

    /// The hybrid channel, if that is the active model
    pub fn as_hybrid(&self) -> Option<&HybridChannel> {
        match self {
            Channel::Hybrid(c) => Some(c),
            _ => None,
        }
    }

    /// The presence channel, if that is the active model
    pub fn as_presence(&self) -> Option<&PresenceChannel> {
        match self {
            Channel::Presence(c) => Some(c),
            _ => None,
        }
    }
}

impl CommandChannel for Channel {
    #[inline]
    fn model(&self) -> ConsistencyModel {
        match self {
            Channel::Strict(c) => c.model(),
            Channel::Presence(c) => c.model(),
            Channel::Hybrid(c) => c.model(),
        }
    }

    #[inline]
    fn shared_config(&self) -> &SharedConfig {
        match self {
            Channel::Strict(c) => c.shared_config(),
            Channel::Presence(c) => c.shared_config(),
            Channel::Hybrid(c) => c.shared_config(),
        }
    }

    fn reset(&self) {
        match self {
            Channel::Strict(c) => c.reset(),
            Channel::Presence(c) => c.reset(),
            Channel::Hybrid(c) => c.reset(),
        }
    }

    #[inline]
    fn feed<I>(&self, tokens: I)
    where
        I: IntoIterator,
        I::Item: Into<Token>,
    {
        match self {
            Channel::Strict(c) => c.feed(tokens),
            Channel::Presence(c) => c.feed(tokens),
            Channel::Hybrid(c) => c.feed(tokens),
        }
    }

    #[inline]
    fn wait_for(&self, caller: &str, expected: &str) -> CommandResult<()> {
        match self {
            Channel::Strict(c) => c.wait_for(caller, expected),
            Channel::Presence(c) => c.wait_for(caller, expected),
            Channel::Hybrid(c) => c.wait_for(caller, expected),
        }
    }

    fn pending(&self) -> PendingSnapshot {
        match self {
            Channel::Strict(c) => c.pending(),
            Channel::Presence(c) => c.pending(),
            Channel::Hybrid(c) => c.pending(),
        }
    }

    fn stats(&self) -> ChannelStats {
        match self {
            Channel::Strict(c) => c.stats(),
            Channel::Presence(c) => c.stats(),
            Channel::Hybrid(c) => c.stats(),
        }
    }
}
