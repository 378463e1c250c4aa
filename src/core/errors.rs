/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::sync::ConsistencyModel;
use super::types::Token;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Command channel operation result
pub type CommandResult<T> = Result<T, CommandError>;

/// Failures surfaced by a wait
///
/// Configuration and producer calls never fail; only consumers see these.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CommandError {
    /// The fail budget ran out before the expected token could be matched
    #[error(
        "{caller} expected {expected:?} but {}; giving up after {fail_budget} attempts ({model} model)",
        describe_seen(*model, seen.as_deref())
    )]
    #[diagnostic(
        code(faircmd::exhausted),
        help("The script and the waits disagree on token order. Dump the pending tokens or raise the fail budget.")
    )]
    Exhausted {
        caller: String,
        expected: Token,
        /// Token at the head of the store when the budget ran out, if any
        seen: Option<Token>,
        fail_budget: u32,
        model: ConsistencyModel,
    },

    /// The line source ended while a line-oriented wait was in progress
    #[error("{caller} expected line {expected:?} but the input stream was closed")]
    #[diagnostic(
        code(faircmd::input_closed),
        help("The input stream reached end-of-file. The expected line was never entered.")
    )]
    InputClosed { caller: String, expected: Token },

    /// Reading the line source failed
    #[error("Input read failed: {0}")]
    #[diagnostic(code(faircmd::io))]
    Io(String),
}

impl CommandError {
    /// Whether the wait gave up because its budget was exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, CommandError::Exhausted { .. })
    }

    /// Caller label attached to the failure, if any
    pub fn caller(&self) -> Option<&str> {
        match self {
            CommandError::Exhausted { caller, .. } | CommandError::InputClosed { caller, .. } => {
                Some(caller)
            }
            CommandError::Io(_) => None,
        }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::Io(err.to_string())
    }
}

fn describe_seen(model: ConsistencyModel, seen: Option<&str>) -> String {
    match (model, seen) {
        (ConsistencyModel::Presence, Some(line)) => format!("the last line read was {:?}", line),
        (ConsistencyModel::Presence, None) => "it was not present".to_string(),
        (_, Some(head)) => format!("saw {:?} at the head", head),
        (_, None) => "the store was empty".to_string(),
    }
}
