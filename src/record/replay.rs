/*!
 * Replay Emission
 *
 * Renders consumed tokens as an escaped literal list that can be pasted
 * into a test, and parses such text back into tokens.
 *
 * Escapes cover backslash, double quote, `\n`, `\r`, `\t` and the other
 * ASCII control characters (`\xNN`), which keeps the output valid in Rust
 * as well as in C-family string literal syntax.
 */

use crate::core::limits::DEFAULT_REPLAY_VARIABLE;
use crate::core::types::Token;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;
use thiserror::Error;

/// Shape of the emitted replay code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayMode {
    /// A direct call that feeds the tokens: `channel.feed([..]);`
    #[default]
    Preload,
    /// A standalone list bound to a variable: `let script: &[&str] = &[..];`
    Vector,
}

impl fmt::Display for ReplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayMode::Preload => f.write_str("preload"),
            ReplayMode::Vector => f.write_str("vector"),
        }
    }
}

impl FromStr for ReplayMode {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "preload" => Ok(ReplayMode::Preload),
            "vector" => Ok(ReplayMode::Vector),
            other => Err(ReplayError::UnknownMode(other.to_string())),
        }
    }
}

/// Replay text errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ReplayError {
    #[error("Unknown replay mode: {0}")]
    #[diagnostic(code(replay::unknown_mode), help("Use \"preload\" or \"vector\"."))]
    UnknownMode(String),

    #[error("Unterminated string literal starting at byte {0}")]
    #[diagnostic(code(replay::unterminated))]
    UnterminatedLiteral(usize),

    #[error("Invalid escape sequence {0:?}")]
    #[diagnostic(code(replay::invalid_escape))]
    InvalidEscape(String),
}

/// Quote and escape one token as a string literal
pub fn escape_literal(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 2);
    out.push('"');
    for c in token.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn literal_list(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| escape_literal(t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render `tokens` as pasteable replay code
///
/// `variable` names the binding in `Vector` mode; an empty name falls back
/// to `script`. `Preload` mode ignores it.
pub fn emit_replay_code(tokens: &[Token], mode: ReplayMode, variable: &str) -> String {
    let list = literal_list(tokens);
    match mode {
        // `[]` alone leaves the item type uninferable.
        ReplayMode::Preload if tokens.is_empty() => {
            "channel.feed(std::iter::empty::<&str>());\n".to_string()
        }
        ReplayMode::Preload => format!("channel.feed([{}]);\n", list),
        ReplayMode::Vector => {
            let var = if variable.is_empty() {
                DEFAULT_REPLAY_VARIABLE
            } else {
                variable
            };
            format!(
                "let {var}: &[&str] = &[{list}];\n// Usage: channel.feed({var}.iter().copied());\n"
            )
        }
    }
}

/// Parse emitted replay code back into tokens
///
/// Collects every string literal of the first statement (up to the first
/// `;` outside a literal). Line comments are skipped.
pub fn parse_replay(text: &str) -> Result<Vec<Token>, ReplayError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '"' => tokens.push(parse_literal(pos, &mut chars)?),
            ';' => break,
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Ok(tokens)
}

fn parse_literal(
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<Token, ReplayError> {
    let mut out = String::new();
    loop {
        let Some((_, c)) = chars.next() else {
            return Err(ReplayError::UnterminatedLiteral(start));
        };
        match c {
            '"' => return Ok(out),
            '\\' => {
                let Some((_, esc)) = chars.next() else {
                    return Err(ReplayError::UnterminatedLiteral(start));
                };
                match esc {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    '\'' => out.push('\''),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    '0' => out.push('\0'),
                    'x' => {
                        let hex: String = chars.by_ref().take(2).map(|(_, c)| c).collect();
                        let value = u8::from_str_radix(&hex, 16)
                            .ok()
                            .filter(|_| hex.len() == 2)
                            .ok_or_else(|| ReplayError::InvalidEscape(format!("\\x{}", hex)))?;
                        out.push(char::from(value));
                    }
                    other => return Err(ReplayError::InvalidEscape(format!("\\{}", other))),
                }
            }
            c => out.push(c),
        }
    }
}
