/*!
 * Core Types
 * Common types used across the command channels
 */

/// A single command token
///
/// Tokens are opaque: equality is exact string comparison and the empty
/// string is a valid token like any other.
pub type Token = String;

/// Normalize an optional token, mapping an absent value to the empty token
#[inline]
pub fn normalize_token(token: Option<&str>) -> Token {
    token.unwrap_or_default().to_owned()
}

/// Caller label used in diagnostics when none was supplied
pub const UNKNOWN_CALLER: &str = "?";

/// Normalize a caller label for diagnostics
#[inline]
pub(crate) fn caller_label(caller: &str) -> &str {
    if caller.is_empty() {
        UNKNOWN_CALLER
    } else {
        caller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_token_is_empty() {
        assert_eq!(normalize_token(None), "");
        assert_eq!(normalize_token(Some("go")), "go");
    }

    #[test]
    fn test_caller_label() {
        assert_eq!(caller_label(""), "?");
        assert_eq!(caller_label("worker"), "worker");
    }
}
