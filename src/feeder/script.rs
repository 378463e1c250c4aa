/*!
 * Script Tokenization
 * Whitespace tokenization shared by the live feeder and script files
 */

use crate::core::types::Token;
use std::io::{self, BufRead};
use std::path::Path;

/// Split one line of input into tokens on any whitespace
pub fn tokenize_line(line: &str) -> Vec<Token> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Read a script: whitespace-separated tokens, one or more per line
///
/// Blank lines and lines starting with `#` are skipped.
pub fn load_script<R: BufRead>(reader: R) -> io::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            continue;
        }
        tokens.extend(tokenize_line(trimmed));
    }
    Ok(tokens)
}

/// Read a script file from disk
pub fn load_script_file(path: impl AsRef<Path>) -> io::Result<Vec<Token>> {
    let file = std::fs::File::open(path)?;
    load_script(io::BufReader::new(file))
}
