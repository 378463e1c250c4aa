/*!
 * Script Loading Tests
 */

use faircmd::{load_script, load_script_file, CommandChannel, StrictChannel, WaitConfig};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_script_file_drives_channel() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# worker script").unwrap();
    writeln!(file, "go promote").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "  stop  ").unwrap();

    let tokens = load_script_file(file.path()).unwrap();
    assert_eq!(tokens, vec!["go", "promote", "stop"]);

    let channel = StrictChannel::new(WaitConfig::deterministic());
    channel.feed(tokens);
    channel.wait_for("worker", "go").unwrap();
    channel.wait_for("worker", "promote").unwrap();
    channel.wait_for("worker", "stop").unwrap();
}

#[test]
fn test_missing_script_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_script_file(dir.path().join("absent.txt")).is_err());
}

#[test]
fn test_script_from_reader() {
    let tokens = load_script("a b\n#c\nd\n".as_bytes()).unwrap();
    assert_eq!(tokens, vec!["a", "b", "d"]);
}
