/*!
 * Hybrid Channel Tests
 * Loose matching, live feeding and consumption replay
 */

use faircmd::{
    parse_replay, CommandChannel, HybridChannel, PendingSnapshot, ReplayMode, WaitConfig,
};
use pretty_assertions::assert_eq;
use parking_lot::Mutex;
use std::io::{self, BufReader, Read};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Blocking byte source fed from the test thread
struct PipeReader {
    rx: Receiver<Vec<u8>>,
    buf: Vec<u8>,
}

impl Read for PipeReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.buf.is_empty() {
            match self.rx.recv() {
                Ok(bytes) => self.buf = bytes,
                Err(_) => return Ok(0),
            }
        }
        let n = out.len().min(self.buf.len());
        out[..n].copy_from_slice(&self.buf[..n]);
        self.buf.drain(..n);
        Ok(n)
    }
}

fn pipe() -> (Sender<Vec<u8>>, impl FnOnce() -> BufReader<PipeReader> + Send + 'static) {
    let (tx, rx) = mpsc::channel();
    (tx, move || BufReader::new(PipeReader { rx, buf: Vec::new() }))
}

fn wait_until(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !done() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_loose_wait_discards_prefix() {
    let channel = HybridChannel::new(WaitConfig::deterministic());
    channel.feed(["x", "y", "hello"]);

    channel.wait_for_loose("demo", "hello").unwrap();

    assert!(channel.pending().is_empty());
    assert_eq!(channel.snapshot_consumed(), vec!["hello"]);
    assert_eq!(channel.stats().discarded, 2);
}

#[test]
fn test_loose_wait_fails_without_match() {
    let channel = HybridChannel::new(WaitConfig::default().with_fail_budget(3));
    channel.feed(["x", "y"]);

    let err = channel.wait_for_loose("demo", "hello").unwrap_err();
    assert!(err.is_exhausted());
    assert_eq!(
        channel.pending(),
        PendingSnapshot::Ordered(vec!["x".into(), "y".into()])
    );
    assert!(channel.snapshot_consumed().is_empty());
}

#[test]
fn test_replay_of_recorded_session() {
    let channel = HybridChannel::default();
    channel.feed(["go", "say \"hi\"", "path\\to", "two\nlines"]);
    for expected in ["go", "say \"hi\"", "path\\to", "two\nlines"] {
        channel.wait_for("t", expected).unwrap();
    }

    let preload = channel.emit_replay_code(ReplayMode::Preload, "");
    assert_eq!(
        preload,
        "channel.feed([\"go\", \"say \\\"hi\\\"\", \"path\\\\to\", \"two\\nlines\"]);\n"
    );

    // Replaying the emitted script reproduces the session.
    let replay = HybridChannel::default();
    replay.feed(parse_replay(&preload).unwrap());
    for expected in ["go", "say \"hi\"", "path\\to", "two\nlines"] {
        replay.wait_for("t", expected).unwrap();
    }
    assert_eq!(replay.snapshot_consumed(), channel.snapshot_consumed());
}

#[test]
fn test_vector_replay_uses_variable() {
    let channel = HybridChannel::default();
    channel.feed(["a"]);
    channel.wait_for("t", "a").unwrap();

    assert_eq!(
        channel.emit_replay_code(ReplayMode::Vector, "steps"),
        "let steps: &[&str] = &[\"a\"];\n// Usage: channel.feed(steps.iter().copied());\n"
    );
}

#[test]
fn test_live_feeder_merges_with_preload() {
    let channel = HybridChannel::default();
    let (tx, source) = pipe();
    channel.feed(["hello"]);
    assert!(channel.start_live_feeder_with(source).unwrap());

    tx.send(b"world again\n".to_vec()).unwrap();

    channel.wait_for("main", "hello").unwrap();
    channel.wait_for("main", "world").unwrap();
    channel.wait_for("main", "again").unwrap();
    assert!(channel.stop_live_feeder());
    assert_eq!(channel.snapshot_consumed(), vec!["hello", "world", "again"]);
}

#[test]
fn test_feeder_start_stop_idempotent() {
    let channel = HybridChannel::default();
    let (_tx, source) = pipe();
    let (_tx2, other) = pipe();

    assert!(!channel.stop_live_feeder());
    assert!(channel.start_live_feeder_with(source).unwrap());
    assert!(!channel.start_live_feeder_with(other).unwrap());
    assert!(channel.is_feeder_running());
    assert!(channel.stop_live_feeder());
    assert!(!channel.stop_live_feeder());
    assert!(!channel.is_feeder_running());
}

#[test]
fn test_lines_after_stop_are_dropped() {
    let channel = HybridChannel::default();
    let (tx, source) = pipe();
    channel.start_live_feeder_with(source).unwrap();

    tx.send(b"before\n".to_vec()).unwrap();
    wait_until(|| channel.pending().len() == 1);
    assert!(channel.stop_live_feeder());

    // The detached thread is still parked in its read.
    let _ = tx.send(b"late\n".to_vec());
    thread::sleep(Duration::from_millis(50));
    assert_eq!(channel.pending(), PendingSnapshot::Ordered(vec!["before".into()]));
}

#[test]
fn test_parked_run_forwards_line_after_restart() {
    let channel = HybridChannel::default();
    let (old_tx, old_source) = pipe();
    channel.start_live_feeder_with(old_source).unwrap();
    old_tx.send(b"first\n".to_vec()).unwrap();
    wait_until(|| channel.pending().len() == 1);
    channel.stop_live_feeder();

    let (tx, source) = pipe();
    assert!(channel.start_live_feeder_with(source).unwrap());
    old_tx.send(b"stale\n".to_vec()).unwrap();
    tx.send(b"fresh\n".to_vec()).unwrap();

    wait_until(|| channel.pending().len() == 3);
    let PendingSnapshot::Ordered(mut tokens) = channel.pending() else {
        panic!("hybrid store is ordered");
    };
    tokens.sort();
    assert_eq!(tokens, vec!["first", "fresh", "stale"]);
    channel.stop_live_feeder();
}

/// Stream shared by every run, locked per read like stdin
struct SharedReader {
    rx: Arc<Mutex<Receiver<Vec<u8>>>>,
    buf: Vec<u8>,
}

impl Read for SharedReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.buf.is_empty() {
            match self.rx.lock().recv() {
                Ok(bytes) => self.buf = bytes,
                Err(_) => return Ok(0),
            }
        }
        let n = out.len().min(self.buf.len());
        out[..n].copy_from_slice(&self.buf[..n]);
        self.buf.drain(..n);
        Ok(n)
    }
}

#[test]
fn test_shared_source_keeps_lines_across_restart() {
    let (tx, rx) = mpsc::channel();
    let rx = Arc::new(Mutex::new(rx));
    let source = |rx: &Arc<Mutex<Receiver<Vec<u8>>>>| {
        let rx = rx.clone();
        move || BufReader::new(SharedReader { rx, buf: Vec::new() })
    };

    let channel = HybridChannel::default();
    channel.start_live_feeder_with(source(&rx)).unwrap();
    // Let the first run park in its read.
    thread::sleep(Duration::from_millis(30));
    assert!(channel.stop_live_feeder());
    assert!(channel.start_live_feeder_with(source(&rx)).unwrap());

    tx.send(b"hello\n".to_vec()).unwrap();
    channel.wait_for("main", "hello").unwrap();

    tx.send(b"world\n".to_vec()).unwrap();
    channel.wait_for("main", "world").unwrap();
    assert_eq!(channel.snapshot_consumed(), vec!["hello", "world"]);
    channel.stop_live_feeder();
}
