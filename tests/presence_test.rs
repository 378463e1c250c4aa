/*!
 * Presence Channel Tests
 * Bag matching semantics independent of insertion order
 */

use faircmd::{CommandChannel, PendingSnapshot, PresenceChannel, WaitConfig};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[test]
fn test_duplicates_consumed_one_at_a_time() {
    let channel = PresenceChannel::new(WaitConfig::default().with_fail_budget(3));
    channel.feed(["a", "b", "a"]);

    channel.wait_for("t", "a").unwrap();
    assert_eq!(channel.count("a"), 1);
    channel.wait_for("t", "a").unwrap();
    assert_eq!(channel.count("a"), 0);

    let err = channel.wait_for("t", "a").unwrap_err();
    assert!(err.is_exhausted());
    assert!(err.to_string().contains("it was not present"));
    assert_eq!(channel.pending(), PendingSnapshot::Bag(vec![("b".into(), 1)]));
}

#[test]
fn test_insertion_order_irrelevant() {
    let mut rng = StdRng::seed_from_u64(7);
    let tokens = ["go", "promote", "stop", "go", "idle"];

    for _ in 0..20 {
        let mut shuffled = tokens.to_vec();
        shuffled.shuffle(&mut rng);

        let channel = PresenceChannel::new(WaitConfig::default().with_fail_budget(3));
        channel.feed(shuffled);
        for expected in tokens {
            channel.wait_for("t", expected).unwrap();
        }
        assert!(channel.pending().is_empty());
    }
}

#[test]
fn test_reset_empties_bag() {
    let channel = PresenceChannel::default();
    channel.feed(["a", "a"]);
    channel.reset();
    assert_eq!(channel.count("a"), 0);
    assert!(channel.pending().is_empty());
}

#[test]
fn test_dump_format() {
    let channel = PresenceChannel::default();
    channel.feed(["b", "a", "b"]);
    assert_eq!(
        channel.pending().to_string(),
        "[faircmd][pending=3] { \"a\": 1 \"b\": 2 }"
    );
    channel.dump_pending_to_stderr();
}
