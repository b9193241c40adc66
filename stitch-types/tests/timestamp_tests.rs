use stitch_types::Timestamp;

// ── Construction ─────────────────────────────────────────────────

#[test]
fn now_is_positive() {
    let ts = Timestamp::now();
    assert!(ts.millis() > 0);
}

#[test]
fn from_millis_round_trips() {
    let ts = Timestamp::from_millis(1_234_567_890);
    assert_eq!(ts.millis(), 1_234_567_890);
}

#[test]
fn default_is_epoch() {
    assert_eq!(Timestamp::default().millis(), 0);
}

// ── Ordering ─────────────────────────────────────────────────────

#[test]
fn ordering_by_millis() {
    let a = Timestamp::from_millis(100);
    let b = Timestamp::from_millis(200);
    assert!(a < b);
    assert!(a.is_before(&b));
    assert!(b.is_after(&a));
}

#[test]
fn equal_timestamps_are_neither_before_nor_after() {
    let a = Timestamp::from_millis(5);
    let b = Timestamp::from_millis(5);
    assert!(!a.is_before(&b));
    assert!(!a.is_after(&b));
}

// ── previous_day ─────────────────────────────────────────────────

#[test]
fn previous_day_subtracts_24_hours() {
    let ts = Timestamp::from_millis(100_000_000);
    assert_eq!(ts.previous_day().millis(), 100_000_000 - 86_400_000);
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn serialization_roundtrip() {
    let ts = Timestamp::from_millis(42);
    let json = serde_json::to_string(&ts).unwrap();
    assert_eq!(json, "42");
    let parsed: Timestamp = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ts);
}
