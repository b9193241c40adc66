use pretty_assertions::assert_eq;
use serde_json::json;
use stitch_model::{Condition, Event, Persona, Predicate, Profile, Session};
use stitch_store::{MemoryStore, ProfileStore, StoreError};
use stitch_types::{ProfileId, Timestamp};

fn profile_with_email(id: &str, email: &str, first_visit: i64) -> Profile {
    let mut profile = Profile::new(id);
    profile.set_property("email", json!(email));
    profile.first_visit = Timestamp::from_millis(first_visit);
    profile
}

// ── Query visibility ─────────────────────────────────────────────

#[test]
fn saved_profile_invisible_to_queries_until_refresh() {
    let store = MemoryStore::new();
    store
        .save_profile(&profile_with_email("p1", "a@x.com", 100))
        .unwrap();

    assert!(store
        .find_profiles_by_property("email", &json!("a@x.com"))
        .unwrap()
        .is_empty());

    store.refresh().unwrap();
    assert_eq!(
        store
            .find_profiles_by_property("email", &json!("a@x.com"))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn load_by_id_is_read_your_writes() {
    let store = MemoryStore::new();
    store
        .save_profile(&profile_with_email("p1", "a@x.com", 100))
        .unwrap();

    // No refresh; the load must still see the record.
    let loaded = store.load_profile(&ProfileId::new("p1")).unwrap().unwrap();
    assert_eq!(loaded.property("email"), Some(&json!("a@x.com")));
}

#[test]
fn query_orders_by_first_visit_then_id() {
    let store = MemoryStore::new();
    store
        .save_profile(&profile_with_email("pb", "a@x.com", 200))
        .unwrap();
    store
        .save_profile(&profile_with_email("pc", "a@x.com", 100))
        .unwrap();
    store
        .save_profile(&profile_with_email("pa", "a@x.com", 200))
        .unwrap();
    store.refresh().unwrap();

    let found = store
        .find_profiles_by_property("email", &json!("a@x.com"))
        .unwrap();
    let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["pc", "pa", "pb"]);
}

#[test]
fn profile_count_tracks_visible_records() {
    let store = MemoryStore::new();
    store.save_profile(&Profile::new("p1")).unwrap();
    assert_eq!(store.profile_count().unwrap(), 0);
    store.refresh().unwrap();
    assert_eq!(store.profile_count().unwrap(), 1);
}

// ── Targeted updates ─────────────────────────────────────────────

#[test]
fn mark_profile_merged_sets_tombstone_only() {
    let store = MemoryStore::new();
    let mut profile = profile_with_email("p2", "a@x.com", 100);
    profile.segments.insert("buyers".to_string());
    store.save_profile(&profile).unwrap();

    store
        .mark_profile_merged(&ProfileId::new("p2"), &ProfileId::new("p1"))
        .unwrap();

    let loaded = store.load_profile(&ProfileId::new("p2")).unwrap().unwrap();
    assert_eq!(loaded.merged_with, Some(ProfileId::new("p1")));
    // The rest of the record is untouched.
    assert_eq!(loaded.property("email"), Some(&json!("a@x.com")));
    assert!(loaded.segments.contains("buyers"));
}

#[test]
fn mark_profile_merged_missing_is_not_found() {
    let store = MemoryStore::new();
    let err = store
        .mark_profile_merged(&ProfileId::new("ghost"), &ProfileId::new("p1"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn reassign_session_rewrites_owner_and_keeps_timestamp() {
    let store = MemoryStore::new();
    let p2 = Profile::new("p2");
    let mut session = Session::new("s1", &p2);
    session.timestamp = Timestamp::from_millis(42);
    store.save_session(&session).unwrap();

    store
        .reassign_session(&session.id, session.timestamp, &ProfileId::new("p1"))
        .unwrap();

    let loaded = store.load_session(&session.id, None).unwrap().unwrap();
    assert_eq!(loaded.profile_id, ProfileId::new("p1"));
    assert_eq!(loaded.timestamp, Timestamp::from_millis(42));
}

#[test]
fn reassign_event_rewrites_owner() {
    let store = MemoryStore::new();
    let event = Event::new("e1", "pageView", &ProfileId::new("p2"));
    store.save_event(&event).unwrap();

    store
        .reassign_event(&event.id, event.timestamp, &ProfileId::new("p1"))
        .unwrap();
    store.refresh().unwrap();

    let events = store.events_for_profile(&ProfileId::new("p1")).unwrap();
    assert_eq!(events.len(), 1);
    assert!(store
        .events_for_profile(&ProfileId::new("p2"))
        .unwrap()
        .is_empty());
}

// ── Removal ──────────────────────────────────────────────────────

#[test]
fn remove_profile_deletes_record_and_index_entry() {
    let store = MemoryStore::new();
    store
        .save_profile(&profile_with_email("p1", "a@x.com", 100))
        .unwrap();
    store.refresh().unwrap();

    store.remove_profile(&ProfileId::new("p1")).unwrap();

    assert!(store.load_profile(&ProfileId::new("p1")).unwrap().is_none());
    assert!(store
        .find_profiles_by_property("email", &json!("a@x.com"))
        .unwrap()
        .is_empty());
}

// ── Sessions & events by profile ─────────────────────────────────

#[test]
fn sessions_for_profile_filters_and_sorts() {
    let store = MemoryStore::new();
    let p1 = Profile::new("p1");
    let p2 = Profile::new("p2");

    let mut s1 = Session::new("s1", &p1);
    s1.timestamp = Timestamp::from_millis(200);
    let mut s2 = Session::new("s2", &p1);
    s2.timestamp = Timestamp::from_millis(100);
    let s3 = Session::new("s3", &p2);

    for s in [&s1, &s2, &s3] {
        store.save_session(s).unwrap();
    }
    store.refresh().unwrap();

    let sessions = store.sessions_for_profile(&p1.id).unwrap();
    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "s1"]);
}

// ── Personas ─────────────────────────────────────────────────────

#[test]
fn persona_round_trip() {
    let store = MemoryStore::new();
    let persona = Persona::new("persona-shopper");
    store.save_persona(&persona).unwrap();

    let loaded = store
        .load_persona(&ProfileId::new("persona-shopper"))
        .unwrap()
        .unwrap();
    assert_eq!(loaded, persona);

    store
        .remove_persona(&ProfileId::new("persona-shopper"))
        .unwrap();
    assert!(store
        .load_persona(&ProfileId::new("persona-shopper"))
        .unwrap()
        .is_none());
}

// ── Matching facility ────────────────────────────────────────────

#[test]
fn test_match_profile_delegates_to_condition() {
    let store = MemoryStore::new();
    let mut profile = Profile::new("p1");
    profile.set_property("country", json!("NO"));

    let cond = Condition::new(Predicate::PropertyEquals {
        property: "country".to_string(),
        value: json!("NO"),
    });
    assert!(store.test_match_profile(&cond, &profile).unwrap());

    let miss = Condition::new(Predicate::PropertyEquals {
        property: "country".to_string(),
        value: json!("SE"),
    });
    assert!(!store.test_match_profile(&miss, &profile).unwrap());
}
