use std::io::Write;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use stitch_engine::{ProfileService, StrategyRegistry};
use stitch_model::{Persona, PersonaWithSessions, Profile, Session, StaticCatalog};
use stitch_store::{MemoryStore, ProfileStore};
use stitch_types::{ProfileId, SessionId, Timestamp};

fn service() -> (Arc<MemoryStore>, ProfileService) {
    let store = Arc::new(MemoryStore::new());
    let service = ProfileService::new(
        Arc::clone(&store) as Arc<dyn ProfileStore>,
        Arc::new(StaticCatalog::with_builtins()),
        Arc::new(StrategyRegistry::with_builtins()),
    );
    (store, service)
}

// ── Lineage-following load ───────────────────────────────────────

#[test]
fn load_returns_live_profile_as_is() {
    let (_, service) = service();
    let profile = Profile::new("p1");
    service.save(&profile).unwrap();

    let loaded = service.load(&profile.id).unwrap().unwrap();
    assert_eq!(loaded, profile);
}

#[test]
fn load_follows_tombstone_to_canonical_profile() {
    let (_, service) = service();
    let master = Profile::new("p1");
    let mut loser = Profile::new("p2");
    loser.merged_with = Some(master.id.clone());
    service.save(&master).unwrap();
    service.save(&loser).unwrap();

    let loaded = service.load(&loser.id).unwrap().unwrap();
    assert_eq!(loaded.id, master.id);
}

#[test]
fn load_follows_chains_of_tombstones() {
    let (_, service) = service();
    let master = Profile::new("p1");
    let mut mid = Profile::new("p2");
    mid.merged_with = Some(master.id.clone());
    let mut tail = Profile::new("p3");
    tail.merged_with = Some(mid.id.clone());
    for p in [&master, &mid, &tail] {
        service.save(p).unwrap();
    }

    let loaded = service.load(&tail.id).unwrap().unwrap();
    assert_eq!(loaded.id, master.id);
}

#[test]
fn load_with_dangling_lineage_returns_the_tombstone() {
    let (_, service) = service();
    let mut orphan = Profile::new("p2");
    orphan.merged_with = Some(ProfileId::new("vanished"));
    service.save(&orphan).unwrap();

    // The master is gone; the best available answer is the tombstone.
    let loaded = service.load(&orphan.id).unwrap().unwrap();
    assert_eq!(loaded.id, orphan.id);
}

#[test]
fn load_survives_tombstone_cycles() {
    let (_, service) = service();
    let mut a = Profile::new("pa");
    let mut b = Profile::new("pb");
    a.merged_with = Some(b.id.clone());
    b.merged_with = Some(a.id.clone());
    service.save(&a).unwrap();
    service.save(&b).unwrap();

    // Must terminate rather than loop forever.
    assert!(service.load(&a.id).unwrap().is_some());
}

#[test]
fn load_missing_profile_is_none() {
    let (_, service) = service();
    assert!(service.load(&ProfileId::new("ghost")).unwrap().is_none());
}

// ── Session loading ──────────────────────────────────────────────

#[test]
fn load_session_without_hint() {
    let (_, service) = service();
    let profile = Profile::new("p1");
    let session = Session::new("s1", &profile);
    service.save_session(&session).unwrap();

    let loaded = service.load_session(&session.id, None).unwrap().unwrap();
    assert_eq!(loaded, session);
}

#[test]
fn load_session_with_hint_falls_back() {
    let (_, service) = service();
    let profile = Profile::new("p1");
    let session = Session::new("s1", &profile);
    service.save_session(&session).unwrap();

    // The in-memory store ignores hints, so this exercises the full ladder
    // ending in the unhinted probe.
    let loaded = service
        .load_session(&session.id, Some(Timestamp::now()))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id, session.id);
}

// ── Personas ─────────────────────────────────────────────────────

#[test]
fn create_persona_seeds_one_session() {
    let (store, service) = service();
    let persona = service.create_persona("persona-shopper").unwrap();
    store.refresh().unwrap();

    let bundle = service
        .load_persona_with_sessions(persona.id())
        .unwrap()
        .unwrap();
    assert_eq!(bundle.persona, persona);
    assert_eq!(bundle.sessions.len(), 1);
    assert_eq!(bundle.sessions[0].profile_id, *persona.id());
}

#[test]
fn delete_persona_removes_it() {
    let (_, service) = service();
    let persona = service.create_persona("persona-shopper").unwrap();
    service.delete_persona(persona.id()).unwrap();
    assert!(service.load_persona(persona.id()).unwrap().is_none());
}

// ── Fixture seeding ──────────────────────────────────────────────

fn write_fixture(dir: &std::path::Path, name: &str, contents: &str) {
    let mut file = std::fs::File::create(dir.join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

fn persona_fixture_json(id: &str) -> String {
    let persona = Persona::new(id);
    // Session owned by nobody in particular; seeding must rebind it.
    let mut session = Session::new(SessionId::random(), &Profile::new("placeholder"));
    session.properties.insert("referrer".to_string(), json!("fixture"));
    serde_json::to_string(&PersonaWithSessions {
        persona,
        sessions: vec![session],
    })
    .unwrap()
}

#[test]
fn seeding_loads_fixtures_and_rebinds_sessions() {
    let (_, service) = service();
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "shopper.json", &persona_fixture_json("persona-shopper"));
    write_fixture(dir.path(), "browser.json", &persona_fixture_json("persona-browser"));

    let loaded = service.seed_personas_from_dir(dir.path()).unwrap();
    assert_eq!(loaded, 2);

    let bundle = service
        .load_persona_with_sessions(&ProfileId::new("persona-shopper"))
        .unwrap()
        .unwrap();
    assert_eq!(bundle.sessions.len(), 1);
    assert_eq!(bundle.sessions[0].profile_id, ProfileId::new("persona-shopper"));
}

#[test]
fn seeding_skips_malformed_fixtures() {
    let (_, service) = service();
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "good.json", &persona_fixture_json("persona-good"));
    write_fixture(dir.path(), "bad.json", "{ this is not json");
    write_fixture(dir.path(), "ignored.txt", "not a fixture at all");

    let loaded = service.seed_personas_from_dir(dir.path()).unwrap();
    assert_eq!(loaded, 1);
    assert!(service
        .load_persona(&ProfileId::new("persona-good"))
        .unwrap()
        .is_some());
}

#[test]
fn seeding_empty_dir_loads_nothing() {
    let (_, service) = service();
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(service.seed_personas_from_dir(dir.path()).unwrap(), 0);
}

// ── End-to-end through the facade ────────────────────────────────

#[test]
fn merge_through_the_service_facade() {
    let (store, service) = service();
    let mut p1 = Profile::new("p1");
    p1.first_visit = Timestamp::from_millis(100);
    p1.set_property("email", json!("a@x.com"));
    let mut p2 = Profile::new("p2");
    p2.first_visit = Timestamp::from_millis(200);
    p2.set_property("email", json!("a@x.com"));
    service.save(&p1).unwrap();
    service.save(&p2).unwrap();
    store.refresh().unwrap();

    let mut session = Session::new("s1", &p2);
    service.save_session(&session).unwrap();

    let updated = service
        .merge_profiles_on_property(&p2, &mut session, "email", &json!("a@x.com"))
        .unwrap();
    assert!(!updated, "identical property sets leave the master unchanged");

    // The cookie id of the superseded current profile now resolves nowhere,
    // but the master carries on.
    assert!(service.load(&p2.id).unwrap().is_none());
    assert_eq!(session.profile_id, p1.id);
}
