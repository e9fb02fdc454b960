use mapty::app::{App, DEFAULT_ZOOM, ListAction, SubmitOutcome};
use mapty::database::{JsonFileStore, KeyValueStore, SqliteStore};
use mapty::error::WorkoutError;
use mapty::map::{FixedLocation, MemoryMap, RecordingNotifier};
use mapty::render::MemoryList;
use mapty::storage::{STORAGE_KEY, WorkoutRepository, decode};
use mapty::types::{Coords, WorkoutId, WorkoutKind};
use std::path::Path;
use tempfile::TempDir;

type TestApp = App<MemoryMap, MemoryList, RecordingNotifier>;

const NYC: Coords = Coords::new(40.7, -74.0);

fn boot(kv: Box<dyn KeyValueStore>) -> TestApp {
    App::start(
        MemoryMap::default(),
        MemoryList::default(),
        RecordingNotifier::default(),
        WorkoutRepository::new(kv),
        &mut FixedLocation(Some(NYC)),
        DEFAULT_ZOOM,
    )
}

fn boot_json(dir: &Path) -> TestApp {
    boot(Box::new(JsonFileStore::open(dir).unwrap()))
}

fn submit_new(
    app: &mut TestApp,
    at: Coords,
    kind: WorkoutKind,
    distance: &str,
    duration: &str,
    extra: &str,
) -> WorkoutId {
    app.handle_map_click(at).unwrap();
    let input = app.form_mut().input_mut();
    input.kind = kind;
    input.distance = distance.into();
    input.duration = duration.into();
    match kind {
        WorkoutKind::Running => input.cadence = extra.into(),
        WorkoutKind::Cycling => input.elevation = extra.into(),
    }
    match app.submit().unwrap() {
        SubmitOutcome::Created(id) => id,
        other => panic!("expected a new workout, got {other:?}"),
    }
}

fn stored_count(dir: &Path) -> usize {
    let kv = JsonFileStore::open(dir).unwrap();
    kv.get(STORAGE_KEY)
        .unwrap()
        .map_or(0, |raw| decode(&raw).unwrap().len())
}

#[test]
fn running_scenario() {
    let dir = TempDir::new().unwrap();
    let mut app = boot_json(dir.path());

    let id = submit_new(&mut app, NYC, WorkoutKind::Running, "5", "25", "180");
    let w = app.store().get(&id).unwrap();
    assert_eq!(w.pace(), Some(5.0));
    assert!(w.description().starts_with("Running on"));
    assert_eq!(stored_count(dir.path()), 1);
}

#[test]
fn cycling_edit_scenario_survives_restart() {
    let dir = TempDir::new().unwrap();
    let mut app = boot_json(dir.path());

    let id = submit_new(&mut app, NYC, WorkoutKind::Cycling, "20", "60", "300");
    let created = app.store().get(&id).unwrap().clone();
    assert_eq!(created.speed(), Some(20.0));
    drop(app);

    let mut app = boot_json(dir.path());
    assert_eq!(app.store().len(), 1);
    assert_eq!(app.list().ids(), vec![&id]);
    assert!(app.marker_for(&id).is_some());

    app.handle_list_click(&id, ListAction::Edit).unwrap();
    {
        let input = app.form_mut().input_mut();
        assert_eq!(input.kind, WorkoutKind::Cycling);
        input.distance = "10".into();
        input.duration = "30".into();
        input.elevation = "150".into();
    }
    assert_eq!(app.submit().unwrap(), SubmitOutcome::Updated(id.clone()));
    drop(app);

    let app = boot_json(dir.path());
    let edited = app.store().get(&id).unwrap();
    assert_eq!(edited.speed(), Some(20.0));
    assert_eq!(edited.distance(), 10.0);
    assert_eq!(edited.elevation_gain(), Some(150.0));
    assert_eq!(edited.id(), created.id());
    assert_eq!(edited.date(), created.date());
    assert_eq!(edited.coords(), created.coords());
}

#[test]
fn type_change_on_edit_swaps_variant_fields() {
    let dir = TempDir::new().unwrap();
    let mut app = boot_json(dir.path());
    let id = submit_new(&mut app, NYC, WorkoutKind::Running, "5", "25", "180");

    app.handle_list_click(&id, ListAction::Edit).unwrap();
    app.toggle_type();
    app.form_mut().input_mut().elevation = "120".into();
    app.submit().unwrap();

    let w = app.store().get(&id).unwrap();
    assert_eq!(w.kind(), WorkoutKind::Cycling);
    assert_eq!((w.cadence(), w.pace()), (None, None));
    assert_eq!(w.elevation_gain(), Some(120.0));
    assert_eq!(w.speed(), Some(12.0));

    let raw = JsonFileStore::open(dir.path())
        .unwrap()
        .get(STORAGE_KEY)
        .unwrap()
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(v[0].get("cadence").is_none());
    assert_eq!(v[0]["elevationGain"], 120.0);
}

#[test]
fn delete_removes_exactly_one_everywhere() {
    let dir = TempDir::new().unwrap();
    let mut app = boot_json(dir.path());
    let a = submit_new(&mut app, NYC, WorkoutKind::Running, "5", "25", "180");
    let b = submit_new(&mut app, Coords::new(51.5, -0.1), WorkoutKind::Cycling, "20", "60", "300");
    let c = submit_new(&mut app, NYC, WorkoutKind::Running, "10", "55", "170");

    app.handle_list_click(&b, ListAction::Delete).unwrap();
    assert_eq!(app.store().len(), 2);
    assert_eq!(app.list().ids(), vec![&c, &a]);
    assert_eq!(app.map().markers.len(), 2);
    assert_eq!(stored_count(dir.path()), 2);
}

#[test]
fn delete_without_marker_still_removes_from_store_and_list() {
    let dir = TempDir::new().unwrap();
    let mut app = boot_json(dir.path());
    let id = submit_new(&mut app, NYC, WorkoutKind::Running, "5", "25", "180");
    drop(app);

    // No location this time: nothing is drawn, so there is no marker.
    let mut app: TestApp = App::start(
        MemoryMap::default(),
        MemoryList::default(),
        RecordingNotifier::default(),
        WorkoutRepository::new(Box::new(JsonFileStore::open(dir.path()).unwrap())),
        &mut FixedLocation(None),
        DEFAULT_ZOOM,
    );
    assert!(app.marker_for(&id).is_none());

    app.delete(&id).unwrap();
    assert!(app.store().is_empty());
    assert!(app.list().entries.is_empty());
    assert_eq!(stored_count(dir.path()), 0);
}

#[test]
fn malformed_state_boots_empty() {
    let dir = TempDir::new().unwrap();
    let mut kv = JsonFileStore::open(dir.path()).unwrap();
    kv.set(STORAGE_KEY, "[{\"id\": 3}]").unwrap();

    let app = boot_json(dir.path());
    assert!(app.store().is_empty());
    assert!(app.list().entries.is_empty());
}

#[test]
fn sqlite_backend_round_trip_and_reset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapty.sqlite");

    let mut app = boot(Box::new(SqliteStore::open(&path).unwrap()));
    submit_new(&mut app, NYC, WorkoutKind::Running, "5", "25", "180");
    submit_new(&mut app, NYC, WorkoutKind::Cycling, "20", "60", "300");
    drop(app);

    let mut app = boot(Box::new(SqliteStore::open(&path).unwrap()));
    assert_eq!(app.store().len(), 2);

    app.reset(&mut FixedLocation(Some(NYC))).unwrap();
    assert!(app.store().is_empty());
    drop(app);

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
}

#[test]
fn rejected_submit_leaves_persisted_state_alone() {
    let dir = TempDir::new().unwrap();
    let mut app = boot_json(dir.path());
    let id = submit_new(&mut app, NYC, WorkoutKind::Running, "5", "25", "180");

    app.handle_list_click(&id, ListAction::Edit).unwrap();
    app.form_mut().input_mut().distance = "abc".into();
    assert!(matches!(app.submit(), Err(WorkoutError::Validation)));
    assert_eq!(app.store().get(&id).unwrap().distance(), 5.0);
    assert!(app.editing().is_some());
    assert_eq!(
        app.notifier().messages.last().map(String::as_str),
        Some("Please enter positive numbers")
    );
    drop(app);

    let app = boot_json(dir.path());
    assert_eq!(app.store().get(&id).unwrap().distance(), 5.0);
}
