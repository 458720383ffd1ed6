use feed_watch::state::write_batch;
use feed_watch::{NewEntryRecord, StateFile, Watermark, WatermarkState, WatermarkStore};
use std::fs;

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateFile::new(dir.path().join("state.json")).load();
    assert!(store.is_empty());
}

#[test]
fn corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    for content in ["{not json", "[1, 2, 3]", "\"just a string\"", ""] {
        fs::write(&path, content).unwrap();
        assert!(StateFile::new(&path).load().is_empty(), "content: {content:?}");
    }
}

#[test]
fn bad_values_drop_only_their_feed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        r#"{
            "https://a.example.com/rss": "2024-01-03T10:00:00.000Z",
            "https://b.example.com/rss": "not a date",
            "https://c.example.com/rss": 42
        }"#,
    )
    .unwrap();

    let store = StateFile::new(&path).load();

    assert_eq!(store.len(), 1);
    assert!(matches!(
        store.state_for("https://a.example.com/rss"),
        WatermarkState::CheckedAt(_)
    ));
    assert_eq!(store.state_for("https://b.example.com/rss"), WatermarkState::NeverChecked);
}

#[test]
fn legacy_values_are_normalized_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, r#"{"https://a.example.com/rss": "2024-01-01T01:00:00+01:00"}"#).unwrap();

    let store = StateFile::new(&path).load();

    assert_eq!(
        store.get("https://a.example.com/rss").map(Watermark::as_str),
        Some("2024-01-01T00:00:00.000Z")
    );
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let file = StateFile::new(dir.path().join("nested").join("state.json"));

    let mut store = WatermarkStore::new();
    store.record("https://a.example.com/rss", Watermark::parse("2024-01-03T10:00:00Z").unwrap());
    store.record("https://b.example.com/rss", Watermark::parse("2024-02-01T00:00:00Z").unwrap());
    file.save(&store).unwrap();

    assert_eq!(file.load(), store);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(json["https://a.example.com/rss"], "2024-01-03T10:00:00.000Z");
}

#[test]
fn save_replaces_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let file = StateFile::new(dir.path().join("state.json"));
    fs::write(file.path(), r#"{"https://old.example.com/rss": "2020-01-01T00:00:00Z"}"#).unwrap();

    let mut store = WatermarkStore::new();
    store.record("https://new.example.com/rss", Watermark::parse("2024-01-01T00:00:00Z").unwrap());
    file.save(&store).unwrap();

    let reloaded = file.load();
    assert_eq!(reloaded.len(), 1);
    assert!(reloaded.get("https://old.example.com/rss").is_none());

    // No temp files left behind
    let leftovers = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn save_into_unwritable_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").unwrap();

    let file = StateFile::new(blocker.join("state.json"));
    assert!(file.save(&WatermarkStore::new()).is_err());
}

#[test]
fn batch_is_a_camel_case_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new-items.json");
    let records = vec![NewEntryRecord {
        feed_name: "Blog".to_string(),
        title: "Hello".to_string(),
        link: "https://example.com/hello".to_string(),
        date: "2024-01-03T10:00:00Z".to_string(),
        summary: "Hi".to_string(),
    }];

    write_batch(&path, &records).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json[0]["feedName"], "Blog");
    assert_eq!(json[0]["date"], "2024-01-03T10:00:00Z");

    write_batch(&path, &[]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
}
