use study_core::model::{Assessment, LearnerProgress, Level, SessionId};
use storage::json_file::JsonFileStore;
use storage::repository::{AssessmentCache, AssessmentKey, ProgressMap, ProgressRepository};

#[tokio::test]
async fn missing_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("data"));
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_overwrites_the_whole_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let a = SessionId::new("a").unwrap();
    let b = SessionId::new("b").unwrap();

    let mut first = ProgressMap::new();
    first.insert(a.clone(), LearnerProgress::new());
    first.insert(b.clone(), LearnerProgress::new());
    store.save(&first).await.unwrap();

    // A writer holding an older snapshot replaces everything it did not see.
    let mut stale = ProgressMap::new();
    stale.insert(a.clone(), LearnerProgress::new());
    store.save(&stale).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert!(loaded.contains_key(&a));
    assert!(!loaded.contains_key(&b));
}

#[tokio::test]
async fn progress_document_is_keyed_by_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let mut map = ProgressMap::new();
    map.insert(SessionId::new("class-9").unwrap(), LearnerProgress::new());
    store.save(&map).await.unwrap();

    let raw = std::fs::read_to_string(store.progress_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["class-9"]["unlocked_level"], 1);
    assert_eq!(value["class-9"]["xp"], 0);
    assert!(value["class-9"].get("retry_available_at").is_none());
}

#[tokio::test]
async fn corrupt_document_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    std::fs::write(store.progress_path(), b"{ not json").unwrap();
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, storage::repository::StorageError::Serialization(_)));
}

#[tokio::test]
async fn stored_session_ids_are_validated_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    std::fs::write(store.progress_path(), br#"{" bio-101 ": {"xp": 40}}"#).unwrap();
    let loaded = store.load().await.unwrap();
    let id = SessionId::new("bio-101").unwrap();
    assert_eq!(loaded[&id].xp(), 40);

    std::fs::write(store.progress_path(), br#"{".": {"xp": 40}}"#).unwrap();
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, storage::repository::StorageError::Serialization(_)));
}

#[tokio::test]
async fn assessments_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let key = AssessmentKey::new(SessionId::new("s").unwrap(), 0, Level::Recall);
    assert!(store.get_assessment(&key).await.unwrap().is_none());

    let assessment = Assessment::new(Level::Recall, "ch1.pdf", 0, Vec::new());
    store.put_assessment(&key, &assessment).await.unwrap();

    assert!(store.assessment_path(&key).ends_with("assessments/s_ch0_lvl1.json"));
    assert_eq!(store.get_assessment(&key).await.unwrap(), Some(assessment));
}
