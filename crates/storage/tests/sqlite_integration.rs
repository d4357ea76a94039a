use study_core::model::{Assessment, LearnerProgress, Level, Question, SessionId};
use study_core::progression::{Progression, Submission};
use study_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::{AssessmentCache, AssessmentKey, ProgressMap, ProgressRepository};
use storage::sqlite::SqliteRepository;

fn played_progress() -> LearnerProgress {
    let mut progress = LearnerProgress::new();
    let mut rng = StdRng::seed_from_u64(1);
    Progression::default().submit(
        &mut progress,
        &Submission::new(1, 9, 10),
        fixed_now(),
        &mut rng,
    );
    progress
}

#[tokio::test]
async fn sqlite_roundtrip_persists_progress() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load().await.unwrap().is_empty());

    let session = SessionId::new("bio-101").unwrap();
    let mut map = ProgressMap::new();
    map.insert(session.clone(), played_progress());
    repo.save(&map).await.expect("save");

    let loaded = repo.load().await.expect("load");
    let progress = &loaded[&session];
    assert_eq!(progress.unlocked_level(), Level::Application);
    assert_eq!(progress.history().len(), 1);
    assert!(progress.xp() >= 50);
}

#[tokio::test]
async fn sqlite_save_updates_existing_rows() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_update?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo.migrate().await.expect("migrations are idempotent");

    let session = SessionId::new("s1").unwrap();
    let mut map = ProgressMap::new();
    map.insert(session.clone(), LearnerProgress::new());
    repo.save(&map).await.unwrap();

    map.insert(session.clone(), played_progress());
    repo.save(&map).await.unwrap();

    let loaded = repo.load().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[&session].history().len(), 1);
}

#[tokio::test]
async fn sqlite_caches_assessments_per_chapter() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_assess?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let session = SessionId::new("s1").unwrap();
    let key = AssessmentKey::new(session.clone(), 0, Level::Synthesis);
    let question = Question {
        id: Some(1),
        question: "Critique this method".into(),
        options: Vec::new(),
        correct_answer: None,
        explanation: Some("Mentions bias".into()),
        hints: vec!["Think about sampling".into()],
        kind: Some("short_answer".into()),
    };
    let assessment = Assessment::new(Level::Synthesis, "ch1.pdf", 0, vec![question]);
    repo.put_assessment(&key, &assessment).await.unwrap();

    assert_eq!(repo.get_assessment(&key).await.unwrap(), Some(assessment));
    let other = AssessmentKey::new(session, 1, Level::Synthesis);
    assert!(repo.get_assessment(&other).await.unwrap().is_none());
}
