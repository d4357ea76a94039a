mod common;

use std::sync::Arc;

use services::ai::RemedialPlanner;
use services::documents::ChapterCatalog;
use services::{AnalyticsService, Clock, MistakeLedgerService, ProgressionService};
use storage::repository::{InMemoryRepository, ProgressRepository};
use study_core::model::{MistakeInput, MistakeScope};
use study_core::progression::Submission;
use study_core::time::fixed_now;

use common::{ScriptedModel, session};

async fn seeded() -> (InMemoryRepository, MistakeLedgerService) {
    let repo = InMemoryRepository::new();
    let clock = Clock::fixed(fixed_now());
    let progression = ProgressionService::new(
        clock,
        Arc::new(repo.clone()),
        ChapterCatalog::new("unused-uploads"),
        RemedialPlanner::new(ScriptedModel::failing()),
    )
    .with_seed(3);

    let alice = Submission::new(1, 5, 10).with_mistakes(vec![
        MistakeInput::new("What is osmosis?"),
        MistakeInput::new("Name the powerhouse of the cell."),
    ]);
    progression
        .submit_assessment_result(&session("alice"), alice)
        .await
        .unwrap();
    let bob = Submission::new(2, 2, 10).with_mistakes(vec![MistakeInput::new("What is osmosis?")]);
    progression
        .submit_assessment_result(&session("bob"), bob)
        .await
        .unwrap();
    progression
        .submit_assessment_result(&session("carol"), Submission::new(1, 9, 10))
        .await
        .unwrap();

    let ledger = MistakeLedgerService::new(clock, Arc::new(repo.clone()));
    (repo, ledger)
}

#[tokio::test]
async fn session_scope_lists_untagged_entries() {
    let (_, ledger) = seeded().await;

    let entries = ledger
        .get_mistakes(MistakeScope::Session(session("alice")))
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.session_id.is_none()));

    let unknown = ledger
        .get_mistakes(MistakeScope::Session(session("nobody")))
        .await
        .unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn all_scope_tags_entries_with_their_session() {
    let (_, ledger) = seeded().await;

    let entries = ledger.get_mistakes("all".parse().unwrap()).await.unwrap();
    assert_eq!(entries.len(), 3);
    let bob: Vec<_> = entries
        .iter()
        .filter(|e| e.session_id.as_ref().map(|s| s.as_str()) == Some("bob"))
        .collect();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].mistake.question, "What is osmosis?");

    let json = serde_json::to_value(bob[0]).unwrap();
    assert_eq!(json["session_id"], "bob");
    assert_eq!(json["level"], 2);
}

#[tokio::test]
async fn comments_attach_to_exact_question_only() {
    let (repo, ledger) = seeded().await;
    let alice = session("alice");

    assert!(
        ledger
            .update_mistake_comment(&alice, "What is osmosis?", "water moves")
            .await
            .unwrap()
    );
    assert!(
        !ledger
            .update_mistake_comment(&alice, "what is osmosis?", "case differs")
            .await
            .unwrap()
    );
    assert!(
        !ledger
            .update_mistake_comment(&session("nobody"), "What is osmosis?", "x")
            .await
            .unwrap()
    );

    let stored = repo.load().await.unwrap();
    let mistakes = stored[&alice].mistakes().entries();
    assert_eq!(mistakes[0].comments, "water moves");
    assert!(mistakes[1].comments.is_empty());
}

#[tokio::test]
async fn class_overview_aggregates_real_sessions() {
    let (repo, _) = seeded().await;
    let analytics = AnalyticsService::new(Arc::new(repo));

    let overview = analytics.class_overview().await.unwrap();
    assert_eq!(overview.total_learners, 3);
    assert_eq!(overview.level_distribution.level_1, 2);
    assert_eq!(overview.level_distribution.level_2, 1);
    assert_eq!(overview.level_distribution.completed, 0);
    assert!((overview.average_attempts.level_1 - 2.0 / 3.0).abs() < 1e-9);
    assert!((overview.average_attempts.level_2 - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(overview.common_mistakes[0].concept, "What is osmosis?");
    assert_eq!(overview.common_mistakes[0].frequency, 2);
    assert_eq!(overview.common_mistakes.len(), 2);
}

#[tokio::test]
async fn class_overview_of_empty_store_is_zeroed() {
    let analytics = AnalyticsService::new(Arc::new(InMemoryRepository::new()));
    let overview = analytics.class_overview().await.unwrap();
    assert_eq!(overview.total_learners, 0);
    assert!(overview.common_mistakes.is_empty());
}

#[tokio::test]
async fn class_overview_ignores_attempts_at_unknown_levels() {
    let repo = InMemoryRepository::new();
    let progression = ProgressionService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        ChapterCatalog::new("unused-uploads"),
        RemedialPlanner::new(ScriptedModel::failing()),
    );
    progression
        .submit_assessment_result(&session("dave"), Submission::new(7, 3, 10))
        .await
        .unwrap();

    let overview = AnalyticsService::new(Arc::new(repo))
        .class_overview()
        .await
        .unwrap();
    assert_eq!(overview.total_learners, 1);
    assert_eq!(overview.level_distribution.level_1, 1);
    assert!(overview.average_attempts.level_1.abs() < 1e-9);
    assert!(overview.average_attempts.level_3.abs() < 1e-9);
}
