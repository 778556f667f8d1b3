//! Integration tests for wizard sessions and draft persistence
//!
//! Runs the session against file-backed drafts in a temporary directory.

use chrono::{Duration, Utc};
use project_planner::config::PlannerConfig;
use project_planner::contact::{OutboxQuoteSubmitter, QuoteRequest, QuoteSubmitter};
use project_planner::draft::{DraftStore, FileDraftStore, PlannerDraft, load_fresh};
use project_planner::planner::{
    BlueprintId, CascadePolicy, PlannerCatalog, PlannerSession, WizardStep,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn catalog() -> Arc<PlannerCatalog> {
    Arc::new(PlannerCatalog::builtin().unwrap())
}

/// A draft saved within the expiry window restores the same wizard position
#[test]
fn test_file_draft_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path().join("draft.json")));

    let mut session = PlannerSession::new(catalog(), PlannerConfig::default(), store.clone());
    session.select_category("hospitality").unwrap();
    session.select_service("appointment-booking").unwrap();
    session.toggle(BlueprintId::Interaction, "waitlist");
    session.go_back();

    let resumed = PlannerSession::resume(catalog(), PlannerConfig::default(), store, Utc::now());
    assert_eq!(resumed.category().map(|c| c.id.as_str()), Some("hospitality"));
    assert_eq!(
        resumed.service().map(|s| s.id.as_str()),
        Some("appointment-booking")
    );
    assert_eq!(resumed.current_step(), WizardStep::Service);
    assert_eq!(resumed.max_visited_step(), WizardStep::Configure);
    assert!(
        resumed
            .selection(BlueprintId::Interaction)
            .unwrap()
            .is_selected("waitlist")
    );
}

/// A draft saved two hours ago is discarded with a one hour expiry
#[test]
fn test_stale_draft_is_not_restored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");
    let store = Arc::new(FileDraftStore::new(&path));

    let now = Utc::now();
    store
        .save(&PlannerDraft {
            selected_category_id: Some("retail".to_string()),
            selected_service_id: Some("online-store".to_string()),
            current_step_index: 2,
            max_visited_step_index: 2,
            saved_at_timestamp: (now - Duration::hours(2)).timestamp_millis(),
            selections: BTreeMap::new(),
            auto_added: BTreeMap::new(),
            quantities: BTreeMap::new(),
            website: None,
        })
        .unwrap();

    assert!(load_fresh(store.as_ref(), Duration::hours(1), now).is_none());
    assert!(!path.exists());
}

/// Resuming with a stale draft starts a fresh session
#[test]
fn test_resume_ignores_stale_draft() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path().join("draft.json")));

    let mut session = PlannerSession::new(catalog(), PlannerConfig::default(), store.clone());
    session.select_category("retail").unwrap();

    let later = Utc::now() + Duration::hours(2);
    let resumed = PlannerSession::resume(catalog(), PlannerConfig::default(), store, later);
    assert!(resumed.category().is_none());
    assert_eq!(resumed.current_step(), WizardStep::Category);
}

/// A corrupt draft file behaves like no draft at all
#[test]
fn test_corrupt_draft_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");
    std::fs::write(&path, "{\"selectedCategoryId\": 42").unwrap();

    let store = Arc::new(FileDraftStore::new(&path));
    let session = PlannerSession::resume(catalog(), PlannerConfig::default(), store, Utc::now());
    assert_eq!(session.current_step(), WizardStep::Category);
}

/// Write failures never surface from session operations
#[test]
fn test_unwritable_draft_location_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let store = Arc::new(FileDraftStore::new(blocker.join("draft.json")));

    let mut session = PlannerSession::new(catalog(), PlannerConfig::default(), store);
    session.select_category("retail").unwrap();
    session.select_service("online-store").unwrap();
    assert_eq!(session.estimate().unwrap().total, 25000);
}

/// The release-orphans policy drops prerequisites nobody needs any more
#[test]
fn test_release_orphans_policy_from_config() {
    let mut config = PlannerConfig::default();
    config.cascade_policy = CascadePolicy::ReleaseOrphans;
    let store = Arc::new(project_planner::draft::MemoryDraftStore::new());

    let mut session = PlannerSession::new(catalog(), config, store);
    session.select_category("retail").unwrap();
    session.select_service("online-store").unwrap();

    session.toggle(BlueprintId::Commerce, "wishlist");
    assert!(
        session
            .selection(BlueprintId::Commerce)
            .unwrap()
            .is_selected("customer_accounts")
    );

    session.toggle(BlueprintId::Commerce, "wishlist");
    let state = session.selection(BlueprintId::Commerce).unwrap();
    assert!(!state.is_selected("customer_accounts"));
    assert_eq!(session.estimate().unwrap().total, 25000);
}

/// A resumed session releases auto-added prerequisites like the live one
#[test]
fn test_resumed_session_releases_orphans_like_live_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path().join("draft.json")));
    let mut config = PlannerConfig::default();
    config.cascade_policy = CascadePolicy::ReleaseOrphans;

    let mut live = PlannerSession::new(catalog(), config.clone(), store.clone());
    live.select_category("retail").unwrap();
    live.select_service("online-store").unwrap();
    live.toggle(BlueprintId::Commerce, "wishlist");

    let mut resumed = PlannerSession::resume(catalog(), config, store, Utc::now());
    assert_eq!(
        resumed.selection(BlueprintId::Commerce).unwrap().auto_added(),
        live.selection(BlueprintId::Commerce).unwrap().auto_added()
    );

    let live_outcome = live.toggle(BlueprintId::Commerce, "wishlist");
    let resumed_outcome = resumed.toggle(BlueprintId::Commerce, "wishlist");

    assert_eq!(live_outcome.removed, vec!["wishlist", "customer_accounts"]);
    assert_eq!(resumed_outcome.removed, live_outcome.removed);
    assert_eq!(resumed.estimate().unwrap().total, 25000);
    assert_eq!(resumed.estimate(), live.estimate());
}

/// The session summary is handed off as the callback message
#[tokio::test]
async fn test_summary_handed_to_outbox() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path().join("draft.json")));

    let mut session = PlannerSession::new(catalog(), PlannerConfig::default(), store);
    session.select_category("retail").unwrap();
    session.select_service("online-store").unwrap();
    session.toggle(BlueprintId::Commerce, "coupons_discounts");

    let outbox = dir.path().join("outbox.jsonl");
    let submitter = OutboxQuoteSubmitter::new(&outbox);
    let request = QuoteRequest::new(
        "Ravi",
        "ravi@example.in",
        "9876543210",
        session.summary(),
    )
    .for_service("online-store");
    submitter.submit(&request).await.unwrap();

    let line = std::fs::read_to_string(&outbox).unwrap();
    let json: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("Coupons & Discounts"));
    assert!(message.contains("₹28,500"));
}
