use anyhow::Result;
use chrono::{Local, Utc};
use colored::*;
use log::info;
use project_planner::config::PlannerConfig;
use project_planner::draft::{DraftStore, FileDraftStore};
use project_planner::planner::{PlannerCatalog, PlannerSession, WizardStep};
use std::sync::Arc;

pub fn show_command(catalog: Arc<PlannerCatalog>, config: PlannerConfig) -> Result<()> {
    let store = Arc::new(FileDraftStore::new(config.draft_path()?));

    let Some(draft) = store.load() else {
        println!("No saved draft at {}", store.path().display());
        return Ok(());
    };

    let saved_at = draft
        .saved_at()
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let stale = draft.is_expired(config.draft.expiry(), Utc::now());

    println!("{} {}", "Draft:".bold(), store.path().display());
    println!("  Saved:  {}", saved_at);
    println!(
        "  Status: {}",
        if stale {
            "expired, will be discarded".yellow()
        } else {
            "resumable".green()
        }
    );
    if let Some(step) = WizardStep::from_index(draft.current_step_index) {
        println!("  Step:   {}", step);
    }

    if !stale {
        let session = PlannerSession::resume(catalog, config, store, Utc::now());
        println!();
        println!("{}", session.summary());
    }

    Ok(())
}

pub fn clear_command(config: &PlannerConfig) -> Result<()> {
    let store = FileDraftStore::new(config.draft_path()?);
    store.clear()?;
    info!("Draft cleared");
    println!("{} Draft cleared", "✓".green());
    Ok(())
}
