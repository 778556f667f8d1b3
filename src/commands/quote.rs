use crate::cli::commands::quote::QuoteArgs;
use crate::cli::ui::with_spinner;
use anyhow::Result;
use chrono::Utc;
use colored::*;
use log::info;
use project_planner::config::PlannerConfig;
use project_planner::contact::{QuoteRequest, SubmissionReceipt, submitter_from_config};
use project_planner::draft::FileDraftStore;
use project_planner::planner::{PlannerCatalog, PlannerSession};
use std::sync::Arc;

pub async fn quote_command(
    catalog: Arc<PlannerCatalog>,
    config: PlannerConfig,
    args: QuoteArgs,
) -> Result<()> {
    if let Some(id) = &args.service {
        if catalog.directory().service(id).is_none() {
            anyhow::bail!("Unknown service: {}", id);
        }
    }

    let store = Arc::new(FileDraftStore::new(config.draft_path()?));
    let session = PlannerSession::resume(catalog, config.clone(), store, Utc::now());

    let service_id = args
        .service
        .or_else(|| session.service().map(|s| s.id.clone()));
    let message = match args.message {
        Some(message) => message,
        None if session.service().is_some() => session.summary(),
        None => "Callback requested".to_string(),
    };

    let mut request = QuoteRequest::new(args.name, args.email, args.phone, message);
    if let Some(id) = service_id {
        request = request.for_service(id);
    }

    let receipt = submit_request(&config, &request).await?;
    print_receipt(&receipt);
    Ok(())
}

/// Validate and hand a request to the configured submitter
pub async fn submit_request(
    config: &PlannerConfig,
    request: &QuoteRequest,
) -> Result<SubmissionReceipt> {
    request.validate()?;
    let submitter = submitter_from_config(config)?;
    let receipt = with_spinner("Sending your request", submitter.submit(request)).await?;
    info!("Quote request {} delivered to {}", receipt.id, receipt.destination);
    Ok(receipt)
}

pub fn print_receipt(receipt: &SubmissionReceipt) {
    println!(
        "{} Thanks! We'll call you back soon. Reference: {}",
        "✓".green(),
        receipt.id.to_string().bold()
    );
    println!("  {}", format!("Delivered to {}", receipt.destination).dimmed());
}
