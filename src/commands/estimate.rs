use crate::cli::commands::estimate::EstimateArgs;
use crate::cli::ui::Spinner;
use crate::commands::render;
use anyhow::{Context, Result};
use colored::*;
use is_terminal::IsTerminal;
use log::{debug, info};
use project_planner::config::PlannerConfig;
use project_planner::draft::MemoryDraftStore;
use project_planner::planner::{
    BlueprintId, PlannerCatalog, PlannerSession, ServiceKind, ToggleAction, WebsiteQuote,
};
use std::sync::Arc;

pub async fn estimate_command(
    catalog: Arc<PlannerCatalog>,
    config: PlannerConfig,
    args: EstimateArgs,
) -> Result<()> {
    info!("Estimating service {}", args.service);

    let service = catalog
        .directory()
        .service(&args.service)
        .with_context(|| format!("Unknown service: {}", args.service))?
        .clone();
    let category_id = match &args.category {
        Some(id) => id.clone(),
        None => catalog
            .directory()
            .categories()
            .iter()
            .find(|c| c.service_ids.contains(&service.id))
            .map(|c| c.id.clone())
            .with_context(|| format!("No industry offers service '{}'", service.id))?,
    };

    // Scripted estimates never touch the saved draft
    let mut session = PlannerSession::new(
        Arc::clone(&catalog),
        config,
        Arc::new(MemoryDraftStore::new()),
    );
    session.select_category(&category_id)?;
    session.select_service(&service.id)?;

    match service.kind {
        ServiceKind::WebsitePages => {
            let defaults = WebsiteQuote::default();
            session.set_website(WebsiteQuote {
                pages: args.pages.unwrap_or(defaults.pages),
                dynamic_pages: args.dynamic_pages.unwrap_or(defaults.dynamic_pages),
                features: args.features.iter().copied().collect(),
            });
        }
        kind => {
            for key in &args.select {
                let blueprint = resolve_key(&catalog, kind, key)?;
                if session
                    .selection(blueprint)
                    .is_some_and(|s| s.is_selected(key))
                {
                    debug!("'{}' already selected", key);
                    continue;
                }
                let outcome = session.toggle(blueprint, key);
                if outcome.action == ToggleAction::Selected && !args.json {
                    render::print_outcome(&outcome);
                }
            }
            for (key, qty) in &args.quantities {
                let blueprint = resolve_key(&catalog, kind, key)?;
                if !session
                    .selection(blueprint)
                    .is_some_and(|s| s.is_selected(key))
                {
                    anyhow::bail!("Quantity given for '{}', which is not selected", key);
                }
                session.set_quantity(blueprint, key, *qty);
            }
        }
    }

    let estimate = if args.instant {
        session.estimate().context("No service selected")?
    } else {
        let pending = session
            .request_estimate(&mut rand::rng())
            .context("No service selected")?;
        let _spinner = (std::io::stderr().is_terminal() && !args.json)
            .then(|| Spinner::start_timed("Calculating your estimate", pending.delay()));
        pending.wait().await.context("Estimate was cancelled")?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!("{}", session.summary().dimmed());
    render::print_estimate(&estimate);
    Ok(())
}

/// Blueprint that owns `key` among those used by `kind`
fn resolve_key(catalog: &PlannerCatalog, kind: ServiceKind, key: &str) -> Result<BlueprintId> {
    kind.blueprints()
        .iter()
        .copied()
        .find(|id| catalog.blueprint(*id).catalog().contains(key))
        .with_context(|| {
            format!(
                "Unknown component '{}'. Run `project-planner catalog` to list keys",
                key
            )
        })
}
