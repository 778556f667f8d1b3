//! Interactive planner wizard

use crate::cli::commands::plan::PlanArgs;
use crate::cli::ui::Spinner;
use crate::commands::quote::{print_receipt, submit_request};
use crate::commands::render;
use anyhow::Result;
use chrono::Utc;
use colored::*;
use dialoguer::{Input, MultiSelect, Select};
use is_terminal::IsTerminal;
use log::{info, warn};
use project_planner::config::PlannerConfig;
use project_planner::contact::QuoteRequest;
use project_planner::draft::{DraftStore, FileDraftStore};
use project_planner::planner::{
    BlueprintId, PlannerCatalog, PlannerSession, ServiceKind, WebsiteFeature, WebsiteQuote,
    WizardStep, format_amount,
};
use std::sync::Arc;

enum Flow {
    Continue,
    Exit,
}

pub async fn plan_command(
    catalog: Arc<PlannerCatalog>,
    config: PlannerConfig,
    args: PlanArgs,
) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!(
            "The planner wizard needs an interactive terminal. Use `project-planner estimate` instead."
        );
    }

    let store: Arc<dyn DraftStore> = Arc::new(FileDraftStore::new(config.draft_path()?));
    let mut session = if args.fresh {
        if let Err(e) = store.clear() {
            warn!("Failed to clear draft: {}", e);
        }
        PlannerSession::new(catalog, config, store)
    } else {
        PlannerSession::resume(catalog, config, store, Utc::now())
    };

    if session.category().is_some() {
        println!("{}", "Found a saved plan:".bold());
        println!("{}", session.summary().dimmed());
        println!();
        if !prompt_confirmation("Resume where you left off?", true)? {
            session.reset();
        }
    }

    loop {
        println!();
        print_progress(&session);

        let flow = match session.current_step() {
            WizardStep::Category => category_step(&mut session)?,
            WizardStep::Service => service_step(&mut session)?,
            WizardStep::Configure => configure_step(&mut session)?,
            WizardStep::Estimate => estimate_step(&mut session).await?,
        };

        if let Flow::Exit = flow {
            break;
        }
    }

    info!("Planner wizard finished");
    Ok(())
}

fn print_progress(session: &PlannerSession) {
    let steps: Vec<String> = WizardStep::ALL
        .iter()
        .map(|step| {
            let label = format!("{}. {}", step.index() + 1, step.label());
            if *step == session.current_step() {
                label.bold().bright_blue().to_string()
            } else if *step <= session.max_visited_step() {
                label.normal().to_string()
            } else {
                label.dimmed().to_string()
            }
        })
        .collect();
    let separator = " › ".dimmed().to_string();
    println!("{}", steps.join(separator.as_str()));
}

fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(if default_yes { 0 } else { 1 })
        .interact()?;
    Ok(selection == 0)
}

fn category_step(session: &mut PlannerSession) -> Result<Flow> {
    let categories = session.catalog().directory().categories().to_vec();
    let mut items: Vec<String> = categories
        .iter()
        .map(|c| format!("{} - {}", c.name.bold(), c.description.dimmed()))
        .collect();
    items.push("Exit".to_string());

    let current = session
        .category()
        .and_then(|selected| categories.iter().position(|c| c.id == selected.id))
        .unwrap_or(0);

    let choice = Select::new()
        .with_prompt("What kind of business is this for?")
        .items(&items)
        .default(current)
        .interact()?;

    match categories.get(choice) {
        Some(category) => {
            session.select_category(&category.id)?;
            Ok(Flow::Continue)
        }
        None => Ok(Flow::Exit),
    }
}

fn service_step(session: &mut PlannerSession) -> Result<Flow> {
    let Some(category) = session.category().cloned() else {
        session.go_to_step(WizardStep::Category);
        return Ok(Flow::Continue);
    };
    let services: Vec<_> = session
        .catalog()
        .directory()
        .services_in(&category.id)
        .into_iter()
        .cloned()
        .collect();

    let mut items: Vec<String> = services
        .iter()
        .map(|s| format!("{} - {}", s.name.bold(), s.description.dimmed()))
        .collect();
    items.push("← Back".to_string());

    let current = session
        .service()
        .and_then(|selected| services.iter().position(|s| s.id == selected.id))
        .unwrap_or(0);

    let choice = Select::new()
        .with_prompt(format!("Which service do you need for {}?", category.name))
        .items(&items)
        .default(current)
        .interact()?;

    match services.get(choice) {
        Some(service) => session.select_service(&service.id)?,
        None => {
            session.go_back();
        }
    }
    Ok(Flow::Continue)
}

fn configure_step(session: &mut PlannerSession) -> Result<Flow> {
    match session.service_kind() {
        Some(ServiceKind::WebsitePages) => configure_website(session),
        Some(_) => configure_modules(session),
        None => {
            session.go_to_step(WizardStep::Service);
            Ok(Flow::Continue)
        }
    }
}

enum ModuleChoice {
    Toggle(BlueprintId, String),
    Quantity,
    Continue,
    Back,
}

fn configure_modules(session: &mut PlannerSession) -> Result<Flow> {
    let mut cursor = 0;

    loop {
        let mut choices = Vec::new();
        let mut items = Vec::new();

        for group in session.display_groups() {
            for item in group.items {
                let component = item.component;
                if component.is_mandatory {
                    continue;
                }
                let selected = session
                    .selection(item.source)
                    .is_some_and(|s| s.is_selected(&component.key));
                let marker = if selected { "[✓]".green() } else { "[ ]".normal() };
                items.push(format!(
                    "{} {:<28} {:>9}  {}",
                    marker,
                    component.label,
                    format!("+{}", format_amount(component.unit_price)),
                    group.title.dimmed()
                ));
                choices.push(ModuleChoice::Toggle(item.source, component.key));
            }
        }
        items.push("Set a quantity…".to_string());
        choices.push(ModuleChoice::Quantity);
        items.push("Continue to estimate →".bold().to_string());
        choices.push(ModuleChoice::Continue);
        items.push("← Back".to_string());
        choices.push(ModuleChoice::Back);

        let total = session.estimate().map(|e| e.total).unwrap_or_default();
        let choice = Select::new()
            .with_prompt(format!(
                "Pick modules (core features included) · running total {}",
                format_amount(total)
            ))
            .items(&items)
            .default(cursor.min(items.len() - 1))
            .max_length(18)
            .interact()?;
        cursor = choice;

        match choices.get(choice) {
            Some(ModuleChoice::Toggle(blueprint, key)) => {
                let outcome = session.toggle(*blueprint, key);
                render::print_outcome(&outcome);
            }
            Some(ModuleChoice::Quantity) => prompt_quantity(session)?,
            Some(ModuleChoice::Continue) => {
                session.advance();
                return Ok(Flow::Continue);
            }
            Some(ModuleChoice::Back) | None => {
                session.go_back();
                return Ok(Flow::Continue);
            }
        }
    }
}

fn prompt_quantity(session: &mut PlannerSession) -> Result<()> {
    let Some(kind) = session.service_kind() else {
        return Ok(());
    };

    let mut options: Vec<(BlueprintId, String, String)> = Vec::new();
    for id in kind.blueprints() {
        let graph = session.catalog().blueprint(*id).graph();
        if let Some(state) = session.selection(*id) {
            for key in state.optional_keys(graph) {
                options.push((
                    *id,
                    key.clone(),
                    format!("{} (x{})", graph.display_name(key), state.quantity(key)),
                ));
            }
        }
    }

    if options.is_empty() {
        println!("{}", "Select a module first.".yellow());
        return Ok(());
    }

    let labels: Vec<&str> = options.iter().map(|(_, _, label)| label.as_str()).collect();
    let choice = Select::new()
        .with_prompt("Which module?")
        .items(&labels)
        .default(0)
        .interact()?;
    let (blueprint, key, _) = &options[choice];

    let quantity: u32 = Input::new()
        .with_prompt("Quantity")
        .default(session.selection(*blueprint).map_or(1, |s| s.quantity(key)))
        .validate_with(|value: &u32| -> Result<(), &str> {
            if *value >= 1 {
                Ok(())
            } else {
                Err("Quantity must be at least 1")
            }
        })
        .interact_text()?;

    session.set_quantity(*blueprint, key, quantity);
    Ok(())
}

fn configure_website(session: &mut PlannerSession) -> Result<Flow> {
    let current = session.website().clone();

    let pages: u32 = Input::new()
        .with_prompt("How many pages?")
        .default(current.pages)
        .validate_with(|value: &u32| -> Result<(), &str> {
            if *value >= 1 {
                Ok(())
            } else {
                Err("At least one page is needed")
            }
        })
        .interact_text()?;

    let dynamic_pages: u32 = Input::new()
        .with_prompt("How many of them are dynamic (listings, dashboards)?")
        .default(current.dynamic_pages.min(pages))
        .validate_with(move |value: &u32| -> Result<(), String> {
            if *value <= pages {
                Ok(())
            } else {
                Err(format!("Can't exceed the {} pages", pages))
            }
        })
        .interact_text()?;

    let labels: Vec<String> = WebsiteFeature::ALL
        .iter()
        .map(|f| {
            format!(
                "{} (+{})",
                f.label(),
                format_amount(session.config().website.feature_price(*f))
            )
        })
        .collect();
    let defaults: Vec<bool> = WebsiteFeature::ALL
        .iter()
        .map(|f| current.features.contains(f))
        .collect();
    let picked = MultiSelect::new()
        .with_prompt("Extra features (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    session.set_website(WebsiteQuote {
        pages,
        dynamic_pages,
        features: picked
            .into_iter()
            .filter_map(|i| WebsiteFeature::ALL.get(i).copied())
            .collect(),
    });
    session.advance();
    Ok(Flow::Continue)
}

async fn estimate_step(session: &mut PlannerSession) -> Result<Flow> {
    let Some(pending) = session.request_estimate(&mut rand::rng()) else {
        session.go_to_step(WizardStep::Service);
        return Ok(Flow::Continue);
    };

    let spinner = Spinner::start_timed("Calculating your estimate", pending.delay());
    let estimate = pending.wait().await;
    spinner.stop();

    let Some(estimate) = estimate else {
        println!("{}", "Estimate cancelled.".yellow());
        session.go_back();
        return Ok(Flow::Continue);
    };

    println!("{}", session.summary().dimmed());
    render::print_estimate(&estimate);

    let items = vec![
        "Request a callback",
        "Adjust configuration",
        "Start over",
        "Exit (your plan is saved)",
    ];
    let choice = Select::new()
        .with_prompt("What next?")
        .items(&items)
        .default(0)
        .interact()?;

    match choice {
        0 => {
            request_callback(session).await?;
            Ok(Flow::Exit)
        }
        1 => {
            session.go_back();
            Ok(Flow::Continue)
        }
        2 => {
            session.reset();
            Ok(Flow::Continue)
        }
        _ => Ok(Flow::Exit),
    }
}

async fn request_callback(session: &PlannerSession) -> Result<()> {
    let name: String = Input::new()
        .with_prompt("Your name")
        .validate_with(|value: &String| -> Result<(), &str> {
            if value.trim().is_empty() {
                Err("Name is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let email: String = Input::new()
        .with_prompt("Email")
        .validate_with(|value: &String| -> Result<(), String> {
            QuoteRequest::new("-", value.as_str(), "+910000000000", "")
                .validate()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let phone: String = Input::new()
        .with_prompt("Phone")
        .validate_with(|value: &String| -> Result<(), String> {
            QuoteRequest::new("-", "a@b.co", value.as_str(), "")
                .validate()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let mut request = QuoteRequest::new(name, email, phone, session.summary());
    if let Some(service) = session.service() {
        request = request.for_service(service.id.clone());
    }

    let receipt = submit_request(session.config(), &request).await?;
    print_receipt(&receipt);
    Ok(())
}
