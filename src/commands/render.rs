//! Shared terminal output for planner commands

use colored::*;
use project_planner::planner::{
    Accent, MergedGroup, Notice, PlannerCatalog, PlannerSession, PriceEstimate, ToggleOutcome,
    format_amount,
};

pub fn accent_title(title: &str, accent: Accent) -> ColoredString {
    let title = title.bold();
    match accent {
        Accent::Blue => title.bright_blue(),
        Accent::Green => title.bright_green(),
        Accent::Purple => title.bright_magenta(),
        Accent::Orange => title.yellow(),
        Accent::Teal => title.cyan(),
        Accent::Rose => title.bright_red(),
    }
}

/// Print groups, marking selected components when a session is given
pub fn print_groups(
    groups: &[MergedGroup],
    catalog: &PlannerCatalog,
    session: Option<&PlannerSession>,
    verbose: bool,
) {
    for group in groups {
        println!();
        println!("{}", accent_title(&group.title, group.accent));

        for item in &group.items {
            let component = &item.component;
            let graph = catalog.blueprint(item.source).graph();
            let selected = session
                .and_then(|s| s.selection(item.source))
                .is_some_and(|s| s.is_selected(&component.key));

            let marker = if component.is_mandatory {
                "■".bright_black()
            } else if selected {
                "✓".green()
            } else {
                "·".dimmed()
            };
            let price = if component.is_mandatory {
                "included".dimmed()
            } else {
                format!("+{}", format_amount(component.unit_price)).normal()
            };

            println!(
                "  {} {:<28} {:>10}  {}",
                marker,
                component.label,
                price,
                component.key.dimmed()
            );

            if verbose {
                if !component.description.is_empty() {
                    println!("      {}", component.description.dimmed());
                }
                if !component.dependencies.is_empty() {
                    let needs: Vec<&str> = component
                        .dependencies
                        .iter()
                        .map(|k| graph.display_name(k))
                        .collect();
                    println!("      {} {}", "needs".dimmed(), needs.join(", "));
                }
            }
        }
    }
}

pub fn print_estimate(estimate: &PriceEstimate) {
    println!();
    println!("  {:<22} {:>12}", "Base platform", format_amount(estimate.base_price));
    println!(
        "  {:<22} {:>12}",
        "Optional modules",
        format_amount(estimate.optional_modules_cost)
    );
    println!("  {}", "─".repeat(35).dimmed());
    println!(
        "  {:<22} {:>12}",
        "Estimated total".bold(),
        format_amount(estimate.total).bright_green().bold()
    );
    println!();
}

pub fn print_notice(notice: &Notice) {
    match notice {
        Notice::Required { .. } => println!("{} {}", "!".bright_red().bold(), notice),
        Notice::RequiredAutoEnabled { .. } => println!("{} {}", "!".yellow().bold(), notice),
        Notice::PrerequisitesAdded { .. } | Notice::DependentsRemoved { .. } => {
            println!("{} {}", "ℹ".bright_blue(), notice)
        }
    }
}

pub fn print_outcome(outcome: &ToggleOutcome) {
    if let Some(notice) = &outcome.notice {
        print_notice(notice);
    }
}
