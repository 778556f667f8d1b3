use anyhow::Result;
use colored::*;
use project_planner::planner::{PlannerCatalog, ServiceKind};

pub fn services_command(catalog: &PlannerCatalog) -> Result<()> {
    let directory = catalog.directory();

    for category in directory.categories() {
        println!("{} {}", category.name.bold(), format!("({})", category.id).dimmed());
        if !category.description.is_empty() {
            println!("  {}", category.description.dimmed());
        }

        for service in directory.services_in(&category.id) {
            let pricing = match service.kind {
                ServiceKind::Modules(id) => id.label().to_string(),
                ServiceKind::Universal => "All modules".to_string(),
                ServiceKind::WebsitePages => "Per page".to_string(),
            };
            println!(
                "  • {:<26} {:<22} {}",
                service.name,
                service.id.cyan(),
                pricing.dimmed()
            );
        }
        println!();
    }

    Ok(())
}
