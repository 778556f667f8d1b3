use crate::cli::commands::catalog::{CatalogArgs, CatalogView};
use crate::commands::render;
use anyhow::Result;
use colored::*;
use log::info;
use project_planner::planner::{BlueprintId, PlannerCatalog, ServiceKind};

pub fn catalog_command(catalog: &PlannerCatalog, args: CatalogArgs) -> Result<()> {
    info!("Showing catalog view {:?}", args.blueprint);

    let views: Vec<(String, ServiceKind)> = match args.blueprint {
        Some(CatalogView::Interaction) => vec![blueprint_view(BlueprintId::Interaction)],
        Some(CatalogView::Commerce) => vec![blueprint_view(BlueprintId::Commerce)],
        Some(CatalogView::Universal) => {
            vec![("Universal".to_string(), ServiceKind::Universal)]
        }
        None => BlueprintId::ALL.into_iter().map(blueprint_view).collect(),
    };

    for (title, kind) in views {
        println!("{}", format!("═══ {} ═══", title).bold());
        render::print_groups(&catalog.groups_for(kind), catalog, None, args.verbose);
        println!();
    }

    println!(
        "{} {}  {} {}",
        "■".bright_black(),
        "included in base price".dimmed(),
        "·".dimmed(),
        "optional".dimmed()
    );
    Ok(())
}

fn blueprint_view(id: BlueprintId) -> (String, ServiceKind) {
    (id.label().to_string(), ServiceKind::Modules(id))
}
