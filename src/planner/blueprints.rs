//! Blueprints and the planner catalog
//!
//! A blueprint is one business-flow family (booking/interaction, commerce)
//! owning its own catalog, dependency graph and display group configuration.
//! [`PlannerCatalog`] bundles every blueprint with the service directory and is
//! constructed once at startup, then shared by reference.

use super::builtin;
use super::catalog::{Catalog, CatalogError, ComponentDefinition};
use super::graph::DependencyGraph;
use super::grouping::{
    DisplayGroup, GroupConfig, MergedGroup, TaggedGroups, build_groups, merge_blueprints,
    tag_groups,
};
use super::services::{ServiceDirectory, ServiceKind};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known blueprint families
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlueprintId {
    Interaction,
    Commerce,
}

impl BlueprintId {
    pub const ALL: [BlueprintId; 2] = [BlueprintId::Interaction, BlueprintId::Commerce];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlueprintId::Interaction => "interaction",
            BlueprintId::Commerce => "commerce",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlueprintId::Interaction => "Booking & Interaction",
            BlueprintId::Commerce => "Commerce",
        }
    }
}

impl fmt::Display for BlueprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlueprintId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interaction" | "booking" => Ok(BlueprintId::Interaction),
            "commerce" | "ecommerce" => Ok(BlueprintId::Commerce),
            other => anyhow::bail!(
                "Unknown blueprint '{}'. Expected 'interaction' or 'commerce'",
                other
            ),
        }
    }
}

/// One blueprint's catalog, graph and group configuration
#[derive(Debug, Clone)]
pub struct Blueprint {
    id: BlueprintId,
    catalog: Catalog,
    graph: DependencyGraph,
    groups: Vec<GroupConfig>,
}

impl Blueprint {
    /// Validate the definitions and derive the dependency graph
    ///
    /// Group configurations must only reference keys of this catalog.
    pub fn new(
        id: BlueprintId,
        components: Vec<ComponentDefinition>,
        groups: Vec<GroupConfig>,
    ) -> Result<Self, CatalogError> {
        let catalog = Catalog::new(components)?;

        for group in &groups {
            if let Some(key) = group.item_keys.iter().find(|k| !catalog.contains(k)) {
                return Err(CatalogError::UnknownGroupKey {
                    group: group.title.clone(),
                    key: key.clone(),
                });
            }
        }

        let graph = DependencyGraph::build(catalog.components());
        Ok(Self {
            id,
            catalog,
            graph,
            groups,
        })
    }

    pub fn id(&self) -> BlueprintId {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn group_config(&self) -> &[GroupConfig] {
        &self.groups
    }

    pub fn display_groups(&self) -> Vec<DisplayGroup> {
        build_groups(&self.groups, &self.catalog)
    }
}

/// Every blueprint plus the service directory
#[derive(Debug, Clone)]
pub struct PlannerCatalog {
    interaction: Blueprint,
    commerce: Blueprint,
    directory: ServiceDirectory,
}

impl PlannerCatalog {
    pub fn new(interaction: Blueprint, commerce: Blueprint, directory: ServiceDirectory) -> Self {
        Self {
            interaction,
            commerce,
            directory,
        }
    }

    /// Construct the catalogs shipped with the planner
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog = Self::new(
            builtin::interaction()?,
            builtin::commerce()?,
            builtin::directory()?,
        );
        info!(
            "Loaded planner catalog: {} interaction modules, {} commerce modules, {} services",
            catalog.interaction.catalog().len(),
            catalog.commerce.catalog().len(),
            catalog.directory.services().len()
        );
        Ok(catalog)
    }

    pub fn blueprint(&self, id: BlueprintId) -> &Blueprint {
        match id {
            BlueprintId::Interaction => &self.interaction,
            BlueprintId::Commerce => &self.commerce,
        }
    }

    pub fn directory(&self) -> &ServiceDirectory {
        &self.directory
    }

    /// Grouped view for a service kind, tagged by source blueprint
    pub fn groups_for(&self, kind: ServiceKind) -> Vec<MergedGroup> {
        match kind {
            ServiceKind::Modules(id) => {
                let blueprint = self.blueprint(id);
                tag_groups(id, &blueprint.display_groups())
            }
            ServiceKind::Universal => self.universal_groups(),
            ServiceKind::WebsitePages => Vec::new(),
        }
    }

    /// Both blueprints merged into one de-duplicated view
    pub fn universal_groups(&self) -> Vec<MergedGroup> {
        let interaction = self.interaction.display_groups();
        let commerce = self.commerce.display_groups();
        merge_blueprints(
            TaggedGroups {
                source: BlueprintId::Interaction,
                groups: &interaction,
            },
            TaggedGroups {
                source: BlueprintId::Commerce,
                groups: &commerce,
            },
            "Commerce ·",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::grouping::Accent;

    #[test]
    fn test_blueprint_id_parsing() {
        assert_eq!(
            "interaction".parse::<BlueprintId>().unwrap(),
            BlueprintId::Interaction
        );
        assert_eq!(
            "Commerce".parse::<BlueprintId>().unwrap(),
            BlueprintId::Commerce
        );
        assert!("crm".parse::<BlueprintId>().is_err());
        assert_eq!(BlueprintId::Commerce.to_string(), "commerce");
    }

    #[test]
    fn test_blueprint_rejects_unknown_group_key() {
        let err = Blueprint::new(
            BlueprintId::Interaction,
            vec![ComponentDefinition::new("a", "A", 0)],
            vec![GroupConfig::new("Core", Accent::Blue, &["a", "nope"])],
        )
        .unwrap_err();

        assert_eq!(
            err,
            CatalogError::UnknownGroupKey {
                group: "Core".to_string(),
                key: "nope".to_string(),
            }
        );
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = PlannerCatalog::builtin().unwrap();
        for id in BlueprintId::ALL {
            let blueprint = catalog.blueprint(id);
            assert_eq!(blueprint.id(), id);
            assert!(!blueprint.graph().mandatory_keys().is_empty());
        }
    }

    #[test]
    fn test_builtin_blueprints_share_no_keys() {
        let catalog = PlannerCatalog::builtin().unwrap();
        let commerce = catalog.blueprint(BlueprintId::Commerce).catalog();
        for component in catalog.blueprint(BlueprintId::Interaction).catalog().iter() {
            assert!(
                !commerce.contains(&component.key),
                "key '{}' appears in both blueprints",
                component.key
            );
        }
    }

    #[test]
    fn test_universal_groups_prefix_second_blueprint() {
        let catalog = PlannerCatalog::builtin().unwrap();
        let merged = catalog.universal_groups();

        let commerce_titles: Vec<_> = merged
            .iter()
            .filter(|g| g.items.iter().all(|i| i.source == BlueprintId::Commerce))
            .map(|g| g.title.as_str())
            .collect();
        assert!(!commerce_titles.is_empty());
        assert!(commerce_titles.iter().all(|t| t.starts_with("Commerce · ")));
    }

    #[test]
    fn test_website_service_has_no_groups() {
        let catalog = PlannerCatalog::builtin().unwrap();
        assert!(catalog.groups_for(ServiceKind::WebsitePages).is_empty());
    }
}
