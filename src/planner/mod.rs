//! Smart project planner core
//!
//! Component catalogs per blueprint, the dependency graph derived from them,
//! cascade selection, grouped presentation, price aggregation and the
//! synthetic estimate reveal delay.

pub mod blueprints;
pub mod builtin;
pub mod catalog;
pub mod estimate;
pub mod graph;
pub mod grouping;
pub mod pricing;
pub mod selection;
pub mod services;
pub mod session;
pub mod website;

pub use blueprints::{Blueprint, BlueprintId, PlannerCatalog};
pub use catalog::{Catalog, CatalogError, ComponentDefinition};
pub use estimate::{EstimateDelay, PendingEstimate};
pub use graph::DependencyGraph;
pub use grouping::{
    Accent, DisplayGroup, GroupConfig, MergedGroup, TaggedComponent, TaggedGroups, build_groups,
    merge_blueprints, tag_groups,
};
pub use pricing::{PriceEstimate, PriceTable, compute_total, estimate, format_amount};
pub use selection::{CascadePolicy, Notice, SelectionState, ToggleAction, ToggleOutcome};
pub use services::{Category, Service, ServiceDirectory, ServiceKind};
pub use session::{PlannerSession, WizardStep};
pub use website::{WebsiteFeature, WebsitePricing, WebsiteQuote};
