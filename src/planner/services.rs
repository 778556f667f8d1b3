//! Business categories and the services offered in each
//!
//! Every service resolves to a [`ServiceKind`], which decides how it is
//! configured and priced.

use super::blueprints::BlueprintId;
use super::catalog::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pricing strategy of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "blueprint")]
pub enum ServiceKind {
    /// Module selection over one blueprint
    Modules(BlueprintId),
    /// Module selection over every blueprint at once
    Universal,
    /// Page-count formula, no modules
    WebsitePages,
}

impl ServiceKind {
    /// Blueprints whose selections take part in this service
    pub fn blueprints(&self) -> &'static [BlueprintId] {
        match self {
            ServiceKind::Modules(BlueprintId::Interaction) => &[BlueprintId::Interaction],
            ServiceKind::Modules(BlueprintId::Commerce) => &[BlueprintId::Commerce],
            ServiceKind::Universal => &BlueprintId::ALL,
            ServiceKind::WebsitePages => &[],
        }
    }

    pub fn uses_modules(&self) -> bool {
        !self.blueprints().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: ServiceKind,
}

impl Service {
    pub fn new(id: &str, name: &str, description: &str, kind: ServiceKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub service_ids: Vec<String>,
}

impl Category {
    pub fn new(id: &str, name: &str, description: &str, service_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            service_ids: service_ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Validated categories and services
#[derive(Debug, Clone)]
pub struct ServiceDirectory {
    categories: Vec<Category>,
    services: Vec<Service>,
}

impl ServiceDirectory {
    pub fn new(categories: Vec<Category>, services: Vec<Service>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        for id in categories
            .iter()
            .map(|c| &c.id)
            .chain(services.iter().map(|s| &s.id))
        {
            if !ids.insert(id.as_str()) {
                return Err(CatalogError::DuplicateEntry(id.clone()));
            }
        }

        for category in &categories {
            for service_id in &category.service_ids {
                if !services.iter().any(|s| &s.id == service_id) {
                    return Err(CatalogError::UnknownService {
                        category: category.id.clone(),
                        service: service_id.clone(),
                    });
                }
            }
        }

        Ok(Self {
            categories,
            services,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Services of a category, in configured order
    pub fn services_in(&self, category_id: &str) -> Vec<&Service> {
        self.category(category_id)
            .map(|category| {
                category
                    .service_ids
                    .iter()
                    .filter_map(|id| self.service(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn category_offers(&self, category_id: &str, service_id: &str) -> bool {
        self.category(category_id)
            .is_some_and(|c| c.service_ids.iter().any(|s| s == service_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ServiceDirectory {
        ServiceDirectory::new(
            vec![Category::new("retail", "Retail", "", &["shop", "site"])],
            vec![
                Service::new(
                    "shop",
                    "Online Shop",
                    "",
                    ServiceKind::Modules(BlueprintId::Commerce),
                ),
                Service::new("site", "Website", "", ServiceKind::WebsitePages),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_and_membership() {
        let directory = directory();
        assert_eq!(directory.services_in("retail").len(), 2);
        assert!(directory.services_in("nope").is_empty());
        assert!(directory.category_offers("retail", "site"));
        assert!(!directory.category_offers("retail", "ghost"));
    }

    #[test]
    fn test_unknown_service_rejected() {
        let err = ServiceDirectory::new(
            vec![Category::new("retail", "Retail", "", &["ghost"])],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownService { .. }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = ServiceDirectory::new(
            vec![Category::new("shop", "Shop", "", &[])],
            vec![Service::new("shop", "Shop", "", ServiceKind::Universal)],
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateEntry("shop".to_string()));
    }

    #[test]
    fn test_service_kind_blueprints() {
        assert_eq!(
            ServiceKind::Modules(BlueprintId::Commerce).blueprints(),
            &[BlueprintId::Commerce]
        );
        assert_eq!(ServiceKind::Universal.blueprints().len(), 2);
        assert!(!ServiceKind::WebsitePages.uses_modules());
    }
}
