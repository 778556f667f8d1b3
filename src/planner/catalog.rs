//! Component definitions and validated catalogs
//!
//! A catalog is the static, author-defined list of feature modules for one
//! blueprint. Catalogs are validated once at construction and are immutable
//! afterwards.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A configurable feature module offered by a blueprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Always selected, never removable, cost included in the base price
    #[serde(default)]
    pub is_mandatory: bool,
    /// Keys that must be selected whenever this component is selected
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub unit_price: u64,
    /// Scaffolding component: part of the graph but never displayed
    #[serde(default)]
    pub is_hidden: bool,
}

impl ComponentDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, unit_price: u64) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: String::new(),
            is_mandatory: false,
            dependencies: Vec::new(),
            unit_price,
            is_hidden: false,
        }
    }

    /// Set the human-readable description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare prerequisite keys, in order
    pub fn requires(mut self, keys: &[&str]) -> Self {
        self.dependencies = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Mark as a primary (mandatory) component
    pub fn mandatory(mut self) -> Self {
        self.is_mandatory = true;
        self
    }

    /// Exclude from grouped display
    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }
}

/// Catalog validation failures, reported at load time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate component key '{0}'")]
    DuplicateKey(String),

    #[error("component '{component}' depends on unknown component '{missing}'")]
    DanglingDependency { component: String, missing: String },

    #[error("dependency cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("mandatory component '{component}' depends on optional component '{dependency}'")]
    MandatoryDependsOnOptional {
        component: String,
        dependency: String,
    },

    #[error("group '{group}' references unknown component '{key}'")]
    UnknownGroupKey { group: String, key: String },

    #[error("category '{category}' references unknown service '{service}'")]
    UnknownService { category: String, service: String },

    #[error("duplicate directory entry '{0}'")]
    DuplicateEntry(String),
}

/// Validated, immutable list of component definitions
#[derive(Debug, Clone)]
pub struct Catalog {
    components: Vec<ComponentDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Validate and index a list of definitions
    ///
    /// Rejects duplicate keys, dependencies on keys outside the catalog,
    /// mandatory components with optional prerequisites, and cycles.
    pub fn new(components: Vec<ComponentDefinition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(components.len());
        for (position, component) in components.iter().enumerate() {
            if index.insert(component.key.clone(), position).is_some() {
                return Err(CatalogError::DuplicateKey(component.key.clone()));
            }
        }

        for component in &components {
            for dependency in &component.dependencies {
                let Some(&position) = index.get(dependency) else {
                    return Err(CatalogError::DanglingDependency {
                        component: component.key.clone(),
                        missing: dependency.clone(),
                    });
                };
                if component.is_mandatory && !components[position].is_mandatory {
                    return Err(CatalogError::MandatoryDependsOnOptional {
                        component: component.key.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let catalog = Self { components, index };
        if let Some(cycle) = catalog.find_cycle() {
            return Err(CatalogError::Cycle(cycle));
        }

        debug!("Validated catalog with {} components", catalog.len());
        Ok(catalog)
    }

    pub fn get(&self, key: &str) -> Option<&ComponentDefinition> {
        self.index.get(key).map(|&position| &self.components[position])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All definitions in authoring order
    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.components.iter()
    }

    /// Definitions that may appear in display groups
    pub fn visible(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.components.iter().filter(|c| !c.is_hidden)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Depth-first search for a back edge; returns the cycle path if found
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut finished: HashSet<&str> = HashSet::new();
        let mut path: Vec<&str> = Vec::new();

        for component in &self.components {
            if let Some(cycle) = self.visit(&component.key, &mut path, &mut finished) {
                return Some(cycle);
            }
        }
        None
    }

    fn visit<'a>(
        &'a self,
        key: &'a str,
        path: &mut Vec<&'a str>,
        finished: &mut HashSet<&'a str>,
    ) -> Option<Vec<String>> {
        if finished.contains(key) {
            return None;
        }
        if let Some(start) = path.iter().position(|k| *k == key) {
            let mut cycle: Vec<String> = path[start..].iter().map(|k| k.to_string()).collect();
            cycle.push(key.to_string());
            return Some(cycle);
        }

        path.push(key);
        if let Some(component) = self.get(key) {
            for dependency in &component.dependencies {
                if let Some(cycle) = self.visit(dependency, path, finished) {
                    return Some(cycle);
                }
            }
        }
        path.pop();
        finished.insert(key);
        None
    }
}
