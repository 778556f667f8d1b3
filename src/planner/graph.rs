//! Dependency graph derived from a component catalog
//!
//! Built once per blueprint and read-only afterwards. The builder trusts its
//! input: malformed definitions (duplicate keys, dangling references) produce
//! partial indexes instead of errors. Catalogs are validated by
//! [`Catalog::new`](super::Catalog::new) before they get here.

use super::catalog::ComponentDefinition;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// key -> declared prerequisites, verbatim
    dependencies_of: HashMap<String, Vec<String>>,
    /// key -> keys that declare it as a prerequisite
    dependents_of: HashMap<String, Vec<String>>,
    mandatory_keys: BTreeSet<String>,
    label_of: HashMap<String, String>,
}

impl DependencyGraph {
    pub fn build(components: &[ComponentDefinition]) -> Self {
        let mut graph = Self::default();

        for component in components {
            graph
                .dependencies_of
                .insert(component.key.clone(), component.dependencies.clone());
            graph
                .label_of
                .insert(component.key.clone(), component.label.clone());

            for dependency in &component.dependencies {
                graph
                    .dependents_of
                    .entry(dependency.clone())
                    .or_default()
                    .push(component.key.clone());
            }

            if component.is_mandatory {
                graph.mandatory_keys.insert(component.key.clone());
            }
        }

        graph
    }

    /// Whether the key names a component of this graph
    pub fn contains(&self, key: &str) -> bool {
        self.label_of.contains_key(key)
    }

    pub fn dependencies_of(&self, key: &str) -> &[String] {
        self.dependencies_of
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn dependents_of(&self, key: &str) -> &[String] {
        self.dependents_of
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn mandatory_keys(&self) -> &BTreeSet<String> {
        &self.mandatory_keys
    }

    pub fn is_mandatory(&self, key: &str) -> bool {
        self.mandatory_keys.contains(key)
    }

    pub fn label_of(&self, key: &str) -> Option<&str> {
        self.label_of.get(key).map(String::as_str)
    }

    /// Label for notices, falling back to the raw key
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.label_of(key).unwrap_or(key)
    }

    /// Number of components in the graph
    pub fn len(&self) -> usize {
        self.label_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_of.is_empty()
    }

    /// Every key reachable from `key` through prerequisites, excluding `key`
    pub fn prerequisite_closure(&self, key: &str) -> BTreeSet<String> {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<&str> = self.dependencies_of(key).iter().map(String::as_str).collect();

        while let Some(current) = stack.pop() {
            if closure.insert(current.to_string()) {
                stack.extend(self.dependencies_of(current).iter().map(String::as_str));
            }
        }

        closure.remove(key);
        closure
    }
}
