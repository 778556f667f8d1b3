//! Display grouping
//!
//! Presentation-only buckets of components, independent of the dependency
//! structure. Hidden and unknown keys are dropped; groups left empty are
//! omitted.

use super::blueprints::BlueprintId;
use super::catalog::{Catalog, ComponentDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Accent colour a group is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Blue,
    Green,
    Purple,
    Orange,
    Teal,
    Rose,
}

/// Configured group: title, accent and ordered item keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub title: String,
    pub accent: Accent,
    pub item_keys: Vec<String>,
}

impl GroupConfig {
    pub fn new(title: impl Into<String>, accent: Accent, item_keys: &[&str]) -> Self {
        Self {
            title: title.into(),
            accent,
            item_keys: item_keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayGroup {
    pub title: String,
    pub accent: Accent,
    pub items: Vec<ComponentDefinition>,
}

/// A component together with the blueprint it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedComponent {
    pub source: BlueprintId,
    pub component: ComponentDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedGroup {
    pub title: String,
    pub accent: Accent,
    pub items: Vec<TaggedComponent>,
}

/// Groups of one blueprint, borrowed for merging
#[derive(Debug, Clone, Copy)]
pub struct TaggedGroups<'a> {
    pub source: BlueprintId,
    pub groups: &'a [DisplayGroup],
}

/// Map configured groups through the catalog, preserving order
pub fn build_groups(config: &[GroupConfig], catalog: &Catalog) -> Vec<DisplayGroup> {
    config
        .iter()
        .filter_map(|group| {
            let items: Vec<ComponentDefinition> = group
                .item_keys
                .iter()
                .filter_map(|key| catalog.get(key))
                .filter(|component| !component.is_hidden)
                .cloned()
                .collect();

            (!items.is_empty()).then(|| DisplayGroup {
                title: group.title.clone(),
                accent: group.accent,
                items,
            })
        })
        .collect()
}

/// Tag every item of a single blueprint's groups with its source
pub fn tag_groups(source: BlueprintId, groups: &[DisplayGroup]) -> Vec<MergedGroup> {
    groups
        .iter()
        .map(|group| MergedGroup {
            title: group.title.clone(),
            accent: group.accent,
            items: group
                .items
                .iter()
                .map(|component| TaggedComponent {
                    source,
                    component: component.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Concatenate two blueprints' groups into one de-duplicated view
///
/// The first occurrence of a key wins. Titles of groups from the second
/// blueprint are prefixed with `second_prefix`.
pub fn merge_blueprints(
    first: TaggedGroups<'_>,
    second: TaggedGroups<'_>,
    second_prefix: &str,
) -> Vec<MergedGroup> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(first.groups.len() + second.groups.len());

    let sides = [(first, None), (second, Some(second_prefix))];
    for (side, prefix) in sides {
        for group in side.groups {
            let items: Vec<TaggedComponent> = group
                .items
                .iter()
                .filter(|component| seen.insert(component.key.clone()))
                .map(|component| TaggedComponent {
                    source: side.source,
                    component: component.clone(),
                })
                .collect();

            if items.is_empty() {
                continue;
            }

            let title = match prefix {
                Some(prefix) => format!("{} {}", prefix, group.title),
                None => group.title.clone(),
            };
            merged.push(MergedGroup {
                title,
                accent: group.accent,
                items,
            });
        }
    }

    merged
}
