//! Selection state and the cascade engine
//!
//! Selecting a component pulls its prerequisites in (depth-first); deselecting
//! one pushes its dependents out (breadth-first). Mandatory components are
//! selected from the start and can never be removed.

use super::blueprints::BlueprintId;
use super::graph::DependencyGraph;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// How far a deselection reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CascadePolicy {
    /// Remove every reachable non-mandatory dependent, nothing else
    #[default]
    Reachable,
    /// Additionally release auto-added prerequisites that no remaining
    /// selected component still requires
    ReleaseOrphans,
}

impl std::str::FromStr for CascadePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reachable" => Ok(CascadePolicy::Reachable),
            "release-orphans" => Ok(CascadePolicy::ReleaseOrphans),
            other => anyhow::bail!(
                "Unknown cascade policy '{}'. Expected 'reachable' or 'release-orphans'",
                other
            ),
        }
    }
}

/// User-facing message describing a cascade side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Attempted removal of a mandatory component
    Required { label: String },
    PrerequisitesAdded { parent: String, added: Vec<String> },
    /// A mandatory prerequisite had to be switched back on
    RequiredAutoEnabled { parent: String, required: Vec<String> },
    DependentsRemoved { parent: String, removed: Vec<String> },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Required { label } => {
                write!(f, "{} is a required component and cannot be removed", label)
            }
            Notice::PrerequisitesAdded { parent, added } => {
                write!(f, "{} also needs: {}", parent, added.join(", "))
            }
            Notice::RequiredAutoEnabled { parent, required } => write!(
                f,
                "Required component {} was enabled for {}",
                required.join(", "),
                parent
            ),
            Notice::DependentsRemoved { parent, removed } => write!(
                f,
                "Removing {} also removed: {}",
                parent,
                removed.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Selected,
    Deselected,
    /// Removal of a mandatory component was refused
    Refused,
    /// Key is not part of the graph
    Ignored,
}

/// Result of a single toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    /// Keys that became selected, toggled key first
    pub added: Vec<String>,
    /// Keys that became unselected, toggled key first
    pub removed: Vec<String>,
    pub notice: Option<Notice>,
}

impl ToggleOutcome {
    pub fn ignored() -> Self {
        Self {
            action: ToggleAction::Ignored,
            added: Vec::new(),
            removed: Vec::new(),
            notice: None,
        }
    }

    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Selected keys and quantities for one blueprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    blueprint: BlueprintId,
    selected: BTreeSet<String>,
    quantities: BTreeMap<String, u32>,
    /// Selected only because something else required them
    auto_added: BTreeSet<String>,
    policy: CascadePolicy,
}

impl SelectionState {
    /// Fresh selection containing exactly the mandatory keys
    pub fn new(blueprint: BlueprintId, graph: &DependencyGraph) -> Self {
        Self {
            blueprint,
            selected: graph.mandatory_keys().clone(),
            quantities: BTreeMap::new(),
            auto_added: BTreeSet::new(),
            policy: CascadePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CascadePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn blueprint(&self) -> BlueprintId {
        self.blueprint
    }

    pub fn policy(&self) -> CascadePolicy {
        self.policy
    }

    pub fn selected_keys(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected keys that are not mandatory
    pub fn optional_keys<'a>(
        &'a self,
        graph: &'a DependencyGraph,
    ) -> impl Iterator<Item = &'a String> + 'a {
        self.selected.iter().filter(move |k| !graph.is_mandatory(k))
    }

    /// Quantity for a key; absent entries count as 1
    pub fn quantity(&self, key: &str) -> u32 {
        self.quantities.get(key).copied().unwrap_or(1).max(1)
    }

    pub fn quantities(&self) -> &BTreeMap<String, u32> {
        &self.quantities
    }

    /// Selected keys that were pulled in as prerequisites, not chosen directly
    pub fn auto_added(&self) -> &BTreeSet<String> {
        &self.auto_added
    }

    /// Set a quantity, clamped to at least 1. Unknown keys are ignored.
    pub fn set_quantity(&mut self, graph: &DependencyGraph, key: &str, quantity: u32) -> bool {
        if !graph.contains(key) {
            return false;
        }
        self.quantities.insert(key.to_string(), quantity.max(1));
        true
    }

    /// Back to the mandatory keys only
    pub fn reset(&mut self, graph: &DependencyGraph) {
        self.selected = graph.mandatory_keys().clone();
        self.quantities.clear();
        self.auto_added.clear();
    }

    /// Flip a component's membership, cascading as needed
    pub fn toggle(&mut self, graph: &DependencyGraph, key: &str) -> ToggleOutcome {
        if !graph.contains(key) {
            debug!("Ignoring toggle of unknown key '{}' in {}", key, self.blueprint);
            return ToggleOutcome::ignored();
        }

        if graph.is_mandatory(key) {
            if self.selected.contains(key) {
                debug!("Refusing to remove mandatory component '{}'", key);
                return ToggleOutcome {
                    action: ToggleAction::Refused,
                    added: Vec::new(),
                    removed: Vec::new(),
                    notice: Some(Notice::Required {
                        label: graph.display_name(key).to_string(),
                    }),
                };
            }
            self.selected.insert(key.to_string());
            return ToggleOutcome {
                action: ToggleAction::Selected,
                added: vec![key.to_string()],
                removed: Vec::new(),
                notice: None,
            };
        }

        if self.selected.contains(key) {
            self.deselect(graph, key)
        } else {
            self.select(graph, key)
        }
    }

    /// Re-select saved keys, pulling in prerequisites so closure holds
    ///
    /// Keys listed in `auto_added` keep their prerequisite status, so a
    /// resumed selection releases them exactly like the original would.
    pub fn restore<S: AsRef<str>>(
        &mut self,
        graph: &DependencyGraph,
        keys: &[S],
        auto_added: &[S],
    ) {
        for key in keys {
            let key = key.as_ref();
            if graph.contains(key) && !self.selected.contains(key) {
                self.select(graph, key);
            }
        }
        for key in auto_added {
            let key = key.as_ref();
            if self.selected.contains(key) && !graph.is_mandatory(key) {
                self.auto_added.insert(key.to_string());
            }
        }
    }

    fn select(&mut self, graph: &DependencyGraph, key: &str) -> ToggleOutcome {
        self.selected.insert(key.to_string());
        self.auto_added.remove(key);

        let mut cascaded = Vec::new();
        self.cascade_add(graph, key, &mut cascaded);

        let notice = if cascaded.is_empty() {
            None
        } else {
            let parent = graph.display_name(key).to_string();
            let required: Vec<String> = cascaded
                .iter()
                .filter(|k| graph.is_mandatory(k))
                .map(|k| graph.display_name(k).to_string())
                .collect();
            if required.is_empty() {
                Some(Notice::PrerequisitesAdded {
                    parent,
                    added: cascaded
                        .iter()
                        .map(|k| graph.display_name(k).to_string())
                        .collect(),
                })
            } else {
                Some(Notice::RequiredAutoEnabled { parent, required })
            }
        };

        debug!(
            "Selected '{}' in {} (+{} prerequisites)",
            key,
            self.blueprint,
            cascaded.len()
        );

        let mut added = Vec::with_capacity(cascaded.len() + 1);
        added.push(key.to_string());
        added.extend(cascaded);

        ToggleOutcome {
            action: ToggleAction::Selected,
            added,
            removed: Vec::new(),
            notice,
        }
    }

    fn cascade_add(&mut self, graph: &DependencyGraph, key: &str, added: &mut Vec<String>) {
        for dependency in graph.dependencies_of(key) {
            if !graph.contains(dependency) {
                continue;
            }
            if self.selected.insert(dependency.clone()) {
                if !graph.is_mandatory(dependency) {
                    self.auto_added.insert(dependency.clone());
                }
                added.push(dependency.clone());
                self.cascade_add(graph, dependency, added);
            }
        }
    }

    fn deselect(&mut self, graph: &DependencyGraph, key: &str) -> ToggleOutcome {
        self.selected.remove(key);
        self.auto_added.remove(key);

        let mut cascaded = Vec::new();
        let mut queue = VecDeque::from([key.to_string()]);
        while let Some(current) = queue.pop_front() {
            for dependent in graph.dependents_of(&current) {
                if graph.is_mandatory(dependent) {
                    continue;
                }
                if self.selected.remove(dependent) {
                    self.auto_added.remove(dependent);
                    cascaded.push(dependent.clone());
                    queue.push_back(dependent.clone());
                }
            }
        }

        if self.policy == CascadePolicy::ReleaseOrphans {
            cascaded.extend(self.release_orphans(graph));
        }

        self.quantities.remove(key);
        for dependent in &cascaded {
            self.quantities.remove(dependent);
        }

        debug!(
            "Deselected '{}' in {} (-{} cascaded)",
            key,
            self.blueprint,
            cascaded.len()
        );

        let notice = (!cascaded.is_empty()).then(|| Notice::DependentsRemoved {
            parent: graph.display_name(key).to_string(),
            removed: cascaded
                .iter()
                .map(|k| graph.display_name(k).to_string())
                .collect(),
        });

        let mut removed = Vec::with_capacity(cascaded.len() + 1);
        removed.push(key.to_string());
        removed.extend(cascaded);

        ToggleOutcome {
            action: ToggleAction::Deselected,
            added: Vec::new(),
            removed,
            notice,
        }
    }

    /// Drop auto-added keys no longer required by any directly chosen key
    fn release_orphans(&mut self, graph: &DependencyGraph) -> Vec<String> {
        let mut required: BTreeSet<String> = BTreeSet::new();
        for anchor in self.selected.iter().filter(|k| !self.auto_added.contains(*k)) {
            required.insert(anchor.clone());
            required.extend(graph.prerequisite_closure(anchor));
        }

        let orphans: Vec<String> = self
            .auto_added
            .iter()
            .filter(|k| !required.contains(*k) && !graph.is_mandatory(k))
            .cloned()
            .collect();

        for orphan in &orphans {
            self.selected.remove(orphan);
            self.auto_added.remove(orphan);
        }
        orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::catalog::ComponentDefinition;

    fn graph() -> DependencyGraph {
        DependencyGraph::build(&[
            ComponentDefinition::new("a", "Alpha", 0).mandatory(),
            ComponentDefinition::new("b", "Beta", 5000).requires(&["a"]),
            ComponentDefinition::new("c", "Gamma", 3000).requires(&["b"]),
            ComponentDefinition::new("d", "Delta", 1000).requires(&["b"]),
            ComponentDefinition::new("e", "Epsilon", 1000),
        ])
    }

    fn keys(state: &SelectionState) -> Vec<&str> {
        state.selected_keys().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_new_selection_is_mandatory_keys() {
        let graph = graph();
        let state = SelectionState::new(BlueprintId::Interaction, &graph);
        assert_eq!(keys(&state), vec!["a"]);
    }

    #[test]
    fn test_select_cascades_prerequisites() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);

        let outcome = state.toggle(&graph, "c");

        assert_eq!(outcome.action, ToggleAction::Selected);
        assert_eq!(outcome.added, vec!["c", "b"]);
        assert_eq!(keys(&state), vec!["a", "b", "c"]);
        assert_eq!(
            outcome.notice,
            Some(Notice::PrerequisitesAdded {
                parent: "Gamma".to_string(),
                added: vec!["Beta".to_string()],
            })
        );
    }

    #[test]
    fn test_select_without_missing_prerequisites_has_no_notice() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        let outcome = state.toggle(&graph, "b");
        assert_eq!(outcome.added, vec!["b"]);
        assert!(outcome.notice.is_none());
    }

    #[test]
    fn test_deselect_cascades_dependents() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        state.toggle(&graph, "c");
        state.toggle(&graph, "d");

        let outcome = state.toggle(&graph, "b");

        assert_eq!(outcome.action, ToggleAction::Deselected);
        assert_eq!(outcome.removed, vec!["b", "c", "d"]);
        assert_eq!(keys(&state), vec!["a"]);
        assert_eq!(
            outcome.notice.unwrap().to_string(),
            "Removing Beta also removed: Gamma, Delta"
        );
    }

    #[test]
    fn test_mandatory_removal_is_refused() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        state.toggle(&graph, "c");
        let before = state.clone();

        let outcome = state.toggle(&graph, "a");

        assert_eq!(outcome.action, ToggleAction::Refused);
        assert!(!outcome.changed());
        assert_eq!(state, before);
        assert_eq!(
            outcome.notice,
            Some(Notice::Required {
                label: "Alpha".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        let outcome = state.toggle(&graph, "zzz");
        assert_eq!(outcome.action, ToggleAction::Ignored);
        assert_eq!(keys(&state), vec!["a"]);
    }

    #[test]
    fn test_missing_mandatory_prerequisite_is_reported() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        state.selected.remove("a");

        let outcome = state.toggle(&graph, "b");

        assert_eq!(
            outcome.notice,
            Some(Notice::RequiredAutoEnabled {
                parent: "Beta".to_string(),
                required: vec!["Alpha".to_string()],
            })
        );
        assert!(state.is_selected("a"));
    }

    #[test]
    fn test_reachable_policy_keeps_shared_prerequisites() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        state.toggle(&graph, "c");

        state.toggle(&graph, "c");

        assert_eq!(keys(&state), vec!["a", "b"]);
    }

    #[test]
    fn test_release_orphans_policy_drops_unneeded_prerequisites() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph)
            .with_policy(CascadePolicy::ReleaseOrphans);
        state.toggle(&graph, "c");
        state.toggle(&graph, "d");

        let outcome = state.toggle(&graph, "c");
        assert_eq!(outcome.removed, vec!["c"]);
        assert_eq!(keys(&state), vec!["a", "b", "d"]);

        let outcome = state.toggle(&graph, "d");
        assert_eq!(outcome.removed, vec!["d", "b"]);
        assert_eq!(keys(&state), vec!["a"]);
    }

    #[test]
    fn test_release_orphans_keeps_directly_chosen_prerequisite() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph)
            .with_policy(CascadePolicy::ReleaseOrphans);
        state.toggle(&graph, "b");
        state.toggle(&graph, "c");

        state.toggle(&graph, "c");

        assert_eq!(keys(&state), vec!["a", "b"]);
    }

    #[test]
    fn test_quantities_default_and_clamp() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        assert_eq!(state.quantity("b"), 1);

        assert!(state.set_quantity(&graph, "b", 0));
        assert_eq!(state.quantity("b"), 1);

        assert!(state.set_quantity(&graph, "b", 4));
        assert_eq!(state.quantity("b"), 4);

        assert!(!state.set_quantity(&graph, "zzz", 2));
    }

    #[test]
    fn test_restore_reapplies_closure() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        state.restore(&graph, &["c", "unknown"], &[]);
        assert_eq!(keys(&state), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_restore_keeps_prerequisites_releasable() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph)
            .with_policy(CascadePolicy::ReleaseOrphans);
        state.restore(&graph, &["a", "b", "c"], &["b"]);
        assert_eq!(state.auto_added().iter().collect::<Vec<_>>(), vec!["b"]);

        let outcome = state.toggle(&graph, "c");

        assert_eq!(outcome.removed, vec!["c", "b"]);
        assert_eq!(keys(&state), vec!["a"]);
    }

    #[test]
    fn test_unselected_mandatory_key_is_reselected_silently() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        state.selected.remove("a");

        let outcome = state.toggle(&graph, "a");

        assert_eq!(outcome.action, ToggleAction::Selected);
        assert_eq!(outcome.added, vec!["a"]);
        assert!(outcome.notice.is_none());
        assert!(state.is_selected("a"));
    }

    #[test]
    fn test_deselect_drops_quantities_of_removed_keys() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        state.toggle(&graph, "c");
        state.set_quantity(&graph, "b", 2);
        state.set_quantity(&graph, "c", 3);

        state.toggle(&graph, "b");
        assert!(state.quantities().is_empty());

        state.toggle(&graph, "c");
        assert_eq!(state.quantity("c"), 1);
        assert_eq!(state.quantity("b"), 1);
    }

    #[test]
    fn test_reset_returns_to_mandatory() {
        let graph = graph();
        let mut state = SelectionState::new(BlueprintId::Interaction, &graph);
        state.toggle(&graph, "c");
        state.set_quantity(&graph, "c", 3);
        state.reset(&graph);
        assert_eq!(keys(&state), vec!["a"]);
        assert!(state.quantities().is_empty());
    }

    #[test]
    fn test_cascade_policy_parsing() {
        assert_eq!(
            "release-orphans".parse::<CascadePolicy>().unwrap(),
            CascadePolicy::ReleaseOrphans
        );
        assert!("refcount".parse::<CascadePolicy>().is_err());
    }
}
