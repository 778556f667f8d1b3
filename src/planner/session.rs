//! Wizard session
//!
//! A [`PlannerSession`] walks a visitor through category, service, module
//! configuration and estimate. It owns one [`SelectionState`] per blueprint
//! the chosen service touches, at most one pending estimate reveal, and saves
//! a draft after every change.

use super::blueprints::{BlueprintId, PlannerCatalog};
use super::estimate::PendingEstimate;
use super::grouping::MergedGroup;
use super::pricing::{self, PriceEstimate};
use super::selection::{SelectionState, ToggleOutcome};
use super::services::{Category, Service, ServiceKind};
use super::website::WebsiteQuote;
use crate::config::PlannerConfig;
use crate::draft::{self, DraftStore, PlannerDraft};
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::task::AbortHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Category,
    Service,
    Configure,
    Estimate,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Category,
        WizardStep::Service,
        WizardStep::Configure,
        WizardStep::Estimate,
    ];

    pub fn index(self) -> usize {
        match self {
            WizardStep::Category => 0,
            WizardStep::Service => 1,
            WizardStep::Configure => 2,
            WizardStep::Estimate => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Category => "Choose your industry",
            WizardStep::Service => "Pick a service",
            WizardStep::Configure => "Configure",
            WizardStep::Estimate => "Estimate",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct PlannerSession {
    catalog: Arc<PlannerCatalog>,
    config: PlannerConfig,
    store: Arc<dyn DraftStore>,
    category_id: Option<String>,
    service_id: Option<String>,
    current_step: WizardStep,
    max_visited_step: WizardStep,
    selections: BTreeMap<BlueprintId, SelectionState>,
    website: WebsiteQuote,
    pending_estimate: Option<AbortHandle>,
}

impl PlannerSession {
    /// Empty session at the first step
    pub fn new(
        catalog: Arc<PlannerCatalog>,
        config: PlannerConfig,
        store: Arc<dyn DraftStore>,
    ) -> Self {
        Self {
            catalog,
            config,
            store,
            category_id: None,
            service_id: None,
            current_step: WizardStep::Category,
            max_visited_step: WizardStep::Category,
            selections: BTreeMap::new(),
            website: WebsiteQuote::default(),
            pending_estimate: None,
        }
    }

    /// Session seeded from the store's draft when it is still fresh
    pub fn resume(
        catalog: Arc<PlannerCatalog>,
        config: PlannerConfig,
        store: Arc<dyn DraftStore>,
        now: DateTime<Utc>,
    ) -> Self {
        let expiry = config.draft.expiry();
        let draft = draft::load_fresh(store.as_ref(), expiry, now);
        let mut session = Self::new(catalog, config, store);
        if let Some(draft) = draft {
            session.restore(&draft);
        }
        session
    }

    pub fn catalog(&self) -> &PlannerCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn max_visited_step(&self) -> WizardStep {
        self.max_visited_step
    }

    pub fn category(&self) -> Option<&Category> {
        self.category_id
            .as_deref()
            .and_then(|id| self.catalog.directory().category(id))
    }

    pub fn service(&self) -> Option<&Service> {
        self.service_id
            .as_deref()
            .and_then(|id| self.catalog.directory().service(id))
    }

    pub fn service_kind(&self) -> Option<ServiceKind> {
        self.service().map(|s| s.kind)
    }

    pub fn selection(&self, blueprint: BlueprintId) -> Option<&SelectionState> {
        self.selections.get(&blueprint)
    }

    pub fn website(&self) -> &WebsiteQuote {
        &self.website
    }

    pub fn has_pending_estimate(&self) -> bool {
        self.pending_estimate
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Whether the prerequisites of `step` are chosen
    pub fn can_enter(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Category => true,
            WizardStep::Service => self.category().is_some(),
            WizardStep::Configure | WizardStep::Estimate => self.service().is_some(),
        }
    }

    pub fn select_category(&mut self, category_id: &str) -> Result<()> {
        if self.catalog.directory().category(category_id).is_none() {
            anyhow::bail!("Unknown category: {}", category_id);
        }

        if self.category_id.as_deref() != Some(category_id) {
            info!("Category selected: {}", category_id);
            self.category_id = Some(category_id.to_string());
            self.service_id = None;
            self.max_visited_step = WizardStep::Service;
            self.cancel_estimate();
        }

        self.current_step = WizardStep::Service;
        self.persist();
        Ok(())
    }

    pub fn select_service(&mut self, service_id: &str) -> Result<()> {
        let Some(category_id) = self.category_id.clone() else {
            anyhow::bail!("Choose a category before picking a service");
        };
        let Some(service) = self.catalog.directory().service(service_id) else {
            anyhow::bail!("Unknown service: {}", service_id);
        };
        if !self
            .catalog
            .directory()
            .category_offers(&category_id, service_id)
        {
            anyhow::bail!(
                "Service '{}' is not offered in category '{}'",
                service_id,
                category_id
            );
        }

        let blueprints = service.kind.blueprints();
        if self.service_id.as_deref() != Some(service_id) {
            info!("Service selected: {}", service_id);
            self.service_id = Some(service_id.to_string());
            self.max_visited_step = WizardStep::Configure;
            self.cancel_estimate();
        }
        for blueprint in blueprints {
            self.ensure_selection(*blueprint);
        }

        self.current_step = WizardStep::Configure;
        self.persist();
        Ok(())
    }

    /// Jump to a visited step, or one past the furthest visited step
    pub fn go_to_step(&mut self, step: WizardStep) -> bool {
        let reachable = step.index() <= self.max_visited_step.index() + 1;
        if !reachable || !self.can_enter(step) {
            debug!("Cannot enter step {:?} yet", step);
            return false;
        }

        if step != WizardStep::Estimate {
            self.cancel_estimate();
        }
        self.current_step = step;
        self.max_visited_step = self.max_visited_step.max(step);
        self.persist();
        true
    }

    pub fn advance(&mut self) -> bool {
        match self.current_step.next() {
            Some(step) => self.go_to_step(step),
            None => false,
        }
    }

    pub fn go_back(&mut self) -> bool {
        match self.current_step.previous() {
            Some(step) => self.go_to_step(step),
            None => false,
        }
    }

    /// Toggle a component of `blueprint`, creating its selection if needed
    ///
    /// Blueprints the current service does not use are ignored.
    pub fn toggle(&mut self, blueprint: BlueprintId, key: &str) -> ToggleOutcome {
        if !self.uses_blueprint(blueprint) {
            debug!("Ignoring toggle of '{}': {} is not in use", key, blueprint);
            return ToggleOutcome::ignored();
        }
        let catalog = Arc::clone(&self.catalog);
        let graph = catalog.blueprint(blueprint).graph();
        let outcome = self.ensure_selection(blueprint).toggle(graph, key);

        if outcome.changed() {
            self.cancel_estimate();
            self.persist();
        }
        outcome
    }

    pub fn set_quantity(&mut self, blueprint: BlueprintId, key: &str, quantity: u32) -> bool {
        if !self.uses_blueprint(blueprint) {
            return false;
        }
        let catalog = Arc::clone(&self.catalog);
        let graph = catalog.blueprint(blueprint).graph();
        let updated = self
            .ensure_selection(blueprint)
            .set_quantity(graph, key, quantity);

        if updated {
            self.cancel_estimate();
            self.persist();
        }
        updated
    }

    pub fn set_website(&mut self, quote: WebsiteQuote) {
        self.website = quote.normalized();
        self.cancel_estimate();
        self.persist();
    }

    /// Grouped components for the chosen service
    pub fn display_groups(&self) -> Vec<MergedGroup> {
        self.service_kind()
            .map(|kind| self.catalog.groups_for(kind))
            .unwrap_or_default()
    }

    /// Price for the current configuration, available immediately
    pub fn estimate(&self) -> Option<PriceEstimate> {
        let kind = self.service_kind()?;
        let estimate = match kind {
            ServiceKind::Modules(id) => {
                let blueprint = self.catalog.blueprint(id);
                let table = self.config.pricing.price_table(blueprint);
                match self.selections.get(&id) {
                    Some(state) => pricing::estimate(state, blueprint.graph(), &table),
                    None => PriceEstimate::new(table.base_price(), 0),
                }
            }
            ServiceKind::Universal => {
                let optional = kind
                    .blueprints()
                    .iter()
                    .filter_map(|id| {
                        let blueprint = self.catalog.blueprint(*id);
                        let table = self.config.pricing.price_table(blueprint);
                        self.selections.get(id).map(|state| {
                            pricing::optional_modules_cost(state, blueprint.graph(), &table)
                        })
                    })
                    .fold(0u64, u64::saturating_add);
                PriceEstimate::new(self.config.pricing.universal_base_price, optional)
            }
            ServiceKind::WebsitePages => self.config.website.estimate(&self.website),
        };
        Some(estimate)
    }

    /// Share of the available choices currently taken, in `0.0..=1.0`
    pub fn selection_ratio(&self) -> f64 {
        match self.service_kind() {
            Some(ServiceKind::WebsitePages) => self.website.selection_ratio(),
            Some(kind) => {
                let (selected, total) = kind.blueprints().iter().fold((0, 0), |acc, id| {
                    let total = self.catalog.blueprint(*id).catalog().len();
                    let selected = self
                        .selections
                        .get(id)
                        .map(|s| s.selected_count())
                        .unwrap_or(0);
                    (acc.0 + selected, acc.1 + total)
                });
                if total == 0 {
                    0.0
                } else {
                    selected as f64 / total as f64
                }
            }
            None => 0.0,
        }
    }

    /// Schedule the delayed reveal of the current estimate
    ///
    /// Replaces any reveal still pending. Must be called inside a tokio runtime.
    pub fn request_estimate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<PendingEstimate<PriceEstimate>> {
        let estimate = self.estimate()?;
        self.cancel_estimate();

        let delay = self
            .config
            .estimate
            .delay()
            .delay_for_ratio(self.selection_ratio(), rng);
        let pending = PendingEstimate::schedule(delay, estimate);
        self.pending_estimate = Some(pending.abort_handle());
        Some(pending)
    }

    pub fn cancel_estimate(&mut self) {
        if let Some(handle) = self.pending_estimate.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending estimate reveal");
            }
            handle.abort();
        }
    }

    /// Start over and forget the saved draft
    pub fn reset(&mut self) {
        info!("Resetting planner session");
        self.cancel_estimate();
        self.category_id = None;
        self.service_id = None;
        self.current_step = WizardStep::Category;
        self.max_visited_step = WizardStep::Category;
        self.selections.clear();
        self.website = WebsiteQuote::default();

        if let Err(e) = self.store.clear() {
            warn!("Failed to clear draft: {}", e);
        }
    }

    /// Plain-text description of the configuration and its price
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        if let Some(category) = self.category() {
            lines.push(format!("Industry: {}", category.name));
        }
        let Some(service) = self.service() else {
            lines.push("No service selected yet".to_string());
            return lines.join("\n");
        };
        lines.push(format!("Service: {}", service.name));

        match service.kind {
            ServiceKind::WebsitePages => {
                let quote = self.website.normalized();
                lines.push(format!(
                    "Pages: {} ({} dynamic)",
                    quote.pages, quote.dynamic_pages
                ));
                if !quote.features.is_empty() {
                    let features: Vec<&str> = quote.features.iter().map(|f| f.label()).collect();
                    lines.push(format!("Features: {}", features.join(", ")));
                }
            }
            kind => {
                for id in kind.blueprints() {
                    let graph = self.catalog.blueprint(*id).graph();
                    let Some(state) = self.selections.get(id) else {
                        continue;
                    };
                    let modules: Vec<String> = state
                        .optional_keys(graph)
                        .map(|key| match state.quantity(key) {
                            1 => graph.display_name(key).to_string(),
                            qty => format!("{} x{}", graph.display_name(key), qty),
                        })
                        .collect();
                    if modules.is_empty() {
                        lines.push(format!("{} modules: core only", id.label()));
                    } else {
                        lines.push(format!("{} modules: {}", id.label(), modules.join(", ")));
                    }
                }
            }
        }

        if let Some(estimate) = self.estimate() {
            lines.push(format!(
                "Estimated total: {}",
                pricing::format_amount(estimate.total)
            ));
        }

        lines.join("\n")
    }

    pub fn to_draft(&self, now: DateTime<Utc>) -> PlannerDraft {
        PlannerDraft {
            selected_category_id: self.category_id.clone(),
            selected_service_id: self.service_id.clone(),
            current_step_index: self.current_step.index(),
            max_visited_step_index: self.max_visited_step.index(),
            saved_at_timestamp: now.timestamp_millis(),
            selections: self
                .selections
                .iter()
                .map(|(id, state)| (*id, state.selected_keys().iter().cloned().collect()))
                .collect(),
            auto_added: self
                .selections
                .iter()
                .filter(|(_, state)| !state.auto_added().is_empty())
                .map(|(id, state)| (*id, state.auto_added().iter().cloned().collect()))
                .collect(),
            quantities: self
                .selections
                .iter()
                .filter(|(_, state)| !state.quantities().is_empty())
                .map(|(id, state)| (*id, state.quantities().clone()))
                .collect(),
            website: match self.service_kind() {
                Some(ServiceKind::WebsitePages) => Some(self.website.clone()),
                _ => None,
            },
        }
    }

    /// Rebuild the wizard position and choices from a draft
    ///
    /// References to categories or services that no longer exist are
    /// dropped, and the step indices are pulled back to what remains valid.
    pub fn restore(&mut self, draft: &PlannerDraft) {
        self.cancel_estimate();
        let directory = self.catalog.directory();

        let category_id = draft
            .selected_category_id
            .as_deref()
            .filter(|id| directory.category(id).is_some());
        let service_id = match category_id {
            Some(category) => draft
                .selected_service_id
                .as_deref()
                .filter(|id| directory.category_offers(category, id)),
            None => None,
        };

        if draft.selected_category_id.is_some() && category_id.is_none()
            || draft.selected_service_id.is_some() && service_id.is_none()
        {
            warn!("Draft references entities that no longer exist, dropping them");
        }

        self.category_id = category_id.map(str::to_string);
        self.service_id = service_id.map(str::to_string);

        let ceiling = if self.service_id.is_some() {
            WizardStep::Estimate
        } else if self.category_id.is_some() {
            WizardStep::Service
        } else {
            WizardStep::Category
        };
        let max_visited = WizardStep::from_index(draft.max_visited_step_index)
            .unwrap_or(WizardStep::Estimate)
            .min(ceiling);
        let current = WizardStep::from_index(draft.current_step_index)
            .unwrap_or(WizardStep::Estimate)
            .min(max_visited);
        self.max_visited_step = max_visited;
        self.current_step = current;

        self.selections.clear();
        let blueprints = self
            .service_kind()
            .map(|kind| kind.blueprints())
            .unwrap_or_default();
        for id in blueprints {
            let graph = self.catalog.blueprint(*id).graph();
            let mut state =
                SelectionState::new(*id, graph).with_policy(self.config.cascade_policy);
            if let Some(keys) = draft.selections.get(id) {
                let auto_added = draft.auto_added.get(id).map(Vec::as_slice).unwrap_or_default();
                state.restore(graph, keys.as_slice(), auto_added);
            }
            if let Some(quantities) = draft.quantities.get(id) {
                for (key, qty) in quantities {
                    state.set_quantity(graph, key, *qty);
                }
            }
            self.selections.insert(*id, state);
        }

        self.website = draft
            .website
            .as_ref()
            .map(WebsiteQuote::normalized)
            .unwrap_or_default();

        debug!(
            "Restored draft at step {:?} (max {:?})",
            self.current_step, self.max_visited_step
        );
    }

    /// Save a draft; failures are logged and otherwise ignored
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.to_draft(Utc::now())) {
            warn!("Failed to save draft: {}", e);
        }
    }

    fn uses_blueprint(&self, blueprint: BlueprintId) -> bool {
        self.service_kind()
            .is_some_and(|kind| kind.blueprints().contains(&blueprint))
    }

    fn ensure_selection(&mut self, blueprint: BlueprintId) -> &mut SelectionState {
        let graph = self.catalog.blueprint(blueprint).graph();
        let policy = self.config.cascade_policy;
        self.selections
            .entry(blueprint)
            .or_insert_with(|| SelectionState::new(blueprint, graph).with_policy(policy))
    }
}

impl Drop for PlannerSession {
    fn drop(&mut self) {
        self.cancel_estimate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::MemoryDraftStore;
    use crate::planner::selection::ToggleAction;
    use crate::planner::website::WebsiteFeature;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session_with_store() -> (PlannerSession, Arc<MemoryDraftStore>) {
        let catalog = Arc::new(PlannerCatalog::builtin().unwrap());
        let store = Arc::new(MemoryDraftStore::new());
        let session = PlannerSession::new(catalog, PlannerConfig::default(), store.clone());
        (session, store)
    }

    #[test]
    fn test_step_navigation_requires_choices() {
        let (mut session, _) = session_with_store();
        assert_eq!(session.current_step(), WizardStep::Category);
        assert!(!session.advance());
        assert!(!session.go_to_step(WizardStep::Configure));

        session.select_category("retail").unwrap();
        assert_eq!(session.current_step(), WizardStep::Service);
        assert!(!session.advance());

        session.select_service("online-store").unwrap();
        assert_eq!(session.current_step(), WizardStep::Configure);
        assert!(session.advance());
        assert_eq!(session.current_step(), WizardStep::Estimate);

        assert!(session.go_back());
        assert!(session.go_to_step(WizardStep::Category));
        assert_eq!(session.max_visited_step(), WizardStep::Estimate);
        assert!(session.go_to_step(WizardStep::Estimate));
    }

    #[test]
    fn test_changing_category_clears_service() {
        let (mut session, _) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("online-store").unwrap();

        session.select_category("healthcare").unwrap();
        assert!(session.service().is_none());
        assert_eq!(session.max_visited_step(), WizardStep::Service);
        assert!(session.select_service("online-store").is_err());
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let (mut session, _) = session_with_store();
        assert!(session.select_category("aerospace").is_err());
        assert!(session.select_service("online-store").is_err());
        session.select_category("retail").unwrap();
        assert!(session.select_service("spaceship").is_err());
    }

    #[test]
    fn test_selection_created_with_mandatory_keys() {
        let (mut session, _) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("online-store").unwrap();

        let catalog = PlannerCatalog::builtin().unwrap();
        let graph = catalog.blueprint(BlueprintId::Commerce).graph();
        let state = session.selection(BlueprintId::Commerce).unwrap();
        assert_eq!(state.selected_keys(), graph.mandatory_keys());
        assert!(session.selection(BlueprintId::Interaction).is_none());
    }

    #[test]
    fn test_module_estimate_adds_optional_cost() {
        let (mut session, _) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("online-store").unwrap();
        assert_eq!(session.estimate().unwrap().total, 25000);

        // wishlist pulls in customer_accounts
        let outcome = session.toggle(BlueprintId::Commerce, "wishlist");
        assert_eq!(outcome.action, ToggleAction::Selected);
        let estimate = session.estimate().unwrap();
        assert_eq!(estimate.base_price, 25000);
        assert_eq!(estimate.optional_modules_cost, 2000 + 4000);
        assert_eq!(estimate.total, 31000);
    }

    #[test]
    fn test_blueprints_outside_the_service_are_ignored() {
        let (mut session, store) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("business-website").unwrap();
        let saved = store.raw();

        let outcome = session.toggle(BlueprintId::Interaction, "waitlist");
        assert_eq!(outcome.action, ToggleAction::Ignored);
        assert!(!session.set_quantity(BlueprintId::Commerce, "wishlist", 2));
        assert!(session.selection(BlueprintId::Interaction).is_none());
        assert!(session.selection(BlueprintId::Commerce).is_none());
        assert_eq!(store.raw(), saved);
    }

    #[test]
    fn test_universal_estimate_uses_universal_base() {
        let (mut session, _) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("marketplace").unwrap();
        assert!(session.selection(BlueprintId::Interaction).is_some());
        assert!(session.selection(BlueprintId::Commerce).is_some());
        assert_eq!(session.estimate().unwrap().total, 35000);

        session.toggle(BlueprintId::Commerce, "wishlist");
        assert_eq!(session.estimate().unwrap().total, 35000 + 6000);
        assert!(!session.display_groups().is_empty());
    }

    #[test]
    fn test_website_estimate() {
        let (mut session, _) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("business-website").unwrap();
        assert!(session.display_groups().is_empty());

        let mut quote = WebsiteQuote {
            pages: 4,
            dynamic_pages: 1,
            ..WebsiteQuote::default()
        };
        quote.features.insert(WebsiteFeature::Blog);
        session.set_website(quote);

        // 8000 + 3 * 1500 + 3500 + 2500
        assert_eq!(session.estimate().unwrap().total, 18500);
        assert!(session.summary().contains("Pages: 4 (1 dynamic)"));
    }

    #[test]
    fn test_every_change_saves_a_draft() {
        let (mut session, store) = session_with_store();
        session.select_category("retail").unwrap();
        let draft = store.load().unwrap();
        assert_eq!(draft.selected_category_id.as_deref(), Some("retail"));
        assert_eq!(draft.current_step_index, 1);

        session.select_service("online-store").unwrap();
        session.toggle(BlueprintId::Commerce, "coupons_discounts");
        let draft = store.load().unwrap();
        assert!(
            draft.selections[&BlueprintId::Commerce].contains(&"coupons_discounts".to_string())
        );
    }

    #[test]
    fn test_restore_round_trip() {
        let (mut session, store) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("online-store").unwrap();
        session.toggle(BlueprintId::Commerce, "shipping_integration");
        session.set_quantity(BlueprintId::Commerce, "shipping_integration", 3);
        session.advance();

        let catalog = Arc::new(PlannerCatalog::builtin().unwrap());
        let resumed =
            PlannerSession::resume(catalog, PlannerConfig::default(), store.clone(), Utc::now());

        assert_eq!(resumed.category().map(|c| c.id.as_str()), Some("retail"));
        assert_eq!(resumed.service().map(|s| s.id.as_str()), Some("online-store"));
        assert_eq!(resumed.current_step(), WizardStep::Estimate);
        assert_eq!(resumed.max_visited_step(), WizardStep::Estimate);
        let (original, restored) = (
            session.selection(BlueprintId::Commerce).unwrap(),
            resumed.selection(BlueprintId::Commerce).unwrap(),
        );
        assert_eq!(restored.selected_keys(), original.selected_keys());
        assert_eq!(restored.quantity("shipping_integration"), 3);
        assert_eq!(resumed.estimate(), session.estimate());
    }

    #[test]
    fn test_restore_drops_missing_entities() {
        let (mut session, _) = session_with_store();
        let draft = PlannerDraft {
            selected_category_id: Some("retail".to_string()),
            selected_service_id: Some("retired-service".to_string()),
            current_step_index: 3,
            max_visited_step_index: 3,
            saved_at_timestamp: Utc::now().timestamp_millis(),
            selections: BTreeMap::new(),
            auto_added: BTreeMap::new(),
            quantities: BTreeMap::new(),
            website: None,
        };

        session.restore(&draft);
        assert_eq!(session.category().map(|c| c.id.as_str()), Some("retail"));
        assert!(session.service().is_none());
        assert_eq!(session.current_step(), WizardStep::Service);
        assert_eq!(session.max_visited_step(), WizardStep::Service);
    }

    #[test]
    fn test_reset_clears_store() {
        let (mut session, store) = session_with_store();
        session.select_category("retail").unwrap();
        assert!(store.raw().is_some());

        session.reset();
        assert!(store.raw().is_none());
        assert_eq!(session.current_step(), WizardStep::Category);
        assert!(session.estimate().is_none());
    }

    #[test]
    fn test_summary_lists_optional_modules() {
        let (mut session, _) = session_with_store();
        session.select_category("healthcare").unwrap();
        session.select_service("appointment-booking").unwrap();
        let summary = session.summary();
        assert!(summary.contains("Service: Appointment Booking App"));
        assert!(summary.contains("core only"));
        assert!(summary.contains("Estimated total: ₹15,000"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_request_cancels_previous_reveal() {
        let (mut session, _) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("online-store").unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let first = session.request_estimate(&mut rng).unwrap();
        let second = session.request_estimate(&mut rng).unwrap();
        assert!(second.delay() <= session.config().estimate.delay().ceiling());

        assert_eq!(first.wait().await, None);
        assert_eq!(second.wait().await.map(|e| e.total), Some(25000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_cancels_pending_reveal() {
        let (mut session, _) = session_with_store();
        session.select_category("retail").unwrap();
        session.select_service("online-store").unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let pending = session.request_estimate(&mut rng).unwrap();
        assert!(session.has_pending_estimate());

        session.toggle(BlueprintId::Commerce, "wishlist");
        assert_eq!(pending.wait().await, None);
        assert!(!session.has_pending_estimate());
    }
}
