//! Local-only planner drafts
//!
//! The planner saves a small draft after every change so a session can be
//! resumed. Storage failures are never fatal: a missing or unreadable draft
//! is simply "no saved state", and stale drafts are discarded.

use crate::planner::blueprints::BlueprintId;
use crate::planner::website::WebsiteQuote;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Serialized wizard position plus module choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerDraft {
    pub selected_category_id: Option<String>,
    pub selected_service_id: Option<String>,
    pub current_step_index: usize,
    pub max_visited_step_index: usize,
    /// Milliseconds since the Unix epoch
    pub saved_at_timestamp: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selections: BTreeMap<BlueprintId, Vec<String>>,
    /// Selected keys that were only pulled in as prerequisites
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub auto_added: BTreeMap<BlueprintId, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub quantities: BTreeMap<BlueprintId, BTreeMap<String, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<WebsiteQuote>,
}

impl PlannerDraft {
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.saved_at_timestamp)
    }

    /// Older than `expiry` at `now`; unreadable timestamps count as expired
    pub fn is_expired(&self, expiry: chrono::Duration, now: DateTime<Utc>) -> bool {
        match self.saved_at() {
            Some(saved_at) => now.signed_duration_since(saved_at) > expiry,
            None => true,
        }
    }
}

/// Persistence collaborator for drafts
pub trait DraftStore: Send + Sync {
    /// The saved draft, or `None` when missing or corrupt
    fn load(&self) -> Option<PlannerDraft>;
    fn save(&self, draft: &PlannerDraft) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Load a draft only if it is still within the expiry window
///
/// Stale drafts are cleared from the store.
pub fn load_fresh(
    store: &dyn DraftStore,
    expiry: chrono::Duration,
    now: DateTime<Utc>,
) -> Option<PlannerDraft> {
    let draft = store.load()?;
    if draft.is_expired(expiry, now) {
        info!(
            "Discarding stale draft saved at {}",
            draft.saved_at_timestamp
        );
        if let Err(e) = store.clear() {
            warn!("Failed to clear stale draft: {}", e);
        }
        return None;
    }
    Some(draft)
}

/// JSON file in the data directory
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Option<PlannerDraft> {
        if !self.path.exists() {
            debug!("No draft at {:?}", self.path);
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read draft {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!("Ignoring corrupt draft {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn save(&self, draft: &PlannerDraft) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create draft directory: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(draft).context("Failed to serialize draft")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write draft: {:?}", self.path))?;

        debug!("Draft saved to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove draft: {:?}", self.path))?;
            debug!("Draft removed from {:?}", self.path);
        }
        Ok(())
    }
}

/// In-process store holding the serialized JSON
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    slot: Mutex<Option<String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load raw content, e.g. to simulate a corrupt draft
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Option<PlannerDraft> {
        let raw = self.raw()?;
        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!("Ignoring corrupt in-memory draft: {}", e);
                None
            }
        }
    }

    fn save(&self, draft: &PlannerDraft) -> Result<()> {
        let content = serde_json::to_string(draft).context("Failed to serialize draft")?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("Draft store lock poisoned"))?;
        *slot = Some(content);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("Draft store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}
