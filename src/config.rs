use crate::planner::estimate::EstimateDelay;
use crate::planner::pricing::PriceTable;
use crate::planner::selection::CascadePolicy;
use crate::planner::website::WebsitePricing;
use crate::planner::{Blueprint, BlueprintId};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlannerConfig {
    #[serde(default)]
    pub cascade_policy: CascadePolicy,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub website: WebsitePricing,
    #[serde(default)]
    pub estimate: EstimateConfig,
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_interaction_base")]
    pub interaction_base_price: u64,
    #[serde(default = "default_commerce_base")]
    pub commerce_base_price: u64,
    /// Base price when both blueprints are configured together
    #[serde(default = "default_universal_base")]
    pub universal_base_price: u64,
    #[serde(default = "default_unit_price")]
    pub default_unit_price: u64,
    /// Unit price overrides by component key
    #[serde(default)]
    pub overrides: HashMap<String, u64>,
}

fn default_interaction_base() -> u64 {
    15000
}

fn default_commerce_base() -> u64 {
    25000
}

fn default_universal_base() -> u64 {
    35000
}

fn default_unit_price() -> u64 {
    2000
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            interaction_base_price: default_interaction_base(),
            commerce_base_price: default_commerce_base(),
            universal_base_price: default_universal_base(),
            default_unit_price: default_unit_price(),
            overrides: HashMap::new(),
        }
    }
}

impl PricingConfig {
    pub fn base_price(&self, blueprint: BlueprintId) -> u64 {
        match blueprint {
            BlueprintId::Interaction => self.interaction_base_price,
            BlueprintId::Commerce => self.commerce_base_price,
        }
    }

    pub fn price_table(&self, blueprint: &Blueprint) -> PriceTable {
        PriceTable::from_catalog(
            blueprint.catalog(),
            self.base_price(blueprint.id()),
            self.default_unit_price,
            &self.overrides,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

fn default_min_delay_ms() -> u64 {
    1200
}

fn default_max_delay_ms() -> u64 {
    3500
}

fn default_jitter_ms() -> u64 {
    400
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl EstimateConfig {
    pub fn delay(&self) -> EstimateDelay {
        EstimateDelay::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            Duration::from_millis(self.jitter_ms),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftConfig {
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: u64,
    /// Overrides the default draft location in the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_expiry_minutes() -> u64 {
    60
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            expiry_minutes: default_expiry_minutes(),
            path: None,
        }
    }
}

impl DraftConfig {
    pub fn expiry(&self) -> chrono::Duration {
        let minutes = i64::try_from(self.expiry_minutes)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 60_000 - 1);
        chrono::Duration::minutes(minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContactConfig {
    /// Callback requests are POSTed here when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Local outbox used when no endpoint is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbox_path: Option<PathBuf>,
}

impl PlannerConfig {
    /// Directory holding config.toml
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("project-planner")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".project-planner")
        };
        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory for drafts and the quote outbox
    pub fn data_dir() -> Result<PathBuf> {
        Ok(dirs::data_dir()
            .context("Failed to get data directory")?
            .join("project-planner"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: PlannerConfig = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!(
            "Loaded config with {} price overrides",
            config.pricing.overrides.len()
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(parent) = config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
                info!("Created config directory: {:?}", parent);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn draft_path(&self) -> Result<PathBuf> {
        match &self.draft.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("draft.json")),
        }
    }

    pub fn outbox_path(&self) -> Result<PathBuf> {
        match &self.contact.outbox_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("quote-outbox.jsonl")),
        }
    }

    /// Update a single setting by its CLI name
    pub fn set_value(&mut self, name: &str, value: &str) -> Result<()> {
        info!("Setting {} to {}", name, value);

        match name {
            "interaction-base-price" => {
                self.pricing.interaction_base_price = parse_amount(name, value)?
            }
            "commerce-base-price" => self.pricing.commerce_base_price = parse_amount(name, value)?,
            "universal-base-price" => {
                self.pricing.universal_base_price = parse_amount(name, value)?
            }
            "default-unit-price" => self.pricing.default_unit_price = parse_amount(name, value)?,
            "min-delay-ms" => self.estimate.min_delay_ms = parse_amount(name, value)?,
            "max-delay-ms" => self.estimate.max_delay_ms = parse_amount(name, value)?,
            "jitter-ms" => self.estimate.jitter_ms = parse_amount(name, value)?,
            "draft-expiry-minutes" => {
                let minutes = parse_amount(name, value)?;
                if minutes == 0 {
                    anyhow::bail!("draft-expiry-minutes must be greater than 0");
                }
                self.draft.expiry_minutes = minutes;
            }
            "cascade-policy" => self.cascade_policy = value.parse()?,
            "contact-endpoint" => {
                self.contact.endpoint = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => anyhow::bail!("Unknown setting: {}", name),
        }

        if self.estimate.max_delay_ms < self.estimate.min_delay_ms {
            anyhow::bail!(
                "max-delay-ms ({}) must not be lower than min-delay-ms ({})",
                self.estimate.max_delay_ms,
                self.estimate.min_delay_ms
            );
        }

        Ok(())
    }
}

fn parse_amount(name: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        anyhow::anyhow!(
            "Invalid value for {}: '{}'. Must be a non-negative integer.",
            name,
            value
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlannerConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.pricing.interaction_base_price, 15000);
        assert_eq!(config.draft.expiry_minutes, 60);
        assert_eq!(config.cascade_policy, CascadePolicy::Reachable);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
cascade_policy = "release-orphans"

[pricing]
commerce_base_price = 30000

[pricing.overrides]
live_chat = 4200
"#,
        )
        .unwrap();

        let config = PlannerConfig::load_from(&path).unwrap();
        assert_eq!(config.pricing.commerce_base_price, 30000);
        assert_eq!(config.pricing.interaction_base_price, 15000);
        assert_eq!(config.pricing.overrides.get("live_chat"), Some(&4200));
        assert_eq!(config.cascade_policy, CascadePolicy::ReleaseOrphans);
        assert_eq!(config.estimate, EstimateConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = PlannerConfig::default();
        config.set_value("jitter-ms", "50").unwrap();
        config.set_value("contact-endpoint", "https://example.com/quotes").unwrap();
        config.save_to(&path).unwrap();

        let reloaded = PlannerConfig::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "pricing = 12").unwrap();
        assert!(PlannerConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_set_value_validation() {
        let mut config = PlannerConfig::default();
        assert!(config.set_value("default-unit-price", "abc").is_err());
        assert!(config.set_value("draft-expiry-minutes", "0").is_err());
        assert!(config.set_value("no-such-setting", "1").is_err());
        assert!(config.set_value("min-delay-ms", "9000").is_err());

        let mut config = PlannerConfig::default();
        config.set_value("cascade-policy", "release-orphans").unwrap();
        assert_eq!(config.cascade_policy, CascadePolicy::ReleaseOrphans);
    }

    #[test]
    fn test_price_table_uses_blueprint_base() {
        let catalog = crate::planner::PlannerCatalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let table = config
            .pricing
            .price_table(catalog.blueprint(BlueprintId::Commerce));
        assert_eq!(table.base_price(), 25000);
        assert_eq!(table.unit_price("wishlist"), 2000);
    }
}
