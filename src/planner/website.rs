//! Website pages pricing formula
//!
//! Simple brochure/website services are not module-based: they are priced by
//! page counts and flat per-feature fees instead of the dependency graph.

use super::pricing::PriceEstimate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WebsiteFeature {
    ContactForm,
    Blog,
    Cms,
    Seo,
    Multilingual,
    Analytics,
}

impl WebsiteFeature {
    pub const ALL: [WebsiteFeature; 6] = [
        WebsiteFeature::ContactForm,
        WebsiteFeature::Blog,
        WebsiteFeature::Cms,
        WebsiteFeature::Seo,
        WebsiteFeature::Multilingual,
        WebsiteFeature::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebsiteFeature::ContactForm => "contact-form",
            WebsiteFeature::Blog => "blog",
            WebsiteFeature::Cms => "cms",
            WebsiteFeature::Seo => "seo",
            WebsiteFeature::Multilingual => "multilingual",
            WebsiteFeature::Analytics => "analytics",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WebsiteFeature::ContactForm => "Contact form",
            WebsiteFeature::Blog => "Blog",
            WebsiteFeature::Cms => "Content management",
            WebsiteFeature::Seo => "SEO setup",
            WebsiteFeature::Multilingual => "Multilingual content",
            WebsiteFeature::Analytics => "Analytics integration",
        }
    }
}

impl fmt::Display for WebsiteFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebsiteFeature {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WebsiteFeature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = WebsiteFeature::ALL.iter().map(|f| f.as_str()).collect();
                anyhow::anyhow!(
                    "Unknown website feature '{}'. Expected one of: {}",
                    s,
                    known.join(", ")
                )
            })
    }
}

/// What the visitor asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteQuote {
    pub pages: u32,
    pub dynamic_pages: u32,
    #[serde(default)]
    pub features: BTreeSet<WebsiteFeature>,
}

impl Default for WebsiteQuote {
    fn default() -> Self {
        Self {
            pages: 5,
            dynamic_pages: 0,
            features: BTreeSet::new(),
        }
    }
}

impl WebsiteQuote {
    /// At least one page; dynamic pages never exceed the page count
    pub fn normalized(&self) -> Self {
        let pages = self.pages.max(1);
        Self {
            pages,
            dynamic_pages: self.dynamic_pages.min(pages),
            features: self.features.clone(),
        }
    }

    /// How "heavy" the request is, in `0.0..=1.0`, for the reveal delay
    pub fn selection_ratio(&self) -> f64 {
        let quote = self.normalized();
        let chosen = quote.dynamic_pages as f64 + quote.features.len() as f64;
        let possible = quote.pages as f64 + WebsiteFeature::ALL.len() as f64;
        (chosen / possible).clamp(0.0, 1.0)
    }
}

/// Prices for the website formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsitePricing {
    #[serde(default = "default_website_base")]
    pub base_price: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    #[serde(default = "default_per_dynamic_page")]
    pub per_dynamic_page: u64,
    #[serde(default = "default_feature_price")]
    pub feature_price: u64,
    /// Per-feature overrides of `feature_price`, keyed by feature name
    #[serde(default)]
    pub feature_prices: BTreeMap<String, u64>,
}

fn default_website_base() -> u64 {
    8000
}

fn default_per_page() -> u64 {
    1500
}

fn default_per_dynamic_page() -> u64 {
    3500
}

fn default_feature_price() -> u64 {
    2500
}

impl Default for WebsitePricing {
    fn default() -> Self {
        Self {
            base_price: default_website_base(),
            per_page: default_per_page(),
            per_dynamic_page: default_per_dynamic_page(),
            feature_price: default_feature_price(),
            feature_prices: [
                (WebsiteFeature::Cms, 6000),
                (WebsiteFeature::Multilingual, 5000),
                (WebsiteFeature::ContactForm, 1000),
            ]
            .into_iter()
            .map(|(feature, price)| (feature.as_str().to_string(), price))
            .collect(),
        }
    }
}

impl WebsitePricing {
    pub fn feature_price(&self, feature: WebsiteFeature) -> u64 {
        self.feature_prices
            .get(feature.as_str())
            .copied()
            .unwrap_or(self.feature_price)
    }

    /// Static pages at `per_page`, dynamic pages at `per_dynamic_page`
    pub fn estimate(&self, quote: &WebsiteQuote) -> PriceEstimate {
        let quote = quote.normalized();
        let static_pages = u64::from(quote.pages - quote.dynamic_pages);
        let dynamic_pages = u64::from(quote.dynamic_pages);

        let pages_cost = static_pages
            .saturating_mul(self.per_page)
            .saturating_add(dynamic_pages.saturating_mul(self.per_dynamic_page));
        let features_cost = quote
            .features
            .iter()
            .map(|f| self.feature_price(*f))
            .fold(0u64, u64::saturating_add);

        PriceEstimate::new(self.base_price, pages_cost.saturating_add(features_cost))
    }

    pub fn total(&self, quote: &WebsiteQuote) -> u64 {
        self.estimate(quote).total
    }
}
