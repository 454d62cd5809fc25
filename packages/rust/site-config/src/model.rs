//! Site configuration model.
//!
//! One logical [`SiteConfig`] exists per deployment. It is owned by the
//! backing store; the storefront only reads it. `SiteConfig::default()` is the
//! compiled-in fallback used before (or instead of) a successful fetch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The full tenant configuration served by `GET /api/site-config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub branding: Branding,
    pub layout: LayoutConfig,
    /// Feature flags by name.
    pub features: BTreeMap<String, bool>,
    pub localization: Localization,
    pub trading: TradingConfig,
    pub metadata: SiteMetadata,
    /// Extended categories, passed through untouched.
    pub extended: BTreeMap<String, serde_json::Value>,
}

impl SiteConfig {
    /// Branding for `language`, with its per-language overrides applied.
    ///
    /// Languages without overrides get the base branding.
    pub fn branding_for(&self, language: &str) -> Branding {
        match self.branding.overrides.get(language) {
            Some(patch) => self.branding.with_override(patch),
            None => {
                tracing::debug!(language, "no branding overrides for language");
                self.branding.clone()
            }
        }
    }

    /// Whether a feature flag is on. Unknown flags are off.
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }

    /// The persisted variant id, if set.
    pub fn persisted_variant(&self) -> Option<&str> {
        let id = self.layout.active_variant.trim();
        (!id.is_empty()).then_some(id)
    }
}

/// Brand identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Branding {
    pub site_name: String,
    pub tagline: String,
    pub logo_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    /// Language code → partial branding.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, BrandingOverride>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            site_name: "Storefront".into(),
            tagline: "Trade global markets with confidence".into(),
            logo_url: "/assets/logo.svg".into(),
            primary_color: "#0052ff".into(),
            secondary_color: "#111827".into(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Branding {
    fn with_override(&self, patch: &BrandingOverride) -> Self {
        Self {
            site_name: patch.site_name.clone().unwrap_or_else(|| self.site_name.clone()),
            tagline: patch.tagline.clone().unwrap_or_else(|| self.tagline.clone()),
            logo_url: patch.logo_url.clone().unwrap_or_else(|| self.logo_url.clone()),
            primary_color: self.primary_color.clone(),
            secondary_color: self.secondary_color.clone(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Per-language branding delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Layout switches, including the persisted active variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub active_variant: String,
    pub show_footer: bool,
    pub show_language_switcher: bool,
    pub sticky_header: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            active_variant: "classic".into(),
            show_footer: true,
            show_language_switcher: true,
            sticky_header: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Localization {
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            default_language: "en".into(),
            supported_languages: vec!["en".into()],
        }
    }
}

/// Trading parameters shown on marketing pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TradingConfig {
    pub max_leverage: u32,
    pub min_deposit: f64,
    pub base_currency: String,
    pub instruments: Vec<String>,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            max_leverage: 500,
            min_deposit: 100.0,
            base_currency: "USD".into(),
            instruments: vec!["forex".into(), "indices".into(), "commodities".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "Storefront — Online Trading".into(),
            description: "Trade forex, indices and commodities.".into(),
            keywords: vec!["trading".into(), "forex".into(), "cfd".into()],
        }
    }
}
