//! Per-variant page overrides.
//!
//! An [`OverrideRegistry`] maps a variant id to one optional partial config
//! per page kind. Overrides are declarative deltas authored here (or loaded
//! from JSON); Builders turn them into complete page configs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storefront_shared::{Result, StorefrontError};
use tracing::warn;

use crate::id::VariantId;
use crate::page::{
    CompanyPageOverride, CompanySubpageOverride, CustomerInfoPageOverride, EducationPageOverride,
    LegalPageOverride, MarketInfoPageOverride, PartnersPageOverride,
};

/// One optional override per page kind for a single variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partners: Option<PartnersPageOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyPageOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<EducationPageOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal: Option<LegalPageOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfoPageOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_info: Option<MarketInfoPageOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_subpage: Option<CompanySubpageOverride>,
}

/// Variant id → page overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideRegistry {
    entries: BTreeMap<VariantId, PageOverrides>,
}

impl OverrideRegistry {
    /// An empty registry: every variant gets pure defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the overrides of one variant.
    pub fn insert(&mut self, id: VariantId, overrides: PageOverrides) {
        self.entries.insert(id, overrides);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, id: VariantId, overrides: PageOverrides) -> Self {
        self.insert(id, overrides);
        self
    }

    pub fn get(&self, id: VariantId) -> Option<&PageOverrides> {
        self.entries.get(&id)
    }

    /// Variant ids with registered overrides, in canonical id order.
    pub fn variant_ids(&self) -> impl Iterator<Item = VariantId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a registry from a JSON object keyed by variant id.
    ///
    /// Keys naming no known variant are skipped with a warning.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, PageOverrides> = serde_json::from_str(content)
            .map_err(|e| StorefrontError::parse(format!("override registry: {e}")))?;

        let mut registry = Self::new();
        for (key, overrides) in raw {
            match VariantId::lookup(&key) {
                Some(id) => registry.insert(id, overrides),
                None => warn!(variant = %key, "ignoring overrides for unknown variant"),
            }
        }
        Ok(registry)
    }

    /// The overrides shipped with the storefront, one entry per known variant.
    pub fn builtin() -> Self {
        VariantId::ALL
            .into_iter()
            .fold(Self::new(), |registry, id| registry.with(id, authored(id)))
    }
}

// ---------------------------------------------------------------------------
// Authored overrides
// ---------------------------------------------------------------------------

fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn list(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|i| (*i).to_string()).collect())
}

fn authored(id: VariantId) -> PageOverrides {
    match id {
        VariantId::Classic => PageOverrides::default(),
        VariantId::Modern => PageOverrides {
            partners: Some(PartnersPageOverride {
                layout: s("cards"),
                hero_style: s("fullscreen"),
                ..Default::default()
            }),
            education: Some(EducationPageOverride {
                layout: s("masonry"),
                articles_per_page: Some(12),
                ..Default::default()
            }),
            market_info: Some(MarketInfoPageOverride {
                show_heatmap: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Minimal => PageOverrides {
            company: Some(CompanyPageOverride {
                layout: s("prose"),
                show_team: Some(false),
                show_timeline: Some(false),
                ..Default::default()
            }),
            customer_info: Some(CustomerInfoPageOverride {
                layout: s("single-column"),
                channels: list(&["email"]),
                ..Default::default()
            }),
            company_subpage: Some(CompanySubpageOverride {
                show_breadcrumbs: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Bold => PageOverrides {
            partners: Some(PartnersPageOverride {
                hero_style: s("video"),
                cta_label: s("Start earning today"),
                ..Default::default()
            }),
            company: Some(CompanyPageOverride {
                show_awards: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Corporate => PageOverrides {
            company: Some(CompanyPageOverride {
                layout: s("sections"),
                show_awards: Some(true),
                founded_year: Some(2004),
                ..Default::default()
            }),
            legal: Some(LegalPageOverride {
                documents: list(&[
                    "terms-and-conditions",
                    "privacy-policy",
                    "risk-disclosure",
                    "aml-policy",
                    "best-execution-policy",
                    "conflicts-of-interest",
                ]),
                contact_email: s("compliance@example.com"),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Neon => PageOverrides {
            partners: Some(PartnersPageOverride {
                layout: s("grid-{special}"),
                ..Default::default()
            }),
            market_info: Some(MarketInfoPageOverride {
                layout: s("heatmap"),
                show_heatmap: Some(true),
                default_instruments: list(&["BTCUSD", "ETHUSD", "SOLUSD", "XAUUSD"]),
                refresh_interval_secs: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Aurora => PageOverrides {
            education: Some(EducationPageOverride {
                hero_style: s("carousel"),
                show_glossary: Some(false),
                ..Default::default()
            }),
            customer_info: Some(CustomerInfoPageOverride {
                show_live_chat: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Horizon => PageOverrides {
            market_info: Some(MarketInfoPageOverride {
                show_economic_calendar: Some(false),
                min_spread_pips: Some(0.0),
                ..Default::default()
            }),
            company_subpage: Some(CompanySubpageOverride {
                show_sidebar: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Summit => PageOverrides {
            partners: Some(PartnersPageOverride {
                commission_tiers: Some(5),
                ..Default::default()
            }),
            legal: Some(LegalPageOverride {
                layout: s("accordion"),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Pulse => PageOverrides {
            education: Some(EducationPageOverride {
                show_webinars: Some(false),
                course_levels: list(&["starter", "pro"]),
                ..Default::default()
            }),
            customer_info: Some(CustomerInfoPageOverride {
                support_hours: s("24/7"),
                show_live_chat: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Zenith => PageOverrides {
            company: Some(CompanyPageOverride {
                hero_style: s("minimal"),
                values: list(&["Clarity", "Focus"]),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Vertex => PageOverrides {
            partners: Some(PartnersPageOverride {
                layout: s("table"),
                show_commission_table: Some(false),
                ..Default::default()
            }),
            market_info: Some(MarketInfoPageOverride {
                refresh_interval_secs: Some(1),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Nova => PageOverrides {
            education: Some(EducationPageOverride {
                layout: s("carousel"),
                ..Default::default()
            }),
            company_subpage: Some(CompanySubpageOverride {
                hero_style: s("split"),
                related_links: list(&["/company", "/company/press"]),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::Meridian => PageOverrides {
            legal: Some(LegalPageOverride {
                show_last_updated: Some(false),
                ..Default::default()
            }),
            customer_info: Some(CustomerInfoPageOverride {
                layout: s("accordion"),
                show_contact_form: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        },
        VariantId::DarkPro | VariantId::LightPro => PageOverrides {
            partners: Some(PartnersPageOverride {
                highlights: list(&["Institutional spreads", "API access", "Volume rebates"]),
                ..Default::default()
            }),
            market_info: Some(MarketInfoPageOverride {
                layout: s("terminal"),
                show_heatmap: Some(true),
                min_spread_pips: Some(0.0),
                ..Default::default()
            }),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_known_variant() {
        let registry = OverrideRegistry::builtin();
        assert_eq!(registry.len(), VariantId::ALL.len());
        for id in VariantId::ALL {
            assert!(registry.get(id).is_some(), "missing overrides for {id}");
        }
    }

    #[test]
    fn classic_uses_pure_defaults() {
        let registry = OverrideRegistry::builtin();
        assert_eq!(registry.get(VariantId::Classic), Some(&PageOverrides::default()));
    }

    #[test]
    fn from_json_skips_unknown_variants() {
        let json = r#"{
            "neon": { "partners": { "layout": "cards" } },
            "not-a-real-id": { "legal": { "layout": "x" } }
        }"#;
        let registry = OverrideRegistry::from_json(json).expect("parse");
        assert_eq!(registry.len(), 1);
        let neon = registry.get(VariantId::Neon).unwrap();
        assert_eq!(
            neon.partners.as_ref().and_then(|p| p.layout.as_deref()),
            Some("cards")
        );
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(OverrideRegistry::from_json("[1, 2]").is_err());
    }

    #[test]
    fn page_overrides_use_source_keys() {
        let overrides = PageOverrides {
            customer_info: Some(CustomerInfoPageOverride {
                show_faq: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&overrides).unwrap();
        assert_eq!(json, serde_json::json!({ "customerInfo": { "showFaq": false } }));
    }
}
