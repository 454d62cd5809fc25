//! Active variant resolution.
//!
//! The effective variant is the preview directive when it names a known
//! variant, else the persisted value when known, else the designated default.
//! Unknown ids are corrected silently; nothing here returns an error.

use storefront_shared::VariantsConfig;
use tracing::{debug, warn};
use url::Url;

use crate::definition::VariantDefinition;
use crate::id::{DEFAULT_VARIANT, VariantId};
use crate::overrides::OverrideRegistry;

/// Picks the variant for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantResolver {
    default: VariantId,
}

impl VariantResolver {
    pub fn new(default: VariantId) -> Self {
        Self { default }
    }

    /// Resolver using `[variants].default_variant`; an unknown id there
    /// degrades to [`DEFAULT_VARIANT`].
    pub fn from_config(config: &VariantsConfig) -> Self {
        match VariantId::lookup(&config.default_variant) {
            Some(id) => Self::new(id),
            None => {
                warn!(
                    configured = %config.default_variant,
                    fallback = %DEFAULT_VARIANT,
                    "configured default variant is unknown"
                );
                Self::new(DEFAULT_VARIANT)
            }
        }
    }

    pub fn default_variant(&self) -> VariantId {
        self.default
    }

    /// Resolve the effective variant id.
    pub fn resolve(&self, persisted: Option<&str>, preview: Option<&str>) -> VariantId {
        if let Some(raw) = preview {
            match VariantId::lookup(raw) {
                Some(id) => return id,
                None => debug!(preview = raw, "ignoring unknown preview variant"),
            }
        }

        if let Some(raw) = persisted {
            match VariantId::lookup(raw) {
                Some(id) => return id,
                None => debug!(persisted = raw, "ignoring unknown persisted variant"),
            }
        }

        self.default
    }

    /// Resolve and build the definition in one step.
    pub fn resolve_definition(
        &self,
        persisted: Option<&str>,
        preview: Option<&str>,
        registry: &OverrideRegistry,
    ) -> VariantDefinition {
        VariantDefinition::define(self.resolve(persisted, preview), registry)
    }
}

impl Default for VariantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_VARIANT)
    }
}

/// [`VariantResolver::resolve`] with the designated default.
pub fn resolve(persisted: Option<&str>, preview: Option<&str>) -> VariantId {
    VariantResolver::default().resolve(persisted, preview)
}

/// Extract the preview directive from a raw query string (with or without `?`).
///
/// Empty values count as absent.
pub fn preview_from_query(query: &str, param: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Extract the preview directive from a full URL.
pub fn preview_from_url(url: &Url, param: &str) -> Option<String> {
    url.query().and_then(|q| preview_from_query(q, param))
}
