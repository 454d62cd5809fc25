//! Known variant identifiers.

use serde::{Deserialize, Serialize};

/// Every skin the storefront ships.
///
/// The string form is the stable id used in persisted configuration, preview
/// query parameters, stylesheet paths, and the generated configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantId {
    Classic,
    Modern,
    Minimal,
    Bold,
    Corporate,
    Neon,
    Aurora,
    Horizon,
    Summit,
    Pulse,
    Zenith,
    Vertex,
    Nova,
    Meridian,
    DarkPro,
    LightPro,
}

/// Designated fallback for unknown or missing ids.
pub const DEFAULT_VARIANT: VariantId = VariantId::Classic;

impl VariantId {
    /// All known variants in canonical order.
    pub const ALL: [VariantId; 16] = [
        Self::Classic,
        Self::Modern,
        Self::Minimal,
        Self::Bold,
        Self::Corporate,
        Self::Neon,
        Self::Aurora,
        Self::Horizon,
        Self::Summit,
        Self::Pulse,
        Self::Zenith,
        Self::Vertex,
        Self::Nova,
        Self::Meridian,
        Self::DarkPro,
        Self::LightPro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Modern => "modern",
            Self::Minimal => "minimal",
            Self::Bold => "bold",
            Self::Corporate => "corporate",
            Self::Neon => "neon",
            Self::Aurora => "aurora",
            Self::Horizon => "horizon",
            Self::Summit => "summit",
            Self::Pulse => "pulse",
            Self::Zenith => "zenith",
            Self::Vertex => "vertex",
            Self::Nova => "nova",
            Self::Meridian => "meridian",
            Self::DarkPro => "dark-pro",
            Self::LightPro => "light-pro",
        }
    }

    /// Human-readable name shown in variant pickers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::Modern => "Modern",
            Self::Minimal => "Minimal",
            Self::Bold => "Bold",
            Self::Corporate => "Corporate",
            Self::Neon => "Neon",
            Self::Aurora => "Aurora",
            Self::Horizon => "Horizon",
            Self::Summit => "Summit",
            Self::Pulse => "Pulse",
            Self::Zenith => "Zenith",
            Self::Vertex => "Vertex",
            Self::Nova => "Nova",
            Self::Meridian => "Meridian",
            Self::DarkPro => "Dark Pro",
            Self::LightPro => "Light Pro",
        }
    }

    /// Parse a raw id, returning `None` for anything not in the catalogue.
    pub fn lookup(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl Default for VariantId {
    fn default() -> Self {
        DEFAULT_VARIANT
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}'")]
pub struct UnknownVariant(pub String);

impl std::str::FromStr for VariantId {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_through_from_str() {
        for id in VariantId::ALL {
            let parsed: VariantId = id.to_string().parse().expect("parse id");
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for id in VariantId::ALL {
            assert!(seen.insert(id.as_str()), "duplicate id {id}");
        }
    }

    #[test]
    fn serde_matches_as_str() {
        let json = serde_json::to_string(&VariantId::DarkPro).unwrap();
        assert_eq!(json, "\"dark-pro\"");
        let parsed: VariantId = serde_json::from_str("\"light-pro\"").unwrap();
        assert_eq!(parsed, VariantId::LightPro);
    }

    #[test]
    fn unknown_id_error_names_the_input() {
        let err = "vapor".parse::<VariantId>().unwrap_err();
        assert_eq!(err, UnknownVariant("vapor".to_string()));
        assert_eq!(err.to_string(), "unknown variant 'vapor'");
    }

    #[test]
    fn lookup_tolerates_case_and_whitespace() {
        assert_eq!(VariantId::lookup("  NEON "), Some(VariantId::Neon));
        assert_eq!(VariantId::lookup("not-a-real-id"), None);
        assert_eq!(VariantId::lookup(""), None);
    }
}
