//! Page configuration model and Builders.
//!
//! Each page kind has a flat, fully-populated config type with compiled
//! defaults and a matching override type where every field is optional.
//! Builders merge an override onto the defaults field by field: a set field
//! wins, an unset field falls through to the default. There is no error path.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Page kinds
// ---------------------------------------------------------------------------

/// The page kinds a variant configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageKind {
    Partners,
    Company,
    Education,
    Legal,
    CustomerInfo,
    MarketInfo,
    CompanySubpage,
}

impl PageKind {
    /// Canonical order, also the order generated blocks are written in.
    pub const ALL: [PageKind; 7] = [
        Self::Partners,
        Self::Company,
        Self::Education,
        Self::Legal,
        Self::CustomerInfo,
        Self::MarketInfo,
        Self::CompanySubpage,
    ];

    /// Key of this page inside a variant's `pages` object.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Partners => "partners",
            Self::Company => "company",
            Self::Education => "education",
            Self::Legal => "legal",
            Self::CustomerInfo => "customerInfo",
            Self::MarketInfo => "marketInfo",
            Self::CompanySubpage => "companySubpage",
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A primitive or array-valued page field, as written to configuration source.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<String>),
}

/// Conversion of a page field into a [`FieldValue`].
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Str(self.clone())
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl ToFieldValue for u32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Int(i64::from(*self))
    }
}

impl ToFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl ToFieldValue for Vec<String> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::List(self.clone())
    }
}

// ---------------------------------------------------------------------------
// PageConfig trait + generic Builder
// ---------------------------------------------------------------------------

/// A complete configuration for one page kind.
pub trait PageConfig: Clone + Default + PartialEq + Serialize + DeserializeOwned {
    /// Partial delta of this config; every field optional.
    type Override: Clone + Default + PartialEq + Serialize + DeserializeOwned;

    const KIND: PageKind;

    /// Field-independent shallow merge: `patch` fields win, the rest come from `self`.
    fn merge(&self, patch: &Self::Override) -> Self;

    /// Fields in declaration order, keyed by their source name.
    fn fields(&self) -> Vec<(&'static str, FieldValue)>;
}

/// Merge an optional override onto `defaults`.
///
/// `build(d, None)` and `build(d, Some(&Default::default()))` both equal `d`.
pub fn build<P: PageConfig>(defaults: &P, patch: Option<&P::Override>) -> P {
    match patch {
        Some(patch) => defaults.merge(patch),
        None => defaults.clone(),
    }
}

macro_rules! page_config {
    (
        $(#[$meta:meta])*
        $name:ident, $override_name:ident, $kind:ident, $builder:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty as $key:literal = $default:expr, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                #[serde(rename = $key)]
                pub $field: $ty,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $default, )+
                }
            }
        }

        #[doc = concat!("Partial [`", stringify!($name), "`]; unset fields keep their defaults.")]
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $override_name {
            $(
                #[serde(rename = $key, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
        }

        impl $override_name {
            /// Whether no field is set.
            pub fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )+
            }
        }

        impl PageConfig for $name {
            type Override = $override_name;

            const KIND: PageKind = PageKind::$kind;

            fn merge(&self, patch: &$override_name) -> Self {
                Self {
                    $(
                        $field: patch
                            .$field
                            .clone()
                            .unwrap_or_else(|| self.$field.clone()),
                    )+
                }
            }

            fn fields(&self) -> Vec<(&'static str, FieldValue)> {
                vec![ $( ($key, self.$field.to_field_value()), )+ ]
            }
        }

        #[doc = concat!("Builder for the `", stringify!($kind), "` page.")]
        pub fn $builder(patch: Option<&$override_name>) -> $name {
            build(&$name::default(), patch)
        }
    };
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Page configs
// ---------------------------------------------------------------------------

page_config! {
    /// Introducing-broker and affiliate programme page.
    PartnersPageConfig, PartnersPageOverride, Partners, build_partners_page {
        layout: String as "layout" = "grid".into(),
        hero_style: String as "heroStyle" = "split".into(),
        show_commission_table: bool as "showCommissionTable" = true,
        commission_tiers: u32 as "commissionTiers" = 3,
        cta_label: String as "ctaLabel" = "Become a partner".into(),
        highlights: Vec<String> as "highlights" =
            strings(&["Up to 40% revenue share", "Daily payouts", "Dedicated manager"]),
    }
}

page_config! {
    /// About-the-company page.
    CompanyPageConfig, CompanyPageOverride, Company, build_company_page {
        layout: String as "layout" = "timeline".into(),
        hero_style: String as "heroStyle" = "centered".into(),
        show_team: bool as "showTeam" = true,
        show_timeline: bool as "showTimeline" = true,
        show_awards: bool as "showAwards" = false,
        founded_year: u32 as "foundedYear" = 2010,
        values: Vec<String> as "values" = strings(&["Transparency", "Security", "Innovation"]),
    }
}

page_config! {
    /// Trading academy page.
    EducationPageConfig, EducationPageOverride, Education, build_education_page {
        layout: String as "layout" = "cards".into(),
        hero_style: String as "heroStyle" = "split".into(),
        show_video_library: bool as "showVideoLibrary" = true,
        show_webinars: bool as "showWebinars" = true,
        show_glossary: bool as "showGlossary" = true,
        course_levels: Vec<String> as "courseLevels" =
            strings(&["beginner", "intermediate", "advanced"]),
        articles_per_page: u32 as "articlesPerPage" = 9,
    }
}

page_config! {
    /// Legal documents hub.
    LegalPageConfig, LegalPageOverride, Legal, build_legal_page {
        layout: String as "layout" = "sidebar".into(),
        show_table_of_contents: bool as "showTableOfContents" = true,
        show_last_updated: bool as "showLastUpdated" = true,
        documents: Vec<String> as "documents" = strings(&[
            "terms-and-conditions",
            "privacy-policy",
            "risk-disclosure",
            "aml-policy",
        ]),
        contact_email: String as "contactEmail" = "legal@example.com".into(),
    }
}

page_config! {
    /// Customer support and information page.
    CustomerInfoPageConfig, CustomerInfoPageOverride, CustomerInfo, build_customer_info_page {
        layout: String as "layout" = "tabs".into(),
        show_faq: bool as "showFaq" = true,
        show_contact_form: bool as "showContactForm" = true,
        show_live_chat: bool as "showLiveChat" = false,
        support_hours: String as "supportHours" = "24/5".into(),
        channels: Vec<String> as "channels" = strings(&["email", "phone", "chat"]),
    }
}

page_config! {
    /// Market overview page.
    MarketInfoPageConfig, MarketInfoPageOverride, MarketInfo, build_market_info_page {
        layout: String as "layout" = "table".into(),
        show_ticker: bool as "showTicker" = true,
        show_economic_calendar: bool as "showEconomicCalendar" = true,
        show_heatmap: bool as "showHeatmap" = false,
        default_instruments: Vec<String> as "defaultInstruments" =
            strings(&["EURUSD", "GBPUSD", "XAUUSD", "BTCUSD"]),
        refresh_interval_secs: u32 as "refreshIntervalSecs" = 5,
        min_spread_pips: f64 as "minSpreadPips" = 0.1,
    }
}

page_config! {
    /// Secondary company pages (careers, regulation, press).
    CompanySubpageConfig, CompanySubpageOverride, CompanySubpage, build_company_subpage {
        layout: String as "layout" = "article".into(),
        hero_style: String as "heroStyle" = "minimal".into(),
        show_breadcrumbs: bool as "showBreadcrumbs" = true,
        show_sidebar: bool as "showSidebar" = false,
        related_links: Vec<String> as "relatedLinks" =
            strings(&["/company", "/company/regulation", "/company/careers"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_is_identity() {
        let defaults = PartnersPageConfig::default();
        assert_eq!(build(&defaults, Some(&PartnersPageOverride::default())), defaults);
        assert_eq!(build(&defaults, None), defaults);
        assert_eq!(build_legal_page(None), LegalPageConfig::default());
    }

    #[test]
    fn single_field_override_changes_only_that_field() {
        let defaults = CompanyPageConfig::default();
        let patch = CompanyPageOverride {
            show_awards: Some(true),
            ..Default::default()
        };
        let built = build(&defaults, Some(&patch));

        assert!(built.show_awards);
        let changed: Vec<_> = built
            .fields()
            .into_iter()
            .zip(defaults.fields())
            .filter(|(a, b)| a != b)
            .map(|(a, _)| a.0)
            .collect();
        assert_eq!(changed, vec!["showAwards"]);
    }

    #[test]
    fn every_field_can_be_overridden_independently() {
        let defaults = MarketInfoPageConfig::default();
        let patch: MarketInfoPageOverride = serde_json::from_value(serde_json::json!({
            "layout": "grid-{special}",
            "defaultInstruments": ["ETHUSD"],
            "minSpreadPips": 0.5,
        }))
        .unwrap();
        let built = build(&defaults, Some(&patch));

        assert_eq!(built.layout, "grid-{special}");
        assert_eq!(built.default_instruments, vec!["ETHUSD".to_string()]);
        assert_eq!(built.min_spread_pips, 0.5);
        assert_eq!(built.refresh_interval_secs, defaults.refresh_interval_secs);
        assert_eq!(built.show_ticker, defaults.show_ticker);
    }

    /// A value of the same JSON type that differs from `value`.
    fn altered(value: &serde_json::Value) -> serde_json::Value {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Value::Bool(!b),
            Value::String(s) => Value::String(format!("{s}-alt")),
            Value::Number(n) => match n.as_u64() {
                Some(n) => serde_json::json!(n + 1),
                None => serde_json::json!(n.as_f64().unwrap_or_default() + 0.5),
            },
            Value::Array(items) => {
                let mut items = items.clone();
                items.push(Value::String("extra".into()));
                Value::Array(items)
            }
            other => panic!("unexpected page field value {other}"),
        }
    }

    /// Override each field of `P` on its own and check nothing else moves.
    fn assert_each_field_overrides_alone<P: PageConfig>() {
        let defaults = P::default();
        let default_json = serde_json::to_value(&defaults).unwrap();
        let keys: Vec<_> = defaults.fields().into_iter().map(|(k, _)| k).collect();

        for key in keys {
            let value = altered(&default_json[key]);
            let patch: P::Override =
                serde_json::from_value(serde_json::json!({ key: value.clone() })).unwrap();
            let built = build(&defaults, Some(&patch));

            let changed: Vec<_> = built
                .fields()
                .into_iter()
                .zip(defaults.fields())
                .filter(|(a, b)| a != b)
                .map(|(a, _)| a.0)
                .collect();
            assert_eq!(changed, vec![key], "{}: overriding `{key}`", P::KIND);
            assert_eq!(serde_json::to_value(&built).unwrap()[key], value);
        }
    }

    #[test]
    fn each_field_of_every_page_kind_overrides_alone() {
        assert_each_field_overrides_alone::<PartnersPageConfig>();
        assert_each_field_overrides_alone::<CompanyPageConfig>();
        assert_each_field_overrides_alone::<EducationPageConfig>();
        assert_each_field_overrides_alone::<LegalPageConfig>();
        assert_each_field_overrides_alone::<CustomerInfoPageConfig>();
        assert_each_field_overrides_alone::<MarketInfoPageConfig>();
        assert_each_field_overrides_alone::<CompanySubpageConfig>();
    }

    #[test]
    fn override_serializes_only_set_fields() {
        let patch = EducationPageOverride {
            layout: Some("list".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "layout": "list" }));
        assert!(!patch.is_empty());
        assert!(EducationPageOverride::default().is_empty());
    }

    #[test]
    fn config_serializes_with_source_keys() {
        let json = serde_json::to_value(CustomerInfoPageConfig::default()).unwrap();
        assert_eq!(json["supportHours"], "24/5");
        assert_eq!(json["showLiveChat"], false);
    }

    #[test]
    fn fields_follow_declaration_order() {
        let keys: Vec<_> = CompanySubpageConfig::default()
            .fields()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec!["layout", "heroStyle", "showBreadcrumbs", "showSidebar", "relatedLinks"]
        );
    }

    #[test]
    fn kinds_report_their_keys() {
        assert_eq!(PartnersPageConfig::KIND.key(), "partners");
        assert_eq!(CustomerInfoPageConfig::KIND.key(), "customerInfo");
        assert_eq!(CompanySubpageConfig::KIND.key(), "companySubpage");
        assert_eq!(PageKind::ALL.len(), 7);
    }
}
