//! Resolved variant definitions.
//!
//! A [`VariantDefinition`] is what the storefront renders: the variant's
//! structural axis values plus one complete page config per page kind, built
//! live from the Builders and the [`OverrideRegistry`].

use serde::{Deserialize, Serialize};

use crate::id::VariantId;
use crate::overrides::{OverrideRegistry, PageOverrides};
use crate::page::{
    CompanyPageConfig, CompanySubpageConfig, CustomerInfoPageConfig, EducationPageConfig,
    FieldValue, LegalPageConfig, MarketInfoPageConfig, PageConfig, PageKind, PartnersPageConfig,
    build_company_page, build_company_subpage, build_customer_info_page, build_education_page,
    build_legal_page, build_market_info_page, build_partners_page,
};
use crate::structure::{VariantStructure, structure_for};

/// Complete page configs of one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPages {
    pub partners: PartnersPageConfig,
    pub company: CompanyPageConfig,
    pub education: EducationPageConfig,
    pub legal: LegalPageConfig,
    pub customer_info: CustomerInfoPageConfig,
    pub market_info: MarketInfoPageConfig,
    pub company_subpage: CompanySubpageConfig,
}

/// The serialized fields of one page kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBlock {
    pub kind: PageKind,
    pub fields: Vec<(&'static str, FieldValue)>,
}

impl PageBlock {
    fn of<P: PageConfig>(config: &P) -> Self {
        Self {
            kind: P::KIND,
            fields: config.fields(),
        }
    }
}

impl VariantPages {
    /// Run every Builder over the matching override (if any).
    pub fn build(overrides: Option<&PageOverrides>) -> Self {
        Self {
            partners: build_partners_page(overrides.and_then(|o| o.partners.as_ref())),
            company: build_company_page(overrides.and_then(|o| o.company.as_ref())),
            education: build_education_page(overrides.and_then(|o| o.education.as_ref())),
            legal: build_legal_page(overrides.and_then(|o| o.legal.as_ref())),
            customer_info: build_customer_info_page(
                overrides.and_then(|o| o.customer_info.as_ref()),
            ),
            market_info: build_market_info_page(overrides.and_then(|o| o.market_info.as_ref())),
            company_subpage: build_company_subpage(
                overrides.and_then(|o| o.company_subpage.as_ref()),
            ),
        }
    }

    /// One block per page kind, in [`PageKind::ALL`] order.
    pub fn blocks(&self) -> Vec<PageBlock> {
        vec![
            PageBlock::of(&self.partners),
            PageBlock::of(&self.company),
            PageBlock::of(&self.education),
            PageBlock::of(&self.legal),
            PageBlock::of(&self.customer_info),
            PageBlock::of(&self.market_info),
            PageBlock::of(&self.company_subpage),
        ]
    }
}

impl Default for VariantPages {
    fn default() -> Self {
        Self::build(None)
    }
}

/// A fully resolved skin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDefinition {
    pub id: VariantId,
    pub name: String,
    pub structure: VariantStructure,
    pub pages: VariantPages,
}

impl VariantDefinition {
    /// Build the definition of `id` from its structure and registered overrides.
    pub fn define(id: VariantId, registry: &OverrideRegistry) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            structure: structure_for(id),
            pages: VariantPages::build(registry.get(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::build;

    #[test]
    fn every_variant_builds_complete_pages() {
        let registry = OverrideRegistry::builtin();
        for id in VariantId::ALL {
            let def = VariantDefinition::define(id, &registry);
            let blocks = def.pages.blocks();
            assert_eq!(blocks.len(), PageKind::ALL.len());
            for (block, kind) in blocks.iter().zip(PageKind::ALL) {
                assert_eq!(block.kind, kind);
                assert!(!block.fields.is_empty());
            }
        }
    }

    #[test]
    fn pages_match_builder_output() {
        let registry = OverrideRegistry::builtin();
        let def = VariantDefinition::define(VariantId::Neon, &registry);
        let overrides = registry.get(VariantId::Neon).unwrap();

        let expected = build(
            &MarketInfoPageConfig::default(),
            overrides.market_info.as_ref(),
        );
        assert_eq!(def.pages.market_info, expected);
        assert_eq!(def.pages.partners.layout, "grid-{special}");
        // untouched pages are pure defaults
        assert_eq!(def.pages.legal, LegalPageConfig::default());
    }

    #[test]
    fn empty_registry_yields_defaults() {
        let def = VariantDefinition::define(VariantId::Bold, &OverrideRegistry::new());
        assert_eq!(def.pages, VariantPages::default());
        assert_eq!(def.name, "Bold");
    }

    #[test]
    fn definition_serializes_pages_by_source_key() {
        let def = VariantDefinition::define(VariantId::Classic, &OverrideRegistry::builtin());
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["id"], "classic");
        assert_eq!(json["structure"]["navLayout"], "top-bar");
        assert!(json["pages"]["customerInfo"].is_object());
        assert!(json["pages"]["companySubpage"].is_object());
    }
}
