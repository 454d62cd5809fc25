//! Variant configuration and composition.
//!
//! This crate provides:
//! - [`VariantId`] — the catalogue of known skins
//! - Structural axes ([`NavLayout`], [`HeroStyle`], …) and [`VariantStructure`]
//! - Page configs, overrides, and Builders ([`page`])
//! - [`OverrideRegistry`] — per-variant page overrides
//! - [`VariantDefinition`] — a fully resolved skin
//! - [`VariantResolver`] — picks the active variant for a view

pub mod definition;
pub mod id;
pub mod overrides;
pub mod page;
pub mod resolver;
pub mod structure;

pub use definition::{PageBlock, VariantDefinition, VariantPages};
pub use id::{DEFAULT_VARIANT, UnknownVariant, VariantId};
pub use overrides::{OverrideRegistry, PageOverrides};
pub use page::{
    CompanyPageConfig, CompanyPageOverride, CompanySubpageConfig, CompanySubpageOverride,
    CustomerInfoPageConfig, CustomerInfoPageOverride, EducationPageConfig, EducationPageOverride,
    FieldValue, LegalPageConfig, LegalPageOverride, MarketInfoPageConfig, MarketInfoPageOverride,
    PageConfig, PageKind, PartnersPageConfig, PartnersPageOverride, build, build_company_page,
    build_company_subpage, build_customer_info_page, build_education_page, build_legal_page,
    build_market_info_page, build_partners_page,
};
pub use resolver::{VariantResolver, preview_from_query, preview_from_url, resolve};
pub use structure::{
    BenefitsStyle, CtaStyle, FooterLayout, HeroStyle, NavLayout, StatsStyle, StructuralAxis,
    TestimonialStyle, VariantStructure, structure_for,
};
