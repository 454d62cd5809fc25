//! Site configuration: model, snapshot cache, and fetch/refresh lifecycle.
//!
//! This crate provides:
//! - [`SiteConfig`] — the tenant configuration and its compiled default
//! - [`SnapshotCache`] — the local last-known-good slot
//! - [`SiteConfigStore`] — synchronous load, then asynchronous refresh

pub mod cache;
pub mod model;
pub mod store;

pub use cache::{SNAPSHOT_SLOT, Snapshot, SnapshotCache};
pub use model::{
    Branding, BrandingOverride, LayoutConfig, Localization, SiteConfig, SiteMetadata,
    TradingConfig,
};
pub use store::{ConfigOrigin, RefreshOutcome, SiteConfigSource, SiteConfigStore};
