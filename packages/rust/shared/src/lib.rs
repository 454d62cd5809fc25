//! Shared error model and configuration for the storefront workspace.
//!
//! This crate is the foundation depended on by all other storefront crates.
//! It provides:
//! - [`StorefrontError`] — the unified error type
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, PatchMode, PatcherConfig, SiteSourceConfig, StylesheetConfig, VARIANT_PLACEHOLDER,
    VariantsConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, StorefrontError};
