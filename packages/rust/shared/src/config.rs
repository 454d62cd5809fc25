//! Application configuration for the storefront tooling.
//!
//! User config lives at `~/.storefront/storefront.toml`.
//! Missing sections and fields fall back to the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorefrontError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".storefront";

/// Placeholder substituted by the variant id in stylesheet paths.
pub const VARIANT_PLACEHOLDER: &str = "{variant}";

// ---------------------------------------------------------------------------
// Config structs (matching storefront.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site configuration endpoint and snapshot cache.
    #[serde(default)]
    pub site: SiteSourceConfig,

    /// Variant selection.
    #[serde(default)]
    pub variants: VariantsConfig,

    /// Stylesheet naming convention.
    #[serde(default)]
    pub stylesheets: StylesheetConfig,

    /// Source patcher target and behavior.
    #[serde(default)]
    pub patcher: PatcherConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSourceConfig {
    /// Base URL of the backing store API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Path of the site configuration endpoint.
    #[serde(default = "default_config_path")]
    pub config_path: String,

    /// HTTP timeout for the configuration fetch.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Directory holding the snapshot slot. Defaults to `~/.storefront/cache`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
}

impl Default for SiteSourceConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            config_path: default_config_path(),
            request_timeout_secs: default_request_timeout(),
            cache_dir: None,
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:3000".into()
}
fn default_config_path() -> String {
    "/api/site-config".into()
}
fn default_request_timeout() -> u64 {
    10
}

/// `[variants]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantsConfig {
    /// Variant used when neither the preview nor the persisted value is known.
    #[serde(default = "default_variant")]
    pub default_variant: String,

    /// Query parameter carrying the preview directive.
    #[serde(default = "default_preview_param")]
    pub preview_param: String,
}

impl Default for VariantsConfig {
    fn default() -> Self {
        Self {
            default_variant: default_variant(),
            preview_param: default_preview_param(),
        }
    }
}

fn default_variant() -> String {
    "classic".into()
}
fn default_preview_param() -> String {
    "variant".into()
}

/// `[stylesheets]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylesheetConfig {
    /// Path template; `{variant}` is replaced with the variant id.
    #[serde(default = "default_path_template")]
    pub path_template: String,

    /// Attribute tagging the injected stylesheet element.
    #[serde(default = "default_marker_attribute")]
    pub marker_attribute: String,

    /// Document-level attribute reflecting the active variant.
    #[serde(default = "default_root_attribute")]
    pub root_attribute: String,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            path_template: default_path_template(),
            marker_attribute: default_marker_attribute(),
            root_attribute: default_root_attribute(),
        }
    }
}

fn default_path_template() -> String {
    "/themes/{variant}.css".into()
}
fn default_marker_attribute() -> String {
    "data-variant-stylesheet".into()
}
fn default_root_attribute() -> String {
    "data-variant".into()
}

/// How the source patcher writes generated page blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchMode {
    /// Replace existing page blocks in place, insert missing ones. Idempotent.
    #[default]
    Replace,
    /// Always insert after the anchor. Re-running duplicates blocks.
    Insert,
}

impl std::fmt::Display for PatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replace => f.write_str("replace"),
            Self::Insert => f.write_str("insert"),
        }
    }
}

/// `[patcher]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatcherConfig {
    /// Configuration source file rewritten in place.
    #[serde(default = "default_patch_target")]
    pub target: String,

    /// Always-present page key after which new blocks are inserted.
    #[serde(default = "default_anchor")]
    pub anchor: String,

    /// Write mode.
    #[serde(default)]
    pub mode: PatchMode,
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            target: default_patch_target(),
            anchor: default_anchor(),
            mode: PatchMode::default(),
        }
    }
}

fn default_patch_target() -> String {
    "web/src/config/variants.generated.ts".into()
}
fn default_anchor() -> String {
    "home".into()
}

impl AppConfig {
    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !self.stylesheets.path_template.contains(VARIANT_PLACEHOLDER) {
            return Err(StorefrontError::config(format!(
                "stylesheets.path_template '{}' must contain {VARIANT_PLACEHOLDER}",
                self.stylesheets.path_template
            )));
        }
        if self.patcher.anchor.trim().is_empty() {
            return Err(StorefrontError::config("patcher.anchor must not be empty"));
        }
        Ok(())
    }

    /// Full URL of the site configuration endpoint.
    pub fn site_config_url(&self) -> String {
        format!(
            "{}{}",
            self.site.api_base_url.trim_end_matches('/'),
            self.site.config_path
        )
    }

    /// Directory of the snapshot slot.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.site.cache_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(config_dir()?.join("cache")),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.storefront/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| StorefrontError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.storefront/storefront.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| StorefrontError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        StorefrontError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| StorefrontError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| StorefrontError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| StorefrontError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
