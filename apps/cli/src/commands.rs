//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use storefront_patcher::{PatchOptions, PatchReport, patch_file};
use storefront_render::{Composer, MemoryDocument, StylesheetSwitcher};
use storefront_shared::{AppConfig, StorefrontError, init_config, load_config};
use storefront_site_config::{
    ConfigOrigin, RefreshOutcome, SiteConfigSource, SiteConfigStore, SnapshotCache,
};
use storefront_variants::{
    OverrideRegistry, StructuralAxis, VariantDefinition, VariantId, VariantResolver,
    preview_from_query, preview_from_url,
};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Storefront — white-label variant configuration tooling.
#[derive(Parser)]
#[command(
    name = "storefront",
    version,
    about = "Inspect storefront variants, refresh site config, and patch the variant catalogue.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Splice generated page blocks into the configured variant catalogue.
    Patch,

    /// Inspect variant definitions.
    Variant {
        #[command(subcommand)]
        action: VariantAction,
    },

    /// Remote site configuration.
    SiteConfig {
        #[command(subcommand)]
        action: SiteConfigAction,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Variant subcommands.
#[derive(Subcommand)]
pub(crate) enum VariantAction {
    /// List known variants with their structure.
    List,
    /// Print the effective definition of a variant as JSON.
    Show {
        /// Persisted variant id.
        id: String,

        /// Page URL (or bare query string) carrying a preview parameter.
        #[arg(long)]
        url: Option<String>,

        /// Language used for the composed page sections.
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// Load an override registry from JSON and print the definitions it yields.
    Overrides {
        /// JSON object keyed by variant id.
        file: PathBuf,
    },
}

/// Site config subcommands.
#[derive(Subcommand)]
pub(crate) enum SiteConfigAction {
    /// Load the cached snapshot, refresh from the API, and report the active variant.
    Fetch {
        /// Page URL (or bare query string) whose preview parameter applies on top.
        #[arg(long)]
        url: Option<String>,
    },
    /// Delete the cached site config snapshot.
    ClearCache,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "storefront=info",
        1 => "storefront=debug",
        _ => "storefront=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Patch => cmd_patch().await,
        Command::Variant { action } => match action {
            VariantAction::List => cmd_variant_list().await,
            VariantAction::Show { id, url, language } => {
                cmd_variant_show(&id, url.as_deref(), &language).await
            }
            VariantAction::Overrides { file } => cmd_variant_overrides(&file).await,
        },
        Command::SiteConfig { action } => match action {
            SiteConfigAction::Fetch { url } => cmd_site_config_fetch(url.as_deref()).await,
            SiteConfigAction::ClearCache => cmd_site_config_clear_cache().await,
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_patch() -> Result<()> {
    let config = load_config()?;
    let target = PathBuf::from(&config.patcher.target);
    let options = PatchOptions::from(&config.patcher);
    let registry = OverrideRegistry::builtin();

    info!(
        target = %target.display(),
        anchor = %options.anchor,
        mode = %options.mode,
        variants = registry.len(),
        "patching variant catalogue"
    );

    let report = patch_file(&target, &registry, &options)?;
    print_patch_report(&target, &report);
    Ok(())
}

fn print_patch_report(target: &Path, report: &PatchReport) {
    println!();
    println!("  Patched {}", target.display());
    for patched in &report.patched {
        println!(
            "  ✓ {:<10} inserted {:>2}  replaced {:>2}  duplicates removed {:>2}",
            patched.variant.as_str(),
            patched.inserted,
            patched.replaced,
            patched.duplicates_removed
        );
    }
    for (variant, reason) in &report.skipped {
        println!("  ✗ {:<10} {reason}", variant.as_str());
    }
    println!();
    println!(
        "  {} variant(s) patched, {} skipped, {} block(s) written",
        report.patched.len(),
        report.skipped.len(),
        report.blocks_written()
    );
    println!();
}

async fn cmd_variant_list() -> Result<()> {
    let registry = OverrideRegistry::builtin();

    println!(
        "{:<10} {:<10} {:<9} {:<11} {:<8} {:<9}",
        "ID", "NAME", "NAV", "HERO", "CTA", "FOOTER"
    );
    for id in VariantId::ALL {
        let def = VariantDefinition::define(id, &registry);
        let s = &def.structure;
        println!(
            "{:<10} {:<10} {:<9} {:<11} {:<8} {:<9}",
            id.as_str(),
            def.name,
            s.nav_layout.as_str(),
            s.hero_style.as_str(),
            s.cta_style.as_str(),
            s.footer_layout.as_str()
        );
    }
    Ok(())
}

async fn cmd_variant_show(id: &str, location: Option<&str>, language: &str) -> Result<()> {
    let config = load_config()?;
    let resolver = VariantResolver::from_config(&config.variants);
    let registry = OverrideRegistry::builtin();
    let preview = preview_directive(location, &config.variants.preview_param);

    let def = resolver.resolve_definition(Some(id), preview.as_deref(), &registry);
    if def.id.as_str() != id.trim().to_lowercase() {
        info!(requested = id, resolved = %def.id, "variant resolved to a different id");
    }

    let composer = Composer::standard();
    let unrendered: Vec<_> = composer
        .unrendered(&def)
        .into_iter()
        .map(|(axis, kind)| serde_json::json!({ "axis": axis, "kind": kind }))
        .collect();
    let output = serde_json::json!({
        "definition": def,
        "sections": composer.compose(&def, language),
        "unrendered": unrendered,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn cmd_variant_overrides(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| StorefrontError::io(file, e))?;
    let registry = OverrideRegistry::from_json(&content)?;
    info!(file = %file.display(), variants = registry.len(), "override registry loaded");

    let definitions: Vec<_> = VariantId::ALL
        .into_iter()
        .filter(|id| registry.get(*id).is_some())
        .map(|id| VariantDefinition::define(id, &registry))
        .collect();
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}

/// Preview directive carried by `location`, a full page URL or a bare query string.
fn preview_directive(location: Option<&str>, param: &str) -> Option<String> {
    let location = location?;
    match Url::parse(location) {
        Ok(url) => preview_from_url(&url, param),
        Err(_) => preview_from_query(location, param),
    }
}

async fn cmd_site_config_fetch(location: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let preview = preview_directive(location, &config.variants.preview_param);
    let preview = preview.as_deref();
    let resolver = VariantResolver::from_config(&config.variants);
    let cache = SnapshotCache::new(config.cache_dir()?);
    let source = SiteConfigSource::from_config(&config)?;

    let store = SiteConfigStore::load(Some(cache), resolver);
    let initial = store.active_variant(preview);
    info!(origin = ?store.origin(), variant = %initial, "site config loaded");

    let spinner = spinner(format!("Fetching {}", source.url()));
    let outcome = store.refresh(&source).await;
    spinner.finish_and_clear();

    let active = store.active_variant(preview);
    let mut switcher = StylesheetSwitcher::new(MemoryDocument::new(), config.stylesheets.clone());
    let stylesheet = switcher.acquire(active);

    let site = store.current();
    println!();
    match &outcome {
        RefreshOutcome::Updated => println!("  Site config refreshed from {}", source.url()),
        RefreshOutcome::Fallback { error } => {
            println!("  Refresh failed ({error}); using {}", describe_origin(store.origin()))
        }
    }
    println!("  Brand:      {}", site.branding.site_name);
    println!("  Variant:    {active}");
    if active != initial {
        println!("  (was {initial} before refresh)");
    }
    let href = stylesheet
        .host()
        .links()
        .first()
        .map_or("-", |link| link.href.as_str());
    println!("  Stylesheet: {href}");
    println!();

    Ok(())
}

fn describe_origin(origin: ConfigOrigin) -> &'static str {
    match origin {
        ConfigOrigin::Default => "built-in defaults",
        ConfigOrigin::Snapshot => "cached snapshot",
        ConfigOrigin::Remote => "remote config",
    }
}

async fn cmd_site_config_clear_cache() -> Result<()> {
    let config = load_config()?;
    let cache = SnapshotCache::new(config.cache_dir()?);
    cache.clear()?;
    println!("Site config cache cleared: {}", cache.path().display());
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress
// ---------------------------------------------------------------------------

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(message);
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variant_show_with_url() {
        let cli = Cli::try_parse_from([
            "storefront",
            "variant",
            "show",
            "neon",
            "--url",
            "https://broker.example/?variant=nova",
        ])
        .unwrap();
        match cli.command {
            Command::Variant {
                action: VariantAction::Show { id, url, language },
            } => {
                assert_eq!(id, "neon");
                assert_eq!(url.as_deref(), Some("https://broker.example/?variant=nova"));
                assert_eq!(language, "en");
            }
            _ => panic!("expected variant show"),
        }
        assert!(
            Cli::try_parse_from(["storefront", "variant", "show", "neon", "--preview", "nova"])
                .is_err()
        );
    }

    #[test]
    fn preview_directive_reads_the_configured_param() {
        let url = Some("https://broker.example/markets?lang=en&variant=dark-pro");
        assert_eq!(preview_directive(url, "variant"), Some("dark-pro".into()));
        assert_eq!(preview_directive(url, "skin"), None);
        assert_eq!(
            preview_directive(Some("?skin=aurora"), "skin"),
            Some("aurora".into())
        );
        assert_eq!(preview_directive(Some("https://broker.example/"), "variant"), None);
        assert_eq!(preview_directive(None, "variant"), None);
    }

    #[test]
    fn parses_overrides_and_clear_cache() {
        let cli = Cli::try_parse_from(["storefront", "variant", "overrides", "skins.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Variant { action: VariantAction::Overrides { file } } if file == Path::new("skins.json")
        ));
        let cli = Cli::try_parse_from(["storefront", "site-config", "clear-cache"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::SiteConfig { action: SiteConfigAction::ClearCache }
        ));
    }

    #[test]
    fn patch_takes_no_flags() {
        assert!(Cli::try_parse_from(["storefront", "patch"]).is_ok());
        assert!(Cli::try_parse_from(["storefront", "patch", "--mode", "insert"]).is_err());
    }

    #[test]
    fn site_config_uses_kebab_case() {
        let cli = Cli::try_parse_from(["storefront", "-vv", "site-config", "fetch"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::SiteConfig {
                action: SiteConfigAction::Fetch { url: None }
            }
        ));
    }
}
