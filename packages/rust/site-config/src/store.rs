//! Two-phase site configuration lifecycle.
//!
//! Phase 1 ([`SiteConfigStore::load`]) is synchronous: the last snapshot if
//! one is readable, otherwise the compiled-in default. Phase 2
//! ([`SiteConfigStore::refresh`]) fetches from the backing store and replaces
//! the current config on success. On a transport failure, non-200 status, or
//! malformed body the store falls back to the compiled-in default; the error
//! is logged and never reaches the caller. The snapshot slot is left as is, so
//! the next start still paints from the last good config.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use storefront_shared::{AppConfig, Result, StorefrontError};
use storefront_variants::{VariantId, VariantResolver};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::cache::SnapshotCache;
use crate::model::SiteConfig;

/// User-Agent string for configuration requests.
const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// HTTP source of the site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfigSource {
    url: String,
    client: Client,
}

impl SiteConfigSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| StorefrontError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Source for the endpoint in `[site]`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.site_config_url(),
            Duration::from_secs(config.site.request_timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `GET` the configuration. Any non-200 status is an error.
    pub async fn fetch(&self) -> Result<SiteConfig> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| StorefrontError::Network(format!("{}: {e}", self.url)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(StorefrontError::Network(format!(
                "{}: HTTP {status}",
                self.url
            )));
        }

        response
            .json::<SiteConfig>()
            .await
            .map_err(|e| StorefrontError::parse(format!("{}: invalid site config: {e}", self.url)))
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Where the current config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Default,
    Snapshot,
    Remote,
}

/// Result of a refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The remote config replaced the current one.
    Updated,
    /// The fetch failed; the current config was kept.
    Fallback { error: String },
}

/// The constructed site configuration handed to the rest of the app.
pub struct SiteConfigStore {
    tx: watch::Sender<Arc<SiteConfig>>,
    origin: watch::Sender<ConfigOrigin>,
    cache: Option<SnapshotCache>,
    resolver: VariantResolver,
}

impl SiteConfigStore {
    /// Phase 1: synchronous load of the last-known snapshot or the default.
    pub fn load(cache: Option<SnapshotCache>, resolver: VariantResolver) -> Self {
        let (config, origin) = match cache.as_ref().and_then(SnapshotCache::read) {
            Some(snapshot) => {
                info!(saved_at = %snapshot.saved_at, "using cached site config");
                (snapshot.config, ConfigOrigin::Snapshot)
            }
            None => (SiteConfig::default(), ConfigOrigin::Default),
        };

        let (tx, _) = watch::channel(Arc::new(config));
        let (origin, _) = watch::channel(origin);
        Self {
            tx,
            origin,
            cache,
            resolver,
        }
    }

    /// Current configuration.
    pub fn current(&self) -> Arc<SiteConfig> {
        self.tx.borrow().clone()
    }

    pub fn origin(&self) -> ConfigOrigin {
        *self.origin.borrow()
    }

    /// Receiver notified whenever the configuration is replaced.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SiteConfig>> {
        self.tx.subscribe()
    }

    /// Phase 2: fetch and replace. Never returns an error.
    #[instrument(skip_all, fields(url = %source.url()))]
    pub async fn refresh(&self, source: &SiteConfigSource) -> RefreshOutcome {
        match source.fetch().await {
            Ok(config) => {
                self.replace(config);
                info!(variant = %self.active_variant(None), "site config refreshed");
                RefreshOutcome::Updated
            }
            Err(e) => {
                error!(
                    error = %e,
                    origin = ?self.origin(),
                    "site config fetch failed, falling back to default config"
                );
                self.fall_back();
                RefreshOutcome::Fallback {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Replace the current configuration and persist the snapshot.
    pub fn replace(&self, config: SiteConfig) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.write(&config) {
                warn!(error = %e, "failed to persist site config snapshot");
            }
        }
        self.tx.send_replace(Arc::new(config));
        self.origin.send_replace(ConfigOrigin::Remote);
    }

    /// Switch to the compiled-in default without touching the snapshot.
    fn fall_back(&self) {
        self.tx.send_replace(Arc::new(SiteConfig::default()));
        self.origin.send_replace(ConfigOrigin::Default);
    }

    /// Effective variant for a view, honoring an optional preview directive.
    pub fn active_variant(&self, preview: Option<&str>) -> VariantId {
        let config = self.current();
        self.resolver.resolve(config.persisted_variant(), preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "storefront-store-{name}-{}",
            std::process::id()
        ));
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    fn source_for(server: &MockServer) -> SiteConfigSource {
        SiteConfigSource::new(
            format!("{}/api/site-config", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn load_without_snapshot_uses_default() {
        let store = SiteConfigStore::load(None, VariantResolver::default());
        assert_eq!(store.origin(), ConfigOrigin::Default);
        assert_eq!(*store.current(), SiteConfig::default());
        assert_eq!(store.active_variant(None), VariantId::Classic);
    }

    #[test]
    fn load_prefers_snapshot() {
        let dir = temp_dir("snapshot");
        let cache = SnapshotCache::new(&dir);
        let mut config = SiteConfig::default();
        config.layout.active_variant = "summit".into();
        cache.write(&config).unwrap();

        let store = SiteConfigStore::load(Some(cache), VariantResolver::default());
        assert_eq!(store.origin(), ConfigOrigin::Snapshot);
        assert_eq!(store.active_variant(None), VariantId::Summit);
        assert_eq!(store.active_variant(Some("pulse")), VariantId::Pulse);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn refresh_replaces_and_persists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/site-config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "layout": { "activeVariant": "dark-pro" },
                "branding": { "siteName": "Acme Markets" }
            })))
            .mount(&server)
            .await;

        let dir = temp_dir("refresh");
        let store = SiteConfigStore::load(Some(SnapshotCache::new(&dir)), VariantResolver::default());
        let mut rx = store.subscribe();

        let outcome = store.refresh(&source_for(&server)).await;
        assert_eq!(outcome, RefreshOutcome::Updated);
        assert_eq!(store.origin(), ConfigOrigin::Remote);
        assert_eq!(store.active_variant(None), VariantId::DarkPro);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().branding.site_name, "Acme Markets");

        let snapshot = SnapshotCache::new(&dir).read().expect("snapshot written");
        assert_eq!(snapshot.config.layout.active_variant, "dark-pro");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn non_200_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/site-config"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = SiteConfigStore::load(None, VariantResolver::default());
        let outcome = store.refresh(&source_for(&server)).await;

        match outcome {
            RefreshOutcome::Fallback { error } => assert!(error.contains("503")),
            RefreshOutcome::Updated => panic!("expected fallback"),
        }
        assert_eq!(*store.current(), SiteConfig::default());
        assert_eq!(store.origin(), ConfigOrigin::Default);
    }

    #[tokio::test]
    async fn failed_refresh_discards_loaded_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/site-config"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = temp_dir("stale");
        let cache = SnapshotCache::new(&dir);
        let mut stale = SiteConfig::default();
        stale.layout.active_variant = "aurora".into();
        stale.branding.site_name = "Stale Brand".into();
        cache.write(&stale).unwrap();

        let store = SiteConfigStore::load(Some(cache), VariantResolver::default());
        assert_eq!(store.origin(), ConfigOrigin::Snapshot);
        let mut rx = store.subscribe();

        let outcome = store.refresh(&source_for(&server)).await;
        assert!(matches!(outcome, RefreshOutcome::Fallback { .. }));
        assert_eq!(*store.current(), SiteConfig::default());
        assert_eq!(store.origin(), ConfigOrigin::Default);
        assert_eq!(store.active_variant(None), VariantId::Classic);
        assert!(rx.has_changed().unwrap());

        // the slot still holds the last good config for the next start
        let snapshot = SnapshotCache::new(&dir).read().expect("snapshot kept");
        assert_eq!(snapshot.config.branding.site_name, "Stale Brand");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/site-config"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let store = SiteConfigStore::load(None, VariantResolver::default());
        let outcome = store.refresh(&source_for(&server)).await;
        assert!(matches!(outcome, RefreshOutcome::Fallback { .. }));
        assert_eq!(store.active_variant(None), VariantId::Classic);
    }

    #[tokio::test]
    async fn unknown_remote_variant_resolves_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/site-config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "layout": { "activeVariant": "retro-wave" }
            })))
            .mount(&server)
            .await;

        let store = SiteConfigStore::load(None, VariantResolver::new(VariantId::Minimal));
        store.refresh(&source_for(&server)).await;
        assert_eq!(store.active_variant(None), VariantId::Minimal);
    }
}
