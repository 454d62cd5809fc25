//! Local snapshot of the last successfully fetched [`SiteConfig`].
//!
//! A single named slot under the cache directory, read synchronously at
//! startup for instant paint. Each snapshot carries a SHA-256 of its config
//! so a truncated or hand-edited file is ignored rather than trusted.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use storefront_shared::{Result, StorefrontError};
use tracing::{debug, warn};

use crate::model::SiteConfig;

/// File name of the snapshot slot.
pub const SNAPSHOT_SLOT: &str = "storefront-site-config.json";

/// Stored snapshot envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub checksum: String,
    pub config: SiteConfig,
}

/// Handle on the snapshot slot.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
}

impl SnapshotCache {
    /// Slot inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SNAPSHOT_SLOT),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. Missing, unreadable, or corrupt slots yield `None`.
    pub fn read(&self) -> Option<Snapshot> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no site config snapshot");
                return None;
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "failed to read site config snapshot");
                return None;
            }
        };

        match self.decode(&content) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "ignoring site config snapshot");
                None
            }
        }
    }

    /// Persist `config` into the slot.
    pub fn write(&self, config: &SiteConfig) -> Result<Snapshot> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorefrontError::io(parent, e))?;
        }

        let snapshot = Snapshot {
            saved_at: Utc::now(),
            checksum: checksum(config)?,
            config: config.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StorefrontError::parse(format!("serialize snapshot: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| StorefrontError::io(&self.path, e))?;

        debug!(path = ?self.path, "site config snapshot written");
        Ok(snapshot)
    }

    /// Remove the slot. A missing slot is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorefrontError::io(&self.path, e)),
        }
    }

    fn decode(&self, content: &str) -> Result<Snapshot> {
        let snapshot: Snapshot = serde_json::from_str(content)
            .map_err(|e| StorefrontError::parse(format!("snapshot: {e}")))?;

        let expected = checksum(&snapshot.config)?;
        if snapshot.checksum != expected {
            return Err(StorefrontError::validation("snapshot checksum mismatch"));
        }
        Ok(snapshot)
    }
}

fn checksum(config: &SiteConfig) -> Result<String> {
    let bytes = serde_json::to_vec(config)
        .map_err(|e| StorefrontError::parse(format!("serialize site config: {e}")))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
