//! Active variant stylesheet management.
//!
//! [`StylesheetSwitcher`] is the sole owner of the variant stylesheet element.
//! It has two states, no resource or one active variant, and every
//! `activate` removes the current element before attaching the next so two
//! variant stylesheets are never attached at once. The document itself is
//! abstracted behind [`DocumentHost`].

use std::collections::BTreeMap;

use storefront_shared::{StylesheetConfig, VARIANT_PLACEHOLDER};
use storefront_variants::VariantId;
use tracing::debug;

// ---------------------------------------------------------------------------
// Document host
// ---------------------------------------------------------------------------

/// The document operations the switcher needs.
pub trait DocumentHost {
    /// Attach a stylesheet link tagged with `marker_attribute = variant`.
    fn append_stylesheet(&mut self, href: &str, marker_attribute: &str, variant: VariantId);

    /// Remove every link carrying `marker_attribute`. Returns how many were removed.
    fn remove_marked_stylesheets(&mut self, marker_attribute: &str) -> usize;

    /// Set (or with `None`, remove) an attribute on the document root.
    fn set_root_attribute(&mut self, name: &str, value: Option<&str>);
}

/// A stylesheet `<link>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetLink {
    pub href: String,
    pub attributes: BTreeMap<String, String>,
}

/// In-process document used by tests and headless preview tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    links: Vec<StylesheetLink>,
    root_attributes: BTreeMap<String, String>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a link not owned by the switcher (base styles, fonts).
    pub fn add_link(&mut self, link: StylesheetLink) {
        self.links.push(link);
    }

    pub fn links(&self) -> &[StylesheetLink] {
        &self.links
    }

    /// Links carrying `marker_attribute`.
    pub fn marked_links(&self, marker_attribute: &str) -> Vec<&StylesheetLink> {
        self.links
            .iter()
            .filter(|l| l.attributes.contains_key(marker_attribute))
            .collect()
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }
}

impl DocumentHost for MemoryDocument {
    fn append_stylesheet(&mut self, href: &str, marker_attribute: &str, variant: VariantId) {
        let mut attributes = BTreeMap::new();
        attributes.insert("rel".to_string(), "stylesheet".to_string());
        attributes.insert(marker_attribute.to_string(), variant.to_string());
        self.links.push(StylesheetLink {
            href: href.to_string(),
            attributes,
        });
    }

    fn remove_marked_stylesheets(&mut self, marker_attribute: &str) -> usize {
        let before = self.links.len();
        self.links
            .retain(|l| !l.attributes.contains_key(marker_attribute));
        before - self.links.len()
    }

    fn set_root_attribute(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.root_attributes.insert(name.to_string(), value.to_string());
            }
            None => {
                self.root_attributes.remove(name);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Switcher
// ---------------------------------------------------------------------------

/// Switcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitcherState {
    NoResource,
    Active(VariantId),
}

/// Owns the variant stylesheet attached to a [`DocumentHost`].
#[derive(Debug)]
pub struct StylesheetSwitcher<D: DocumentHost> {
    host: D,
    config: StylesheetConfig,
    state: SwitcherState,
}

impl<D: DocumentHost> StylesheetSwitcher<D> {
    pub fn new(host: D, config: StylesheetConfig) -> Self {
        Self {
            host,
            config,
            state: SwitcherState::NoResource,
        }
    }

    pub fn state(&self) -> SwitcherState {
        self.state
    }

    pub fn host(&self) -> &D {
        &self.host
    }

    /// Stylesheet path for `variant`.
    pub fn href_for(&self, variant: VariantId) -> String {
        self.config
            .path_template
            .replace(VARIANT_PLACEHOLDER, variant.as_str())
    }

    /// Swap to `variant`'s stylesheet. Last call wins.
    pub fn activate(&mut self, variant: VariantId) {
        let removed = self
            .host
            .remove_marked_stylesheets(&self.config.marker_attribute);
        let href = self.href_for(variant);
        self.host
            .append_stylesheet(&href, &self.config.marker_attribute, variant);
        self.host
            .set_root_attribute(&self.config.root_attribute, Some(variant.as_str()));

        debug!(%variant, href = %href, removed, previous = ?self.state, "variant stylesheet activated");
        self.state = SwitcherState::Active(variant);
    }

    /// Remove the variant stylesheet and the root marker. Safe to call in any state.
    pub fn teardown(&mut self) {
        let removed = self
            .host
            .remove_marked_stylesheets(&self.config.marker_attribute);
        self.host.set_root_attribute(&self.config.root_attribute, None);

        if removed > 0 || self.state != SwitcherState::NoResource {
            debug!(removed, previous = ?self.state, "variant stylesheet removed");
        }
        self.state = SwitcherState::NoResource;
    }

    /// Activate `variant` for the lifetime of the returned guard.
    pub fn acquire(&mut self, variant: VariantId) -> ActiveStylesheet<'_, D> {
        self.activate(variant);
        ActiveStylesheet { switcher: self }
    }

    pub fn into_host(self) -> D {
        self.host
    }
}

/// Scoped activation; dropping it tears the stylesheet down.
pub struct ActiveStylesheet<'a, D: DocumentHost> {
    switcher: &'a mut StylesheetSwitcher<D>,
}

impl<D: DocumentHost> ActiveStylesheet<'_, D> {
    /// Currently active variant.
    pub fn variant(&self) -> Option<VariantId> {
        match self.switcher.state {
            SwitcherState::Active(id) => Some(id),
            SwitcherState::NoResource => None,
        }
    }

    /// Switch variants without releasing the scope.
    pub fn switch_to(&mut self, variant: VariantId) {
        self.switcher.activate(variant);
    }

    pub fn host(&self) -> &D {
        &self.switcher.host
    }
}

impl<D: DocumentHost> Drop for ActiveStylesheet<'_, D> {
    fn drop(&mut self) {
        self.switcher.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switcher() -> StylesheetSwitcher<MemoryDocument> {
        StylesheetSwitcher::new(MemoryDocument::new(), StylesheetConfig::default())
    }

    #[test]
    fn starts_without_resource() {
        let s = switcher();
        assert_eq!(s.state(), SwitcherState::NoResource);
        assert!(s.host().links().is_empty());
    }

    #[test]
    fn second_activate_leaves_exactly_one_link() {
        let mut s = switcher();
        s.activate(VariantId::Modern);
        s.activate(VariantId::Neon);

        let marked = s.host().marked_links("data-variant-stylesheet");
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].href, "/themes/neon.css");
        assert_eq!(s.state(), SwitcherState::Active(VariantId::Neon));
        assert_eq!(s.host().root_attribute("data-variant"), Some("neon"));
    }

    #[test]
    fn teardown_removes_only_marked_links() {
        let mut doc = MemoryDocument::new();
        doc.add_link(StylesheetLink {
            href: "/base.css".into(),
            attributes: BTreeMap::from([("rel".to_string(), "stylesheet".to_string())]),
        });
        let mut s = StylesheetSwitcher::new(doc, StylesheetConfig::default());

        s.activate(VariantId::DarkPro);
        assert_eq!(s.host().links().len(), 2);

        s.teardown();
        assert_eq!(s.state(), SwitcherState::NoResource);
        assert_eq!(s.host().links().len(), 1);
        assert_eq!(s.host().links()[0].href, "/base.css");
        assert_eq!(s.host().root_attribute("data-variant"), None);

        // idempotent
        s.teardown();
        assert_eq!(s.host().links().len(), 1);
    }

    #[test]
    fn reactivating_same_variant_does_not_duplicate() {
        let mut s = switcher();
        s.activate(VariantId::Aurora);
        s.activate(VariantId::Aurora);
        assert_eq!(s.host().marked_links("data-variant-stylesheet").len(), 1);
    }

    #[test]
    fn guard_releases_on_drop() {
        let mut s = switcher();
        {
            let mut guard = s.acquire(VariantId::Pulse);
            assert_eq!(guard.variant(), Some(VariantId::Pulse));
            guard.switch_to(VariantId::Zenith);
            assert_eq!(guard.host().marked_links("data-variant-stylesheet")[0].href, "/themes/zenith.css");
        }
        assert_eq!(s.state(), SwitcherState::NoResource);
        assert!(s.host().marked_links("data-variant-stylesheet").is_empty());
    }

    #[test]
    fn custom_template_and_marker() {
        let config = StylesheetConfig {
            path_template: "https://cdn.example.com/skins/{variant}/main.css".into(),
            marker_attribute: "data-skin".into(),
            root_attribute: "data-theme".into(),
        };
        let mut s = StylesheetSwitcher::new(MemoryDocument::new(), config);
        s.activate(VariantId::LightPro);

        let doc = s.into_host();
        assert_eq!(
            doc.marked_links("data-skin")[0].href,
            "https://cdn.example.com/skins/light-pro/main.css"
        );
        assert_eq!(doc.root_attribute("data-theme"), Some("light-pro"));
    }
}
