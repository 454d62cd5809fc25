//! Structural axis → component dispatch.
//!
//! A [`ComponentRegistry`] is keyed by exactly one axis enum, so a hero-style
//! key can never be looked up in a navigation registry. Registries built with
//! [`ComponentRegistry::complete`] cover every value of their axis and cannot
//! miss; hand-assembled registries (plugins, partial skins) may, in which case
//! dispatch falls back or returns `None` with a diagnostic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use storefront_variants::{
    BenefitsStyle, CtaStyle, FooterLayout, HeroStyle, NavLayout, StatsStyle, StructuralAxis,
    TestimonialStyle, VariantDefinition, VariantId,
};
use tracing::{debug, warn};

/// A render implementation for one axis value.
pub type Renderer<P, R> = Box<dyn Fn(&P) -> R + Send + Sync>;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Render implementations for the values of one structural axis.
pub struct ComponentRegistry<K: StructuralAxis, P, R> {
    entries: HashMap<K, Renderer<P, R>>,
    misses: AtomicUsize,
}

impl<K: StructuralAxis, P, R> ComponentRegistry<K, P, R> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            misses: AtomicUsize::new(0),
        }
    }

    /// A registry with an entry for every value of `K`.
    pub fn complete<F>(render: F) -> Self
    where
        F: Fn(K, &P) -> R + Clone + Send + Sync + 'static,
    {
        K::ALL.iter().fold(Self::new(), |registry, &kind| {
            let render = render.clone();
            registry.register(kind, move |props| render(kind, props))
        })
    }

    /// Add (or replace) the implementation for `kind`.
    pub fn register<F>(mut self, kind: K, render: F) -> Self
    where
        F: Fn(&P) -> R + Send + Sync + 'static,
    {
        self.entries.insert(kind, Box::new(render));
        self
    }

    pub fn contains(&self, kind: K) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Axis values without an implementation, in axis order.
    pub fn missing(&self) -> Vec<K> {
        K::ALL
            .iter()
            .copied()
            .filter(|kind| !self.contains(*kind))
            .collect()
    }

    /// Number of dispatches that found neither an entry nor a fallback.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Render `kind`, or `None` (with one diagnostic) if it is not registered.
    pub fn dispatch(&self, kind: K, props: &P) -> Option<R> {
        dispatch(kind, self, props, None)
    }

    /// Render `kind`, using `fallback` when it is not registered.
    pub fn dispatch_or(&self, kind: K, props: &P, fallback: &dyn Fn(&P) -> R) -> R {
        match self.entries.get(&kind) {
            Some(render) => render(props),
            None => {
                debug!(axis = K::AXIS, kind = kind.as_str(), "using fallback component");
                fallback(props)
            }
        }
    }
}

impl<K: StructuralAxis, P, R> Default for ComponentRegistry<K, P, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Look `kind` up in `registry` and render it.
///
/// Absent keys use `fallback` when given; otherwise the result is `None` and
/// a `warn!` diagnostic is emitted (and counted on the registry).
pub fn dispatch<K: StructuralAxis, P, R>(
    kind: K,
    registry: &ComponentRegistry<K, P, R>,
    props: &P,
    fallback: Option<&dyn Fn(&P) -> R>,
) -> Option<R> {
    if let Some(render) = registry.entries.get(&kind) {
        return Some(render(props));
    }
    if let Some(fallback) = fallback {
        debug!(axis = K::AXIS, kind = kind.as_str(), "using fallback component");
        return Some(fallback(props));
    }

    registry.misses.fetch_add(1, Ordering::Relaxed);
    warn!(
        axis = K::AXIS,
        kind = kind.as_str(),
        "no component registered, section not rendered"
    );
    None
}

// ---------------------------------------------------------------------------
// Standard composition
// ---------------------------------------------------------------------------

/// Props handed to every section component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionProps {
    pub variant: VariantId,
    pub language: String,
}

/// A resolved section: which component renders which axis value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub axis: &'static str,
    pub kind: &'static str,
    pub component: &'static str,
    pub props: SectionProps,
}

impl RenderNode {
    fn of<K: StructuralAxis>(kind: K, props: &SectionProps) -> Self {
        Self {
            axis: K::AXIS,
            kind: kind.as_str(),
            component: kind.component_name(),
            props: props.clone(),
        }
    }
}

/// One registry per structural axis.
pub struct Composer {
    pub nav: ComponentRegistry<NavLayout, SectionProps, RenderNode>,
    pub hero: ComponentRegistry<HeroStyle, SectionProps, RenderNode>,
    pub benefits: ComponentRegistry<BenefitsStyle, SectionProps, RenderNode>,
    pub stats: ComponentRegistry<StatsStyle, SectionProps, RenderNode>,
    pub testimonials: ComponentRegistry<TestimonialStyle, SectionProps, RenderNode>,
    pub cta: ComponentRegistry<CtaStyle, SectionProps, RenderNode>,
    pub footer: ComponentRegistry<FooterLayout, SectionProps, RenderNode>,
}

impl Composer {
    /// Complete registries mapping every axis value to its standard component.
    pub fn standard() -> Self {
        Self {
            nav: ComponentRegistry::complete(RenderNode::of),
            hero: ComponentRegistry::complete(RenderNode::of),
            benefits: ComponentRegistry::complete(RenderNode::of),
            stats: ComponentRegistry::complete(RenderNode::of),
            testimonials: ComponentRegistry::complete(RenderNode::of),
            cta: ComponentRegistry::complete(RenderNode::of),
            footer: ComponentRegistry::complete(RenderNode::of),
        }
    }

    /// Page sections of `def` in document order. Unregistered axes are left out.
    pub fn compose(&self, def: &VariantDefinition, language: &str) -> Vec<RenderNode> {
        let props = SectionProps {
            variant: def.id,
            language: language.to_string(),
        };
        let s = &def.structure;

        [
            self.nav.dispatch(s.nav_layout, &props),
            self.hero.dispatch(s.hero_style, &props),
            self.benefits.dispatch(s.benefits_style, &props),
            self.stats.dispatch(s.stats_style, &props),
            self.testimonials.dispatch(s.testimonial_style, &props),
            self.cta.dispatch(s.cta_style, &props),
            self.footer.dispatch(s.footer_layout, &props),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// `(axis, kind)` pairs of `def` that [`Composer::compose`] would leave out.
    pub fn unrendered(&self, def: &VariantDefinition) -> Vec<(&'static str, &'static str)> {
        fn gap<K: StructuralAxis, P, R>(
            registry: &ComponentRegistry<K, P, R>,
            kind: K,
        ) -> Option<(&'static str, &'static str)> {
            (!registry.contains(kind)).then(|| (K::AXIS, kind.as_str()))
        }

        let s = &def.structure;
        [
            gap(&self.nav, s.nav_layout),
            gap(&self.hero, s.hero_style),
            gap(&self.benefits, s.benefits_style),
            gap(&self.stats, s.stats_style),
            gap(&self.testimonials, s.testimonial_style),
            gap(&self.cta, s.cta_style),
            gap(&self.footer, s.footer_layout),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::standard()
    }
}
