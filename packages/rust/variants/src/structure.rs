//! Structural axes: the categorical layout choices each variant makes.
//!
//! Every axis is a closed enum, so a registry keyed by one axis can never be
//! asked for a key from another, and the variant catalogue below is checked
//! for exhaustiveness at compile time.

use serde::{Deserialize, Serialize};

use crate::id::VariantId;

/// Common surface of every structural axis enum.
pub trait StructuralAxis:
    Copy + Eq + std::hash::Hash + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    /// Axis name used in diagnostics (e.g. `navLayout`).
    const AXIS: &'static str;

    /// Every value of the axis.
    const ALL: &'static [Self];

    /// Stable string form as stored in configuration.
    fn as_str(&self) -> &'static str;

    /// Concrete presentational component rendering this value.
    fn component_name(&self) -> &'static str;

    /// Parse the stable string form.
    fn lookup(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == raw)
    }
}

macro_rules! structural_axis {
    (
        $(#[$meta:meta])*
        $name:ident, $axis:literal {
            $( $variant:ident => $id:literal, $component:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $id)] $variant, )+
        }

        impl StructuralAxis for $name {
            const AXIS: &'static str = $axis;
            const ALL: &'static [Self] = &[$( Self::$variant ),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $id, )+
                }
            }

            fn component_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $component, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

structural_axis! {
    /// Top navigation arrangement.
    NavLayout, "navLayout" {
        TopBar => "top-bar", "TopBarNav";
        Sidebar => "sidebar", "SidebarNav";
        Centered => "centered", "CenteredNav";
        Split => "split", "SplitNav";
        Mega => "mega", "MegaMenuNav";
    }
}

structural_axis! {
    /// Footer arrangement.
    FooterLayout, "footerLayout" {
        Columns => "columns", "ColumnsFooter";
        Minimal => "minimal", "MinimalFooter";
        Stacked => "stacked", "StackedFooter";
        Wide => "wide", "WideFooter";
    }
}

structural_axis! {
    /// Landing hero section style.
    HeroStyle, "heroStyle" {
        Split => "split", "SplitHero";
        Centered => "centered", "CenteredHero";
        Fullscreen => "fullscreen", "FullscreenHero";
        Video => "video", "VideoHero";
        Minimal => "minimal", "MinimalHero";
        Carousel => "carousel", "CarouselHero";
    }
}

structural_axis! {
    /// Call-to-action button style.
    CtaStyle, "ctaStyle" {
        Solid => "solid", "SolidCta";
        Outline => "outline", "OutlineCta";
        Gradient => "gradient", "GradientCta";
        Pill => "pill", "PillCta";
        Ghost => "ghost", "GhostCta";
    }
}

structural_axis! {
    /// Benefits section style.
    BenefitsStyle, "benefitsStyle" {
        Grid => "grid", "GridBenefits";
        Cards => "cards", "CardBenefits";
        List => "list", "ListBenefits";
        Icons => "icons", "IconBenefits";
    }
}

structural_axis! {
    /// Platform statistics strip style.
    StatsStyle, "statsStyle" {
        Counters => "counters", "CounterStats";
        Bar => "bar", "BarStats";
        Cards => "cards", "CardStats";
        Inline => "inline", "InlineStats";
    }
}

structural_axis! {
    /// Testimonials section style.
    TestimonialStyle, "testimonialStyle" {
        Carousel => "carousel", "CarouselTestimonials";
        Grid => "grid", "GridTestimonials";
        Quote => "quote", "QuoteTestimonials";
    }
}

/// One value per structural axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantStructure {
    pub nav_layout: NavLayout,
    pub footer_layout: FooterLayout,
    pub hero_style: HeroStyle,
    pub cta_style: CtaStyle,
    pub benefits_style: BenefitsStyle,
    pub stats_style: StatsStyle,
    pub testimonial_style: TestimonialStyle,
}

impl VariantStructure {
    const fn new(
        nav_layout: NavLayout,
        footer_layout: FooterLayout,
        hero_style: HeroStyle,
        cta_style: CtaStyle,
        benefits_style: BenefitsStyle,
        stats_style: StatsStyle,
        testimonial_style: TestimonialStyle,
    ) -> Self {
        Self {
            nav_layout,
            footer_layout,
            hero_style,
            cta_style,
            benefits_style,
            stats_style,
            testimonial_style,
        }
    }
}

/// Structural choices of a variant.
#[rustfmt::skip]
pub fn structure_for(id: VariantId) -> VariantStructure {
    use BenefitsStyle as B;
    use CtaStyle as C;
    use FooterLayout as F;
    use HeroStyle as H;
    use NavLayout as N;
    use StatsStyle as S;
    use TestimonialStyle as T;

    match id {
        VariantId::Classic => VariantStructure::new(N::TopBar, F::Columns, H::Split, C::Solid, B::Grid, S::Counters, T::Carousel),
        VariantId::Modern => VariantStructure::new(N::Centered, F::Wide, H::Fullscreen, C::Gradient, B::Cards, S::Cards, T::Grid),
        VariantId::Minimal => VariantStructure::new(N::TopBar, F::Minimal, H::Minimal, C::Ghost, B::List, S::Inline, T::Quote),
        VariantId::Bold => VariantStructure::new(N::Mega, F::Stacked, H::Video, C::Solid, B::Icons, S::Bar, T::Carousel),
        VariantId::Corporate => VariantStructure::new(N::Mega, F::Columns, H::Split, C::Outline, B::Grid, S::Counters, T::Grid),
        VariantId::Neon => VariantStructure::new(N::Split, F::Minimal, H::Fullscreen, C::Gradient, B::Icons, S::Bar, T::Carousel),
        VariantId::Aurora => VariantStructure::new(N::Centered, F::Wide, H::Carousel, C::Pill, B::Cards, S::Cards, T::Quote),
        VariantId::Horizon => VariantStructure::new(N::TopBar, F::Wide, H::Centered, C::Solid, B::List, S::Inline, T::Grid),
        VariantId::Summit => VariantStructure::new(N::Sidebar, F::Stacked, H::Split, C::Outline, B::Cards, S::Counters, T::Quote),
        VariantId::Pulse => VariantStructure::new(N::Split, F::Columns, H::Video, C::Pill, B::Icons, S::Bar, T::Carousel),
        VariantId::Zenith => VariantStructure::new(N::Centered, F::Minimal, H::Centered, C::Ghost, B::Grid, S::Inline, T::Grid),
        VariantId::Vertex => VariantStructure::new(N::Sidebar, F::Columns, H::Fullscreen, C::Solid, B::Cards, S::Cards, T::Carousel),
        VariantId::Nova => VariantStructure::new(N::TopBar, F::Stacked, H::Carousel, C::Gradient, B::Icons, S::Counters, T::Grid),
        VariantId::Meridian => VariantStructure::new(N::Mega, F::Wide, H::Minimal, C::Outline, B::List, S::Bar, T::Quote),
        VariantId::DarkPro => VariantStructure::new(N::Split, F::Columns, H::Split, C::Solid, B::Grid, S::Counters, T::Grid),
        VariantId::LightPro => VariantStructure::new(N::Split, F::Columns, H::Centered, C::Outline, B::Grid, S::Counters, T::Grid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_lookup_roundtrips() {
        for kind in NavLayout::ALL {
            assert_eq!(NavLayout::lookup(kind.as_str()), Some(*kind));
        }
        for kind in HeroStyle::ALL {
            assert_eq!(HeroStyle::lookup(kind.as_str()), Some(*kind));
        }
        assert_eq!(CtaStyle::lookup("neon-glow"), None);
    }

    #[test]
    fn component_names_are_distinct_per_axis() {
        let names: std::collections::HashSet<_> =
            HeroStyle::ALL.iter().map(|h| h.component_name()).collect();
        assert_eq!(names.len(), HeroStyle::ALL.len());
    }

    #[test]
    fn structure_serializes_with_axis_keys() {
        let json = serde_json::to_value(structure_for(VariantId::Neon)).unwrap();
        assert_eq!(json["navLayout"], "split");
        assert_eq!(json["heroStyle"], "fullscreen");
        assert_eq!(json["ctaStyle"], "gradient");
    }

    #[test]
    fn pro_variants_share_navigation() {
        assert_eq!(
            structure_for(VariantId::DarkPro).nav_layout,
            structure_for(VariantId::LightPro).nav_layout
        );
    }
}
