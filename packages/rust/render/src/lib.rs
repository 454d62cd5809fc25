//! Runtime presentation plumbing.
//!
//! This crate provides:
//! - [`dispatch`] — structural axis → component registries and page composition
//! - [`stylesheet`] — the single-owner variant stylesheet switcher

pub mod dispatch;
pub mod stylesheet;

pub use dispatch::{ComponentRegistry, Composer, RenderNode, Renderer, SectionProps, dispatch};
pub use stylesheet::{
    ActiveStylesheet, DocumentHost, MemoryDocument, StylesheetLink, StylesheetSwitcher,
    SwitcherState,
};
