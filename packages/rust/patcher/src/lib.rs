//! Source patcher for the front-end variant catalogue.
//!
//! Generates one object literal per page kind from the Builders and splices
//! them into each variant's `pages` object in a TypeScript/JavaScript source
//! file. Only the targeted blocks are touched; everything else in the file is
//! preserved byte for byte.

mod codegen;
mod scanner;
pub mod splice;

pub use splice::{
    PatchOptions, PatchReport, Patched, SkipReason, VariantPatch, patch_file, patch_source,
};
pub use storefront_shared::PatchMode;
