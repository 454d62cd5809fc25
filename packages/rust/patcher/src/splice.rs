//! The patch run: locate each variant's `pages` object and splice generated
//! page blocks into it.
//!
//! Variants are processed in reverse order of their position in the source.
//! Every edit for a variant lies inside that variant's block, so offsets of
//! blocks earlier in the file stay valid while later ones are rewritten.

use std::path::Path;

use storefront_shared::{PatchMode, PatcherConfig, Result, StorefrontError};
use storefront_variants::{OverrideRegistry, PageBlock, VariantId, VariantPages};
use tracing::{info, instrument, warn};

use crate::codegen::{render_entry, render_object};
use crate::scanner::{
    Block, Token, TokenKind, find_object_key, lex, line_indent, object_keys, scan_block,
};

/// Key of the object holding a variant's page configs.
const PAGES_KEY: &str = "pages";

/// Written between the anchor (or a previous block) and each generated block.
const SEPARATOR: &str = ",\n";

// ---------------------------------------------------------------------------
// Options & report
// ---------------------------------------------------------------------------

/// How to patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
    /// Page key after which generated blocks are inserted.
    pub anchor: String,
    pub mode: PatchMode,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self::from(&PatcherConfig::default())
    }
}

impl From<&PatcherConfig> for PatchOptions {
    fn from(config: &PatcherConfig) -> Self {
        Self {
            anchor: config.anchor.clone(),
            mode: config.mode,
        }
    }
}

/// Why a variant was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// No `<id>: {` object, or it never closes.
    #[error("variant block not found")]
    BlockNotFound,
    /// The variant block has no `pages: {` object.
    #[error("no `pages` object in variant block")]
    PagesNotFound,
    /// The anchor key does not occur in the variant block.
    #[error("anchor `{0}` not found")]
    AnchorNotFound(String),
    /// The anchor occurs in the variant block, but never as a direct member
    /// of `pages`.
    #[error("anchor `{0}` is not a direct member of the `pages` object")]
    AnchorOutsidePages(String),
}

/// What happened to one patched variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantPatch {
    pub variant: VariantId,
    /// Blocks inserted after the anchor.
    pub inserted: usize,
    /// Existing blocks rewritten in place.
    pub replaced: usize,
    /// Repeated blocks dropped.
    pub duplicates_removed: usize,
}

/// Per-variant outcome of a run, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub patched: Vec<VariantPatch>,
    pub skipped: Vec<(VariantId, SkipReason)>,
}

impl PatchReport {
    /// Generated blocks written (inserted or replaced).
    pub fn blocks_written(&self) -> usize {
        self.patched.iter().map(|p| p.inserted + p.replaced).sum()
    }

    /// Whether every variant was patched.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn log_summary(&self) {
        for (variant, reason) in &self.skipped {
            warn!(%variant, %reason, "variant needs manual attention");
        }
        info!(
            patched = self.patched.len(),
            skipped = self.skipped.len(),
            blocks = self.blocks_written(),
            "patch run complete"
        );
    }
}

/// Patched source together with its report.
#[derive(Debug, Clone)]
pub struct Patched {
    pub content: String,
    pub report: PatchReport,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Patch the configuration source file at `path` in place.
///
/// Failing to read (or write) the file is the only error; variants that
/// cannot be located are reported as skipped.
#[instrument(skip_all, fields(path = %path.display(), mode = %options.mode))]
pub fn patch_file(
    path: &Path,
    registry: &OverrideRegistry,
    options: &PatchOptions,
) -> Result<PatchReport> {
    let src = std::fs::read_to_string(path).map_err(|e| StorefrontError::io(path, e))?;

    let Patched { content, report } = patch_source(&src, registry, options);

    if content == src {
        info!("target unchanged");
    } else {
        std::fs::write(path, &content).map_err(|e| StorefrontError::io(path, e))?;
        info!(bytes = content.len(), "target rewritten");
    }
    Ok(report)
}

/// Patch `src` for every variant in `registry`.
pub fn patch_source(src: &str, registry: &OverrideRegistry, options: &PatchOptions) -> Patched {
    let tokens = lex(src, 0);
    let mut report = PatchReport::default();

    let mut located: Vec<(VariantId, usize)> = Vec::new();
    for variant in registry.variant_ids() {
        match locate_variant(src, &tokens, variant) {
            Some(open) => located.push((variant, open)),
            None => {
                warn!(%variant, "variant block not found, skipping");
                report.skipped.push((variant, SkipReason::BlockNotFound));
            }
        }
    }

    // last in the source first
    located.sort_by(|a, b| b.1.cmp(&a.1));

    let mut content = src.to_string();
    let mut patched = Vec::new();
    for (variant, open) in located {
        let blocks = VariantPages::build(registry.get(variant)).blocks();
        match patch_variant(&content, open, &blocks, options) {
            Ok((next, counts)) => {
                info!(
                    %variant,
                    inserted = counts.inserted,
                    replaced = counts.replaced,
                    duplicates_removed = counts.duplicates_removed,
                    "variant patched"
                );
                content = next;
                patched.push(VariantPatch { variant, ..counts });
            }
            Err(reason) => {
                warn!(%variant, %reason, "skipping variant");
                report.skipped.push((variant, reason));
            }
        }
    }

    patched.reverse();
    report.patched = patched;
    report.log_summary();

    Patched { content, report }
}

// ---------------------------------------------------------------------------
// Per-variant patch
// ---------------------------------------------------------------------------

/// Offset of the `{` opening the block of `variant`.
///
/// Ids such as `minimal` or `bold` also occur as ordinary nested keys, so the
/// first occurrence holding a direct `pages` object wins; failing that, the
/// first occurrence at all (reported later as [`SkipReason::PagesNotFound`]).
fn locate_variant(src: &str, tokens: &[Token], variant: VariantId) -> Option<usize> {
    let mut first = None;
    for (_, open) in object_keys(src, tokens, variant.as_str(), None) {
        first.get_or_insert(open);
        let has_pages = scan_block(src, open).is_some_and(|block| {
            find_object_key(src, &block.tokens, PAGES_KEY, Some(1)).is_some()
        });
        if has_pages {
            return Some(open);
        }
    }
    first
}

/// A `key: value` member of an object literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub key: String,
    pub key_start: usize,
    pub value_start: usize,
    pub value_end: usize,
}

/// Direct members of `block`, in source order.
pub(crate) fn object_entries(src: &str, block: &Block) -> Vec<Entry> {
    let tokens = &block.tokens;
    let last = tokens.len().saturating_sub(1);
    let mut entries = Vec::new();

    let mut i = 1;
    while i < last {
        let token = tokens[i];
        let key = token.key_text(src).filter(|_| {
            token.depth == 1 && i + 2 < last && tokens[i + 1].kind == TokenKind::Colon
        });
        let Some(key) = key else {
            i += 1;
            continue;
        };

        let value_start = tokens[i + 2].start;
        let mut value_end = tokens[i + 2].end;
        let mut j = i + 2;
        while j < last && !(tokens[j].kind == TokenKind::Comma && tokens[j].depth == 1) {
            value_end = tokens[j].end;
            j += 1;
        }

        entries.push(Entry {
            key: key.to_string(),
            key_start: token.start,
            value_start,
            value_end,
        });
        i = j + 1;
    }
    entries
}

/// A text replacement; insertions have `start == end`.
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

fn apply_edits(src: &str, mut edits: Vec<Edit>) -> String {
    // back to front; at equal starts the wider edit goes first so an
    // insertion never lands inside a range about to be replaced
    edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut out = src.to_string();
    for edit in edits {
        out.replace_range(edit.start..edit.end, &edit.text);
    }
    out
}

fn patch_variant(
    src: &str,
    open: usize,
    blocks: &[PageBlock],
    options: &PatchOptions,
) -> std::result::Result<(String, VariantPatch), SkipReason> {
    let variant = scan_block(src, open).ok_or(SkipReason::BlockNotFound)?;

    let (_, pages_open) = find_object_key(src, &variant.tokens, PAGES_KEY, Some(1))
        .ok_or(SkipReason::PagesNotFound)?;
    let pages = scan_block(src, pages_open).ok_or(SkipReason::PagesNotFound)?;

    let anchor_missing = || SkipReason::AnchorNotFound(options.anchor.clone());
    let (anchor_idx, anchor_open) =
        match find_object_key(src, &pages.tokens, &options.anchor, Some(1)) {
            Some(found) => found,
            None if find_object_key(src, &variant.tokens, &options.anchor, None).is_some() => {
                return Err(SkipReason::AnchorOutsidePages(options.anchor.clone()));
            }
            None => return Err(anchor_missing()),
        };
    let anchor_key = pages.tokens[anchor_idx].start;
    let anchor = scan_block(src, anchor_open).ok_or_else(anchor_missing)?;

    let mut counts = VariantPatch::default();
    let mut edits = Vec::new();

    let to_insert: Vec<&PageBlock> = match options.mode {
        PatchMode::Insert => blocks.iter().collect(),
        PatchMode::Replace => {
            let entries = object_entries(src, &pages);
            let mut missing = Vec::new();
            for block in blocks {
                let key = block.kind.key();
                let mut matches = entries.iter().enumerate().filter(|(_, e)| e.key == key);
                let Some((_, first)) = matches.next() else {
                    missing.push(block);
                    continue;
                };

                edits.push(Edit {
                    start: first.value_start,
                    end: first.value_end,
                    text: render_object(&block.fields, line_indent(src, first.key_start)),
                });
                counts.replaced += 1;

                // drop repeats together with the separator before them
                for (idx, repeat) in matches {
                    edits.push(Edit {
                        start: entries[idx - 1].value_end,
                        end: repeat.value_end,
                        text: String::new(),
                    });
                    counts.duplicates_removed += 1;
                }
            }
            missing
        }
    };

    if !to_insert.is_empty() {
        let indent = line_indent(src, anchor_key);
        let generated: Vec<String> = to_insert
            .iter()
            .map(|block| render_entry(block, indent))
            .collect();
        edits.push(Edit {
            start: anchor.end(),
            end: anchor.end(),
            text: format!("{SEPARATOR}{}", generated.join(SEPARATOR)),
        });
        counts.inserted = to_insert.len();
    }

    Ok((apply_edits(src, edits), counts))
}
