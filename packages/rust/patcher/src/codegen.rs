//! Deterministic rendering of page configs as object literal source.
//!
//! One field per line, string values single-quoted, arrays bracketed, two
//! spaces of indentation per level relative to the owning key.

use std::sync::LazyLock;

use regex::Regex;
use storefront_variants::{FieldValue, PageBlock};

/// One level of indentation.
pub(crate) const INDENT_UNIT: &str = "  ";

/// Keys that can be written without quotes.
static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("ident regex"));

/// `key: { ... }` for one page block, the key line indented by `indent`.
pub(crate) fn render_entry(block: &PageBlock, indent: &str) -> String {
    format!(
        "{indent}{}: {}",
        render_key(block.kind.key()),
        render_object(&block.fields, indent)
    )
}

/// `{ ... }` with fields one level deeper than `indent` and the closing brace at `indent`.
pub(crate) fn render_object(fields: &[(&'static str, FieldValue)], indent: &str) -> String {
    if fields.is_empty() {
        return "{}".to_string();
    }

    let inner = format!("{indent}{INDENT_UNIT}");
    let lines: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{inner}{}: {}", render_key(key), render_value(value)))
        .collect();

    format!("{{\n{}\n{indent}}}", lines.join(",\n"))
}

pub(crate) fn render_key(key: &str) -> String {
    if IDENT_RE.is_match(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

pub(crate) fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Str(s) => quote(s),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Int(n) => n.to_string(),
        FieldValue::Float(f) => render_float(*f),
        FieldValue::List(items) => {
            let items: Vec<String> = items.iter().map(|i| quote(i)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn render_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        String::from(if f > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        f.to_string()
    }
}

/// Single-quoted string literal.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_variants::PageKind;

    #[test]
    fn values_render_as_literals() {
        assert_eq!(render_value(&FieldValue::Str("grid".into())), "'grid'");
        assert_eq!(render_value(&FieldValue::Bool(false)), "false");
        assert_eq!(render_value(&FieldValue::Int(2010)), "2010");
        assert_eq!(render_value(&FieldValue::Float(0.1)), "0.1");
        assert_eq!(render_value(&FieldValue::Float(0.0)), "0");
        assert_eq!(
            render_value(&FieldValue::List(vec!["a".into(), "b".into()])),
            "['a', 'b']"
        );
        assert_eq!(render_value(&FieldValue::List(vec![])), "[]");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(quote("it's"), r"'it\'s'");
        assert_eq!(quote(r"a\b"), r"'a\\b'");
        assert_eq!(quote("line\nbreak"), r"'line\nbreak'");
        assert_eq!(quote("grid-{special}"), "'grid-{special}'");
    }

    #[test]
    fn keys_are_quoted_only_when_needed() {
        assert_eq!(render_key("customerInfo"), "customerInfo");
        assert_eq!(render_key("dark-pro"), "'dark-pro'");
    }

    #[test]
    fn entry_layout() {
        let block = PageBlock {
            kind: PageKind::Legal,
            fields: vec![
                ("layout", FieldValue::Str("sidebar".into())),
                ("showLastUpdated", FieldValue::Bool(true)),
            ],
        };
        let rendered = render_entry(&block, "    ");
        assert_eq!(
            rendered,
            "    legal: {\n      layout: 'sidebar',\n      showLastUpdated: true\n    }"
        );
    }
}
