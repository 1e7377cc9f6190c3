//! Message interpolation and the token extraction used by the auditor.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// `{name}` or `{{name}}` interpolation placeholders.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{?\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}?\}").expect("Invalid regex")
});

/// Opening or closing markup tags, e.g. `<strong>` or `</a>`.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("Invalid regex"));

/// Names of the placeholders in a message.
#[must_use]
pub fn placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Markup tag names in a message, with multiplicity, sorted.
///
/// Closing tags are prefixed with `/`.
#[must_use]
pub fn markup_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = TAG_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?.as_str();
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            Some(if whole.starts_with("</") {
                format!("/{name}")
            } else {
                name
            })
        })
        .collect();
    tags.sort();
    tags
}

/// Substitute `{name}` placeholders with the given values.
///
/// Placeholders without a matching parameter are left untouched so missing
/// data is visible instead of silently blank.
#[must_use]
pub fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let name = caps.get(1).map_or("", |m| m.as_str());
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map_or_else(|| whole.to_owned(), |(_, value)| value.clone())
        })
        .into_owned()
}
