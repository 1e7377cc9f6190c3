//! Locale dictionaries and translation auditing.
//!
//! - [`keys`] - the compile-time [`TranslationKey`] enumeration
//! - [`dictionary`] - flattened per-locale dictionaries parsed from JSON
//! - [`audit`] - key coverage and consistency checks across locales
//! - [`format`] - placeholder interpolation

pub mod audit;
pub mod dictionary;
pub mod format;
pub mod keys;

use std::collections::BTreeMap;

pub use audit::{AuditOptions, AuditReport, Inconsistency, InconsistencyKind, LocaleReport, audit};
pub use dictionary::{Dictionary, DictionaryError, TypedDictionary};
pub use format::interpolate;
pub use keys::{TranslationKey, UnknownKey};

use crate::Locale;

/// One dictionary per locale.
pub type Dictionaries = BTreeMap<Locale, Dictionary>;

/// Placeholder text used when a translation could not be produced.
///
/// Kept recognisable so the untranslated-value audit and human reviewers can
/// find it again.
#[must_use]
pub fn placeholder_translation(locale: Locale, source: &str) -> String {
    format!("[{}] {source}", locale.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_translation() {
        assert_eq!(
            placeholder_translation(Locale::Fr, "Add to cart"),
            "[fr] Add to cart"
        );
    }
}
