//! Filling missing translation keys.
//!
//! Every key the audit reports as missing gets a value: a machine
//! translation of the reference text when one is available and keeps the
//! same placeholders, otherwise a recognisable placeholder.

use cantera_core::Locale;
use cantera_core::i18n::format::placeholders;
use cantera_core::i18n::{AuditOptions, Dictionaries, audit, placeholder_translation};
use serde::Serialize;

use super::translate::Translate;

/// A value written into a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledEntry {
    pub locale: Locale,
    pub key: String,
    /// Locale the source text was taken from.
    pub source_locale: Locale,
    pub value: String,
}

/// What [`fill_missing`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillOutcome {
    /// Values produced by the translation API.
    pub translated: Vec<FilledEntry>,
    /// Placeholder values written because translation was unavailable.
    pub placeholders: Vec<FilledEntry>,
}

impl FillOutcome {
    /// Number of values written.
    #[must_use]
    pub fn total(&self) -> usize {
        self.translated.len() + self.placeholders.len()
    }

    /// Whether nothing was missing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

struct Gap {
    locale: Locale,
    key: String,
    source_locale: Locale,
    source_text: String,
}

/// Fill every missing key in `dictionaries`.
///
/// Source text comes from the reference locale (the primary locale when
/// present) or, failing that, the first locale that has the key. Without a
/// translator every gap gets a placeholder.
pub async fn fill_missing<T: Translate>(
    dictionaries: &mut Dictionaries,
    translator: Option<&T>,
    reference: Option<Locale>,
) -> FillOutcome {
    let gaps = find_gaps(dictionaries, reference);
    let mut outcome = FillOutcome::default();

    for gap in gaps {
        let translated = match translator {
            Some(translator) => translate_gap(translator, &gap).await,
            None => None,
        };

        let (value, bucket) = match translated {
            Some(value) => (value, &mut outcome.translated),
            None => (
                placeholder_translation(gap.locale, &gap.source_text),
                &mut outcome.placeholders,
            ),
        };

        if let Some(dictionary) = dictionaries.get_mut(&gap.locale) {
            dictionary.insert(gap.key.clone(), value.clone());
        }
        bucket.push(FilledEntry {
            locale: gap.locale,
            key: gap.key,
            source_locale: gap.source_locale,
            value,
        });
    }

    tracing::info!(
        translated = outcome.translated.len(),
        placeholders = outcome.placeholders.len(),
        "Filled missing translations"
    );
    outcome
}

fn find_gaps(dictionaries: &Dictionaries, reference: Option<Locale>) -> Vec<Gap> {
    let report = audit(
        dictionaries,
        &AuditOptions {
            reference,
            ..AuditOptions::default()
        },
    );

    let mut gaps = Vec::new();
    for locale_report in &report.locales {
        for key in &locale_report.missing {
            let source = report
                .reference
                .into_iter()
                .chain(dictionaries.keys().copied())
                .filter(|locale| *locale != locale_report.locale)
                .find_map(|locale| {
                    dictionaries
                        .get(&locale)
                        .and_then(|dictionary| dictionary.get(key))
                        .map(|text| (locale, text.to_string()))
                });

            if let Some((source_locale, source_text)) = source {
                gaps.push(Gap {
                    locale: locale_report.locale,
                    key: key.clone(),
                    source_locale,
                    source_text,
                });
            }
        }
    }
    gaps
}

async fn translate_gap<T: Translate>(translator: &T, gap: &Gap) -> Option<String> {
    match translator
        .translate(&gap.source_text, gap.source_locale, gap.locale)
        .await
    {
        Ok(value) if placeholders(&value) == placeholders(&gap.source_text) => Some(value),
        Ok(value) => {
            tracing::warn!(
                locale = %gap.locale,
                key = %gap.key,
                value = %value,
                "Translation changed placeholders, using placeholder text"
            );
            None
        }
        Err(e) => {
            tracing::warn!(
                locale = %gap.locale,
                key = %gap.key,
                error = %e,
                "Translation failed, using placeholder text"
            );
            None
        }
    }
}
