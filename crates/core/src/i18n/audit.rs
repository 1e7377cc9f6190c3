//! Translation consistency audit.
//!
//! Compares the key sets of all locale dictionaries and reports:
//! - **missing** keys: present in the union of all locales (plus any declared
//!   keys) but absent from a locale
//! - **duplicate** keys: repeated within a single locale file
//! - **inconsistent** values: differences against the reference locale that
//!   look unintentional (placeholders or markup that do not match, blank text)
//! - **untranslated** values: identical to the reference (opt-in, reported
//!   separately and never counted as an inconsistency)
//! - **unknown** keys: present in files but not declared in code

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::Dictionary;
use super::format::{markup_tags, placeholders};
use crate::Locale;

/// Knobs for [`audit`].
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// Locale the others are compared against. Defaults to the primary
    /// locale when present, otherwise the first locale audited.
    pub reference: Option<Locale>,
    /// Report values identical to the reference.
    pub report_untranslated: bool,
    /// Keys declared in code. When set, declared keys count towards the
    /// expected key set and undeclared file keys are reported as unknown.
    pub declared_keys: Option<BTreeSet<String>>,
}

/// Why a value looks inconsistent with the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InconsistencyKind {
    /// Interpolation placeholders differ.
    PlaceholderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// Markup tags differ.
    MarkupMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// The value is blank but the reference is not.
    Blank,
}

/// One suspicious value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inconsistency {
    pub key: String,
    #[serde(flatten)]
    pub kind: InconsistencyKind,
    pub reference_value: String,
    pub value: String,
}

/// Findings for a single locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleReport {
    pub locale: Locale,
    pub key_count: usize,
    pub missing: Vec<String>,
    pub duplicates: Vec<String>,
    pub inconsistent: Vec<Inconsistency>,
    pub untranslated: Vec<String>,
}

impl LocaleReport {
    /// Missing, duplicate and inconsistent findings for this locale.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.missing.len() + self.duplicates.len() + self.inconsistent.len()
    }
}

/// Result of auditing a set of locale dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub reference: Option<Locale>,
    /// Size of the expected key set (union of all locales and declared keys).
    pub total_keys: usize,
    pub locales: Vec<LocaleReport>,
    /// Keys found in locale files but not declared in code.
    pub unknown_keys: Vec<String>,
}

impl AuditReport {
    #[must_use]
    pub fn locale(&self, locale: Locale) -> Option<&LocaleReport> {
        self.locales.iter().find(|report| report.locale == locale)
    }

    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.locales.iter().map(|r| r.missing.len()).sum()
    }

    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.locales.iter().map(|r| r.duplicates.len()).sum()
    }

    #[must_use]
    pub fn inconsistent_count(&self) -> usize {
        self.locales.iter().map(|r| r.inconsistent.len()).sum()
    }

    /// All findings except untranslated values, which are advisory.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.locales
            .iter()
            .map(LocaleReport::issue_count)
            .sum::<usize>()
            + self.unknown_keys.len()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}

/// Audit a set of locale dictionaries.
#[must_use]
pub fn audit(dictionaries: &BTreeMap<Locale, Dictionary>, options: &AuditOptions) -> AuditReport {
    let mut expected: BTreeSet<&str> = dictionaries
        .values()
        .flat_map(Dictionary::keys)
        .collect();

    let unknown_keys = options
        .declared_keys
        .as_ref()
        .map(|declared| {
            let unknown: Vec<String> = expected
                .iter()
                .filter(|key| !declared.contains(**key))
                .map(|key| (*key).to_owned())
                .collect();
            expected.extend(declared.iter().map(String::as_str));
            unknown
        })
        .unwrap_or_default();

    let reference = options
        .reference
        .filter(|locale| dictionaries.contains_key(locale))
        .or_else(|| {
            dictionaries
                .contains_key(&Locale::PRIMARY)
                .then_some(Locale::PRIMARY)
        })
        .or_else(|| dictionaries.keys().next().copied());
    let reference_dict = reference.and_then(|locale| dictionaries.get(&locale));

    let locales = dictionaries
        .iter()
        .map(|(locale, dict)| {
            let missing = expected
                .iter()
                .filter(|key| !dict.contains_key(key))
                .map(|key| (*key).to_owned())
                .collect();

            let (inconsistent, untranslated) = match reference_dict {
                Some(reference_dict) if Some(*locale) != reference => {
                    compare_values(reference_dict, dict, options.report_untranslated)
                }
                _ => (Vec::new(), Vec::new()),
            };

            LocaleReport {
                locale: *locale,
                key_count: dict.len(),
                missing,
                duplicates: dict.duplicates().iter().cloned().collect(),
                inconsistent,
                untranslated,
            }
        })
        .collect();

    AuditReport {
        reference,
        total_keys: expected.len(),
        locales,
        unknown_keys,
    }
}

fn compare_values(
    reference: &Dictionary,
    dict: &Dictionary,
    report_untranslated: bool,
) -> (Vec<Inconsistency>, Vec<String>) {
    let mut inconsistent = Vec::new();
    let mut untranslated = Vec::new();

    for (key, value) in dict.iter() {
        let Some(reference_value) = reference.get(key) else {
            continue;
        };

        if let Some(kind) = classify(reference_value, value) {
            inconsistent.push(Inconsistency {
                key: key.to_owned(),
                kind,
                reference_value: reference_value.to_owned(),
                value: value.to_owned(),
            });
        } else if report_untranslated
            && value == reference_value
            && value.chars().any(char::is_alphabetic)
        {
            untranslated.push(key.to_owned());
        }
    }

    (inconsistent, untranslated)
}

fn classify(reference_value: &str, value: &str) -> Option<InconsistencyKind> {
    if value.trim().is_empty() {
        return (!reference_value.trim().is_empty()).then_some(InconsistencyKind::Blank);
    }

    let expected = placeholders(reference_value);
    let found = placeholders(value);
    if expected != found {
        return Some(InconsistencyKind::PlaceholderMismatch {
            expected: expected.into_iter().collect(),
            found: found.into_iter().collect(),
        });
    }

    let expected = markup_tags(reference_value);
    let found = markup_tags(value);
    if expected != found {
        return Some(InconsistencyKind::MarkupMismatch { expected, found });
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn dict(entries: &[(&str, &str)]) -> Dictionary {
        entries.iter().copied().collect()
    }

    fn pair(en: Dictionary, es: Dictionary) -> BTreeMap<Locale, Dictionary> {
        BTreeMap::from([(Locale::En, en), (Locale::Es, es)])
    }

    #[test]
    fn test_disjoint_keys_all_missing() {
        let report = audit(
            &pair(
                dict(&[("nav.home", "Home"), ("nav.about", "About")]),
                dict(&[("cart.title", "Carrito")]),
            ),
            &AuditOptions::default(),
        );
        assert_eq!(report.total_keys, 3);
        assert_eq!(report.locale(Locale::En).unwrap().missing, vec!["cart.title"]);
        assert_eq!(
            report.locale(Locale::Es).unwrap().missing,
            vec!["nav.about", "nav.home"]
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn test_identical_dictionaries_are_clean() {
        let d = dict(&[("nav.home", "Home"), ("cart.notice.quantity_capped", "Max {max}")]);
        let report = audit(
            &pair(d.clone(), d),
            &AuditOptions {
                report_untranslated: true,
                ..AuditOptions::default()
            },
        );
        assert!(report.is_clean());
        assert_eq!(report.missing_count(), 0);
        assert_eq!(report.duplicate_count(), 0);
        assert_eq!(report.inconsistent_count(), 0);
        // Identical text is advisory only.
        assert_eq!(report.locale(Locale::Es).unwrap().untranslated.len(), 2);
    }

    #[test]
    fn test_duplicates_reported() {
        let en = Dictionary::parse_json(r#"{"nav": {"home": "Home", "home": "Start"}}"#).unwrap();
        let es = dict(&[("nav.home", "Inicio")]);
        let report = audit(&pair(en, es), &AuditOptions::default());
        assert_eq!(report.locale(Locale::En).unwrap().duplicates, vec!["nav.home"]);
        assert_eq!(report.issue_count(), 1);
    }

    #[test]
    fn test_placeholder_mismatch() {
        let report = audit(
            &pair(
                dict(&[("cart.notice.quantity_capped", "At most {max} of {name}")]),
                dict(&[("cart.notice.quantity_capped", "Como máximo {maximo} de {name}")]),
            ),
            &AuditOptions::default(),
        );
        let es = report.locale(Locale::Es).unwrap();
        assert_eq!(es.inconsistent.len(), 1);
        assert_eq!(
            es.inconsistent.first().unwrap().kind,
            InconsistencyKind::PlaceholderMismatch {
                expected: vec!["max".to_string(), "name".to_string()],
                found: vec!["maximo".to_string(), "name".to_string()],
            }
        );
    }

    #[test]
    fn test_markup_mismatch_and_blank() {
        let report = audit(
            &pair(
                dict(&[("a", "<strong>Free</strong> delivery"), ("b", "Contact")]),
                dict(&[("a", "Envío gratis"), ("b", "  ")]),
            ),
            &AuditOptions::default(),
        );
        let kinds: Vec<_> = report
            .locale(Locale::Es)
            .unwrap()
            .inconsistent
            .iter()
            .map(|i| i.kind.clone())
            .collect();
        assert!(matches!(
            kinds.first(),
            Some(InconsistencyKind::MarkupMismatch { .. })
        ));
        assert_eq!(kinds.get(1), Some(&InconsistencyKind::Blank));
    }

    #[test]
    fn test_untranslated_only_when_enabled() {
        let dicts = pair(
            dict(&[("a", "Submit"), ("n", "42")]),
            dict(&[("a", "Submit"), ("n", "42")]),
        );
        let report = audit(&dicts, &AuditOptions::default());
        assert!(report.locale(Locale::Es).unwrap().untranslated.is_empty());

        let report = audit(
            &dicts,
            &AuditOptions {
                report_untranslated: true,
                ..AuditOptions::default()
            },
        );
        assert_eq!(report.locale(Locale::Es).unwrap().untranslated, vec!["a"]);
    }

    #[test]
    fn test_declared_keys() {
        let declared: BTreeSet<String> = ["nav.home", "nav.cart"].map(String::from).into();
        let d = dict(&[("nav.home", "Home"), ("legacy.banner", "Sale")]);
        let report = audit(
            &pair(d.clone(), d),
            &AuditOptions {
                declared_keys: Some(declared),
                ..AuditOptions::default()
            },
        );
        assert_eq!(report.unknown_keys, vec!["legacy.banner"]);
        assert_eq!(report.locale(Locale::En).unwrap().missing, vec!["nav.cart"]);
        assert_eq!(report.total_keys, 3);
    }

    #[test]
    fn test_reference_falls_back_to_first_locale() {
        let dicts = BTreeMap::from([
            (Locale::Fr, dict(&[("a", "{n} articles")])),
            (Locale::De, dict(&[("a", "{n} Artikel")])),
        ]);
        let report = audit(&dicts, &AuditOptions::default());
        assert_eq!(report.reference, Some(Locale::Fr));
        assert!(report.is_clean());
    }

    #[test]
    fn test_empty_input() {
        let report = audit(&BTreeMap::new(), &AuditOptions::default());
        assert!(report.is_clean());
        assert_eq!(report.reference, None);
    }

    fn arb_keys() -> impl Strategy<Value = BTreeSet<String>> {
        proptest::collection::btree_set("[a-z]{1,6}(\\.[a-z]{1,6}){0,2}", 0..20)
    }

    proptest! {
        #[test]
        fn prop_disjoint_dictionaries_report_every_key(
            left in arb_keys(),
            right in arb_keys(),
        ) {
            let right: BTreeSet<String> = right.difference(&left).cloned().collect();
            let en: Dictionary = left.iter().map(|k| (k.clone(), format!("en {k}"))).collect();
            let es: Dictionary = right.iter().map(|k| (k.clone(), format!("es {k}"))).collect();

            let report = audit(&pair(en, es), &AuditOptions::default());

            let en_missing: BTreeSet<String> =
                report.locale(Locale::En).unwrap().missing.iter().cloned().collect();
            let es_missing: BTreeSet<String> =
                report.locale(Locale::Es).unwrap().missing.iter().cloned().collect();
            prop_assert_eq!(en_missing, right);
            prop_assert_eq!(es_missing, left);
        }

        #[test]
        fn prop_identical_dictionaries_are_clean(keys in arb_keys()) {
            let d: Dictionary = keys
                .iter()
                .map(|k| (k.clone(), format!("Text for {{{k}}}")))
                .collect();
            let report = audit(&pair(d.clone(), d), &AuditOptions::default());
            prop_assert!(report.is_clean());
        }
    }
}
