//! Auditing and filling locale files on disk.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cantera_admin::services::{Translate, TranslateError, fill_missing};
use cantera_core::Locale;
use cantera_core::i18n::{AuditOptions, InconsistencyKind, TranslationKey, audit};
use cantera_integration_tests::write_locale;
use cantera_storefront::i18n::files::load_file;
use cantera_storefront::i18n::{Translator, load_dir, write_dictionary};

const EN: &str = r#"{
  "nav": { "home": "Home", "cart": "Cart" },
  "cart": { "notice": { "quantity_capped": "Only {max} of {name} can be ordered" } },
  "footer": { "legal": "<b>Legal</b> notice" }
}"#;

const ES: &str = r#"{
  "nav": { "home": "Inicio", "home": "Portada" },
  "cart": { "notice": { "quantity_capped": "Solo se pueden pedir {max}" } },
  "footer": { "legal": "<b>Aviso</b> legal" }
}"#;

// =============================================================================
// Audit
// =============================================================================

#[test]
fn test_audit_locale_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_locale(dir.path(), "en", EN).unwrap();
    write_locale(dir.path(), "es", ES).unwrap();
    write_locale(dir.path(), "README", "not a locale").unwrap();

    let dictionaries = load_dir(dir.path()).unwrap();
    assert_eq!(dictionaries.len(), 2);

    let report = audit(&dictionaries, &AuditOptions::default());
    assert_eq!(report.reference, Some(Locale::En));

    let spanish = report.locale(Locale::Es).unwrap();
    assert_eq!(spanish.missing, vec!["nav.cart".to_string()]);
    assert_eq!(spanish.duplicates, vec!["nav.home".to_string()]);
    assert_eq!(spanish.inconsistent.len(), 1);
    assert_eq!(spanish.inconsistent[0].key, "cart.notice.quantity_capped");
    assert!(matches!(
        spanish.inconsistent[0].kind,
        InconsistencyKind::PlaceholderMismatch { .. }
    ));

    assert!(report.locale(Locale::En).unwrap().missing.is_empty());
}

#[test]
fn test_audit_reports_undeclared_keys() {
    let dir = tempfile::tempdir().unwrap();
    write_locale(dir.path(), "en", r#"{"nav": {"home": "Home"}, "legacy": {"banner": "Sale"}}"#)
        .unwrap();

    let dictionaries = load_dir(dir.path()).unwrap();
    let report = audit(
        &dictionaries,
        &AuditOptions {
            declared_keys: Some(TranslationKey::declared()),
            ..AuditOptions::default()
        },
    );

    assert!(report.unknown_keys.contains(&"legacy.banner".to_string()));
    assert!(!report.is_clean());
}

// =============================================================================
// Fill
// =============================================================================

/// Prefixes the target code, keeping placeholders intact.
struct Tagging;

impl Translate for Tagging {
    async fn translate(
        &self,
        text: &str,
        _source: Locale,
        target: Locale,
    ) -> Result<String, TranslateError> {
        Ok(format!("{}:{text}", target.code()))
    }
}

#[tokio::test]
async fn test_fill_and_write_back() {
    let dir = tempfile::tempdir().unwrap();
    write_locale(dir.path(), "en", EN).unwrap();
    write_locale(dir.path(), "de", r#"{"nav": {"home": "Startseite"}}"#).unwrap();

    let mut dictionaries = load_dir(dir.path()).unwrap();
    let outcome = fill_missing(&mut dictionaries, Some(&Tagging), None).await;
    assert_eq!(outcome.translated.len(), 3);
    assert!(outcome.placeholders.is_empty());

    write_dictionary(dir.path(), Locale::De, &dictionaries[&Locale::De]).unwrap();
    let german = load_file(&dir.path().join("de.json")).unwrap();
    assert_eq!(german.get("nav.home"), Some("Startseite"));
    assert_eq!(german.get("nav.cart"), Some("de:Cart"));
    assert_eq!(
        german.get("cart.notice.quantity_capped"),
        Some("de:Only {max} of {name} can be ordered")
    );

    let reloaded = load_dir(dir.path()).unwrap();
    let report = audit(&reloaded, &AuditOptions::default());
    assert_eq!(report.missing_count(), 0);
    assert_eq!(report.inconsistent_count(), 0);
}

// =============================================================================
// Runtime lookups from bundled files
// =============================================================================

#[tokio::test]
async fn test_translator_falls_back_to_primary() {
    let dir = tempfile::tempdir().unwrap();
    write_locale(dir.path(), "en", EN).unwrap();
    write_locale(dir.path(), "es", ES).unwrap();

    let translator = Translator::offline(load_dir(dir.path()).unwrap());
    assert_eq!(translator.t(Locale::Es, TranslationKey::NavHome).await, "Portada");
    assert_eq!(translator.t(Locale::Es, TranslationKey::NavCart).await, "Cart");
    assert_eq!(translator.t(Locale::Fr, TranslationKey::NavCart).await, "Cart");
}
