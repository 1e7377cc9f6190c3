//! Locale files round-tripping through the translations table.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cantera_admin::content::MemoryTables;
use cantera_admin::db::TranslationRepository;
use cantera_admin::services::{plan_push, pull, push};
use cantera_core::Locale;
use cantera_core::content::TranslationInput;
use cantera_integration_tests::write_locale;
use cantera_storefront::i18n::{load_dir, write_dictionary};

#[tokio::test]
async fn test_push_prune_and_pull_to_disk() {
    let tables = MemoryTables::new();
    let repo = TranslationRepository::new(&tables);

    // Rows already in the table, including one for a locale without a file
    repo.insert_many(&[
        TranslationInput {
            key: "nav.home".to_string(),
            value: "Homepage".to_string(),
            language: Locale::En,
        },
        TranslationInput {
            key: "nav.retired".to_string(),
            value: "Gone".to_string(),
            language: Locale::En,
        },
        TranslationInput {
            key: "nav.home".to_string(),
            value: "Accueil".to_string(),
            language: Locale::Fr,
        },
    ])
    .await
    .unwrap();

    let source = tempfile::tempdir().unwrap();
    write_locale(source.path(), "en", r#"{"nav": {"home": "Home", "cart": "Cart"}}"#).unwrap();
    write_locale(source.path(), "es", r#"{"nav": {"home": "Inicio", "cart": "Carrito"}}"#)
        .unwrap();
    let local = load_dir(source.path()).unwrap();

    let plan = plan_push(&local, &repo.list_all().await.unwrap(), true);
    assert_eq!(plan.inserts.len(), 3);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.deletes.len(), 1);
    assert_eq!(plan.deletes[0].key, "nav.retired");

    let summary = push(&repo, &plan).await.unwrap();
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(tables.row_count("translations"), 5);

    // Pull into a fresh directory and compare with the source files
    let pulled = pull(&repo).await.unwrap();
    let target = tempfile::tempdir().unwrap();
    for (locale, dictionary) in &pulled {
        write_dictionary(target.path(), *locale, dictionary).unwrap();
    }
    let reloaded = load_dir(target.path()).unwrap();

    assert_eq!(reloaded[&Locale::En], local[&Locale::En]);
    assert_eq!(reloaded[&Locale::Es], local[&Locale::Es]);
    // French rows were left alone
    assert_eq!(reloaded[&Locale::Fr].get("nav.home"), Some("Accueil"));

    // Nothing left to do
    let again = plan_push(&local, &repo.list_all().await.unwrap(), true);
    assert!(again.is_empty());
}
