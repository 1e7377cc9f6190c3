//! Locale files on disk: one `<code>.json` per locale.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cantera_core::Locale;
use cantera_core::i18n::{Dictionaries, Dictionary, DictionaryError};
use thiserror::Error;

/// Errors that can occur reading or writing locale files.
#[derive(Debug, Error)]
pub enum LocaleFileError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: DictionaryError,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{first} and {second} are both files for locale {locale}")]
    DuplicateLocale {
        locale: Locale,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Path of a locale's file inside `dir`.
#[must_use]
pub fn locale_path(dir: &Path, locale: Locale) -> PathBuf {
    dir.join(format!("{}.json", locale.code()))
}

/// Load every `<code>.json` in `dir`.
///
/// Files whose name is not a supported locale are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the directory or a locale file cannot be read or
/// parsed, or if two files name the same locale (`pt.json` and `pt-BR.json`).
pub fn load_dir(dir: &Path) -> Result<Dictionaries, LocaleFileError> {
    let io_err = |source| LocaleFileError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut dictionaries = Dictionaries::new();
    let mut sources: BTreeMap<Locale, PathBuf> = BTreeMap::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let locale = match Locale::parse(stem) {
            Ok(locale) => locale,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping locale file");
                continue;
            }
        };

        if let Some(first) = sources.get(&locale) {
            return Err(LocaleFileError::DuplicateLocale {
                locale,
                first: first.clone(),
                second: path,
            });
        }

        let dictionary = load_file(&path)?;
        sources.insert(locale, path.clone());
        tracing::debug!(
            %locale,
            keys = dictionary.len(),
            duplicates = dictionary.duplicates().len(),
            "Loaded locale file"
        );
        dictionaries.insert(locale, dictionary);
    }

    Ok(dictionaries)
}

/// Load a single locale file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> Result<Dictionary, LocaleFileError> {
    let source = fs::read_to_string(path).map_err(|source| LocaleFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Dictionary::parse_json(&source).map_err(|source| LocaleFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a dictionary as nested, pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_dictionary(
    dir: &Path,
    locale: Locale,
    dictionary: &Dictionary,
) -> Result<PathBuf, LocaleFileError> {
    let path = locale_path(dir, locale);
    let mut json = serde_json::to_string_pretty(&dictionary.to_nested_json()).map_err(|source| {
        LocaleFileError::Encode {
            path: path.clone(),
            source,
        }
    })?;
    json.push('\n');

    fs::write(&path, json).map_err(|source| LocaleFileError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en.json"),
            r#"{"nav": {"home": "Home"}, "cart": {"title": "Cart"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("es.json"), r#"{"nav": {"home": "Inicio"}}"#).unwrap();
        fs::write(dir.path().join("README.md"), "not a locale").unwrap();
        fs::write(dir.path().join("xx.json"), "{}").unwrap();

        let dictionaries = load_dir(dir.path()).unwrap();
        assert_eq!(
            dictionaries.keys().copied().collect::<Vec<_>>(),
            vec![Locale::En, Locale::Es]
        );
        assert_eq!(dictionaries[&Locale::En].get("cart.title"), Some("Cart"));
    }

    #[test]
    fn test_region_file_colliding_with_base_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pt.json"), r#"{"nav": {"home": "Início"}}"#).unwrap();
        fs::write(dir.path().join("pt-BR.json"), r#"{"nav": {"home": "Inicio"}}"#).unwrap();

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            LocaleFileError::DuplicateLocale {
                locale: Locale::Pt,
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.contains("pt.json") && message.contains("pt-BR.json"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fr.json"), "[1, 2]").unwrap();

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, LocaleFileError::Parse { .. }));
        assert!(err.to_string().contains("fr.json"));
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let dictionary: Dictionary = [("nav.home", "Accueil"), ("cart.title", "Panier")]
            .into_iter()
            .collect();

        let path = write_dictionary(dir.path(), Locale::Fr, &dictionary).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"nav\": {"));
        assert!(written.ends_with('\n'));

        assert_eq!(load_file(&path).unwrap(), dictionary);
    }
}
