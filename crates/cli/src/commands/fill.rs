//! `cantera fill`: complete locale files.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;

use cantera_admin::AdminError;
use cantera_admin::config::TranslateConfig;
use cantera_admin::services::{FillOutcome, TranslateClient, fill_missing};
use cantera_core::Locale;
use cantera_storefront::StorefrontError;
use cantera_storefront::i18n::{load_dir, write_dictionary};

use super::{CommandError, emit};

/// Fill every missing key in `dir` and write the changed files back.
///
/// Uses the translation API when `TRANSLATE_API_URL` is set, placeholder
/// text otherwise.
///
/// # Errors
///
/// Returns an error if the locale files cannot be read or written, or the
/// translation configuration is invalid.
pub async fn run(dir: &Path, dry_run: bool) -> Result<(), CommandError> {
    let mut dictionaries = load_dir(dir).map_err(StorefrontError::from)?;

    let translator = TranslateConfig::from_env()
        .map_err(AdminError::from)?
        .as_ref()
        .map(TranslateClient::new)
        .transpose()
        .map_err(AdminError::from)?;
    if translator.is_none() {
        tracing::info!("TRANSLATE_API_URL not set, filling with placeholder text");
    }

    let outcome = fill_missing(&mut dictionaries, translator.as_ref(), None).await;
    emit(|out| render_text(&outcome, out))?;

    if dry_run || outcome.is_empty() {
        return Ok(());
    }

    let changed: BTreeSet<Locale> = outcome
        .translated
        .iter()
        .chain(&outcome.placeholders)
        .map(|entry| entry.locale)
        .collect();
    for locale in changed {
        if let Some(dictionary) = dictionaries.get(&locale) {
            let path = write_dictionary(dir, locale, dictionary).map_err(StorefrontError::from)?;
            tracing::info!(path = %path.display(), "Updated locale file");
        }
    }
    Ok(())
}

fn render_text(outcome: &FillOutcome, out: &mut dyn Write) -> io::Result<()> {
    if outcome.is_empty() {
        return writeln!(out, "Nothing to fill");
    }
    for entry in &outcome.translated {
        writeln!(out, "translated   [{}] {} = {}", entry.locale, entry.key, entry.value)?;
    }
    for entry in &outcome.placeholders {
        writeln!(out, "placeholder  [{}] {} = {}", entry.locale, entry.key, entry.value)?;
    }
    writeln!(
        out,
        "{} translated, {} placeholder(s)",
        outcome.translated.len(),
        outcome.placeholders.len()
    )
}
