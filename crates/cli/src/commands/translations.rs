//! `cantera translations`: sync locale files with the translations table.

use std::io::{self, Write};
use std::path::Path;

use cantera_admin::AdminError;
use cantera_admin::db::TranslationRepository;
use cantera_admin::services::{PushPlan, plan_push, pull as pull_rows, push as push_plan};
use cantera_storefront::StorefrontError;
use cantera_storefront::i18n::{load_dir, write_dictionary};

use super::{CommandError, admin_state, emit};

/// Write the translations table into `<dir>/<locale>.json`.
///
/// # Errors
///
/// Returns an error if the table cannot be read or a file cannot be written.
pub async fn pull(dir: &Path) -> Result<(), CommandError> {
    let state = admin_state()?;
    let repo = TranslationRepository::new(state.store());
    let dictionaries = pull_rows(&repo).await.map_err(AdminError::from)?;

    std::fs::create_dir_all(dir)?;
    for (locale, dictionary) in &dictionaries {
        let path = write_dictionary(dir, *locale, dictionary).map_err(StorefrontError::from)?;
        tracing::info!(path = %path.display(), keys = dictionary.len(), "Wrote locale file");
    }
    emit(|out| writeln!(out, "Pulled {} locale(s)", dictionaries.len()))
}

/// Upload the locale files in `dir`.
///
/// # Errors
///
/// Returns an error if the files cannot be read or a table write fails.
pub async fn push(dir: &Path, prune: bool, dry_run: bool) -> Result<(), CommandError> {
    let local = load_dir(dir).map_err(StorefrontError::from)?;
    let state = admin_state()?;
    let repo = TranslationRepository::new(state.store());

    let remote = repo.list_all().await.map_err(AdminError::from)?;
    let plan = plan_push(&local, &remote, prune);
    emit(|out| render_plan(&plan, out))?;

    if dry_run || plan.is_empty() {
        return Ok(());
    }

    let summary = push_plan(&repo, &plan).await.map_err(AdminError::from)?;
    emit(|out| {
        writeln!(
            out,
            "Inserted {}, updated {}, deleted {}",
            summary.inserted, summary.updated, summary.deleted
        )
    })
}

fn render_plan(plan: &PushPlan, out: &mut dyn Write) -> io::Result<()> {
    if plan.is_empty() {
        return writeln!(out, "Translations table is up to date");
    }
    for input in &plan.inserts {
        writeln!(out, "+ [{}] {} = {}", input.language, input.key, input.value)?;
    }
    for update in &plan.updates {
        writeln!(
            out,
            "~ [{}] {}: {} -> {}",
            update.language, update.key, update.old_value, update.new_value
        )?;
    }
    for row in &plan.deletes {
        writeln!(out, "- [{}] {}", row.language, row.key)?;
    }
    writeln!(
        out,
        "{} insert(s), {} update(s), {} delete(s)",
        plan.inserts.len(),
        plan.updates.len(),
        plan.deletes.len()
    )
}
