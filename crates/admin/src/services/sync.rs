//! Synchronising locale files with the `translations` table.
//!
//! A push is planned first and then applied, so callers can show the plan
//! (or stop at a dry run) before anything is written.

use std::collections::{BTreeMap, BTreeSet};

use cantera_core::content::{TranslationInput, TranslationRow};
use cantera_core::i18n::{Dictionaries, Dictionary};
use cantera_core::{Locale, TranslationId};
use serde::Serialize;

use crate::content::TableStore;
use crate::db::{RepositoryError, TranslationRepository};

/// A remote value that differs from the local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationUpdate {
    pub id: TranslationId,
    pub key: String,
    pub language: Locale,
    pub old_value: String,
    pub new_value: String,
}

/// Changes needed to make the table match the local dictionaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushPlan {
    pub inserts: Vec<TranslationInput>,
    pub updates: Vec<TranslationUpdate>,
    pub deletes: Vec<TranslationRow>,
}

impl PushPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Counts of rows written by [`push`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PushSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Group table rows into per-locale dictionaries.
///
/// When the table holds the same key twice for a locale, the row with the
/// highest id wins.
#[must_use]
pub fn rows_to_dictionaries(rows: &[TranslationRow]) -> Dictionaries {
    let mut latest: BTreeMap<(Locale, &str), &TranslationRow> = BTreeMap::new();
    for row in rows {
        latest
            .entry((row.language, row.key.as_str()))
            .and_modify(|current| {
                if row.id.as_i64() > current.id.as_i64() {
                    *current = row;
                }
            })
            .or_insert(row);
    }

    let mut dictionaries = Dictionaries::new();
    for ((locale, key), row) in latest {
        dictionaries
            .entry(locale)
            .or_insert_with(Dictionary::new)
            .insert(key, row.value.as_str());
    }
    dictionaries
}

/// Work out which rows to insert, update and delete.
///
/// Rows for keys missing locally are only deleted when `prune` is set, and
/// only for locales that exist locally. Extra rows for the same key and
/// locale count as stale under `prune`.
#[must_use]
pub fn plan_push(local: &Dictionaries, remote: &[TranslationRow], prune: bool) -> PushPlan {
    let mut plan = PushPlan::default();
    let mut seen: BTreeSet<(Locale, &str)> = BTreeSet::new();

    let mut sorted: Vec<&TranslationRow> = remote.iter().collect();
    sorted.sort_by_key(|row| std::cmp::Reverse(row.id.as_i64()));

    for row in sorted {
        let Some(dictionary) = local.get(&row.language) else {
            continue;
        };

        if !seen.insert((row.language, row.key.as_str())) {
            if prune {
                plan.deletes.push(row.clone());
            }
            continue;
        }

        match dictionary.get(&row.key) {
            Some(value) if value != row.value => plan.updates.push(TranslationUpdate {
                id: row.id,
                key: row.key.clone(),
                language: row.language,
                old_value: row.value.clone(),
                new_value: value.to_string(),
            }),
            Some(_) => {}
            None if prune => plan.deletes.push(row.clone()),
            None => {}
        }
    }

    for (locale, dictionary) in local {
        for (key, value) in dictionary.iter() {
            if !seen.contains(&(*locale, key)) {
                plan.inserts.push(TranslationInput {
                    key: key.to_string(),
                    value: value.to_string(),
                    language: *locale,
                });
            }
        }
    }

    plan.updates
        .sort_by(|a, b| a.language.cmp(&b.language).then_with(|| a.key.cmp(&b.key)));
    plan.deletes
        .sort_by(|a, b| a.language.cmp(&b.language).then_with(|| a.key.cmp(&b.key)));
    plan
}

/// Apply a plan.
///
/// # Errors
///
/// Returns the first repository error. Rows written before the failure stay
/// written.
pub async fn push<S: TableStore>(
    repo: &TranslationRepository<'_, S>,
    plan: &PushPlan,
) -> Result<PushSummary, RepositoryError> {
    let mut summary = PushSummary::default();

    summary.inserted = repo.insert_many(&plan.inserts).await?.len();

    for update in &plan.updates {
        repo.update_value(update.id, &update.new_value).await?;
        summary.updated += 1;
    }

    for row in &plan.deletes {
        match repo.delete(row.id).await {
            Ok(()) => summary.deleted += 1,
            // Already gone
            Err(RepositoryError::NotFound) => {
                tracing::debug!(id = %row.id, key = %row.key, "Row vanished before delete");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        inserted = summary.inserted,
        updated = summary.updated,
        deleted = summary.deleted,
        "Pushed translations"
    );
    Ok(summary)
}

/// Fetch every row and group it by locale.
///
/// # Errors
///
/// Returns `RepositoryError::Content` if the request fails.
pub async fn pull<S: TableStore>(
    repo: &TranslationRepository<'_, S>,
) -> Result<Dictionaries, RepositoryError> {
    let rows = repo.list_all().await?;
    tracing::info!(rows = rows.len(), "Pulled translations");
    Ok(rows_to_dictionaries(&rows))
}
