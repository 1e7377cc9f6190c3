//! Translation table repository.

use cantera_core::content::{TranslationInput, TranslationRow};
use cantera_core::{Locale, TranslationId};
use serde::Serialize;

use super::RepositoryError;
use crate::content::{Query, TableStore};

const TABLE: &str = "translations";

#[derive(Serialize)]
struct ValuePatch<'a> {
    value: &'a str,
}

/// Repository for the `translations` table.
pub struct TranslationRepository<'a, S> {
    store: &'a S,
}

impl<'a, S: TableStore> TranslationRepository<'a, S> {
    /// Create a new translation repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Every row, ordered by language then key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Content` if the request fails.
    pub async fn list_all(&self) -> Result<Vec<TranslationRow>, RepositoryError> {
        let mut rows: Vec<TranslationRow> = self
            .store
            .select(TABLE, &Query::new().order_by("key", true))
            .await?;
        rows.sort_by(|a, b| a.language.cmp(&b.language).then_with(|| a.key.cmp(&b.key)));
        Ok(rows)
    }

    /// Rows for one locale, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Content` if the request fails.
    pub async fn list_for(&self, locale: Locale) -> Result<Vec<TranslationRow>, RepositoryError> {
        let query = Query::new()
            .eq("language", locale.code())
            .order_by("key", true);
        Ok(self.store.select(TABLE, &query).await?)
    }

    /// Insert rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Content` if the request fails.
    pub async fn insert_many(
        &self,
        inputs: &[TranslationInput],
    ) -> Result<Vec<TranslationRow>, RepositoryError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<TranslationRow> = self.store.insert(TABLE, inputs).await?;
        tracing::debug!(count = rows.len(), "Inserted translations");
        Ok(rows)
    }

    /// Change the text of a row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this id.
    pub async fn update_value(
        &self,
        id: TranslationId,
        value: &str,
    ) -> Result<TranslationRow, RepositoryError> {
        let rows: Vec<TranslationRow> = self
            .store
            .update(TABLE, id.as_i64(), &ValuePatch { value })
            .await?;
        rows.into_iter().next().ok_or(RepositoryError::NotFound)
    }

    /// Delete a row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this id.
    pub async fn delete(&self, id: TranslationId) -> Result<(), RepositoryError> {
        if self.store.delete(TABLE, id.as_i64()).await? == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::content::MemoryTables;

    fn input(key: &str, value: &str, language: Locale) -> TranslationInput {
        TranslationInput {
            key: key.to_string(),
            value: value.to_string(),
            language,
        }
    }

    #[tokio::test]
    async fn test_translation_rows() {
        let tables = MemoryTables::new();
        let repo = TranslationRepository::new(&tables);

        let inserted = repo
            .insert_many(&[
                input("nav.home", "Inicio", Locale::Es),
                input("nav.home", "Home", Locale::En),
                input("cart.title", "Cart", Locale::En),
            ])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 3);

        let all = repo.list_all().await.unwrap();
        assert_eq!(
            all.iter()
                .map(|r| (r.language, r.key.as_str()))
                .collect::<Vec<_>>(),
            vec![
                (Locale::En, "cart.title"),
                (Locale::En, "nav.home"),
                (Locale::Es, "nav.home"),
            ]
        );

        let spanish = repo.list_for(Locale::Es).await.unwrap();
        assert_eq!(spanish.len(), 1);

        let updated = repo.update_value(spanish[0].id, "Portada").await.unwrap();
        assert_eq!(updated.value, "Portada");
        assert_eq!(updated.key, "nav.home");

        repo.delete(spanish[0].id).await.unwrap();
        assert!(repo.list_for(Locale::Es).await.unwrap().is_empty());
        assert!(matches!(
            repo.delete(spanish[0].id).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
