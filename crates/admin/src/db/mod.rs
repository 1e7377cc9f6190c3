//! Repositories over the hosted content tables.
//!
//! # Tables
//!
//! - `products` - Catalog entries
//! - `projects` - Portfolio of completed projects
//! - `articles` - News and guides
//! - `translations` - Flattened locale dictionaries
//!
//! Products, projects and articles share the slug-addressed CRUD in
//! [`Repository`]; translations have their own [`TranslationRepository`].

mod tables;
mod translations;

pub use tables::{Articles, Products, Projects, Table};
pub use translations::TranslationRepository;

use thiserror::Error;

use crate::content::{ContentError, Query, TableStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The content store request failed.
    #[error("content store error: {0}")]
    Content(#[from] ContentError),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Input rejected before it reached the store.
    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Repository for products.
pub type ProductRepository<'a, S> = Repository<'a, S, Products>;
/// Repository for projects.
pub type ProjectRepository<'a, S> = Repository<'a, S, Projects>;
/// Repository for articles.
pub type ArticleRepository<'a, S> = Repository<'a, S, Articles>;

/// CRUD access to one slug-addressed table.
pub struct Repository<'a, S, T> {
    store: &'a S,
    _table: std::marker::PhantomData<T>,
}

impl<'a, S: TableStore, T: Table> Repository<'a, S, T> {
    /// Create a new repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            _table: std::marker::PhantomData,
        }
    }

    /// All rows in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Content` if the request fails.
    pub async fn list_all(&self) -> Result<Vec<T::Row>, RepositoryError> {
        let query = Query::new().order_by(T::ORDER_BY, T::ASCENDING);
        Ok(self.store.select(T::NAME, &query).await?)
    }

    /// A row by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this id.
    pub async fn get(&self, id: i64) -> Result<T::Row, RepositoryError> {
        let rows: Vec<T::Row> = self
            .store
            .select(T::NAME, &Query::new().eq("id", id).limit(1))
            .await?;
        rows.into_iter().next().ok_or(RepositoryError::NotFound)
    }

    /// A row by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Content` if the request fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<T::Row>, RepositoryError> {
        let rows: Vec<T::Row> = self
            .store
            .select(T::NAME, &Query::new().eq("slug", slug).limit(1))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Insert a row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for bad input and
    /// `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, input: &T::Input) -> Result<T::Row, RepositoryError> {
        T::validate(input).map_err(RepositoryError::Invalid)?;

        let slug = T::slug(input);
        if self.find_by_slug(slug).await?.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "{} slug already exists: {slug}",
                T::NAME
            )));
        }

        let rows: Vec<T::Row> = self.store.insert(T::NAME, std::slice::from_ref(input)).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| {
                RepositoryError::Content(ContentError::Parse("insert returned no row".to_string()))
            })?;
        tracing::info!(table = T::NAME, id = T::id(&row), slug, "Created row");
        Ok(row)
    }

    /// Replace a row's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this id.
    pub async fn update(&self, id: i64, input: &T::Input) -> Result<T::Row, RepositoryError> {
        T::validate(input).map_err(RepositoryError::Invalid)?;

        let rows: Vec<T::Row> = self.store.update(T::NAME, id, input).await?;
        let row = rows.into_iter().next().ok_or(RepositoryError::NotFound)?;
        tracing::info!(table = T::NAME, id, "Updated row");
        Ok(row)
    }

    /// Delete a row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this id.
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        if self.store.delete(T::NAME, id).await? == 0 {
            return Err(RepositoryError::NotFound);
        }
        tracing::info!(table = T::NAME, id, "Deleted row");
        Ok(())
    }
}

impl<S: TableStore> Repository<'_, S, Articles> {
    /// Published articles, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Content` if the request fails.
    pub async fn list_published(
        &self,
    ) -> Result<Vec<cantera_core::content::Article>, RepositoryError> {
        let query = Query::new()
            .eq("status", cantera_core::ArticleStatus::Published.as_str())
            .order_by("published_at", false);
        Ok(self.store.select(Articles::NAME, &query).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use cantera_core::ArticleStatus;
    use cantera_core::content::{ArticleInput, ProductInput, ProjectInput};
    use rust_decimal::Decimal;

    use super::*;
    use crate::content::MemoryTables;

    fn cement() -> ProductInput {
        ProductInput {
            slug: "white-cement-25kg".to_string(),
            name: "White cement 25kg".to_string(),
            description: None,
            category: "cement".to_string(),
            sku: "CEM-W-25".to_string(),
            price: Decimal::new(940, 2),
            image_url: None,
            max_quantity: Some(40),
            published: true,
        }
    }

    #[tokio::test]
    async fn test_product_crud() {
        let tables = MemoryTables::new();
        let repo = ProductRepository::new(&tables);

        let created = repo.create(&cement()).await.unwrap();
        assert_eq!(created.price, Decimal::new(940, 2));

        let found = repo.find_by_slug("white-cement-25kg").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        let mut input = cement();
        input.price = Decimal::new(995, 2);
        let updated = repo.update(created.id.as_i64(), &input).await.unwrap();
        assert_eq!(updated.price, Decimal::new(995, 2));

        repo.delete(created.id.as_i64()).await.unwrap();
        assert!(matches!(
            repo.get(created.id.as_i64()).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.delete(created.id.as_i64()).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let tables = MemoryTables::new();
        let repo = ProductRepository::new(&tables);
        repo.create(&cement()).await.unwrap();
        assert!(matches!(
            repo.create(&cement()).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let tables = MemoryTables::new();
        let repo = ProductRepository::new(&tables);
        let mut input = cement();
        input.price = Decimal::new(-1, 0);
        assert!(matches!(
            repo.create(&input).await,
            Err(RepositoryError::Invalid(_))
        ));

        let projects = ProjectRepository::new(&tables);
        let project = ProjectInput {
            slug: "Harbour Offices".to_string(),
            title: "Harbour offices".to_string(),
            location: None,
            completed_year: Some(2024),
            summary: None,
            image_url: None,
            published: true,
        };
        assert!(matches!(
            projects.create(&project).await,
            Err(RepositoryError::Invalid(_))
        ));
        assert_eq!(tables.row_count("projects"), 0);
    }

    #[tokio::test]
    async fn test_list_published_articles() {
        let tables = MemoryTables::new();
        let repo = ArticleRepository::new(&tables);
        for (slug, status) in [
            ("choosing-grout", ArticleStatus::Published),
            ("lime-plaster", ArticleStatus::Draft),
        ] {
            repo.create(&ArticleInput {
                slug: slug.to_string(),
                title: slug.replace('-', " "),
                excerpt: None,
                body: "Body".to_string(),
                published_at: None,
                status,
            })
            .await
            .unwrap();
        }

        let published = repo.list_published().await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].slug, "choosing-grout");
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }
}
