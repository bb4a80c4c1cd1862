use std::sync::Arc;

use super::{
    models::{Author, AuthorDraft},
    repository::AuthorRepository,
};
use crate::error::{CatalogError, CatalogResult};

const ENTITY: &str = "Author";

#[derive(Clone)]
pub struct AuthorService {
    repository: Arc<dyn AuthorRepository>,
}

impl AuthorService {
    pub fn new(repository: Arc<dyn AuthorRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, draft: AuthorDraft) -> CatalogResult<Author> {
        let author = self.repository.save(draft.into()).await?;
        tracing::info!(author_id = ?author.id, "author created");
        Ok(author)
    }

    pub async fn get_by_id(&self, id: i64) -> CatalogResult<Author> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(ENTITY, id))
    }

    pub async fn get_all(&self) -> CatalogResult<Vec<Author>> {
        Ok(self.repository.find_all().await?)
    }

    /// Replace the name of an existing author.
    pub async fn update(&self, id: i64, draft: AuthorDraft) -> CatalogResult<Author> {
        let mut existing = self.get_by_id(id).await?;
        existing.name = draft.name;

        let author = self
            .repository
            .save(existing)
            .await
            .map_err(|err| CatalogError::from_update(ENTITY, id, err))?;
        tracing::info!(author_id = id, "author updated");
        Ok(author)
    }

    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(CatalogError::not_found(ENTITY, id));
        }
        self.repository.delete_by_id(id).await?;
        tracing::info!(author_id = id, "author deleted");
        Ok(())
    }
}
