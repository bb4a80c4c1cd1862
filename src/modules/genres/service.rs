use std::sync::Arc;

use super::{
    models::{Genre, GenreDraft},
    repository::GenreRepository,
};
use crate::error::{CatalogError, CatalogResult};

const ENTITY: &str = "Genre";

#[derive(Clone)]
pub struct GenreService {
    repository: Arc<dyn GenreRepository>,
}

impl GenreService {
    pub fn new(repository: Arc<dyn GenreRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, draft: GenreDraft) -> CatalogResult<Genre> {
        let genre = self.repository.save(draft.into()).await?;
        tracing::info!(genre_id = ?genre.id, "genre created");
        Ok(genre)
    }

    pub async fn get_by_id(&self, id: i64) -> CatalogResult<Genre> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(ENTITY, id))
    }

    pub async fn get_all(&self) -> CatalogResult<Vec<Genre>> {
        Ok(self.repository.find_all().await?)
    }

    /// Replace the name of an existing genre.
    pub async fn update(&self, id: i64, draft: GenreDraft) -> CatalogResult<Genre> {
        let mut existing = self.get_by_id(id).await?;
        existing.name = draft.name;

        let genre = self
            .repository
            .save(existing)
            .await
            .map_err(|err| CatalogError::from_update(ENTITY, id, err))?;
        tracing::info!(genre_id = id, "genre updated");
        Ok(genre)
    }

    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(CatalogError::not_found(ENTITY, id));
        }
        self.repository.delete_by_id(id).await?;
        tracing::info!(genre_id = id, "genre deleted");
        Ok(())
    }
}
