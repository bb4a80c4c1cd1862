use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::Genre;

/// Persistence gateway for genres.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// Insert when `id` is `None`, otherwise overwrite the stored row.
    /// Overwriting a missing row fails with `sqlx::Error::RowNotFound`.
    async fn save(&self, genre: Genre) -> Result<Genre, sqlx::Error>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Genre>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<Genre>, sqlx::Error>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error>;
    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error>;
}

pub struct SqliteGenreRepository {
    pool: SqlitePool,
}

impl SqliteGenreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreRepository for SqliteGenreRepository {
    async fn save(&self, genre: Genre) -> Result<Genre, sqlx::Error> {
        match genre.id {
            Some(id) => {
                let updated = sqlx::query("UPDATE genres SET name = ? WHERE id = ?")
                    .bind(&genre.name)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
                    .rows_affected();
                if updated == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
                Ok(genre)
            }
            None => {
                let id = sqlx::query("INSERT INTO genres (name) VALUES (?)")
                    .bind(&genre.name)
                    .execute(&self.pool)
                    .await?
                    .last_insert_rowid();
                Ok(Genre {
                    id: Some(id),
                    ..genre
                })
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_all(&self) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM genres WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
