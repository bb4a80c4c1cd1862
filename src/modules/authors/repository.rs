use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::Author;

/// Persistence gateway for authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Insert when `id` is `None`, otherwise overwrite the stored row.
    /// Overwriting a missing row fails with `sqlx::Error::RowNotFound`.
    async fn save(&self, author: Author) -> Result<Author, sqlx::Error>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Author>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<Author>, sqlx::Error>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error>;
    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error>;
}

pub struct SqliteAuthorRepository {
    pool: SqlitePool,
}

impl SqliteAuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for SqliteAuthorRepository {
    async fn save(&self, author: Author) -> Result<Author, sqlx::Error> {
        match author.id {
            Some(id) => {
                let updated = sqlx::query("UPDATE authors SET name = ? WHERE id = ?")
                    .bind(&author.name)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
                    .rows_affected();
                if updated == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
                Ok(author)
            }
            None => {
                let id = sqlx::query("INSERT INTO authors (name) VALUES (?)")
                    .bind(&author.name)
                    .execute(&self.pool)
                    .await?
                    .last_insert_rowid();
                Ok(Author {
                    id: Some(id),
                    ..author
                })
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Author>, sqlx::Error> {
        sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_all(&self) -> Result<Vec<Author>, sqlx::Error> {
        sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
