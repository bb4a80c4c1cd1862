pub mod authors;
pub mod books;
pub mod genres;
pub mod openapi;

use std::sync::Arc;

use bookstore_kernel::ModuleRegistry;
use sqlx::SqlitePool;

use authors::{repository::SqliteAuthorRepository, service::AuthorService};
use books::{repository::SqliteBookRepository, service::BookService};
use genres::{repository::SqliteGenreRepository, service::GenreService};

/// Wire gateways into services and register every catalog module
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool) {
    let author_service = AuthorService::new(Arc::new(SqliteAuthorRepository::new(pool.clone())));
    let genre_service = GenreService::new(Arc::new(SqliteGenreRepository::new(pool.clone())));
    let book_service = BookService::new(
        Arc::new(SqliteBookRepository::new(pool.clone())),
        author_service.clone(),
        genre_service.clone(),
    );

    registry.register(authors::create_module(author_service));
    registry.register(genres::create_module(genre_service));
    registry.register(books::create_module(book_service));
}

/// Registry containing every catalog module backed by `pool`
pub fn build_registry(pool: &SqlitePool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, pool);
    registry
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;

    /// Fresh in-memory database with every catalog table created
    pub async fn migrated_pool() -> SqlitePool {
        let pool = bookstore_db::connect_in_memory().await.unwrap();
        let registry = super::build_registry(&pool);
        bookstore_db::run_migrations(&pool, &registry).await.unwrap();
        pool
    }
}
