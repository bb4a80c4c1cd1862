use std::sync::Arc;

use super::{
    models::{Book, BookDraft},
    repository::BookRepository,
    search::SearchCriteria,
};
use crate::error::{CatalogError, CatalogResult};
use crate::modules::{
    authors::{models::Author, service::AuthorService},
    genres::{models::Genre, service::GenreService},
};

const ENTITY: &str = "Book";

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
    authors: AuthorService,
    genres: GenreService,
}

impl BookService {
    pub fn new(books: Arc<dyn BookRepository>, authors: AuthorService, genres: GenreService) -> Self {
        Self {
            books,
            authors,
            genres,
        }
    }

    pub async fn create(&self, draft: BookDraft) -> CatalogResult<Book> {
        let (author, genre) = self.resolve_references(&draft).await?;

        let book = self
            .books
            .save(Book {
                id: None,
                title: draft.title,
                price: draft.price,
                quantity: draft.quantity,
                author,
                genre,
            })
            .await?;

        tracing::info!(book_id = ?book.id, "book created");
        Ok(book)
    }

    pub async fn get_by_id(&self, id: i64) -> CatalogResult<Book> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(ENTITY, id))
    }

    pub async fn get_all(&self) -> CatalogResult<Vec<Book>> {
        Ok(self.books.find_all().await?)
    }

    /// Replace every mutable field of an existing book. Fields omitted from
    /// the draft take their defaults; this is not a patch.
    pub async fn update(&self, id: i64, draft: BookDraft) -> CatalogResult<Book> {
        let mut existing = self.get_by_id(id).await?;
        let (author, genre) = self.resolve_references(&draft).await?;

        existing.title = draft.title;
        existing.price = draft.price;
        existing.quantity = draft.quantity;
        existing.author = author;
        existing.genre = genre;

        let book = self
            .books
            .save(existing)
            .await
            .map_err(|err| CatalogError::from_update(ENTITY, id, err))?;
        tracing::info!(book_id = id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.books.exists_by_id(id).await? {
            return Err(CatalogError::not_found(ENTITY, id));
        }
        self.books.delete_by_id(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    pub async fn search(&self, criteria: SearchCriteria) -> CatalogResult<Vec<Book>> {
        tracing::debug!(?criteria, "searching books");
        Ok(self.books.search(&criteria).await?)
    }

    /// Both reference ids must be present before any lookup; each referenced
    /// record is then loaded in full.
    async fn resolve_references(&self, draft: &BookDraft) -> CatalogResult<(Author, Genre)> {
        let author_id = draft
            .author
            .as_ref()
            .and_then(|r| r.id)
            .ok_or_else(|| CatalogError::invalid_argument("Book must have a valid author ID"))?;
        let genre_id = draft
            .genre
            .as_ref()
            .and_then(|r| r.id)
            .ok_or_else(|| CatalogError::invalid_argument("Book must have a valid genre ID"))?;

        let author = self.authors.get_by_id(author_id).await?;
        let genre = self.genres.get_by_id(genre_id).await?;
        Ok((author, genre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{
        authors::repository::MockAuthorRepository,
        books::{
            models::{EntityRef, Price},
            repository::MockBookRepository,
        },
        genres::repository::MockGenreRepository,
    };
    use mockall::predicate::eq;

    fn tolkien() -> Author {
        Author {
            id: Some(1),
            name: "J.R.R. Tolkien".to_string(),
        }
    }

    fn fantasy() -> Genre {
        Genre {
            id: Some(1),
            name: "Fantasy".to_string(),
        }
    }

    fn hobbit() -> Book {
        Book {
            id: Some(1),
            title: "The Hobbit".to_string(),
            price: Price::from_cents(2000),
            quantity: 10,
            author: tolkien(),
            genre: fantasy(),
        }
    }

    fn draft(author: Option<EntityRef>, genre: Option<EntityRef>) -> BookDraft {
        BookDraft {
            title: "The Hobbit".to_string(),
            price: Price::from_cents(2000),
            quantity: 10,
            author,
            genre,
        }
    }

    fn known_author() -> MockAuthorRepository {
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(tolkien())));
        authors
    }

    fn known_genre() -> MockGenreRepository {
        let mut genres = MockGenreRepository::new();
        genres
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(fantasy())));
        genres
    }

    fn service(
        books: MockBookRepository,
        authors: MockAuthorRepository,
        genres: MockGenreRepository,
    ) -> BookService {
        BookService::new(
            Arc::new(books),
            AuthorService::new(Arc::new(authors)),
            GenreService::new(Arc::new(genres)),
        )
    }

    #[tokio::test]
    async fn create_loads_references_and_saves() {
        let mut books = MockBookRepository::new();
        books
            .expect_save()
            .withf(|book| book.id.is_none() && book.author == tolkien() && book.genre == fantasy())
            .times(1)
            .returning(|book| {
                Ok(Book {
                    id: Some(1),
                    ..book
                })
            });

        let created = service(books, known_author(), known_genre())
            .create(draft(Some(EntityRef::id(1)), Some(EntityRef::id(1))))
            .await
            .unwrap();

        assert_eq!(created, hobbit());
    }

    #[tokio::test]
    async fn create_with_unknown_author_never_saves() {
        let mut books = MockBookRepository::new();
        books.expect_save().never();
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_by_id()
            .with(eq(999))
            .returning(|_| Ok(None));

        let err = service(books, authors, MockGenreRepository::new())
            .create(draft(Some(EntityRef::id(999)), Some(EntityRef::id(1))))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Author not found with id: 999");
    }

    #[tokio::test]
    async fn create_with_unknown_genre_never_saves() {
        let mut books = MockBookRepository::new();
        books.expect_save().never();
        let mut genres = MockGenreRepository::new();
        genres
            .expect_find_by_id()
            .with(eq(999))
            .returning(|_| Ok(None));

        let err = service(books, known_author(), genres)
            .create(draft(Some(EntityRef::id(1)), Some(EntityRef::id(999))))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Genre not found with id: 999");
    }

    #[tokio::test]
    async fn create_without_author_id_fails_before_store_access() {
        let mut books = MockBookRepository::new();
        books.expect_save().never();
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().never();
        let mut genres = MockGenreRepository::new();
        genres.expect_find_by_id().never();

        let service = service(books, authors, genres);

        for author in [None, Some(EntityRef::default())] {
            let err = service
                .create(draft(author, Some(EntityRef::id(1))))
                .await
                .unwrap_err();
            assert!(matches!(err, CatalogError::InvalidArgument(ref m) if m == "Book must have a valid author ID"));
        }
    }

    #[tokio::test]
    async fn create_without_genre_id_fails_before_store_access() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().never();

        let err = service(MockBookRepository::new(), authors, MockGenreRepository::new())
            .create(draft(Some(EntityRef::id(1)), None))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidArgument(ref m) if m == "Book must have a valid genre ID"));
    }

    #[tokio::test]
    async fn get_by_id_not_found_names_id() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .with(eq(2))
            .returning(|_| Ok(None));

        let err = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
            .get_by_id(2)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Book not found with id: 2");
    }

    #[tokio::test]
    async fn update_overwrites_every_mutable_field() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(hobbit())));
        books
            .expect_save()
            .withf(|book| {
                book.id == Some(1)
                    && book.title == "The Hobbit: Updated"
                    && book.price == Price::from_cents(2500)
                    && book.quantity == 5
            })
            .times(1)
            .returning(Ok);

        let updated = service(books, known_author(), known_genre())
            .update(
                1,
                BookDraft {
                    title: "The Hobbit: Updated".to_string(),
                    price: Price::from_cents(2500),
                    quantity: 5,
                    ..draft(Some(EntityRef::id(1)), Some(EntityRef::id(1)))
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "The Hobbit: Updated");
        assert_eq!(updated.price, Price::from_cents(2500));
        assert_eq!(updated.quantity, 5);
    }

    #[tokio::test]
    async fn update_missing_book_never_saves() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .with(eq(7))
            .returning(|_| Ok(None));
        books.expect_save().never();

        let err = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
            .update(7, draft(Some(EntityRef::id(1)), Some(EntityRef::id(1))))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Book not found with id: 7");
    }

    #[tokio::test]
    async fn update_with_unknown_genre_never_saves() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(hobbit())));
        books.expect_save().never();
        let mut genres = MockGenreRepository::new();
        genres
            .expect_find_by_id()
            .with(eq(404))
            .returning(|_| Ok(None));

        let err = service(books, known_author(), genres)
            .update(1, draft(Some(EntityRef::id(1)), Some(EntityRef::id(404))))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Genre not found with id: 404");
    }

    #[tokio::test]
    async fn update_of_book_deleted_after_lookup_is_not_found() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(hobbit())));
        books
            .expect_save()
            .times(1)
            .returning(|_| Err(sqlx::Error::RowNotFound));

        let err = service(books, known_author(), known_genre())
            .update(1, draft(Some(EntityRef::id(1)), Some(EntityRef::id(1))))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { entity: "Book", id: 1 }));
    }

    #[tokio::test]
    async fn delete_missing_book_never_deletes() {
        let mut books = MockBookRepository::new();
        books
            .expect_exists_by_id()
            .with(eq(2))
            .returning(|_| Ok(false));
        books.expect_delete_by_id().never();

        let err = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
            .delete(2)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Book not found with id: 2");
    }

    #[tokio::test]
    async fn delete_existing_book() {
        let mut books = MockBookRepository::new();
        books
            .expect_exists_by_id()
            .with(eq(1))
            .returning(|_| Ok(true));
        books
            .expect_delete_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));

        service(books, MockAuthorRepository::new(), MockGenreRepository::new())
            .delete(1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn search_passes_criteria_to_store() {
        let mut books = MockBookRepository::new();
        books
            .expect_search()
            .withf(|criteria| criteria.author.as_deref() == Some("rowling"))
            .times(1)
            .returning(|_| Ok(vec![]));

        let results = service(books, MockAuthorRepository::new(), MockGenreRepository::new())
            .search(SearchCriteria::new(None, Some("rowling"), None))
            .await
            .unwrap();

        assert!(results.is_empty());
    }
}
