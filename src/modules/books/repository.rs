use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{
    models::{Book, BookRow},
    search::{compose_filter, SearchCriteria},
};

const SELECT_BOOKS: &str = r#"
    SELECT b.id, b.title, b.price_cents, b.quantity,
           a.id AS author_id, a.name AS author_name,
           g.id AS genre_id, g.name AS genre_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
    JOIN genres g ON g.id = b.genre_id
"#;

/// Persistence gateway for books. Reads always return the joined author and
/// genre records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert when `id` is `None`, otherwise overwrite the stored row. Only
    /// the ids of the embedded author and genre are written. Overwriting a
    /// missing row fails with `sqlx::Error::RowNotFound`.
    async fn save(&self, book: Book) -> Result<Book, sqlx::Error>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<Book>, sqlx::Error>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error>;
    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error>;
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Book>, sqlx::Error>;
}

pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn save(&self, book: Book) -> Result<Book, sqlx::Error> {
        match book.id {
            Some(id) => {
                let updated = sqlx::query(
                    "UPDATE books SET title = ?, price_cents = ?, quantity = ?, author_id = ?, genre_id = ? WHERE id = ?",
                )
                .bind(&book.title)
                .bind(book.price.cents())
                .bind(book.quantity)
                .bind(book.author.id)
                .bind(book.genre.id)
                .bind(id)
                .execute(&self.pool)
                .await?
                .rows_affected();
                if updated == 0 {
                    return Err(sqlx::Error::RowNotFound);
                }
                Ok(book)
            }
            None => {
                let id = sqlx::query(
                    "INSERT INTO books (title, price_cents, quantity, author_id, genre_id) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(&book.title)
                .bind(book.price.cents())
                .bind(book.quantity)
                .bind(book.author.id)
                .bind(book.genre.id)
                .execute(&self.pool)
                .await?
                .last_insert_rowid();
                Ok(Book {
                    id: Some(id),
                    ..book
                })
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, sqlx::Error> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOKS} WHERE b.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    async fn find_all(&self) -> Result<Vec<Book>, sqlx::Error> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOKS} ORDER BY b.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Book>, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_BOOKS);
        builder.push(" WHERE ");
        compose_filter(&mut builder, criteria);

        let rows = builder
            .build_query_as::<BookRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{
        authors::{
            models::Author,
            repository::{AuthorRepository, SqliteAuthorRepository},
        },
        books::models::Price,
        genres::{
            models::Genre,
            repository::{GenreRepository, SqliteGenreRepository},
        },
        test_support::migrated_pool,
    };

    struct Fixture {
        books: SqliteBookRepository,
        rowling: Author,
        tolkien: Author,
        fantasy: Genre,
        mystery: Genre,
    }

    async fn fixture() -> Fixture {
        let pool = migrated_pool().await;
        let authors = SqliteAuthorRepository::new(pool.clone());
        let genres = SqliteGenreRepository::new(pool.clone());

        let author = |name: &str| Author {
            id: None,
            name: name.to_string(),
        };
        let genre = |name: &str| Genre {
            id: None,
            name: name.to_string(),
        };

        Fixture {
            books: SqliteBookRepository::new(pool),
            rowling: authors.save(author("J.K. Rowling")).await.unwrap(),
            tolkien: authors.save(author("J.R.R. Tolkien")).await.unwrap(),
            fantasy: genres.save(genre("Fantasy")).await.unwrap(),
            mystery: genres.save(genre("Mystery")).await.unwrap(),
        }
    }

    fn book(title: &str, author: &Author, genre: &Genre) -> Book {
        Book {
            id: None,
            title: title.to_string(),
            price: Price::from_cents(3000),
            quantity: 50,
            author: author.clone(),
            genre: genre.clone(),
        }
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        let mut titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        titles.sort_unstable();
        titles
    }

    #[tokio::test]
    async fn save_and_find_joins_references() {
        let f = fixture().await;
        let saved = f
            .books
            .save(book("The Hobbit", &f.tolkien, &f.fantasy))
            .await
            .unwrap();

        let found = f.books.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();

        assert_eq!(found, saved);
        assert_eq!(found.author.name, "J.R.R. Tolkien");
        assert_eq!(found.genre.name, "Fantasy");
    }

    #[tokio::test]
    async fn save_with_unknown_author_violates_foreign_key() {
        let f = fixture().await;
        let ghost = Author {
            id: Some(999),
            name: "Ghost".to_string(),
        };

        let result = f.books.save(book("Nothing", &ghost, &f.fantasy)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn save_with_id_replaces_all_fields() {
        let f = fixture().await;
        let saved = f
            .books
            .save(book("The Hobbit", &f.tolkien, &f.fantasy))
            .await
            .unwrap();

        let replaced = Book {
            title: "The Cuckoo's Calling".to_string(),
            price: Price::from_cents(1599),
            quantity: 0,
            author: f.rowling.clone(),
            genre: f.mystery.clone(),
            ..saved.clone()
        };
        f.books.save(replaced.clone()).await.unwrap();

        let found = f.books.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found, replaced);
    }

    #[tokio::test]
    async fn save_with_unknown_id_is_row_not_found() {
        let f = fixture().await;
        let missing = Book {
            id: Some(404),
            ..book("The Silmarillion", &f.tolkien, &f.fantasy)
        };

        let result = f.books.save(missing).await;

        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
        assert!(f.books.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_and_exists() {
        let f = fixture().await;
        let id = f
            .books
            .save(book("The Hobbit", &f.tolkien, &f.fantasy))
            .await
            .unwrap()
            .id
            .unwrap();

        assert!(f.books.exists_by_id(id).await.unwrap());
        f.books.delete_by_id(id).await.unwrap();
        assert!(!f.books.exists_by_id(id).await.unwrap());
        assert!(f.books.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_case_insensitive_substrings() {
        let f = fixture().await;
        for (title, author, genre) in [
            ("Harry Potter and the Philosopher's Stone", &f.rowling, &f.fantasy),
            ("The Cuckoo's Calling", &f.rowling, &f.mystery),
            ("The Hobbit", &f.tolkien, &f.fantasy),
        ] {
            f.books.save(book(title, author, genre)).await.unwrap();
        }

        let by_title = f
            .books
            .search(&SearchCriteria::new(Some("harry POTTER"), None, None))
            .await
            .unwrap();
        assert_eq!(titles(&by_title), vec!["Harry Potter and the Philosopher's Stone"]);

        let by_author = f
            .books
            .search(&SearchCriteria::new(None, Some("rowling"), None))
            .await
            .unwrap();
        assert_eq!(
            titles(&by_author),
            vec!["Harry Potter and the Philosopher's Stone", "The Cuckoo's Calling"]
        );

        let everything = f.books.search(&SearchCriteria::default()).await.unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn search_parameters_combine_with_and() {
        let f = fixture().await;
        for (title, author, genre) in [
            ("The Cuckoo's Calling", &f.rowling, &f.mystery),
            ("The Hobbit", &f.tolkien, &f.fantasy),
            ("The Silkworm", &f.rowling, &f.mystery),
        ] {
            f.books.save(book(title, author, genre)).await.unwrap();
        }

        let results = f
            .books
            .search(&SearchCriteria::new(Some("the"), None, Some("fant")))
            .await
            .unwrap();
        assert_eq!(titles(&results), vec!["The Hobbit"]);

        let none = f
            .books
            .search(&SearchCriteria::new(Some("hobbit"), Some("rowling"), None))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn search_matches_non_ascii_titles() {
        let f = fixture().await;
        for title in ["Über Alles", "Ångström Tales", "Uber Eats"] {
            f.books
                .save(book(title, &f.tolkien, &f.fantasy))
                .await
                .unwrap();
        }

        for (query, expected) in [
            ("Über", vec!["Über Alles"]),
            ("ÜBER ALLES", vec!["Über Alles"]),
            ("Ångström", vec!["Ångström Tales"]),
            ("ångström", vec![]),
            ("uber", vec!["Uber Eats"]),
        ] {
            let results = f
                .books
                .search(&SearchCriteria::new(Some(query), None, None))
                .await
                .unwrap();
            assert_eq!(titles(&results), expected, "query {query:?}");
        }
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let f = fixture().await;
        f.books
            .save(book("100% Pure", &f.tolkien, &f.fantasy))
            .await
            .unwrap();
        f.books
            .save(book("1000 Words", &f.tolkien, &f.fantasy))
            .await
            .unwrap();

        let results = f
            .books
            .search(&SearchCriteria::new(Some("0%"), None, None))
            .await
            .unwrap();
        assert_eq!(titles(&results), vec!["100% Pure"]);
    }
}
