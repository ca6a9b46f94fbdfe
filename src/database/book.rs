use crate::database::{SqlConditions, is_foreign_key_violation, is_unique_violation, parse_uuid};
use crate::models::author::{Author, AuthorName};
use crate::models::book::{
    Book, BookFilter, BookTitle, CreateBookError, DeleteBookError, DeleteBookRequest,
    FindBookError, FindBookRequest, Isbn, ListBooksError, UpdateBookError,
};
use crate::models::query::{Page, PageRequest};
use crate::repositories::BookRepository;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

// Joined selection: book columns plus the author's, aliased apart.
const BOOK_WITH_AUTHOR_COLUMNS: &str =
    "b.id, b.title, b.isbn, b.published_date, b.genre, b.author_id, b.created_at, b.updated_at, \
     a.id AS a_id, a.first_name AS a_first_name, a.last_name AS a_last_name, a.bio AS a_bio, \
     a.birth_date AS a_birth_date, a.created_at AS a_created_at, a.updated_at AS a_updated_at";

#[derive(Debug, Clone)]
pub struct DefaultBookRepository {
    pool: SqlitePool,
}

impl DefaultBookRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Book {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let isbn: String = row.try_get("isbn")?;
        let published_date: Option<NaiveDate> = row.try_get("published_date")?;
        let genre: Option<String> = row.try_get("genre")?;
        let author_id: String = row.try_get("author_id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        Ok(Self::new(
            parse_uuid("id", &id)?,
            BookTitle::new_unchecked(&title),
            Isbn::new_unchecked(&isbn),
            published_date,
            genre,
            parse_uuid("author_id", &author_id)?,
            created_at,
            updated_at,
        ))
    }
}

fn book_with_author_from_row(row: &SqliteRow) -> Result<Book, sqlx::Error> {
    let mut book = Book::from_row(row)?;

    let author_id: String = row.try_get("a_id")?;
    let first_name: String = row.try_get("a_first_name")?;
    let last_name: String = row.try_get("a_last_name")?;
    let bio: Option<String> = row.try_get("a_bio")?;
    let birth_date: Option<NaiveDate> = row.try_get("a_birth_date")?;
    let created_at: DateTime<Utc> = row.try_get("a_created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("a_updated_at")?;

    book.attach_author(Author::new(
        parse_uuid("a_id", &author_id)?,
        AuthorName::new_unchecked(&first_name),
        AuthorName::new_unchecked(&last_name),
        bio,
        birth_date,
        created_at,
        updated_at,
    ));

    Ok(book)
}

#[async_trait]
impl BookRepository for DefaultBookRepository {
    async fn create_book(&self, book: &Book) -> Result<(), CreateBookError> {
        sqlx::query(
            "INSERT INTO books (id, title, isbn, published_date, genre, author_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(book.id().to_string())
        .bind(book.title().to_string())
        .bind(book.isbn().to_string())
        .bind(book.published_date())
        .bind(book.genre())
        .bind(book.author_id().to_string())
        .bind(book.created_at())
        .bind(book.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                CreateBookError::DuplicateIsbn {
                    isbn: book.isbn().to_string(),
                }
            } else if is_foreign_key_violation(&err) {
                CreateBookError::AuthorNotFound {
                    author_id: book.author_id(),
                }
            } else {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to create book with id "{}""#, book.id()));
                CreateBookError::Other(err)
            }
        })?;

        Ok(())
    }

    async fn find_book(&self, req: &FindBookRequest) -> Result<Option<Book>, FindBookError> {
        let sql = format!(
            "SELECT {BOOK_WITH_AUTHOR_COLUMNS} FROM books b \
             JOIN authors a ON a.id = b.author_id WHERE b.id = ?"
        );
        let row = sqlx::query(&sql)
            .bind(req.id().to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to retrieve book with id "{}""#, req.id()));
                FindBookError(err)
            })?;

        match row {
            Some(row) => {
                let book = book_with_author_from_row(&row).map_err(|err| {
                    let err = anyhow!(err)
                        .context(format!(r#"Failed to decode book with id "{}""#, req.id()));
                    FindBookError(err)
                })?;
                Ok(Some(book))
            }
            None => Ok(None),
        }
    }

    async fn list_books(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> Result<Page<Book>, ListBooksError> {
        let mut conditions = SqlConditions::new();
        if let Some(title) = filter.title() {
            conditions.push_contains("LOWER(b.title) LIKE ?", title);
        }
        if let Some(isbn) = filter.isbn() {
            conditions.push_contains("LOWER(b.isbn) LIKE ?", isbn);
        }
        if let Some(author_id) = filter.author_id() {
            conditions.push_equals("b.author_id = ?", author_id.to_string());
        }

        let count_sql = format!("SELECT COUNT(*) FROM books b{}", conditions.where_clause());
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in conditions.binds() {
            count_query = count_query.bind(bind.as_str());
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(|err| {
            let err = anyhow!(err).context("Failed to count books");
            ListBooksError(err)
        })?;

        let rows_sql = format!(
            "SELECT {BOOK_WITH_AUTHOR_COLUMNS} FROM books b \
             JOIN authors a ON a.id = b.author_id{} \
             ORDER BY b.created_at, b.id LIMIT ? OFFSET ?",
            conditions.where_clause()
        );
        let mut rows_query = sqlx::query(&rows_sql);
        for bind in conditions.binds() {
            rows_query = rows_query.bind(bind.as_str());
        }
        let rows = rows_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context("Failed to list books");
                ListBooksError(err)
            })?;

        let mut books = Vec::with_capacity(rows.len());
        for row in &rows {
            let book = book_with_author_from_row(row).map_err(|err| {
                let err = anyhow!(err).context("Failed to decode book row");
                ListBooksError(err)
            })?;
            books.push(book);
        }

        Ok(Page::new(books, total as u64, page))
    }

    async fn update_book(&self, book: &Book) -> Result<(), UpdateBookError> {
        let result = sqlx::query(
            "UPDATE books SET title = ?, isbn = ?, published_date = ?, genre = ?, \
             author_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(book.title().to_string())
        .bind(book.isbn().to_string())
        .bind(book.published_date())
        .bind(book.genre())
        .bind(book.author_id().to_string())
        .bind(book.updated_at())
        .bind(book.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                UpdateBookError::DuplicateIsbn {
                    isbn: book.isbn().to_string(),
                }
            } else if is_foreign_key_violation(&err) {
                UpdateBookError::AuthorNotFound {
                    author_id: book.author_id(),
                }
            } else {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to update book with id "{}""#, book.id()));
                UpdateBookError::Other(err)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(UpdateBookError::NotFound { id: book.id() });
        }

        Ok(())
    }

    async fn delete_book(&self, req: &DeleteBookRequest) -> Result<(), DeleteBookError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(req.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                let err =
                    anyhow!(err).context(format!(r#"Failed to delete book with id "{}""#, req.id()));
                DeleteBookError::Other(err)
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteBookError::NotFound { id: req.id() });
        }

        Ok(())
    }
}
