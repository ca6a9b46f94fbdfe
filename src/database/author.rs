use crate::database::{SqlConditions, parse_uuid};
use crate::models::author::{
    Author, AuthorFilter, AuthorName, CreateAuthorError, DeleteAuthorError, DeleteAuthorRequest,
    FindAuthorError, FindAuthorRequest, ListAuthorsError, UpdateAuthorError,
};
use crate::models::book::Book;
use crate::models::query::{Page, PageRequest};
use crate::repositories::AuthorRepository;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, bio, birth_date, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct DefaultAuthorRepository {
    pool: SqlitePool,
}

impl DefaultAuthorRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let first_name: String = row.try_get("first_name")?;
        let last_name: String = row.try_get("last_name")?;
        let bio: Option<String> = row.try_get("bio")?;
        let birth_date: Option<NaiveDate> = row.try_get("birth_date")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        Ok(Self::new(
            parse_uuid("id", &id)?,
            AuthorName::new_unchecked(&first_name),
            AuthorName::new_unchecked(&last_name),
            bio,
            birth_date,
            created_at,
            updated_at,
        ))
    }
}

#[async_trait]
impl AuthorRepository for DefaultAuthorRepository {
    async fn create_author(&self, author: &Author) -> Result<(), CreateAuthorError> {
        sqlx::query(
            "INSERT INTO authors (id, first_name, last_name, bio, birth_date, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(author.id().to_string())
        .bind(author.first_name().to_string())
        .bind(author.last_name().to_string())
        .bind(author.bio())
        .bind(author.birth_date())
        .bind(author.created_at())
        .bind(author.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(
                r#"Failed to create author with id "{}""#,
                author.id()
            ));
            CreateAuthorError(err)
        })?;

        Ok(())
    }

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError> {
        let sql = format!("SELECT {AUTHOR_COLUMNS} FROM authors WHERE id = ?");
        let mut author: Author = sqlx::query_as(&sql)
            .bind(req.id().to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindAuthorError::NotFound { id: req.id() }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to retrieve author with id "{}""#,
                        req.id()
                    ));
                    FindAuthorError::Other(err)
                }
            })?;

        if req.include_books() {
            let books: Vec<Book> = sqlx::query_as(
                "SELECT id, title, isbn, published_date, genre, author_id, created_at, updated_at \
                 FROM books WHERE author_id = ? ORDER BY created_at, id",
            )
            .bind(req.id().to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context(format!(
                    r#"Failed to retrieve books for author with id "{}""#,
                    req.id()
                ));
                FindAuthorError::Other(err)
            })?;
            author.attach_books(books);
        }

        Ok(author)
    }

    async fn list_authors(
        &self,
        filter: &AuthorFilter,
        page: &PageRequest,
    ) -> Result<Page<Author>, ListAuthorsError> {
        let mut conditions = SqlConditions::new();
        if let Some(first_name) = filter.first_name() {
            conditions.push_contains("LOWER(first_name) LIKE ?", first_name);
        }
        if let Some(last_name) = filter.last_name() {
            conditions.push_contains("LOWER(last_name) LIKE ?", last_name);
        }

        let count_sql = format!("SELECT COUNT(*) FROM authors{}", conditions.where_clause());
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in conditions.binds() {
            count_query = count_query.bind(bind.as_str());
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(|err| {
            let err = anyhow!(err).context("Failed to count authors");
            ListAuthorsError(err)
        })?;

        let rows_sql = format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors{} ORDER BY created_at, id LIMIT ? OFFSET ?",
            conditions.where_clause()
        );
        let mut rows_query = sqlx::query_as::<_, Author>(&rows_sql);
        for bind in conditions.binds() {
            rows_query = rows_query.bind(bind.as_str());
        }
        let authors = rows_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context("Failed to list authors");
                ListAuthorsError(err)
            })?;

        Ok(Page::new(authors, total as u64, page))
    }

    async fn update_author(&self, author: &Author) -> Result<(), UpdateAuthorError> {
        let result = sqlx::query(
            "UPDATE authors SET first_name = ?, last_name = ?, bio = ?, birth_date = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(author.first_name().to_string())
        .bind(author.last_name().to_string())
        .bind(author.bio())
        .bind(author.birth_date())
        .bind(author.updated_at())
        .bind(author.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(
                r#"Failed to update author with id "{}""#,
                author.id()
            ));
            UpdateAuthorError::Other(err)
        })?;

        if result.rows_affected() == 0 {
            return Err(UpdateAuthorError::NotFound { id: author.id() });
        }

        Ok(())
    }

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(req.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to delete author with id "{}""#, req.id()));
                DeleteAuthorError::Other(err)
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteAuthorError::NotFound { id: req.id() });
        }

        Ok(())
    }
}
