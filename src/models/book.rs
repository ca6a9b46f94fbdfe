use crate::models::author::{Author, FindAuthorError};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

/// A trimmed, non-empty book title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTitle(String);

impl BookTitle {
    pub fn new(raw: &str) -> Result<Self, BookTitleEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(BookTitleEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for BookTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Book title cannot be empty")]
pub struct BookTitleEmptyError;

/// A hyphenated ISBN, e.g. "978-3-16-148410-0".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(raw: &str) -> Result<Self, IsbnError> {
        let trimmed = raw.trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.into()))
        } else {
            Err(IsbnError(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    fn is_valid(s: &str) -> bool {
        static RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^\d{3}-\d{1,5}-\d{1,7}-\d{1,7}-\d$").unwrap());
        RE.is_match(s)
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("{0} is not a valid ISBN")]
pub struct IsbnError(String);

#[derive(Debug, Clone)]
pub struct Book {
    id: Uuid,
    title: BookTitle,
    isbn: Isbn,
    published_date: Option<NaiveDate>,
    genre: Option<String>,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    // None unless the book was loaded joined with its author.
    author: Option<Author>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        id: Uuid,
        title: BookTitle,
        isbn: Isbn,
        published_date: Option<NaiveDate>,
        genre: Option<String>,
        author_id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            isbn,
            published_date,
            genre,
            author_id,
            created_at,
            updated_at,
            author: None,
        }
    }

    /// Builds a fresh Book from a create request and its resolved author.
    /// The caller is responsible for having resolved the author first.
    pub fn create(req: &CreateBookRequest, author: Author) -> Self {
        let now = Utc::now();
        let mut book = Self::new(
            Uuid::new_v4(),
            req.title().clone(),
            req.isbn().clone(),
            req.published_date(),
            req.genre().map(str::to_string),
            author.id(),
            now,
            now,
        );
        book.attach_author(author);
        book
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn title(&self) -> &BookTitle {
        &self.title
    }

    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub const fn published_date(&self) -> Option<NaiveDate> {
        self.published_date
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub const fn author_id(&self) -> Uuid {
        self.author_id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub const fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    pub fn attach_author(&mut self, author: Author) {
        self.author = Some(author);
    }

    /// Points the book at a different author, keeping the reference and
    /// the embedded author consistent.
    pub fn reassign_author(&mut self, author: Author) {
        self.author_id = author.id();
        self.author = Some(author);
    }

    /// Merges the fields present in a partial update over this record and
    /// refreshes `updated_at`. The author reference is reassigned
    /// separately, before the merge.
    pub fn apply_update(&mut self, req: &UpdateBookRequest) {
        if let Some(title) = req.title() {
            self.title = title.clone();
        }
        if let Some(isbn) = req.isbn() {
            self.isbn = isbn.clone();
        }
        if let Some(published_date) = req.published_date() {
            self.published_date = Some(published_date);
        }
        if let Some(genre) = req.genre() {
            self.genre = Some(genre.to_string());
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug)]
pub struct CreateBookRequest {
    title: BookTitle,
    isbn: Isbn,
    published_date: Option<NaiveDate>,
    genre: Option<String>,
    author_id: Uuid,
}

impl CreateBookRequest {
    pub const fn new(title: BookTitle, isbn: Isbn, author_id: Uuid) -> Self {
        Self {
            title,
            isbn,
            published_date: None,
            genre: None,
            author_id,
        }
    }

    pub const fn title(&self) -> &BookTitle {
        &self.title
    }

    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub const fn published_date(&self) -> Option<NaiveDate> {
        self.published_date
    }

    pub fn set_published_date(&mut self, published_date: NaiveDate) {
        self.published_date = Some(published_date);
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn set_genre(&mut self, genre: String) {
        self.genre = Some(genre);
    }

    pub const fn author_id(&self) -> Uuid {
        self.author_id
    }
}

#[derive(Error, Debug)]
pub enum CreateBookError {
    #[error("Author with id \"{author_id}\" does not exist")]
    AuthorNotFound { author_id: Uuid },
    #[error("Book with ISBN \"{isbn}\" already exists")]
    DuplicateIsbn { isbn: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<FindAuthorError> for CreateBookError {
    fn from(err: FindAuthorError) -> Self {
        match err {
            FindAuthorError::NotFound { id } => Self::AuthorNotFound { author_id: id },
            FindAuthorError::Other(cause) => Self::Other(cause),
        }
    }
}

#[derive(Debug)]
pub struct FindBookRequest {
    id: Uuid,
}

impl FindBookRequest {
    pub const fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindBookError(#[from] pub anyhow::Error);

/// Optional filters for listing books. `title` and `isbn` match
/// case-insensitively on any substring; `author_id` matches exactly.
#[derive(Debug, Default)]
pub struct BookFilter {
    title: Option<String>,
    isbn: Option<String>,
    author_id: Option<Uuid>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: String) {
        self.title = Some(title);
    }

    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn set_isbn(&mut self, isbn: String) {
        self.isbn = Some(isbn);
    }

    pub const fn author_id(&self) -> Option<Uuid> {
        self.author_id
    }

    pub fn set_author_id(&mut self, author_id: Uuid) {
        self.author_id = Some(author_id);
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ListBooksError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct UpdateBookRequest {
    id: Uuid,
    title: Option<BookTitle>,
    isbn: Option<Isbn>,
    published_date: Option<NaiveDate>,
    genre: Option<String>,
    author_id: Option<Uuid>,
}

impl UpdateBookRequest {
    pub const fn new(id: Uuid) -> Self {
        Self {
            id,
            title: None,
            isbn: None,
            published_date: None,
            genre: None,
            author_id: None,
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn title(&self) -> Option<&BookTitle> {
        self.title.as_ref()
    }

    pub fn set_title(&mut self, title: BookTitle) {
        self.title = Some(title);
    }

    pub const fn isbn(&self) -> Option<&Isbn> {
        self.isbn.as_ref()
    }

    pub fn set_isbn(&mut self, isbn: Isbn) {
        self.isbn = Some(isbn);
    }

    pub const fn published_date(&self) -> Option<NaiveDate> {
        self.published_date
    }

    pub fn set_published_date(&mut self, published_date: NaiveDate) {
        self.published_date = Some(published_date);
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn set_genre(&mut self, genre: String) {
        self.genre = Some(genre);
    }

    pub const fn author_id(&self) -> Option<Uuid> {
        self.author_id
    }

    pub fn set_author_id(&mut self, author_id: Uuid) {
        self.author_id = Some(author_id);
    }
}

#[derive(Error, Debug)]
pub enum UpdateBookError {
    #[error("Book with id \"{id}\" does not exist")]
    NotFound { id: Uuid },
    #[error("Author with id \"{author_id}\" does not exist")]
    AuthorNotFound { author_id: Uuid },
    #[error("Book with ISBN \"{isbn}\" already exists")]
    DuplicateIsbn { isbn: String },
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<FindAuthorError> for UpdateBookError {
    fn from(err: FindAuthorError) -> Self {
        match err {
            FindAuthorError::NotFound { id } => Self::AuthorNotFound { author_id: id },
            FindAuthorError::Other(cause) => Self::Other(cause),
        }
    }
}

impl From<FindBookError> for UpdateBookError {
    fn from(err: FindBookError) -> Self {
        Self::Other(err.0)
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: Uuid,
}

impl DeleteBookRequest {
    pub const fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteBookError {
    #[error("Book with id \"{id}\" does not exist")]
    NotFound { id: Uuid },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<FindBookError> for DeleteBookError {
    fn from(err: FindBookError) -> Self {
        Self::Other(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Isbn;

    #[test]
    fn accepts_hyphenated_isbns() {
        assert!(Isbn::new("978-3-16-148410-0").is_ok());
        assert!(Isbn::new("978-0-06-085052-4").is_ok());
        assert!(Isbn::new(" 978-0-06-085052-4 ").is_ok());
    }

    #[test]
    fn rejects_malformed_isbns() {
        assert!(Isbn::new("").is_err());
        assert!(Isbn::new("9783161484100").is_err());
        assert!(Isbn::new("97-3-16-148410-0").is_err());
        assert!(Isbn::new("978-3-16-148410-01").is_err());
        assert!(Isbn::new("978-3-16-148410-x").is_err());
    }
}
