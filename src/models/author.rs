use crate::models::book::Book;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A trimmed, non-empty name component (first or last name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(raw: &str) -> Result<Self, AuthorNameEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(AuthorNameEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Author name cannot be empty")]
pub struct AuthorNameEmptyError;

#[derive(Debug, Clone)]
pub struct Author {
    id: Uuid,
    first_name: AuthorName,
    last_name: AuthorName,
    bio: Option<String>,
    birth_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    // None until a fetch explicitly asks for the relation.
    books: Option<Vec<Book>>,
}

impl Author {
    pub const fn new(
        id: Uuid,
        first_name: AuthorName,
        last_name: AuthorName,
        bio: Option<String>,
        birth_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            bio,
            birth_date,
            created_at,
            updated_at,
            books: None,
        }
    }

    /// Builds a fresh Author from a create request. The id is generated
    /// here and `created_at == updated_at` at this point.
    pub fn create(req: &CreateAuthorRequest) -> Self {
        let now = Utc::now();
        Self::new(
            Uuid::new_v4(),
            req.first_name().clone(),
            req.last_name().clone(),
            req.bio().map(str::to_string),
            req.birth_date(),
            now,
            now,
        )
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn first_name(&self) -> &AuthorName {
        &self.first_name
    }

    pub const fn last_name(&self) -> &AuthorName {
        &self.last_name
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub const fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn books(&self) -> Option<&[Book]> {
        self.books.as_deref()
    }

    pub fn attach_books(&mut self, books: Vec<Book>) {
        self.books = Some(books);
    }

    /// Merges the fields present in a partial update over this record and
    /// refreshes `updated_at`. Absent fields are left untouched.
    pub fn apply_update(&mut self, req: &UpdateAuthorRequest) {
        if let Some(first_name) = req.first_name() {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = req.last_name() {
            self.last_name = last_name.clone();
        }
        if let Some(bio) = req.bio() {
            self.bio = Some(bio.to_string());
        }
        if let Some(birth_date) = req.birth_date() {
            self.birth_date = Some(birth_date);
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug)]
pub struct CreateAuthorRequest {
    first_name: AuthorName,
    last_name: AuthorName,
    bio: Option<String>,
    birth_date: Option<NaiveDate>,
}

impl CreateAuthorRequest {
    pub const fn new(first_name: AuthorName, last_name: AuthorName) -> Self {
        Self {
            first_name,
            last_name,
            bio: None,
            birth_date: None,
        }
    }

    pub const fn first_name(&self) -> &AuthorName {
        &self.first_name
    }

    pub const fn last_name(&self) -> &AuthorName {
        &self.last_name
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn set_bio(&mut self, bio: String) {
        self.bio = Some(bio);
    }

    pub const fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = Some(birth_date);
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct CreateAuthorError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct FindAuthorRequest {
    id: Uuid,
    include_books: bool,
}

impl FindAuthorRequest {
    pub const fn new(id: Uuid) -> Self {
        Self {
            id,
            include_books: false,
        }
    }

    /// Asks the store to load the referencing books alongside the author.
    pub const fn with_books(mut self) -> Self {
        self.include_books = true;
        self
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn include_books(&self) -> bool {
        self.include_books
    }
}

#[derive(Error, Debug)]
pub enum FindAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: Uuid },
    #[error(transparent)]
    Other(anyhow::Error),
}

/// Optional filters for listing authors. Text filters match
/// case-insensitively on any substring; provided filters AND together.
#[derive(Debug, Default)]
pub struct AuthorFilter {
    first_name: Option<String>,
    last_name: Option<String>,
}

impl AuthorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn set_first_name(&mut self, first_name: String) {
        self.first_name = Some(first_name);
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn set_last_name(&mut self, last_name: String) {
        self.last_name = Some(last_name);
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ListAuthorsError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct UpdateAuthorRequest {
    id: Uuid,
    first_name: Option<AuthorName>,
    last_name: Option<AuthorName>,
    bio: Option<String>,
    birth_date: Option<NaiveDate>,
}

impl UpdateAuthorRequest {
    pub const fn new(id: Uuid) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            bio: None,
            birth_date: None,
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn first_name(&self) -> Option<&AuthorName> {
        self.first_name.as_ref()
    }

    pub fn set_first_name(&mut self, first_name: AuthorName) {
        self.first_name = Some(first_name);
    }

    pub const fn last_name(&self) -> Option<&AuthorName> {
        self.last_name.as_ref()
    }

    pub fn set_last_name(&mut self, last_name: AuthorName) {
        self.last_name = Some(last_name);
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn set_bio(&mut self, bio: String) {
        self.bio = Some(bio);
    }

    pub const fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = Some(birth_date);
    }
}

#[derive(Error, Debug)]
pub enum UpdateAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: Uuid },
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<FindAuthorError> for UpdateAuthorError {
    fn from(err: FindAuthorError) -> Self {
        match err {
            FindAuthorError::NotFound { id } => Self::NotFound { id },
            FindAuthorError::Other(cause) => Self::Other(cause),
        }
    }
}

#[derive(Debug)]
pub struct DeleteAuthorRequest {
    id: Uuid,
}

impl DeleteAuthorRequest {
    pub const fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: Uuid },
    #[error("Cannot delete author with {count} associated book(s)")]
    HasBooks { id: Uuid, count: usize },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<FindAuthorError> for DeleteAuthorError {
    fn from(err: FindAuthorError) -> Self {
        match err {
            FindAuthorError::NotFound { id } => Self::NotFound { id },
            FindAuthorError::Other(cause) => Self::Other(cause),
        }
    }
}
