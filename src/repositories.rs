use crate::models::author::{
    Author, AuthorFilter, CreateAuthorError, DeleteAuthorError, DeleteAuthorRequest,
    FindAuthorError, FindAuthorRequest, ListAuthorsError, UpdateAuthorError,
};
use crate::models::book::{
    Book, BookFilter, CreateBookError, DeleteBookError, DeleteBookRequest, FindBookError,
    FindBookRequest, ListBooksError, UpdateBookError,
};
use crate::models::query::{Page, PageRequest};
use async_trait::async_trait;

#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    async fn create_author(&self, author: &Author) -> Result<(), CreateAuthorError>;

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError>;

    async fn list_authors(
        &self,
        filter: &AuthorFilter,
        page: &PageRequest,
    ) -> Result<Page<Author>, ListAuthorsError>;

    async fn update_author(&self, author: &Author) -> Result<(), UpdateAuthorError>;

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    async fn create_book(&self, book: &Book) -> Result<(), CreateBookError>;

    /// Loads a book joined with its author. Absent books are `None`, not
    /// an error.
    async fn find_book(&self, req: &FindBookRequest) -> Result<Option<Book>, FindBookError>;

    async fn list_books(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> Result<Page<Book>, ListBooksError>;

    async fn update_book(&self, book: &Book) -> Result<(), UpdateBookError>;

    async fn delete_book(&self, req: &DeleteBookRequest) -> Result<(), DeleteBookError>;
}
