use crate::models::author::FindAuthorRequest;
use crate::models::book::{
    Book, BookFilter, CreateBookError, CreateBookRequest, DeleteBookError, DeleteBookRequest,
    FindBookError, FindBookRequest, ListBooksError, UpdateBookError, UpdateBookRequest,
};
use crate::models::query::{Page, PageRequest};
use crate::repositories::{AuthorRepository, BookRepository};

/// Owns the Book lifecycle. Writes resolve the referenced author first,
/// so no book is ever persisted with a dangling author reference.
#[derive(Debug)]
pub struct BookService<BR, AR> {
    books: BR,
    authors: AR,
}

impl<BR, AR> BookService<BR, AR>
where
    BR: BookRepository,
    AR: AuthorRepository,
{
    pub const fn new(books: BR, authors: AR) -> Self {
        Self { books, authors }
    }

    pub async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, CreateBookError> {
        let author = self
            .authors
            .find_author(&FindAuthorRequest::new(req.author_id()))
            .await?;

        let book = Book::create(req, author);
        self.books.create_book(&book).await?;
        tracing::info!(book_id = %book.id(), author_id = %book.author_id(), "created book");
        Ok(book)
    }

    /// Loads a book with its author. A missing id yields `Ok(None)`, not
    /// an error (unlike authors, where a missing id is a NotFound).
    pub async fn find_book(&self, req: &FindBookRequest) -> Result<Option<Book>, FindBookError> {
        self.books.find_book(req).await
    }

    pub async fn list_books(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> Result<Page<Book>, ListBooksError> {
        self.books.list_books(filter, page).await
    }

    pub async fn update_book(&self, req: &UpdateBookRequest) -> Result<Book, UpdateBookError> {
        let Some(mut book) = self.books.find_book(&FindBookRequest::new(req.id())).await? else {
            return Err(UpdateBookError::NotFound { id: req.id() });
        };

        // A reassignment resolves the new author before anything is
        // merged or written; failure leaves the book untouched.
        if let Some(author_id) = req.author_id() {
            let author = self
                .authors
                .find_author(&FindAuthorRequest::new(author_id))
                .await?;
            book.reassign_author(author);
        }

        book.apply_update(req);
        self.books.update_book(&book).await?;
        Ok(book)
    }

    pub async fn delete_book(&self, req: &DeleteBookRequest) -> Result<(), DeleteBookError> {
        let book = self.books.find_book(&FindBookRequest::new(req.id())).await?;
        if book.is_none() {
            return Err(DeleteBookError::NotFound { id: req.id() });
        }

        self.books.delete_book(req).await?;
        tracing::info!(book_id = %req.id(), "deleted book");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::BookService;
    use crate::database::{DefaultAuthorRepository, DefaultBookRepository, connect_test_pool};
    use crate::models::author::{
        Author, AuthorName, CreateAuthorRequest, DeleteAuthorError, DeleteAuthorRequest,
        FindAuthorError, FindAuthorRequest,
    };
    use crate::models::book::{
        BookFilter, BookTitle, CreateBookError, CreateBookRequest, DeleteBookError,
        DeleteBookRequest, FindBookRequest, Isbn, UpdateBookError, UpdateBookRequest,
    };
    use crate::models::query::PageRequest;
    use crate::services::AuthorService;
    use uuid::Uuid;

    type Services = (
        AuthorService<DefaultAuthorRepository>,
        BookService<DefaultBookRepository, DefaultAuthorRepository>,
    );

    async fn setup() -> Services {
        let pool = connect_test_pool().await;
        let author_repo = DefaultAuthorRepository::new(pool.clone());
        let authors = AuthorService::new(author_repo.clone());
        let books = BookService::new(DefaultBookRepository::new(pool), author_repo);
        (authors, books)
    }

    async fn create_author(
        authors: &AuthorService<DefaultAuthorRepository>,
        first_name: &str,
        last_name: &str,
    ) -> Author {
        let req = CreateAuthorRequest::new(
            AuthorName::new(first_name).expect("valid first name"),
            AuthorName::new(last_name).expect("valid last name"),
        );
        authors
            .create_author(&req)
            .await
            .expect("should create author")
    }

    fn book_request(title: &str, isbn: &str, author_id: Uuid) -> CreateBookRequest {
        CreateBookRequest::new(
            BookTitle::new(title).expect("valid title"),
            Isbn::new(isbn).expect("valid isbn"),
            author_id,
        )
    }

    #[tokio::test]
    async fn create_fails_and_persists_nothing_for_unknown_author() {
        let (_, books) = setup().await;

        let err = books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", Uuid::new_v4()))
            .await
            .expect_err("should not create book");
        assert!(matches!(err, CreateBookError::AuthorNotFound { .. }));

        let page = books
            .list_books(&BookFilter::new(), &PageRequest::default())
            .await
            .expect("should list books");
        assert_eq!(0, page.total());
    }

    #[tokio::test]
    async fn create_embeds_the_resolved_author() {
        let (authors, books) = setup().await;

        let author = create_author(&authors, "Anjan", "Das").await;
        let book = books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", author.id()))
            .await
            .expect("should create book");

        assert_eq!(author.id(), book.author_id());
        assert_eq!(author.id(), book.author().expect("author attached").id());
        assert_eq!(book.created_at(), book.updated_at());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_isbns() {
        let (authors, books) = setup().await;

        let author = create_author(&authors, "Anjan", "Das").await;
        books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", author.id()))
            .await
            .expect("should create book");

        let err = books
            .create_book(&book_request("Another Life", "978-0-06-085052-4", author.id()))
            .await
            .expect_err("duplicate isbn should be rejected");
        assert!(matches!(err, CreateBookError::DuplicateIsbn { .. }));
    }

    #[tokio::test]
    async fn find_returns_none_for_unknown_id() {
        let (_, books) = setup().await;

        let found = books
            .find_book(&FindBookRequest::new(Uuid::new_v4()))
            .await
            .expect("lookup should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_loads_the_book_with_its_author() {
        let (authors, books) = setup().await;

        let author = create_author(&authors, "Anjan", "Das").await;
        let book = books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", author.id()))
            .await
            .expect("should create book");

        let loaded = books
            .find_book(&FindBookRequest::new(book.id()))
            .await
            .expect("lookup should succeed")
            .expect("book should exist");
        assert_eq!(book.id(), loaded.id());
        assert_eq!(author.id(), loaded.author().expect("author joined").id());
    }

    #[tokio::test]
    async fn list_filters_by_title_isbn_and_author() {
        let (authors, books) = setup().await;

        let first = create_author(&authors, "Anjan", "Das").await;
        let second = create_author(&authors, "Yann", "Martel").await;
        books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", first.id()))
            .await
            .expect("should create book");
        books
            .create_book(&book_request("Brave New World", "978-0-06-085053-1", first.id()))
            .await
            .expect("should create book");
        books
            .create_book(&book_request("Beatrice and Virgil", "978-1-4000-6926-2", second.id()))
            .await
            .expect("should create book");

        let mut filter = BookFilter::new();
        filter.set_title("life".to_string());
        let page = books
            .list_books(&filter, &PageRequest::default())
            .await
            .expect("should list books");
        assert_eq!(1, page.total());
        assert_eq!("Life of Pi", page.data()[0].title().to_string());

        let mut filter = BookFilter::new();
        filter.set_isbn("4000".to_string());
        let page = books
            .list_books(&filter, &PageRequest::default())
            .await
            .expect("should list books");
        assert_eq!(1, page.total());

        let mut filter = BookFilter::new();
        filter.set_author_id(first.id());
        let page = books
            .list_books(&filter, &PageRequest::default())
            .await
            .expect("should list books");
        assert_eq!(2, page.total());
        assert!(
            page.data()
                .iter()
                .all(|book| book.author().expect("author joined").id() == first.id())
        );

        let mut filter = BookFilter::new();
        filter.set_title("life".to_string());
        filter.set_author_id(second.id());
        let page = books
            .list_books(&filter, &PageRequest::default())
            .await
            .expect("should list books");
        assert_eq!(0, page.total());
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let (authors, books) = setup().await;

        let author = create_author(&authors, "Yann", "Martel").await;
        let book = books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", author.id()))
            .await
            .expect("should create book");

        let mut update = UpdateBookRequest::new(book.id());
        update.set_genre("Psychological Fiction".to_string());
        let updated = books
            .update_book(&update)
            .await
            .expect("should update book");

        assert_eq!("Life of Pi", updated.title().to_string());
        assert_eq!("978-0-06-085052-4", updated.isbn().to_string());
        assert_eq!(Some("Psychological Fiction"), updated.genre());
        assert_eq!(author.id(), updated.author_id());
    }

    #[tokio::test]
    async fn update_fails_with_not_found_for_unknown_id() {
        let (_, books) = setup().await;

        let mut update = UpdateBookRequest::new(Uuid::new_v4());
        update.set_genre("Novel".to_string());
        let err = books
            .update_book(&update)
            .await
            .expect_err("should not update book");
        assert!(matches!(err, UpdateBookError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_to_unknown_author_keeps_the_original_reference() {
        let (authors, books) = setup().await;

        let author = create_author(&authors, "Yann", "Martel").await;
        let book = books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", author.id()))
            .await
            .expect("should create book");

        let mut update = UpdateBookRequest::new(book.id());
        update.set_author_id(Uuid::new_v4());
        let err = books
            .update_book(&update)
            .await
            .expect_err("unknown author should be rejected");
        assert!(matches!(err, UpdateBookError::AuthorNotFound { .. }));

        let loaded = books
            .find_book(&FindBookRequest::new(book.id()))
            .await
            .expect("lookup should succeed")
            .expect("book should exist");
        assert_eq!(author.id(), loaded.author_id());
    }

    #[tokio::test]
    async fn update_reassigns_the_author() {
        let (authors, books) = setup().await;

        let first = create_author(&authors, "Anjan", "Das").await;
        let second = create_author(&authors, "Yann", "Martel").await;
        let book = books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", first.id()))
            .await
            .expect("should create book");

        let mut update = UpdateBookRequest::new(book.id());
        update.set_author_id(second.id());
        let updated = books
            .update_book(&update)
            .await
            .expect("should update book");
        assert_eq!(second.id(), updated.author_id());

        let loaded = books
            .find_book(&FindBookRequest::new(book.id()))
            .await
            .expect("lookup should succeed")
            .expect("book should exist");
        assert_eq!(second.id(), loaded.author().expect("author joined").id());
    }

    #[tokio::test]
    async fn delete_removes_the_book() {
        let (authors, books) = setup().await;

        let author = create_author(&authors, "Yann", "Martel").await;
        let book = books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", author.id()))
            .await
            .expect("should create book");

        books
            .delete_book(&DeleteBookRequest::new(book.id()))
            .await
            .expect("should delete book");

        let found = books
            .find_book(&FindBookRequest::new(book.id()))
            .await
            .expect("lookup should succeed");
        assert!(found.is_none());

        let err = books
            .delete_book(&DeleteBookRequest::new(book.id()))
            .await
            .expect_err("second delete should fail");
        assert!(matches!(err, DeleteBookError::NotFound { .. }));
    }

    #[tokio::test]
    async fn catalog_round_trip() {
        let (authors, books) = setup().await;

        let author = create_author(&authors, "Anjan", "Das").await;
        let book = books
            .create_book(&book_request("Life of Pi", "978-0-06-085052-4", author.id()))
            .await
            .expect("should create book");

        let loaded = books
            .find_book(&FindBookRequest::new(book.id()))
            .await
            .expect("lookup should succeed")
            .expect("book should exist");
        assert_eq!(author.id(), loaded.author().expect("author joined").id());

        let err = authors
            .delete_author(&DeleteAuthorRequest::new(author.id()))
            .await
            .expect_err("delete should be blocked");
        assert!(matches!(err, DeleteAuthorError::HasBooks { count: 1, .. }));

        books
            .delete_book(&DeleteBookRequest::new(book.id()))
            .await
            .expect("should delete book");
        authors
            .delete_author(&DeleteAuthorRequest::new(author.id()))
            .await
            .expect("should delete author");

        let err = authors
            .find_author(&FindAuthorRequest::new(author.id()))
            .await
            .expect_err("author should be gone");
        assert!(matches!(err, FindAuthorError::NotFound { .. }));
    }
}
