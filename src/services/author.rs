use crate::models::author::{
    Author, AuthorFilter, CreateAuthorError, CreateAuthorRequest, DeleteAuthorError,
    DeleteAuthorRequest, FindAuthorError, FindAuthorRequest, ListAuthorsError, UpdateAuthorError,
    UpdateAuthorRequest,
};
use crate::models::query::{Page, PageRequest};
use crate::repositories::AuthorRepository;

/// Owns the Author lifecycle. Deletion is refused while any book still
/// references the author.
#[derive(Debug)]
pub struct AuthorService<R> {
    repository: R,
}

impl<R> AuthorService<R>
where
    R: AuthorRepository,
{
    pub const fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn create_author(
        &self,
        req: &CreateAuthorRequest,
    ) -> Result<Author, CreateAuthorError> {
        let author = Author::create(req);
        self.repository.create_author(&author).await?;
        tracing::info!(author_id = %author.id(), "created author");
        Ok(author)
    }

    pub async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError> {
        self.repository.find_author(req).await
    }

    pub async fn list_authors(
        &self,
        filter: &AuthorFilter,
        page: &PageRequest,
    ) -> Result<Page<Author>, ListAuthorsError> {
        self.repository.list_authors(filter, page).await
    }

    pub async fn update_author(
        &self,
        req: &UpdateAuthorRequest,
    ) -> Result<Author, UpdateAuthorError> {
        let mut author = self
            .repository
            .find_author(&FindAuthorRequest::new(req.id()))
            .await?;
        author.apply_update(req);
        self.repository.update_author(&author).await?;
        Ok(author)
    }

    pub async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
        let author = self
            .repository
            .find_author(&FindAuthorRequest::new(req.id()).with_books())
            .await?;

        let count = author.books().map_or(0, <[_]>::len);
        if count > 0 {
            return Err(DeleteAuthorError::HasBooks { id: req.id(), count });
        }

        // The check above and the delete are two separate store calls; a
        // book created in between makes the delete fail on the foreign
        // key instead of leaving a dangling reference.
        self.repository.delete_author(req).await?;
        tracing::info!(author_id = %req.id(), "deleted author");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AuthorService;
    use crate::database::{DefaultAuthorRepository, DefaultBookRepository, connect_test_pool};
    use crate::models::author::{
        AuthorFilter, AuthorName, CreateAuthorRequest, DeleteAuthorError, DeleteAuthorRequest,
        FindAuthorError, FindAuthorRequest, UpdateAuthorError, UpdateAuthorRequest,
    };
    use crate::models::book::{Book, BookTitle, CreateBookRequest, Isbn};
    use crate::models::query::PageRequest;
    use crate::repositories::BookRepository;
    use chrono::NaiveDate;
    use uuid::Uuid;

    async fn setup() -> (AuthorService<DefaultAuthorRepository>, DefaultBookRepository) {
        let pool = connect_test_pool().await;
        let authors = AuthorService::new(DefaultAuthorRepository::new(pool.clone()));
        let books = DefaultBookRepository::new(pool);
        (authors, books)
    }

    fn create_request(first_name: &str, last_name: &str) -> CreateAuthorRequest {
        CreateAuthorRequest::new(
            AuthorName::new(first_name).expect("valid first name"),
            AuthorName::new(last_name).expect("valid last name"),
        )
    }

    #[tokio::test]
    async fn create_generates_fresh_ids_and_equal_timestamps() {
        let (authors, _) = setup().await;

        let first = authors
            .create_author(&create_request("Anjan", "Das"))
            .await
            .expect("should create author");
        let second = authors
            .create_author(&create_request("Anjan", "Das"))
            .await
            .expect("should create author");

        assert_ne!(first.id(), second.id());
        assert_eq!(first.created_at(), first.updated_at());
    }

    #[tokio::test]
    async fn find_fails_with_not_found_for_unknown_id() {
        let (authors, _) = setup().await;

        let err = authors
            .find_author(&FindAuthorRequest::new(Uuid::new_v4()))
            .await
            .expect_err("should not find author");
        assert!(matches!(err, FindAuthorError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_with_books_loads_referencing_books() {
        let (authors, books) = setup().await;

        let author = authors
            .create_author(&create_request("Anjan", "Das"))
            .await
            .expect("should create author");
        let req = CreateBookRequest::new(
            BookTitle::new("Life of Pi").expect("valid title"),
            Isbn::new("978-0-06-085052-4").expect("valid isbn"),
            author.id(),
        );
        books
            .create_book(&Book::create(&req, author.clone()))
            .await
            .expect("should create book");

        let loaded = authors
            .find_author(&FindAuthorRequest::new(author.id()).with_books())
            .await
            .expect("should find author");
        let loaded_books = loaded.books().expect("books should be loaded");
        assert_eq!(1, loaded_books.len());
        assert_eq!(author.id(), loaded_books[0].author_id());

        let without = authors
            .find_author(&FindAuthorRequest::new(author.id()))
            .await
            .expect("should find author");
        assert!(without.books().is_none());
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let (authors, _) = setup().await;

        let mut create = create_request("Anjan", "Das");
        create.set_bio("Original bio".to_string());
        create.set_birth_date(NaiveDate::from_ymd_opt(1994, 5, 18).expect("valid date"));
        let author = authors
            .create_author(&create)
            .await
            .expect("should create author");

        let mut update = UpdateAuthorRequest::new(author.id());
        update.set_bio("Updated bio".to_string());
        let updated = authors
            .update_author(&update)
            .await
            .expect("should update author");

        assert_eq!("Anjan", updated.first_name().to_string());
        assert_eq!("Das", updated.last_name().to_string());
        assert_eq!(Some("Updated bio"), updated.bio());
        assert_eq!(author.birth_date(), updated.birth_date());
        assert!(updated.updated_at() >= author.created_at());
    }

    #[tokio::test]
    async fn update_fails_with_not_found_for_unknown_id() {
        let (authors, _) = setup().await;

        let mut update = UpdateAuthorRequest::new(Uuid::new_v4());
        update.set_bio("Updated bio".to_string());
        let err = authors
            .update_author(&update)
            .await
            .expect_err("should not update author");
        assert!(matches!(err, UpdateAuthorError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_is_blocked_while_books_reference_the_author() {
        let (authors, books) = setup().await;

        let author = authors
            .create_author(&create_request("Anjan", "Das"))
            .await
            .expect("should create author");
        let req = CreateBookRequest::new(
            BookTitle::new("Life of Pi").expect("valid title"),
            Isbn::new("978-0-06-085052-4").expect("valid isbn"),
            author.id(),
        );
        books
            .create_book(&Book::create(&req, author.clone()))
            .await
            .expect("should create book");

        let err = authors
            .delete_author(&DeleteAuthorRequest::new(author.id()))
            .await
            .expect_err("delete should be blocked");
        assert!(matches!(err, DeleteAuthorError::HasBooks { count: 1, .. }));
        assert!(err.to_string().contains("1 associated book(s)"));

        // The author must still exist after the refused delete.
        authors
            .find_author(&FindAuthorRequest::new(author.id()))
            .await
            .expect("author should still exist");
    }

    #[tokio::test]
    async fn delete_without_books_removes_the_author() {
        let (authors, _) = setup().await;

        let author = authors
            .create_author(&create_request("Anjan", "Das"))
            .await
            .expect("should create author");
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

    #[tokio::test]
    async fn list_matches_substrings_case_insensitively() {
        let (authors, _) = setup().await;

        authors
            .create_author(&create_request("Anjan", "Das"))
            .await
            .expect("should create author");
        authors
            .create_author(&create_request("Bob", "Smith"))
            .await
            .expect("should create author");

        let mut filter = AuthorFilter::new();
        filter.set_first_name("anj".to_string());
        let page = authors
            .list_authors(&filter, &PageRequest::default())
            .await
            .expect("should list authors");
        assert_eq!(1, page.total());
        assert_eq!("Anjan", page.data()[0].first_name().to_string());

        // Filters AND together.
        let mut filter = AuthorFilter::new();
        filter.set_first_name("anj".to_string());
        filter.set_last_name("smith".to_string());
        let page = authors
            .list_authors(&filter, &PageRequest::default())
            .await
            .expect("should list authors");
        assert_eq!(0, page.total());
    }

    #[tokio::test]
    async fn list_paginates_with_total_and_page_count() {
        let (authors, _) = setup().await;

        for i in 0..12 {
            authors
                .create_author(&create_request(&format!("Author{i}"), "Smith"))
                .await
                .expect("should create author");
        }

        let first = authors
            .list_authors(&AuthorFilter::new(), &PageRequest::new(Some(1), Some(5)))
            .await
            .expect("should list authors");
        assert_eq!(5, first.data().len());
        assert_eq!(12, first.total());
        assert_eq!(3, first.page_count());

        // The last page holds the remainder.
        let last = authors
            .list_authors(&AuthorFilter::new(), &PageRequest::new(Some(3), Some(5)))
            .await
            .expect("should list authors");
        assert_eq!(2, last.data().len());
        assert_eq!(3, last.page());
        assert_eq!(5, last.limit());
    }
}
