use crate::repositories::{AuthorRepository, BookRepository};
use crate::services::{AuthorService, BookService};
use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod author;
pub mod book;
pub mod handler;

#[derive(Debug)]
pub struct AppState<AR, BR> {
    author_service: Arc<AuthorService<AR>>,
    book_service: Arc<BookService<BR, AR>>,
}

impl<AR, BR> AppState<AR, BR>
where
    AR: AuthorRepository,
    BR: BookRepository,
{
    pub fn new(author_service: AuthorService<AR>, book_service: BookService<BR, AR>) -> Self {
        Self {
            author_service: Arc::new(author_service),
            book_service: Arc::new(book_service),
        }
    }

    pub fn author_service(&self) -> &AuthorService<AR> {
        &self.author_service
    }

    pub fn book_service(&self) -> &BookService<BR, AR> {
        &self.book_service
    }
}

impl<AR, BR> Clone for AppState<AR, BR> {
    fn clone(&self) -> Self {
        Self {
            author_service: Arc::clone(&self.author_service),
            book_service: Arc::clone(&self.book_service),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    host: String,
    port: u16,
}

impl HttpServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<AR, BR>(
        state: AppState<AR, BR>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self>
    where
        AR: AuthorRepository,
        BR: BookRepository,
    {
        let router = Router::new()
            .nest("/api/v1", api_routes())
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let listener = TcpListener::bind(format!("{}:{}", config.host, config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        axum::serve(self.listener, self.router)
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

fn api_routes<AR, BR>() -> Router<AppState<AR, BR>>
where
    AR: AuthorRepository,
    BR: BookRepository,
{
    Router::new()
        .route(
            "/authors",
            post(author::create_author).get(author::list_authors),
        )
        .route(
            "/authors/{id}",
            get(author::get_author)
                .patch(author::update_author)
                .delete(author::delete_author),
        )
        .route("/books", post(book::create_book).get(book::list_books))
        .route(
            "/books/{id}",
            get(book::get_book)
                .patch(book::update_book)
                .delete(book::delete_book),
        )
}
