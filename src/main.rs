use book_catalog::config::Config;
use book_catalog::database::{DefaultAuthorRepository, DefaultBookRepository, establish_pool};
use book_catalog::http::{AppState, HttpServer, HttpServerConfig};
use book_catalog::services::{AuthorService, BookService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let pool = establish_pool(config.database_url()).await?;

    let author_repo = DefaultAuthorRepository::new(pool.clone());
    let book_repo = DefaultBookRepository::new(pool);
    let state = AppState::new(
        AuthorService::new(author_repo.clone()),
        BookService::new(book_repo, author_repo),
    );

    let server_config = HttpServerConfig::new(config.server_host(), config.server_port());
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
