use anyhow::Context;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use std::str::FromStr;
use uuid::Uuid;

mod author;
mod book;

pub use author::DefaultAuthorRepository;
pub use book::DefaultBookRepository;

static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn establish_pool(path: &str) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(path)
        .with_context(|| format!("Invalid database path {path}"))?
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePool::connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database at {path}"))?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}

/// A WHERE clause assembled incrementally from optional filters. Clauses
/// AND together and values are always bound parameters, never spliced
/// into the SQL.
#[derive(Debug, Default)]
pub(crate) struct SqlConditions {
    clauses: Vec<&'static str>,
    binds: Vec<String>,
}

impl SqlConditions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match. The clause must compare a
    /// lowercased column against a placeholder, e.g. `LOWER(title) LIKE ?`.
    pub(crate) fn push_contains(&mut self, clause: &'static str, needle: &str) {
        self.clauses.push(clause);
        self.binds.push(format!("%{}%", needle.to_lowercase()));
    }

    pub(crate) fn push_equals(&mut self, clause: &'static str, value: String) {
        self.clauses.push(clause);
        self.binds.push(value);
    }

    pub(crate) fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(crate) fn binds(&self) -> &[String] {
        &self.binds
    }
}

pub(crate) fn parse_uuid(column: &str, raw: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(raw).map_err(|err| sqlx::Error::ColumnDecode {
        index: column.into(),
        source: Box::new(err),
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_unique_violation();
    }

    false
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_foreign_key_violation();
    }

    false
}

#[cfg(test)]
pub(crate) async fn connect_test_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("should parse in-memory path")
        .foreign_keys(true);
    // A single long-lived connection keeps the in-memory database alive
    // for the whole test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .expect("should open in-memory database");
    MIGRATOR.run(&pool).await.expect("should run migrations");
    pool
}
