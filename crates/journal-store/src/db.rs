use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Pooled database handle. Connections are acquired per statement and
/// returned to the pool when the statement finishes, success or not.
#[derive(Clone)]
pub struct JournalDb {
    pool: SqlitePool,
}

impl JournalDb {
    /// Open (or create) the journal database and make sure the schema exists.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<()> {
        let schema = include_str!("../../../schema.sql");

        // Strip line comments before splitting so a ';' inside a comment
        // doesn't get mistaken for a statement terminator.
        let without_comments: String = schema
            .lines()
            .filter(|line| !line.trim_start().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");

        // sqlx runs one statement at a time, so split on ';'
        for statement in without_comments.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&self.pool).await?;
            }
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
