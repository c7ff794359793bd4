use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use fieldx::fxstruct;
use sea_orm::ConnectOptions;
use sea_orm::ConnectionTrait;
use sea_orm::DatabaseConnection;
use tracing::debug;
use tracing::error;

use crate::types::Result;

use super::DatabaseDriver;

/// SQLite backend. The database file is created if missing.
///
/// The pool holds a single connection: SQLite has one writer at a time, and a deferred transaction that reads first
/// can't upgrade to a write lock once another writer has committed. With one connection transactions queue up in the
/// pool instead and never see each other half-way.
#[derive(Debug)]
#[fxstruct(sync, no_new)]
pub struct Sqlite {
    connection: DatabaseConnection,
}

impl Sqlite {
    pub async fn connect(db_path: &Path) -> Result<Self> {
        let schema = format!("sqlite://{}?mode=rwc", db_path.display());
        let mut opts = ConnectOptions::new(&schema);
        opts.max_connections(1)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30));

        let db = sea_orm::Database::connect(opts)
            .await
            .inspect_err(|e| error!("Error connecting to database {schema}: {e}"))?;

        debug!("Connected to {schema}");

        Ok(Self { connection: db })
    }
}

#[async_trait]
impl DatabaseDriver for Sqlite {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Switch the database into WAL mode so that readers don't block the writer.
    async fn configure(&self) -> Result<()> {
        let db = &self.connection;

        db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        db.execute_unprepared("PRAGMA synchronous=NORMAL;").await?;

        Ok(())
    }
}
