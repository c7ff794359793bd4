use std::time::Duration;

use async_trait::async_trait;
use fieldx::fxstruct;
use sea_orm::ConnectOptions;
use sea_orm::DatabaseConnection;
use tracing::debug;
use tracing::error;

use crate::types::Result;

use super::DatabaseDriver;

/// PostgreSQL backend.
#[derive(Debug)]
#[fxstruct(sync, no_new)]
pub struct Pg {
    connection: DatabaseConnection,
}

impl Pg {
    pub async fn connect(host: &str, port: u16, user: &str, password: &str, database: &str) -> Result<Self> {
        let schema = format!("postgres://{user}:{password}@{host}:{port}/{database}");
        let mut opts = ConnectOptions::new(&schema);
        opts.max_connections(20)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(20))
            .max_lifetime(Duration::from_secs(60))
            .test_before_acquire(true);

        let db = sea_orm::Database::connect(opts)
            .await
            .inspect_err(|e| error!("Error connecting to database postgres://{user}@{host}:{port}/{database}: {e}"))?;

        debug!("Connected to postgres://{user}@{host}:{port}/{database}");

        Ok(Self { connection: db })
    }
}

#[async_trait]
impl DatabaseDriver for Pg {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    // Fulfillment relies on row locks taken by the order lookup; the server defaults are sufficient.
    async fn configure(&self) -> Result<()> {
        Ok(())
    }
}
