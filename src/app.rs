//! The service application: configuration, tracing, database wiring.
use std::fmt::Debug;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use clap::error::ErrorKind;
use clap::Parser;
use fieldx::fxstruct;
use fieldx_plus::fx_plus;
use garde::Validate;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing::instrument;

#[cfg(feature = "pg")]
use crate::db::driver::pg::Pg;
#[cfg(feature = "sqlite")]
use crate::db::driver::sqlite::Sqlite;
use crate::db::driver::DatabaseDriver;
use crate::db::migrations::Migrator;
use crate::http;
use crate::types::FulfillmentError;
use crate::types::Result;
use crate::workflow::OrderFulfillmentWorkflow;

#[derive(Debug, Clone, clap::Parser, Validate)]
#[fxstruct(no_new, get(copy))]
#[clap(about, version, name = "warehouse-fulfillment")]
pub(crate) struct Cli {
    /// Address to listen on.
    #[clap(long, short, env = "WAREHOUSE_LISTEN", default_value = "127.0.0.1:8080")]
    #[garde(skip)]
    listen: SocketAddr,

    /// Use SQLite as the database backend.
    #[clap(long, env = "WAREHOUSE_SQLITE", default_value_t = false)]
    #[garde(custom(Self::feature_enabled(cfg!(feature = "sqlite"), "sqlite")))]
    sqlite: bool,

    /// Path to the SQLite database file. Created if missing.
    #[clap(long, env = "WAREHOUSE_SQLITE_PATH", default_value = "warehouse.db")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    sqlite_path: PathBuf,

    /// Use PostgreSQL as the database backend.
    #[clap(long, env = "WAREHOUSE_PG", default_value_t = false)]
    #[garde(custom(Self::pg_backend(cfg!(feature = "pg"), &self.sqlite)))]
    pg: bool,

    // Getters are only used with the `pg` feature.
    #[clap(long, env = "WAREHOUSE_PG_HOST", default_value = "localhost")]
    #[fieldx(get(clone, attributes_fn(allow(dead_code))))]
    #[garde(skip)]
    pg_host: String,

    #[clap(long, env = "WAREHOUSE_PG_PORT", default_value_t = 5432)]
    #[fieldx(get(copy, attributes_fn(allow(dead_code))))]
    #[garde(range(min = 1))]
    pg_port: u16,

    #[clap(long, env = "WAREHOUSE_PG_USER", default_value = "warehouse")]
    #[fieldx(get(clone, attributes_fn(allow(dead_code))))]
    #[garde(skip)]
    pg_user: String,

    #[clap(long, env = "WAREHOUSE_PG_PASSWORD", hide_env_values = true, default_value = "warehouse")]
    #[fieldx(get(clone, attributes_fn(allow(dead_code))))]
    #[garde(skip)]
    pg_password: String,

    #[clap(long, env = "WAREHOUSE_PG_DATABASE", default_value = "warehouse")]
    #[fieldx(get(clone, attributes_fn(allow(dead_code))))]
    #[garde(length(min = 1))]
    pg_database: String,

    /// Create or upgrade the database schema before serving.
    #[clap(long, short, env = "WAREHOUSE_MIGRATE", default_value_t = false)]
    #[garde(skip)]
    migrate: bool,

    /// File to send log into
    #[clap(long, env = "WAREHOUSE_LOG_FILE")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn feature_enabled<'a>(enabled: bool, feature: &'static str) -> impl FnOnce(&'a bool, &()) -> garde::Result {
        move |value, _| {
            if !*value || enabled {
                Ok(())
            }
            else {
                Err(garde::Error::new(format!("Build feature '{feature}' must be enabled.")))
            }
        }
    }

    // Only one backend can be active at a time.
    fn pg_backend<'a>(enabled: bool, sqlite: &'a bool) -> impl FnOnce(&'a bool, &()) -> garde::Result {
        move |value, ctx| {
            if *value && *sqlite {
                Err(garde::Error::new("can't be used together with --sqlite"))
            }
            else {
                Self::feature_enabled(enabled, "pg")(value, ctx)
            }
        }
    }
}

#[fx_plus(
    app,
    rc,
    new(private),
    sync,
    get,
    fallible(off, error(FulfillmentError)),
    builder(vis(pub))
)]
pub struct FulfillmentApp {
    #[fieldx(inner_mut, clearer, builder("_cli_args"))]
    cli_args: Vec<String>,

    #[fieldx(lazy, private, fallible(error(clap::Error)), get(clone))]
    cli: Cli,
}

impl FulfillmentApp {
    fn build_cli(&self) -> Result<Cli, clap::Error> {
        Ok(if let Some(custom_args) = self.clear_cli_args() {
            Cli::try_parse_from(custom_args.into_iter())?
        }
        else {
            Cli::try_parse()?
        })
    }

    fn validate(&self) -> Result<()> {
        let cli = self.cli()?;

        if let Err(report) = cli.validate() {
            return Err(FulfillmentError::Config(report.to_string().trim_end().to_string()));
        }

        if !(cli.sqlite() || cli.pg()) {
            return Err(FulfillmentError::Config(
                "No database backend selected. Use one of --sqlite, --pg to select a backend.".to_string(),
            ));
        }

        Ok(())
    }

    fn setup_tracing(&self) -> Result<()> {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let cli = self.cli()?;

        let filter =
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let dest_writer = Mutex::new(if let Some(log_file) = cli.log_file() {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(log_file)?;
            Box::new(file) as Box<dyn io::Write + Send>
        }
        else {
            Box::new(io::stdout()) as Box<dyn io::Write + Send>
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(dest_writer))
            .try_init()?;

        info!("Tracing initialized");

        Ok(())
    }

    #[instrument(level = "debug", skip(self, driver), fields(driver = driver.name()))]
    async fn serve_with<D: DatabaseDriver>(&self, driver: Arc<D>) -> Result<()> {
        let cli = self.cli()?;

        driver.configure().await?;

        if cli.migrate() {
            info!("Applying migrations");
            Migrator::up(&driver.connection(), None).await?;
        }

        let workflow = Arc::new(OrderFulfillmentWorkflow::new(driver.connection()));
        info!("Using {} backend", driver.name());

        http::serve(workflow, cli.listen()).await
    }

    pub async fn execute(&self) -> Result<()> {
        let cli = match self.cli() {
            Ok(cli) => cli,
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    err.print()?;
                    return Ok(());
                }
                _ => {
                    return Err(err.into());
                }
            },
        };

        self.validate()?;
        self.setup_tracing()?;

        #[cfg(feature = "sqlite")]
        if cli.sqlite() {
            let driver = Arc::new(Sqlite::connect(&cli.sqlite_path()).await?);
            return self.serve_with(driver).await;
        }

        #[cfg(feature = "pg")]
        if cli.pg() {
            let driver = Arc::new(
                Pg::connect(
                    &cli.pg_host(),
                    cli.pg_port(),
                    &cli.pg_user(),
                    &cli.pg_password(),
                    &cli.pg_database(),
                )
                .await?,
            );
            return self.serve_with(driver).await;
        }

        // Only reachable if validation let through a backend whose feature is disabled.
        Err(FulfillmentError::Config("selected database backend is not compiled in".to_string()))
    }

    pub async fn run() -> Result<()> {
        FulfillmentApp::__fieldx_new().execute().await
    }
}

impl FulfillmentAppBuilder {
    pub fn cli_args<S: ToString>(self, args: Vec<S>) -> Self {
        self._cli_args(args.into_iter().map(|s| s.to_string()).collect())
    }
}

impl Debug for FulfillmentApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FulfillmentApp {{ ... }}")
    }
}
