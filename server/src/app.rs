//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::sqlite::SqliteService;
use crate::data::sqlite::seed::seed_demo_data;
use crate::domain::InvoiceCatalog;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub db: Arc<SqliteService>,
    pub invoices: Arc<InvoiceCatalog>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let (cli_config, command) = cli::parse();
        Self::init_logging(cli_config.debug);

        tracing::debug!("Application starting");
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Filters) => Self::print_filters(),
            Some(Commands::Start) | None => {
                let app = Self::init(&cli_config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init(&config).await?;

        // Registry errors are configuration bugs, fail before binding
        let invoices = Arc::new(
            InvoiceCatalog::new().context("Invalid invoice filter registry")?,
        );
        tracing::debug!(filters = invoices.registry().len(), "Invoice filters registered");

        let db_path = storage.database_path(&config);
        let db = Arc::new(
            SqliteService::init(&db_path)
                .await
                .with_context(|| format!("Failed to open database: {}", db_path.display()))?,
        );

        if config.database.seed_demo {
            seed_demo_data(db.pool())
                .await
                .context("Failed to seed demo data")?;
        }

        let shutdown = ShutdownService::new(db.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            db,
            invoices,
        })
    }

    /// Print the invoice filter catalog as JSON
    fn print_filters() -> Result<()> {
        let catalog = InvoiceCatalog::new().context("Invalid invoice filter registry")?;
        let json = serde_json::to_string_pretty(&catalog.registry().catalog())?;
        println!("{}", json);
        Ok(())
    }

    fn init_logging(debug: bool) {
        let default_filter = if debug {
            format!("info,{}=debug", APP_NAME_LOWER)
        } else {
            format!("info,{}=info", APP_NAME_LOWER)
        };

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers before anything can block
        app.shutdown.install_signal_handlers();

        app.shutdown
            .register(app.db.start_checkpoint_task(app.shutdown.subscribe()))
            .await;
        tracing::debug!(data_dir = %app.storage.data_dir().display(), "Background tasks started");

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &app.storage.database_path(&app.config).display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
