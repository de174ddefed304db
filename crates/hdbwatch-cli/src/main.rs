mod collect;
mod diagnose;
mod export;
mod lemon8;
mod summary;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hdbwatch_db::{PgDocumentStore, PoolConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hdbwatch")]
#[command(about = "HDB property news and review collector")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a news or review scraper and save its results
    Collect {
        #[command(subcommand)]
        command: CollectCommands,
    },
    /// Two-phase Lemon8 review pipeline
    Lemon8 {
        #[command(subcommand)]
        command: Lemon8Commands,
    },
    /// Database management
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Report which env files and database the scrapers would use
    Diagnose,
}

#[derive(Debug, Subcommand)]
enum CollectCommands {
    /// Google News RSS searches for HDB and BTO coverage
    GoogleNews,
    /// HDB, URA and LTA press releases
    Official,
    /// Premium news-site listing pages
    Premium,
    /// Living-experience reviews from Singapore subreddits
    Reddit,
}

#[derive(Debug, Subcommand)]
enum Lemon8Commands {
    /// Stage raw posts from a JSON export for analysis
    Stage {
        /// JSON array of collected posts
        file: PathBuf,
    },
    /// Classify unprocessed posts and save the reviews
    Analyze,
    /// Write all Lemon8 reviews to a spreadsheet
    Export {
        /// Output path (defaults to HDBWATCH_EXPORT_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete Lemon8 reviews and return every raw post to unprocessed
    Reset,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("hdbwatch: pass --help to list commands");
        return Ok(());
    };

    if matches!(command, Commands::Diagnose) {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .init();
        return diagnose::run_diagnose().await;
    }

    let config = hdbwatch_core::load_app_config()
        .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = PgDocumentStore::connect(
        &config.database_url,
        &config.db_name,
        PoolConfig::from_app_config(&config),
    )
    .await
    .map_err(|e| anyhow::anyhow!("failed to connect to {}: {e}", config.db_name))?;

    let result = dispatch(command, &store, &config).await;
    store.close().await;
    result
}

async fn dispatch(
    command: Commands,
    store: &PgDocumentStore,
    config: &hdbwatch_core::AppConfig,
) -> anyhow::Result<()> {
    if !matches!(command, Commands::Db { .. }) {
        store.migrate().await?;
    }

    match command {
        Commands::Collect { command } => match command {
            CollectCommands::GoogleNews => collect::run_google_news(store, config).await,
            CollectCommands::Official => collect::run_official(store, config).await,
            CollectCommands::Premium => collect::run_premium(store, config).await,
            CollectCommands::Reddit => collect::run_reddit(store, config).await,
        },
        Commands::Lemon8 { command } => match command {
            Lemon8Commands::Stage { file } => lemon8::run_stage(store, &file).await,
            Lemon8Commands::Analyze => lemon8::run_analyze(store, config).await,
            Lemon8Commands::Export { output } => {
                let path = output.unwrap_or_else(|| config.export_path.clone());
                export::run_export(store, &path).await
            }
            Lemon8Commands::Reset => lemon8::run_reset(store).await,
        },
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                hdbwatch_db::ping(store.pool()).await?;
                println!("database {} is reachable", config.db_name);
                Ok(())
            }
            DbCommands::Migrate => {
                let applied = store.migrate().await?;
                println!("applied {applied} migration(s)");
                Ok(())
            }
        },
        Commands::Diagnose => diagnose::run_diagnose().await,
    }
}
