use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quicknotes::{api, config::Config, db};

#[derive(Parser)]
#[command(name = "quicknotes")]
#[command(about = "Minimal note-taking web application")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides QUICKNOTES_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Create the database schema and exit
    Init {
        /// SQLite database file (overrides QUICKNOTES_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "quicknotes=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(config: &Config) -> anyhow::Result<db::Database> {
    let db = db::Database::open(&config.database_path)?;
    db.migrate()?;
    tracing::info!("Using database {}", config.database_path.display());
    Ok(db)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let db = open_database(&config)?;
    let app = api::create_router(api::AppState::new(db, &config.secret_key));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("quicknotes listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();

    match cli.command {
        Some(Commands::Serve { host, port, db }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(db) = db {
                config.database_path = db;
            }
            serve(config).await?;
        }
        Some(Commands::Init { db }) => {
            if let Some(db) = db {
                config.database_path = db;
            }
            open_database(&config)?;
            println!("Database ready at {}", config.database_path.display());
        }
        None => serve(config).await?,
    }

    Ok(())
}
