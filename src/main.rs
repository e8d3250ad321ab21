//! lexharvest: legal-document harvester for the Côte d'Ivoire knowledge base
//!
//! Fetches official legal sources, extracts clean text, and upserts the
//! resulting documents into PostgreSQL and a vector collection.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lexharvest::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::StoreParams;

#[derive(Parser)]
#[command(name = "lexharvest")]
#[command(about = "Harvest legal documents from Ivorian sources into a knowledge base")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "lexharvest.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Store endpoints and credentials, also readable from the environment
#[derive(Args, Debug)]
struct StoreArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Vector store base URL
    #[arg(long, env = "CHROMA_URL", default_value = "http://localhost:8000")]
    chroma_url: String,

    /// Vector store API token
    #[arg(long, env = "CHROMA_API_KEY")]
    chroma_api_key: Option<String>,

    /// Vector store tenant
    #[arg(long, env = "CHROMA_TENANT", default_value = "default_tenant")]
    chroma_tenant: String,

    /// Vector store database
    #[arg(long, env = "CHROMA_DATABASE", default_value = "default_database")]
    chroma_database: String,

    /// OpenAI-style embeddings endpoint for local embedding computation
    #[arg(long, env = "EMBEDDING_ENDPOINT")]
    embedding_endpoint: Option<String>,

    /// Bearer token for the embeddings endpoint
    #[arg(long, env = "EMBEDDING_API_KEY")]
    embedding_api_key: Option<String>,

    /// Model name sent to the embeddings endpoint
    #[arg(long, env = "EMBEDDING_MODEL", default_value = "all-MiniLM-L6-v2")]
    embedding_model: String,
}

impl From<StoreArgs> for StoreParams {
    fn from(args: StoreArgs) -> Self {
        Self {
            database_url: args.database_url,
            chroma_url: args.chroma_url,
            chroma_api_key: args.chroma_api_key,
            chroma_tenant: args.chroma_tenant,
            chroma_database: args.chroma_database,
            embedding_endpoint: args.embedding_endpoint,
            embedding_api_key: args.embedding_api_key,
            embedding_model: args.embedding_model,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Follow document links from each configured site and ingest the pages
    Harvest {
        #[command(flatten)]
        store: StoreArgs,

        /// Compute embeddings locally instead of delegating to the vector store
        #[arg(long)]
        embed_local: bool,
    },

    /// Extract article blocks directly from the configured portal pages
    Scrape {
        #[command(flatten)]
        store: StoreArgs,

        /// Compute embeddings locally instead of delegating to the vector store
        #[arg(long)]
        embed_local: bool,
    },

    /// Load the built-in starter corpus
    Seed {
        #[command(flatten)]
        store: StoreArgs,

        /// Compute embeddings locally instead of delegating to the vector store
        #[arg(long)]
        embed_local: bool,
    },

    /// Create the relational schema and the vector collection
    InitDb {
        #[command(flatten)]
        store: StoreArgs,

        /// Add a pgvector embedding column to the relational table
        #[arg(long)]
        with_embeddings: bool,
    },

    /// Report store counts and optionally run a similarity search
    Check {
        #[command(flatten)]
        store: StoreArgs,

        /// Query text for a similarity search
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    // -v flags override the configured level; RUST_LOG overrides both
    let default_directive = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Harvest { store, embed_local } => {
            commands::harvest_sites(config, store.into(), embed_local).await
        }
        Commands::Scrape { store, embed_local } => {
            commands::scrape_portals(config, store.into(), embed_local).await
        }
        Commands::Seed { store, embed_local } => {
            commands::seed_corpus(store.into(), embed_local).await
        }
        Commands::InitDb {
            store,
            with_embeddings,
        } => commands::init_db(store.into(), with_embeddings).await,
        Commands::Check { store, query } => {
            commands::check_stores(store.into(), query).await
        }
    }
}
