//! Mercado Comunidad CLI - browse the marketplace from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Scroll through marketplace products (API or local dataset)
//! mercado products --search silla --pages 2
//!
//! # Shuffled listing of a community or store from the local dataset
//! mercado browse --comunidad valdivia --tienda muebles-sur --page 2
//!
//! # Directory
//! mercado communities
//! mercado stores --comunidad valdivia
//! mercado store muebles-sur --search mesa
//! mercado product 12 --comunidad valdivia
//!
//! # Blog (local dataset)
//! mercado blog --tag ventas
//! mercado blog 2
//! ```
//!
//! Every command accepts `--json` for machine-readable output.
//! Log verbosity follows `RUST_LOG`; set `MERCADO_LOG_JSON=1` for JSON logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use mercado_storefront::config::StorefrontConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::CliError;
use output::Format;

#[derive(Parser)]
#[command(name = "mercado")]
#[command(author, version, about = "Mercado Comunidad marketplace browser")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Product feed with search, category filter, and load-more
    Products {
        /// Free-text search over title, description, and store name
        #[arg(short, long, conflicts_with = "category")]
        search: Option<String>,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Shuffled listing of a community or store (local dataset)
    Browse {
        /// Community slug (default: the whole marketplace)
        #[arg(long)]
        comunidad: Option<String>,

        /// Store slug
        #[arg(long)]
        tienda: Option<String>,

        #[arg(short, long, conflicts_with = "category")]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Seed for a reproducible order
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List communities
    Communities,
    /// List the stores of a community
    Stores {
        #[arg(long)]
        comunidad: Option<String>,
    },
    /// One store's products, paginated
    Store {
        /// Store slug
        id: String,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Product detail with contact information (local dataset)
    Product {
        id: i64,

        #[arg(long)]
        comunidad: Option<String>,
    },
    /// Blog articles, or one article by ID (local dataset)
    Blog {
        id: Option<i64>,

        /// Only articles with this tag
        #[arg(long, conflicts_with = "id")]
        tag: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    // Defaults to info for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mercado_cli=info,mercado_storefront=info".into());

    let json = std::env::var("MERCADO_LOG_JSON").is_ok_and(|v| v == "1");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;
    let format = Format::from_flag(cli.json);

    match cli.command {
        Commands::Products {
            search,
            category,
            pages,
        } => {
            commands::products::run(&config, search.as_deref(), category.as_deref(), pages, format)
                .await?;
        }
        Commands::Browse {
            comunidad,
            tienda,
            search,
            category,
            page,
            seed,
        } => {
            let args = commands::browse::BrowseArgs {
                community: comunidad,
                store: tienda,
                search,
                category,
                page,
                seed,
            };
            commands::browse::run(&config, args, format).await?;
        }
        Commands::Communities => commands::directory::communities(&config, format).await?,
        Commands::Stores { comunidad } => {
            commands::directory::stores(&config, comunidad.as_deref(), format).await?;
        }
        Commands::Store { id, search, page } => {
            commands::directory::store(&config, &id, search.as_deref(), page, format).await?;
        }
        Commands::Product { id, comunidad } => {
            commands::browse::product(&config, id, comunidad.as_deref(), format).await?;
        }
        Commands::Blog { id, tag } => {
            commands::browse::blog(&config, id, tag.as_deref(), format).await?;
        }
    }
    Ok(())
}
