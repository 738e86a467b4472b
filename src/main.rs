//! CLI entry point for runtime-works

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "runtime-works")]
#[command(version)]
#[command(about = "Content pipeline for the runtime.works Thoughts blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List thoughts, newest first
    List {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single thought
    Show {
        /// Identifier of the thought (file name without `.mdx`)
        id: String,

        /// Print the rendered HTML instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "runtime_works=debug,info"
    } else {
        "runtime_works=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { json } => {
            let site = runtime_works::Site::new(&base_dir)?;
            runtime_works::commands::list::run(&site, json)?;
        }

        Commands::Show { id, html } => {
            let site = runtime_works::Site::new(&base_dir)?;
            runtime_works::commands::show::run(&site, &id, html)?;
        }

        Commands::Generate => {
            let site = runtime_works::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let site = runtime_works::Site::new(&base_dir)?;

            // Generate first so the static fallback has something to serve
            tracing::info!("Generating static files...");
            site.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            runtime_works::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = runtime_works::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("runtime-works version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
