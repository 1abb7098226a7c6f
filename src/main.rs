//! net51 bridge command-line interface
//!
//! # Usage
//!
//! ## Server Mode
//! ```bash
//! net51-bridge server --port 8080 --host 0.0.0.0
//! ```
//!
//! ## Fetch Mode
//! ```bash
//! net51-bridge fetch cookie
//! net51-bridge fetch netflix-top10 --data-dir ./data
//! ```

use clap::{Parser, Subcommand};

use net51_bridge::cli::{
    fetch::{FetchArgs, FetchTarget, run_fetch_mode},
    server::{ServerArgs, run_server_mode},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "net51-bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server mode
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Configuration file path
        #[arg(long)]
        config: Option<String>,

        /// Directory holding the catalog JSON files
        #[arg(long)]
        data_dir: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Fetch once and print the result as JSON
    Fetch {
        /// What to fetch
        #[arg(value_enum)]
        target: FetchTarget,

        /// Configuration file path
        #[arg(long)]
        config: Option<String>,

        /// Directory holding the catalog JSON files
        #[arg(long)]
        data_dir: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            port,
            host,
            config,
            data_dir,
            verbose,
        } => {
            let args = ServerArgs {
                port,
                host,
                config,
                data_dir,
                verbose,
            };
            run_server_mode(args).await
        }
        Commands::Fetch {
            target,
            config,
            data_dir,
            verbose,
        } => {
            let args = FetchArgs {
                target,
                config,
                data_dir,
                verbose,
            };
            run_fetch_mode(args).await
        }
    }
}
