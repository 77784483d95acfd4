//! Scratchpad CLI
//!
//! Runs and inspects the shared LAN scratchpad.
//!
//! # Commands
//!
//! - `serve` - Serve the editor and document on the local network
//! - `show` - Print the current document
//! - `write` - Replace the document from an argument or stdin

mod commands;

use clap::{Parser, Subcommand};
use scratchpad_server::{ServerConfig, DEFAULT_DATA_FILE, DEFAULT_MAX_DOCUMENT_BYTES};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shared plain-text scratchpad for the local network.
#[derive(Parser)]
#[command(name = "scratchpad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File holding the shared document
    #[arg(
        global = true,
        short = 'f',
        long,
        env = "SCRATCHPAD_DATA_FILE",
        default_value = DEFAULT_DATA_FILE
    )]
    data_file: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the scratchpad on the local network
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "SCRATCHPAD_BIND", default_value = "0.0.0.0:5000")]
        bind: SocketAddr,

        /// Largest accepted document, in bytes
        #[arg(long, env = "SCRATCHPAD_MAX_DOCUMENT_BYTES", default_value_t = DEFAULT_MAX_DOCUMENT_BYTES)]
        max_document_bytes: usize,

        /// Skip syncing each save to disk before replying
        #[arg(long, env = "SCRATCHPAD_NO_SYNC_WRITES")]
        no_sync_writes: bool,
    },

    /// Print the current document
    Show {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Replace the whole document
    Write {
        /// New document text (read from stdin if omitted)
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve {
            bind,
            max_document_bytes,
            no_sync_writes,
        } => {
            let config = ServerConfig::new(bind)
                .with_data_file(cli.data_file)
                .with_max_document_bytes(max_document_bytes)
                .with_sync_writes(!no_sync_writes);
            commands::serve::run(config)?;
        }
        Commands::Show { format } => {
            commands::show::run(&cli.data_file, &format)?;
        }
        Commands::Write { text } => {
            commands::write::run(&cli.data_file, text)?;
        }
        Commands::Version => {
            println!("Scratchpad v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["scratchpad", "serve"]).unwrap();
        match cli.command {
            Commands::Serve {
                bind,
                max_document_bytes,
                no_sync_writes,
            } => {
                assert_eq!(bind.to_string(), "0.0.0.0:5000");
                assert_eq!(max_document_bytes, DEFAULT_MAX_DOCUMENT_BYTES);
                assert!(!no_sync_writes);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn serve_can_skip_disk_sync() {
        let cli = Cli::try_parse_from(["scratchpad", "serve", "--no-sync-writes"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                no_sync_writes: true,
                ..
            }
        ));
    }

    #[test]
    fn global_data_file_after_subcommand() {
        let cli =
            Cli::try_parse_from(["scratchpad", "show", "--data-file", "/tmp/notes.txt"]).unwrap();
        assert_eq!(cli.data_file, PathBuf::from("/tmp/notes.txt"));
    }
}
