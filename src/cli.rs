//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use refshelf_core::{FeatureSettings, ZoteroSettings};

/// Dashboard statistics and Zotero library access for a research knowledge base.
#[derive(Parser, Debug)]
#[command(name = "refshelf")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API
    Serve(ServeArgs),

    /// Print dashboard statistics as JSON
    Stats(StatsArgs),

    /// Read from a Zotero library
    Zotero(ZoteroArgs),
}

/// Location of the knowledge-base database.
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Path to the SQLite database file
    #[arg(long = "db", env = "REFSHELF_DB", default_value = "refshelf.db")]
    pub db_path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8181)]
    pub port: u16,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub features: FeatureSettings,

    #[command(flatten)]
    pub zotero: ZoteroSettings,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Only count tasks of this project
    #[arg(long)]
    pub project_id: Option<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub features: FeatureSettings,
}

#[derive(Args, Debug)]
pub struct ZoteroArgs {
    #[command(flatten)]
    pub settings: ZoteroSettings,

    #[command(subcommand)]
    pub command: ZoteroCommand,
}

#[derive(Subcommand, Debug)]
pub enum ZoteroCommand {
    /// List collections in the library
    Collections,

    /// List the items of a collection
    Items {
        /// Collection key
        collection_key: String,

        /// Request the compact representation without attachment data
        #[arg(long)]
        no_attachments: bool,
    },

    /// Show normalized metadata of one item
    Item {
        /// Item key
        item_key: String,
    },

    /// List the attachments of an item
    Attachments {
        /// Item key
        item_key: String,
    },

    /// Download the PDF attachments of a collection
    Download {
        /// Collection key
        collection_key: String,

        /// Directory to write PDFs and metadata files into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_stats_defaults() {
        let cli = Cli::try_parse_from(["refshelf", "stats"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        let Command::Stats(args) = cli.command else {
            panic!("expected stats command");
        };
        assert!(args.project_id.is_none());
    }

    #[test]
    fn test_cli_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["refshelf", "stats", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_serve_port() {
        let cli = Cli::try_parse_from(["refshelf", "serve", "--port", "9000"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.port, 9000);
    }

    #[test]
    fn test_cli_zotero_download_args() {
        let cli = Cli::try_parse_from([
            "refshelf",
            "zotero",
            "--zotero-api-key",
            "k",
            "--zotero-user-id",
            "1",
            "download",
            "COLL0001",
            "--output",
            "papers",
        ])
        .unwrap();
        let Command::Zotero(args) = cli.command else {
            panic!("expected zotero command");
        };
        assert_eq!(args.settings.zotero_api_key.as_deref(), Some("k"));
        match args.command {
            ZoteroCommand::Download {
                collection_key,
                output,
            } => {
                assert_eq!(collection_key, "COLL0001");
                assert_eq!(output, PathBuf::from("papers"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["refshelf"]).is_err());
    }
}
