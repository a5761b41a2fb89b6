//! CLI interface using clap
//!
//! Provides the command-line interface for DocControl

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};

/// DocControl - Engineering document control
#[derive(Parser, Debug)]
#[command(name = "doccontrol")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the document root (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, csv)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the document inventory
    Scan(ScanArgs),

    /// Classify a single file name
    Classify(ClassifyArgs),

    /// Compare two folder versions or two documents
    Compare(CompareArgs),

    /// Suggest a description from the first page of a PDF
    Describe(DescribeArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Arguments for scan command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Read the inventory from a remote mirror map instead of the local tree
    #[arg(long)]
    pub remote_map: Option<String>,

    /// Keep only the latest version of each document
    #[arg(short, long)]
    pub latest: bool,

    /// Filter by project
    #[arg(long)]
    pub project: Option<String>,

    /// Filter by category (e.g. Geometrico, "Proceso Constructivo")
    #[arg(short, long)]
    pub category: Option<String>,

    /// Filter by review status (e.g. Pending, Approved)
    #[arg(short, long)]
    pub status: Option<String>,
}

/// Arguments for classify command
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// File name to classify
    pub file_name: String,

    /// Folder path the file lives in
    #[arg(short = 'c', long, value_name = "CTX")]
    pub context: Option<String>,

    /// Free-text description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Arguments for compare command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Previous version (folder or document)
    pub v1: String,

    /// Current version (folder or document)
    pub v2: String,

    /// Summarize text changes of one file from a folder comparison
    #[arg(short, long, value_name = "PATH")]
    pub inspect: Option<String>,

    /// Write a side-by-side HTML diff of the document texts
    #[arg(long, value_name = "OUT")]
    pub html: Option<String>,
}

/// Arguments for describe command
#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// PDF to describe
    pub file: String,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Get a configuration value
    #[arg(long)]
    pub get: Option<String>,

    /// Reset to defaults
    #[arg(long)]
    pub reset: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["doccontrol", "scan", "--latest", "--project", "Puente"]);
        assert!(matches!(cli.command, Commands::Scan(_)));

        if let Commands::Scan(args) = cli.command {
            assert!(args.latest);
            assert_eq!(args.project.as_deref(), Some("Puente"));
        }
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::parse_from(["doccontrol", "-o", "csv", "compare", "a", "b", "-p", "/docs"]);
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.path, "/docs");
        if let Commands::Compare(args) = cli.command {
            assert_eq!(args.v1, "a");
            assert_eq!(args.v2, "b");
            assert!(args.inspect.is_none());
        }
    }

    #[test]
    fn test_classify_command() {
        let cli = Cli::parse_from([
            "doccontrol",
            "classify",
            "MC-01_losa_v2.pdf",
            "--context",
            "Puente/20240115",
        ]);
        if let Commands::Classify(args) = cli.command {
            assert_eq!(args.file_name, "MC-01_losa_v2.pdf");
            assert_eq!(args.context.as_deref(), Some("Puente/20240115"));
        }
    }
}
