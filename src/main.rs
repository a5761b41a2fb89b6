//! DocControl - Engineering document control tool
//!
//! Classifies engineering documents, builds inventories of document trees,
//! and explains how a document set changed between two versions.

use anyhow::Result;
use clap::Parser;
use doccontrol::cli::{
    classify, compare, describe, print_classification, print_records, scan, Cli, Commands,
    ConfigArgs, OutputFormat, ScanOptions,
};
use doccontrol::config::Config;
use doccontrol::inventory::ScanCache;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Get document root
    let root = Path::new(&cli.path);
    let config = Config::load_or_default(root)?;

    // Execute command
    match cli.command {
        Commands::Scan(args) => {
            let options = ScanOptions {
                remote_map: args.remote_map,
                latest: args.latest,
                project: args.project,
                category: args.category,
                status: args.status,
            };
            let mut cache = ScanCache::from_config(&config);
            let records = scan(root, &config, &options, &mut cache)?;
            print_records(&records, cli.format)?;
        }

        Commands::Classify(args) => {
            let result = classify(
                &args.file_name,
                args.context.as_deref(),
                args.description.as_deref(),
            );
            print_classification(&result, cli.format)?;
        }

        Commands::Compare(args) => {
            compare(
                &config,
                Path::new(&args.v1),
                Path::new(&args.v2),
                args.inspect.as_deref(),
                args.html.as_deref().map(Path::new),
                cli.format,
            )?;
        }

        Commands::Describe(args) => {
            let description = describe(Path::new(&args.file))?;
            match cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "file": args.file,
                        "description": description,
                    }))?
                ),
                _ if description.is_empty() => println!("No description could be derived."),
                _ => println!("{}", description),
            }
        }

        Commands::Config(args) => {
            handle_config(root, &config, &args)?;
        }
    }

    Ok(())
}

/// Handle config command
fn handle_config(root: &Path, config: &Config, args: &ConfigArgs) -> Result<()> {
    if args.show || (!args.reset && args.get.is_none()) {
        println!("DocControl Configuration");
        println!("========================\n");

        println!("Allowed extensions: {}", config.allowed_extensions.join(", "));
        println!("Annotations file: {:?}", config.annotations_path(root));
        println!("Remote map file: {:?}", config.remote_map_path(root));
        println!("Summary limit: {}", config.summary_limit);
        match config.max_pages {
            Some(pages) => println!("Max pages: {}", pages),
            None => println!("Max pages: all"),
        }
        println!("Cache TTL: {}s", config.cache_ttl_secs);
        println!("Default project: {}", config.default_project);
        println!("Default owner: {}", config.default_owner);
    }

    if let Some(ref key) = args.get {
        match config.get(key) {
            Some(value) => println!("{}", value),
            None => anyhow::bail!("Unknown config key: {}", key),
        }
    }

    if args.reset {
        Config::default().save(root)?;
        println!("✓ Configuration reset to defaults");
    }

    Ok(())
}
