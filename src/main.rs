use clap::{Parser, Subcommand};
use docdex::search::{FsBucketSource, QueryResolver};
use docdex::{IndexBuilder, IndexPersistence, Settings};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "docdex")]
#[command(about = "Build and query static documentation search indexes", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Build a search index from extractor output (JSON Lines)
    Build {
        /// Path to the extractor output file
        input: PathBuf,

        /// Output directory (overrides config index_path)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Emit compact JSON instead of pretty-printed files
        #[arg(long)]
        compact: bool,
    },

    /// Search a built index
    Search {
        /// Query string
        query: String,

        /// Index directory (overrides config index_path)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Maximum number of result rows (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Init { .. }) {
        if let Err(warning) = Settings::check_init() {
            eprintln!("Warning: {warning}");
            eprintln!("Using default configuration for now.");
        }
    }

    let config = Settings::load().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        Settings::default()
    });

    docdex::logging::init_with_config(&config.logging);

    match cli.command {
        Commands::Init { force } => match Settings::init_config_file(force) {
            Ok(path) => {
                println!("Configuration ready at: {}", path.display());
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },

        Commands::Build {
            input,
            out,
            compact,
        } => {
            if let Err(e) = build(&config, &input, out, compact) {
                eprintln!("Build failed: {e}");
                std::process::exit(1);
            }
        }

        Commands::Search {
            query,
            index,
            limit,
            json,
        } => {
            if let Err(e) = search(&config, &query, index, limit, json).await {
                eprintln!("Search failed: {e}");
                std::process::exit(1);
            }
        }

        Commands::Config => {
            match toml::to_string_pretty(&config) {
                Ok(toml_string) => println!("{toml_string}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn build(
    config: &Settings,
    input: &PathBuf,
    out: Option<PathBuf>,
    compact: bool,
) -> anyhow::Result<()> {
    let symbols = docdex::indexing::read_extractor_file(input)?;
    let tuple_count = symbols.len();

    let index = IndexBuilder::new(config.build.prefix_len).build(symbols)?;

    let out_dir = out.unwrap_or_else(|| config.index_path.clone());
    let persistence = IndexPersistence::new(out_dir.clone());
    persistence.save(&index, config.build.pretty && !compact)?;

    println!(
        "Indexed {} symbols ({} extractor records) into {} buckets at {}",
        index.total_symbols,
        tuple_count,
        index.buckets.len(),
        out_dir.display()
    );
    Ok(())
}

async fn search(
    config: &Settings,
    query: &str,
    index: Option<PathBuf>,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let index_dir = index.unwrap_or_else(|| config.index_path.clone());
    let mut search_config = config.search.clone();
    if let Some(limit) = limit {
        search_config.max_results = limit;
    }

    let source = Arc::new(FsBucketSource::new(index_dir));
    let resolver = QueryResolver::load(source, search_config).await?;
    let rows = resolver.search(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No matches for '{query}'");
        return Ok(());
    }

    for row in &rows {
        if row.signature_hint.is_empty() {
            println!(
                "{}::{}  {}",
                row.container_name, row.display_name, row.anchor_url
            );
        } else {
            println!(
                "{}::{}{}  {}",
                row.container_name, row.display_name, row.signature_hint, row.anchor_url
            );
        }
    }
    Ok(())
}
