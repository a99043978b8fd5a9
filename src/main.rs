use clap::{Parser, Subcommand};
use tracing::{error, info};

use urban_explorer::bronze;
use urban_explorer::config::Config;
use urban_explorer::logging;
use urban_explorer::pipeline;
use urban_explorer::server;

#[derive(Parser)]
#[command(name = "urban-explorer")]
#[command(about = "Paris housing open-data pipeline (bronze/silver/gold) and query API")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download raw sources into the bronze layer
    Ingest {
        /// Specific sources to fetch (comma-separated). Default: all
        #[arg(long)]
        sources: Option<String>,
    },
    /// Run every source normalizer (silver layer)
    Clean,
    /// Compute the indicators and publish the gold table
    Aggregate,
    /// Clean then aggregate in one pass
    Run,
    /// Start the read-only HTTP query service
    Serve,
}

fn print_clean_summary(summary: &pipeline::CleanSummary) {
    println!("\n📊 Normalization results:");
    println!("   Succeeded: {}", summary.succeeded.join(", "));
    if !summary.failed.is_empty() {
        println!("\n⚠️  Failed sources:");
        for (source, reason) in &summary.failed {
            println!("   - {source}: {reason}");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Ingest { sources } => {
            println!("⬇️  Downloading raw sources to the bronze layer...");
            let only: Option<Vec<String>> = sources
                .map(|list| list.split(',').map(|s| s.trim().to_string()).collect());
            let outcomes = bronze::ingest_sources(&config, only.as_deref()).await;
            for (source, ok) in &outcomes {
                println!("   {} {}", if *ok { "✅" } else { "❌" }, source);
            }
            bronze::verify_bronze(&config);
        }
        Commands::Clean => {
            println!("🧹 Running source normalizers (silver layer)...");
            let summary = pipeline::run_silver(&config);
            print_clean_summary(&summary);
        }
        Commands::Aggregate => {
            println!("🔗 Building the gold table...");
            match pipeline::run_gold(&config) {
                Ok(rows) => println!("✅ Gold table published ({} rows)", rows.len()),
                Err(e) => {
                    error!("aggregation failed: {e}");
                    anyhow::bail!("aggregation failed: {e}");
                }
            }
        }
        Commands::Run => {
            println!("🔄 Running the full pipeline (silver + gold)...");
            let summary = pipeline::run_silver(&config);
            print_clean_summary(&summary);
            match pipeline::run_gold(&config) {
                Ok(rows) => println!("✅ Gold table published ({} rows)", rows.len()),
                Err(e) => {
                    error!("aggregation failed: {e}");
                    anyhow::bail!("aggregation failed: {e}");
                }
            }
        }
        Commands::Serve => {
            info!("starting the query service");
            server::serve(&config).await?;
        }
    }

    Ok(())
}
