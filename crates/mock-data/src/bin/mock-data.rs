//! Mock data CLI: generate TSV offer fixtures and import them.
//!
//! Run with:
//! ```text
//! cargo run -p mock-data -- generate 100 ./mocks/offers.tsv http://localhost:3123/api
//! cargo run -p mock-data -- import ./mocks/offers.tsv
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mock_data::prelude::*;
use offers::config::ServerConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mock-data")]
#[command(about = "Generate and import mock rental offers.")]
struct CommandLine {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate offers into a TSV file
    #[command(alias = "g")]
    Generate {
        /// Number of offers to generate
        count: usize,
        /// Output TSV file
        output: PathBuf,
        /// Mock data JSON: an http(s) URL or a local file
        source: String,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Import offers from a TSV file into the database at DATABASE_URL
    #[command(alias = "i")]
    Import {
        /// Input TSV file
        path: PathBuf,
        /// Offers per transaction
        #[arg(long, default_value_t = 50)]
        batch_size: usize,
    },
}

async fn generate(
    count: usize,
    output: PathBuf,
    source: String,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let pool = MockServerData::load(&source).await?;
    let generator = TsvOfferGenerator::new(&pool);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let writer = TsvFileWriter::create(&output)?;
    let written = write_offers(&generator, count, writer, &mut rng)?;

    tracing::info!("Generated {} offers into {}", written, output.display());
    Ok(())
}

async fn import(path: PathBuf, batch_size: usize) -> anyhow::Result<()> {
    let offers = TsvFileReader::new(&path).read()?;
    tracing::info!("Parsed {} offers from {}", offers.len(), path.display());

    let config = ServerConfig::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("../offers/migrations").run(&pool).await?;
    tracing::info!("Connected to database");

    let summary = Seeder::new(pool)
        .with_batch_size(batch_size)
        .seed_offers(&offers)
        .await?;

    tracing::info!("Import completed!");
    tracing::info!("  Offers: {}", summary.offers);
    tracing::info!("  Hosts: {}", summary.hosts);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match CommandLine::parse().command {
        Commands::Generate {
            count,
            output,
            source,
            seed,
        } => generate(count, output, source, seed).await,
        Commands::Import { path, batch_size } => import(path, batch_size).await,
    }
}
