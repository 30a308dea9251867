use std::sync::Arc;

use apillon_storage::{ApiTransport, ApillonApi, ApillonConfig, ApillonModel, File};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch the details of a file stored in an Apillon bucket
#[derive(Debug, Parser)]
#[command(name = "apillon-file", version)]
struct Cli {
    /// UUID of the bucket holding the file
    bucket_uuid: String,

    /// UUID of the file
    file_uuid: String,

    /// UUID of the directory containing the file
    #[arg(long)]
    directory: Option<String>,

    /// Print the file as filter query parameters instead of JSON
    #[arg(long)]
    query: bool,

    /// Override the API base URL
    #[arg(long, env = "APILLON_API_URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ApillonConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }
    tracing::info!("Using Apillon API at {}", config.api_url);

    let api: Arc<dyn ApiTransport> = Arc::new(ApillonApi::new(&config)?);
    let mut file = File::new(api, cli.bucket_uuid, cli.directory, cli.file_uuid, None)?;

    let file = file.get().await.map_err(|e| {
        tracing::error!("Failed to fetch file details: {}", e);
        e
    })?;
    tracing::info!(
        "Fetched file {} (status: {})",
        file.uuid(),
        file.status().map(|s| s.name()).unwrap_or("unknown")
    );

    if cli.query {
        println!("{}", file.to_query_string()?);
    } else {
        println!("{}", serde_json::to_string_pretty(&file.serialize_map()?)?);
    }

    Ok(())
}
