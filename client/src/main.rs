mod cli;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // logs a stderr para no ensuciar las tablas de stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rooster=info,client=info,common=info,reqwest=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run().await
}
