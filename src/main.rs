use dotenv::dotenv;
use evm_agent_tools::{config, ethereum, server, tools};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting EVM agent tools server...");

    let config = config::Config::from_env()?;
    let client = ethereum::EthereumClient::new(&config)?;
    let registry = tools::ToolRegistry::with_defaults()?;

    server::run(&client, &registry).await?;

    Ok(())
}
