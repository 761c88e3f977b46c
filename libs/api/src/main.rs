use std::net::{Ipv4Addr, SocketAddr};

use api::{serve, Config};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use util::{load_secrets, require};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = load_secrets("Secrets.dev.toml")?;
    let openai_api_key = require(&secrets, "OPENAI_API_KEY")?;
    let config =
        Config::load(secrets.get("CONFIG").and_then(|value| value.as_str()))?;

    let router = serve(&openai_api_key, &config)?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server.port));
    let listener = TcpListener::bind(&address).await?;
    Ok(axum::serve(listener, router).await?)
}
