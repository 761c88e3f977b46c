use api::Config;
use shuttle_runtime::{Error, SecretStore, Secrets};
use tracing_subscriber::EnvFilter;

#[shuttle_runtime::main]
async fn main(#[Secrets] secret_store: SecretStore) -> shuttle_axum::ShuttleAxum {
    let level = match secret_store.get("ENV").as_deref() {
        Some("prod") => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    let Some(openai_api_key) = secret_store.get("OPENAI_API_KEY") else {
        return Err(Error::BuildPanic(
            "OPENAI_API_KEY was not found".to_string(),
        ));
    };

    let config = Config::load(secret_store.get("CONFIG").as_deref())
        .map_err(|e| Error::BuildPanic(format!("{:#}", e)))?;

    let router = api::serve(&openai_api_key, &config)
        .map_err(|e| Error::BuildPanic(format!("{:#}", e)))?;

    Ok(router.into())
}
