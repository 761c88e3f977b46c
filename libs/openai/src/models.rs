use anyhow::{ensure, Context};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::Serialize;
use tracing::debug;

pub mod chat_completion;
pub mod image_generation;

/// Connection to the OpenAI API.
///
/// Cloning is cheap: every clone shares the same connection pool, so a
/// single `Models` can back any number of model handles.
#[derive(Debug, Clone)]
pub struct Models {
    base_url: String,
    client: Client,
}

impl Models {
    pub fn new(base_url: &str, token: &str) -> anyhow::Result<Self> {
        ensure!(!token.trim().is_empty(), "api token must not be empty");

        let mut authorization =
            HeaderValue::from_str(format!("Bearer {}", token).as_str())
                .context("api token is not a valid header value")?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn string_response<R: Serialize>(
        &self,
        request: &R,
        path: &str,
    ) -> anyhow::Result<String> {
        let body =
            serde_json::to_string(request).context("failed to serialize body")?;

        debug!(task = "openai request", path = path);

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .body(body)
            .send()
            .await?;

        let status_code = response.status();
        let text = response.text().await;

        ensure!(
            status_code.is_success(),
            "status code: {}, response: {:?}",
            status_code,
            text
        );

        Ok(text?)
    }
}
