use std::sync::Arc;

use ::openai::models::{
    chat_completion::{ChatCompletion, ChatCompletionRequest, Message},
    image_generation::{ImageGeneration, ImageGenerationRequest},
    Models,
};
use anyhow::{anyhow, Context};
use futures_util::{future::BoxFuture, FutureExt};

use super::{ChatModelConfig, ImageModel, ImageModelConfig, TextModel};

/// Builds model handles that share one OpenAI connection pool.
#[derive(Clone, Debug)]
pub struct ModelFactory {
    models: Models,
}

impl ModelFactory {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let models = Models::new(base_url, api_key)
            .context("failed to build openai client")?;

        Ok(Self { models })
    }

    pub fn text(&self, config: &ChatModelConfig) -> Arc<dyn TextModel> {
        Arc::new(OpenAiTextModel {
            models: self.models.clone(),
            config: config.clone(),
        })
    }

    pub fn image(&self, config: &ImageModelConfig) -> Arc<dyn ImageModel> {
        Arc::new(OpenAiImageModel {
            models: self.models.clone(),
            config: config.clone(),
        })
    }
}

#[derive(Debug)]
struct OpenAiTextModel {
    models: Models,
    config: ChatModelConfig,
}

impl TextModel for OpenAiTextModel {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        async move {
            let response = self
                .models
                .chat_completion(ChatCompletionRequest {
                    model: self.config.model.clone(),
                    messages: vec![Message::user(prompt)],
                    temperature: self.config.temperature,
                    max_tokens: None,
                })
                .await
                .with_context(|| {
                    format!("{} request failed", self.config.model)
                })?;

            let content = response.content().ok_or_else(|| {
                anyhow!("{} returned no content", self.config.model)
            })?;

            Ok(content.to_string())
        }
        .boxed()
    }
}

#[derive(Debug)]
struct OpenAiImageModel {
    models: Models,
    config: ImageModelConfig,
}

impl ImageModel for OpenAiImageModel {
    fn generate<'a>(
        &'a self,
        description: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        async move {
            let response = self
                .models
                .image_generation(ImageGenerationRequest {
                    model: self.config.model.clone(),
                    prompt: description.to_string(),
                    n: Some(1),
                    size: self.config.size.clone(),
                    response_format: Some("url".to_string()),
                })
                .await
                .with_context(|| {
                    format!("{} request failed", self.config.model)
                })?;

            let url = response.url().ok_or_else(|| {
                anyhow!("{} returned no image url", self.config.model)
            })?;

            Ok(url.to_string())
        }
        .boxed()
    }
}
