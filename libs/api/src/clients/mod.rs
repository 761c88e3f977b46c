use futures_util::future::BoxFuture;
use serde::Deserialize;

pub mod openai;

/// A model that answers a prompt with text.
pub trait TextModel: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>>;
}

/// A model that turns a description into an image and returns its URL.
pub trait ImageModel: Send + Sync {
    fn generate<'a>(
        &'a self,
        description: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>>;
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChatModelConfig {
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ImageModelConfig {
    pub model: String,
    #[serde(default)]
    pub size: Option<String>,
}

impl ChatModelConfig {
    pub fn default_chat() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: None,
        }
    }

    pub fn default_tuned_chat() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: Some(0.1),
        }
    }
}

impl Default for ImageModelConfig {
    fn default() -> Self {
        Self {
            model: "dall-e-2".to_string(),
            size: None,
        }
    }
}
