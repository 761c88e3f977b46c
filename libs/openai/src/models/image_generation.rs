pub mod implementation;

use serde::{Deserialize, Serialize};

static IMAGES_GENERATIONS: &str = "images/generations";

pub trait ImageGeneration {
    fn image_generation(
        &self,
        request: ImageGenerationRequest,
    ) -> impl std::future::Future<Output = anyhow::Result<ImageGenerationResponse>>
           + Send;
}

#[derive(Debug, Serialize, Default)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    pub data: Vec<Image>,
}

#[derive(Debug, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageGenerationResponse {
    pub fn url(&self) -> Option<&str> {
        self.data.first()?.url.as_deref()
    }
}
