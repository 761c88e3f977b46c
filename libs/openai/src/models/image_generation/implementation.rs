use anyhow::Context;

use crate::models::Models;

use super::{
    ImageGeneration, ImageGenerationRequest, ImageGenerationResponse,
    IMAGES_GENERATIONS,
};

impl ImageGeneration for Models {
    async fn image_generation(
        &self,
        request: ImageGenerationRequest,
    ) -> anyhow::Result<ImageGenerationResponse> {
        let text = self.string_response(&request, IMAGES_GENERATIONS).await?;

        let response =
            serde_json::from_str(&text).context("failed to parse response")?;

        Ok(response)
    }
}
