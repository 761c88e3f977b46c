use anyhow::Context;

use crate::models::{chat_completion::CHAT_COMPLETIONS, Models};

use super::{ChatCompletion, ChatCompletionRequest, ChatCompletionResponse};

impl ChatCompletion for Models {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> anyhow::Result<ChatCompletionResponse> {
        let text = self.string_response(&request, CHAT_COMPLETIONS).await?;

        let response =
            serde_json::from_str(&text).context("failed to parse response")?;

        Ok(response)
    }
}
