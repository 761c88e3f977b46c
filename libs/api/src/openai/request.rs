use anyhow::{anyhow, ensure};
use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::response::{ApiResponse, IntoApiResponse};

#[derive(Deserialize, ToSchema)]
pub struct Question {
    /// Natural-language prompt forwarded to the model.
    #[schema(example = "What is 2+2?")]
    pub question: String,
}

impl Question {
    fn into_prompt(self) -> anyhow::Result<String> {
        ensure!(
            !self.question.trim().is_empty(),
            "field `question` must not be blank"
        );

        Ok(self.question)
    }
}

/// Unwraps the JSON body of a question request, rejecting anything that
/// is not an object with a non-blank `question`.
pub(crate) fn prompt_from(
    payload: Result<Json<Question>, JsonRejection>,
) -> ApiResponse<String> {
    let Json(question) = payload
        .map_err(|rejection| anyhow!(rejection.body_text()))
        .into_response("400-002")?;

    question.into_prompt().into_response("400-001")
}
