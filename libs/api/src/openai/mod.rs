use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, info};

pub mod prompt;
pub mod request;

use crate::response::{ApiResponse, IntoApiResponse};
use crate::ApiState;

use self::prompt::RecipePrompt;
use self::request::{prompt_from, Question};

/// Answer a question
#[utoipa::path(
    post,
    path = "/openai/answer",
    tag = "OpenAI Language Models",
    request_body = Question,
    responses(
        (status = 200, description = "Answer generated successfully", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid question", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse)
    )
)]
pub async fn answer(
    State(state): State<ApiState>,
    payload: Result<Json<Question>, JsonRejection>,
) -> ApiResponse<String> {
    let prompt = prompt_from(payload)?;
    debug!(task = "answer", question = prompt.as_str());

    let answer = state.text.generate(&prompt).await.into_response("500-001")?;
    info!(task = "answer", answer_len = answer.len());

    Ok(answer)
}

/// Answer a question with the tuned model
///
/// Same contract as `/openai/answer`, served by the model configured under
/// `openai.tuned_chat`.
#[utoipa::path(
    post,
    path = "/openai/answer/model",
    tag = "OpenAI Language Models",
    request_body = Question,
    responses(
        (status = 200, description = "Answer generated successfully", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid question", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse)
    )
)]
pub async fn answer_with_tuned_model(
    State(state): State<ApiState>,
    payload: Result<Json<Question>, JsonRejection>,
) -> ApiResponse<String> {
    let prompt = prompt_from(payload)?;
    debug!(task = "answer with tuned model", question = prompt.as_str());

    let answer = state
        .tuned_text
        .generate(&prompt)
        .await
        .into_response("500-002")?;
    info!(task = "answer with tuned model", answer_len = answer.len());

    Ok(answer)
}

/// Generate a recipe
#[utoipa::path(
    get,
    path = "/openai/recipe",
    tag = "OpenAI Language Models",
    responses(
        (status = 200, description = "Recipe generated successfully", body = String, content_type = "text/plain"),
        (status = 500, description = "Provider failure", body = ErrorResponse)
    )
)]
pub async fn recipe(State(state): State<ApiState>) -> ApiResponse<String> {
    let prompt = RecipePrompt::roast().render();

    let recipe = state.text.generate(&prompt).await.into_response("500-003")?;
    info!(task = "recipe", recipe_len = recipe.len());

    Ok(recipe)
}

/// Generate an image from a description
///
/// Responds with the URL of the generated image.
#[utoipa::path(
    post,
    path = "/openai/image",
    tag = "OpenAI Language Models",
    request_body = Question,
    responses(
        (status = 200, description = "Image generated successfully", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid description", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse)
    )
)]
pub async fn generate_image(
    State(state): State<ApiState>,
    payload: Result<Json<Question>, JsonRejection>,
) -> ApiResponse<String> {
    let description = prompt_from(payload)?;
    debug!(task = "generate image", description = description.as_str());

    let url = state
        .image
        .generate(&description)
        .await
        .into_response("500-004")?;
    info!(task = "generate image", url = url.as_str());

    Ok(url)
}
