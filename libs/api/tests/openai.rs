use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use api::{router, ApiState, ImageModel, TextModel};
use axum::{
    body::Body,
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN},
        Method, Request, StatusCode,
    },
    response::Response,
    Router,
};
use futures_util::{future::BoxFuture, FutureExt};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Answers deterministically and records every prompt it receives.
#[derive(Default)]
struct StubTextModel {
    prompts: Mutex<Vec<String>>,
}

impl StubTextModel {
    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextModel for StubTextModel {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        async move {
            self.prompts.lock().unwrap().push(prompt.to_string());
            tokio::task::yield_now().await;

            match prompt {
                "What is 2+2?" => Ok("4".to_string()),
                _ => Ok(format!("answer to {}", prompt)),
            }
        }
        .boxed()
    }
}

#[derive(Default)]
struct StubImageModel {
    descriptions: Mutex<Vec<String>>,
}

impl StubImageModel {
    fn descriptions(&self) -> Vec<String> {
        self.descriptions.lock().unwrap().clone()
    }
}

impl ImageModel for StubImageModel {
    fn generate<'a>(
        &'a self,
        description: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        async move {
            self.descriptions.lock().unwrap().push(description.to_string());

            Ok(format!(
                "https://images.example/{}.png",
                description.replace(' ', "-")
            ))
        }
        .boxed()
    }
}

struct UnavailableModel;

impl TextModel for UnavailableModel {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        async { Err(anyhow!("provider unavailable")) }.boxed()
    }
}

impl ImageModel for UnavailableModel {
    fn generate<'a>(
        &'a self,
        _description: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        async { Err(anyhow!("provider unavailable")) }.boxed()
    }
}

#[derive(Default)]
struct Stubs {
    text: Arc<StubTextModel>,
    tuned_text: Arc<StubTextModel>,
    image: Arc<StubImageModel>,
}

impl Stubs {
    fn app(&self) -> Router {
        self.app_with_origins(&[])
    }

    fn app_with_origins(&self, allowed_origins: &[String]) -> Router {
        router(
            ApiState::new(
                self.text.clone(),
                self.tuned_text.clone(),
                self.image.clone(),
            ),
            allowed_origins,
        )
        .unwrap()
    }
}

fn unavailable_app() -> Router {
    let model = Arc::new(UnavailableModel);
    router(ApiState::new(model.clone(), model.clone(), model), &[]).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn text_body(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn assert_plain_text(response: &Response) {
    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
}

#[tokio::test]
async fn test_answer_returns_generated_text() {
    // Arrange
    let stubs = Stubs::default();

    // Act
    let response = stubs
        .app()
        .oneshot(post_json("/openai/answer", r#"{"question":"What is 2+2?"}"#))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_plain_text(&response);
    assert_eq!(text_body(response).await, "4");
    assert_eq!(stubs.text.prompts(), ["What is 2+2?"]);
    assert!(stubs.tuned_text.prompts().is_empty());
}

#[tokio::test]
async fn test_blank_question_is_rejected_before_the_provider() {
    for uri in ["/openai/answer", "/openai/answer/model", "/openai/image"] {
        // Arrange
        let stubs = Stubs::default();

        // Act
        let response = stubs
            .app()
            .oneshot(post_json(uri, r#"{"question":"   "}"#))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["developerMessage"], "400-001");
        assert!(stubs.text.prompts().is_empty());
        assert!(stubs.tuned_text.prompts().is_empty());
        assert!(stubs.image.descriptions().is_empty());
    }
}

#[tokio::test]
async fn test_missing_question_is_rejected_before_the_provider() {
    for body in [r#"{}"#, r#"{"prompt":"hello"}"#, r#"{"question":"#, "[]"] {
        // Arrange
        let stubs = Stubs::default();

        // Act
        let response = stubs
            .app()
            .oneshot(post_json("/openai/answer", body))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let json = json_body(response).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["developerMessage"], "400-002");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid request body"));
        assert!(stubs.text.prompts().is_empty());
    }
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    // Arrange
    let stubs = Stubs::default();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/openai/image")
        .body(Body::from(r#"{"question":"a red fox"}"#))
        .unwrap();

    // Act
    let response = stubs.app().oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(stubs.image.descriptions().is_empty());
}

#[tokio::test]
async fn test_answer_with_tuned_model_uses_the_tuned_handle() {
    for uri in ["/openai/answer/model", "/openai/answerModel"] {
        // Arrange
        let stubs = Stubs::default();

        // Act
        let response = stubs
            .app()
            .oneshot(post_json(uri, r#"{"question":"Who are you?"}"#))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(text_body(response).await, "answer to Who are you?");
        assert_eq!(stubs.tuned_text.prompts(), ["Who are you?"]);
        assert!(stubs.text.prompts().is_empty());
    }
}

#[tokio::test]
async fn test_recipe_submits_the_rendered_prompt() {
    let prompt = "Dish: Assado. Ingredients: carne, tomate, cebola, pimentao.";

    for uri in ["/openai/recipe", "/openai/receita"] {
        // Arrange
        let stubs = Stubs::default();

        // Act
        let response = stubs.app().oneshot(get(uri)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_plain_text(&response);
        assert_eq!(text_body(response).await, format!("answer to {prompt}"));
        assert_eq!(stubs.text.prompts(), [prompt]);
    }
}

#[tokio::test]
async fn test_generate_image_returns_the_url() {
    // Arrange
    let stubs = Stubs::default();

    // Act
    let response = stubs
        .app()
        .oneshot(post_json("/openai/image", r#"{"question":"a red fox"}"#))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_plain_text(&response);
    assert_eq!(
        text_body(response).await,
        "https://images.example/a-red-fox.png"
    );
    assert_eq!(stubs.image.descriptions(), ["a red fox"]);
}

#[tokio::test]
async fn test_generate_image_failure_is_a_structured_error() {
    // Act
    let response = unavailable_app()
        .oneshot(post_json("/openai/image", r#"{"question":"a red fox"}"#))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body = json_body(response).await;
    assert_eq!(body["status"], 500);
    assert_eq!(
        body["message"],
        "failed to generate image: provider unavailable"
    );
    assert_eq!(body["developerMessage"], "500-004");
}

#[tokio::test]
async fn test_text_failures_are_structured_errors() {
    let cases = [
        (post_json("/openai/answer", r#"{"question":"hi"}"#), "500-001"),
        (post_json("/openai/answer/model", r#"{"question":"hi"}"#), "500-002"),
        (get("/openai/recipe"), "500-003"),
    ];

    for (request, code) in cases {
        // Act
        let response = unavailable_app().oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["developerMessage"], code);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .ends_with("provider unavailable"));
    }
}

#[tokio::test]
async fn test_concurrent_answers_do_not_cross_talk() {
    // Arrange
    let stubs = Stubs::default();
    let app = stubs.app();

    // Act
    let handles = (0..16)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = format!(r#"{{"question":"question {i}"}}"#);
                let response = app
                    .oneshot(post_json("/openai/answer", &body))
                    .await
                    .unwrap();
                (i, response.status(), text_body(response).await)
            })
        })
        .collect::<Vec<_>>();

    // Assert
    for handle in handles {
        let (i, status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("answer to question {i}"));
    }
    assert_eq!(stubs.text.prompts().len(), 16);
}

#[tokio::test]
async fn test_unknown_routes_return_not_found() {
    for uri in ["/", "/openai/unknown"] {
        // Arrange
        let stubs = Stubs::default();

        // Act
        let response = stubs.app().oneshot(get(uri)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["status"], 404);
    }
}

#[tokio::test]
async fn test_wrong_method_is_a_structured_error() {
    let cases = [
        get("/openai/answer"),
        get("/openai/image"),
        post_json("/openai/recipe", r#"{"question":"hi"}"#),
    ];

    for request in cases {
        // Arrange
        let stubs = Stubs::default();
        let uri = request.uri().to_string();

        // Act
        let response = stubs.app().oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert!(response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/json"));
        let body = json_body(response).await;
        assert_eq!(body["status"], 405);
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert!(stubs.text.prompts().is_empty());
        assert!(stubs.image.descriptions().is_empty());
    }
}

#[tokio::test]
async fn test_not_found_passes_through_cors() {
    // Arrange
    let stubs = Stubs::default();
    let app =
        stubs.app_with_origins(&["http://localhost:3000".to_string()]);
    let request = Request::builder()
        .method(Method::GET)
        .uri("/missing")
        .header(ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    // Act
    let response = app.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_healthz() {
    // Act
    let response = Stubs::default().app().oneshot(get("/healthz")).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    // Act
    let response = Stubs::default()
        .app()
        .oneshot(get("/api-docs/openapi.json"))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["info"]["title"], "OpenAI Chat API");
    assert_eq!(body["info"]["version"], "1.0.4");
    assert_eq!(body["info"]["license"]["name"], "Apache 2.0");
    assert_eq!(body["info"]["contact"]["name"], "API Support");
    for path in [
        "/openai/answer",
        "/openai/answer/model",
        "/openai/recipe",
        "/openai/image",
    ] {
        assert!(body["paths"].get(path).is_some(), "{path}");
    }
}
