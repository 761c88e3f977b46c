use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use util::load_config;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::clients::openai::ModelFactory;

pub use crate::clients::{
    ChatModelConfig, ImageModel, ImageModelConfig, TextModel,
};
pub use crate::openai::{prompt::RecipePrompt, request::Question};
pub use crate::response::ErrorResponse;

mod clients;
pub mod healthz;
pub mod not_found;
pub mod openai;
mod response;

#[derive(Debug)]
pub enum ApiError {
    ClientError {
        message: String,
        code: Option<String>,
    },
    NotFound(String),
    MethodNotAllowed(String),
    ServerError {
        message: String,
        code: Option<String>,
    },
}

#[derive(Clone)]
pub struct ApiState {
    text: Arc<dyn TextModel>,
    tuned_text: Arc<dyn TextModel>,
    image: Arc<dyn ImageModel>,
}

impl ApiState {
    pub fn new(
        text: Arc<dyn TextModel>,
        tuned_text: Arc<dyn TextModel>,
        image: Arc<dyn ImageModel>,
    ) -> Self {
        Self {
            text,
            tuned_text,
            image,
        }
    }

    /// Builds one model handle per distinct configuration, all sharing a
    /// single connection pool.
    pub fn from_config(api_key: &str, config: &OpenAi) -> anyhow::Result<Self> {
        let factory = ModelFactory::new(&config.base_url, api_key)?;

        let text = factory.text(&config.chat);
        let tuned_text = if config.tuned_chat == config.chat {
            text.clone()
        } else {
            factory.text(&config.tuned_chat)
        };
        let image = factory.image(&config.image);

        Ok(Self::new(text, tuned_text, image))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub openai: OpenAi,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OpenAi {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "ChatModelConfig::default_chat")]
    pub chat: ChatModelConfig,
    #[serde(default = "ChatModelConfig::default_tuned_chat")]
    pub tuned_chat: ChatModelConfig,
    #[serde(default)]
    pub image: ImageModelConfig,
}

impl Config {
    /// Loads `Config{suffix}.toml` from the workspace root.
    pub fn load(suffix: Option<&str>) -> anyhow::Result<Self> {
        let config_name = format!("Config{}.toml", suffix.unwrap_or_default());

        load_config(&config_name)
            .with_context(|| format!("failed to load {}", config_name))
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origins: vec![],
        }
    }
}

impl Default for OpenAi {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat: ChatModelConfig::default_chat(),
            tuned_chat: ChatModelConfig::default_tuned_chat(),
            image: ImageModelConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    8000
}

fn default_base_url() -> String {
    ::openai::DEFAULT_BASE_URL.to_string()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OpenAI Chat API",
        version = "1.0.4",
        description = "Answers questions, generates recipes and images with OpenAI language models.",
        contact(name = "API Support", url = "http://example.com/contact"),
        license(
            name = "Apache 2.0",
            url = "http://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local server")
    ),
    paths(
        openai::answer,
        openai::answer_with_tuned_model,
        openai::recipe,
        openai::generate_image,
        healthz::get_health,
    ),
    components(schemas(Question, ErrorResponse)),
    tags(
        (name = "OpenAI Language Models", description = "Text, recipe and image generation")
    )
)]
pub struct ApiDoc;

pub fn serve(openai_api_key: &str, config: &Config) -> anyhow::Result<Router> {
    info!(task = "start api serving");

    let state = ApiState::from_config(openai_api_key, &config.openai)?;

    router(state, &config.server.allowed_origins)
}

pub fn router(
    state: ApiState,
    allowed_origins: &[String],
) -> anyhow::Result<Router> {
    let cors = if allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid cors origin: {}", origin))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        CorsLayer::new().allow_origin(origins)
    };

    // openai
    let openai_router = Router::new()
        .route("/answer", post(openai::answer))
        .route("/answer/model", post(openai::answer_with_tuned_model))
        .route("/answerModel", post(openai::answer_with_tuned_model))
        .route("/recipe", get(openai::recipe))
        .route("/receita", get(openai::recipe))
        .route("/image", post(openai::generate_image))
        .fallback(not_found::get_404)
        .method_not_allowed_fallback(not_found::get_405)
        .with_state(state);

    let router = Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .route("/healthz", get(healthz::get_health))
        .nest("/openai", openai_router)
        .fallback(not_found::get_404)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
