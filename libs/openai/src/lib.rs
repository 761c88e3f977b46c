//! Thin typed client for the OpenAI REST API.
//!
//! Only the two endpoints the gateway needs are modelled:
//! `chat/completions` and `images/generations`.

pub mod models;

pub static DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
