use std::{collections::HashMap, sync::OnceLock};

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::ApiError;

static ERROR_CODES: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    pub developer_message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message, developer_message) = match self {
            ApiError::ClientError { message, code } => {
                (StatusCode::BAD_REQUEST, message, code)
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, message, None)
            }
            ApiError::MethodNotAllowed(message) => {
                (StatusCode::METHOD_NOT_ALLOWED, message, None)
            }
            ApiError::ServerError { message, code } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, code)
            }
        };

        let body = ErrorResponse {
            status: status_code.as_u16(),
            message,
            developer_message,
        };

        (status_code, Json(body)).into_response()
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T>;
}

impl<T> IntoApiResponse<T> for anyhow::Result<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            let message = format!("{}: {}", describe(error_code), e);
            let code = Some(error_code.to_string());

            match error_code.as_bytes().first() {
                Some(&b'4') => {
                    warn!(code = error_code, error = format!("{:?}", e));
                    ApiError::ClientError { message, code }
                }
                _ => {
                    error!(code = error_code, error = format!("{:?}", e));
                    ApiError::ServerError { message, code }
                }
            }
        })
    }
}

fn describe(error_code: &str) -> &'static str {
    ERROR_CODES
        .get_or_init(|| {
            serde_json::from_str(include_str!("error-code.json"))
                .unwrap_or_default()
        })
        .get(error_code)
        .map(String::as_str)
        .unwrap_or("unexpected error")
}
