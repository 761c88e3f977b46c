use crate::ApiError;

pub(super) async fn get_404() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

pub(super) async fn get_405() -> ApiError {
    ApiError::MethodNotAllowed("method not allowed for this route".to_string())
}
