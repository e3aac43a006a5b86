use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::response::ApiResponse;
use crate::utils::error::{ActionError, StoreError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    NotFound(String),
    InternalError(String),
    DatabaseError(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Conflict(msg) => msg.clone(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::InternalError(msg) => msg.clone(),
            ApiError::DatabaseError(msg) => msg.clone(),
            ApiError::ServiceUnavailable(msg) => msg.clone(),
        }
    }
}

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Validation(msg) => ApiError::BadRequest(msg),
            err @ (ActionError::NotLoggedIn | ActionError::InvalidCredentials) => {
                ApiError::Unauthorized(err.to_string())
            }
            err @ ActionError::UsernameTaken => ApiError::Conflict(err.to_string()),
            err @ (ActionError::NotFound | ActionError::InvalidAction) => {
                ApiError::NotFound(err.to_string())
            }
            // infrastructure details go to the log, never to the client
            ActionError::Store(StoreError::Unavailable(detail)) | ActionError::Session(detail) => {
                tracing::error!("backing store unavailable: {}", detail);
                ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
            ActionError::Store(other) => {
                tracing::error!("database error: {}", other);
                ApiError::DatabaseError("Database error".to_string())
            }
            ActionError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                ApiError::InternalError("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = ApiResponse::<serde_json::Value>::error(self.message());

        (status, Json(error_response)).into_response()
    }
}
