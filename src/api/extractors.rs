use std::collections::HashMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Query, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::utils::validation::RequestFields;

/// Action name plus its fields, decoded from either a JSON or a form body.
/// Query parameters other than `action` fill in fields the body left out.
pub struct ActionPayload {
    pub action: Option<String>,
    pub fields: RequestFields,
}

#[async_trait]
impl<S> FromRequest<S> for ActionPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(mut query) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e)))?;
        let action = query.remove("action");

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(|h| h.to_ascii_lowercase())
            .unwrap_or_default();

        let mut fields = if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to parse JSON: {}", e)))?;
            RequestFields::from_json(value)?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to parse form body: {}", e)))?;
            pairs.into_iter().collect()
        } else {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read body: {}", e)))?;
            decode_untyped_body(&body)?
        };

        fields.fill_missing(query);

        Ok(ActionPayload { action, fields })
    }
}

/// Bodies sent without a JSON or form content type carry no fields; any
/// non-blank payload is refused rather than guessed at.
fn decode_untyped_body(body: &[u8]) -> Result<RequestFields, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RequestFields::new());
    }

    Err(ApiError::bad_request("Unsupported request body"))
}
