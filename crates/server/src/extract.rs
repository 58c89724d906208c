use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use common::types::FieldError;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// `Json<T>` whose rejection is the 400 error envelope instead of axum's plain text.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let message = match &rejection {
                    JsonRejection::MissingJsonContentType(_) => "expected `Content-Type: application/json`".to_string(),
                    other => other.body_text(),
                };
                Err(ApiError::validation(vec![FieldError::new("body", message)]))
            }
        }
    }
}

/// `Query<T>` with the same 400 envelope on bad parameters.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError::validation(vec![FieldError::new("query", rejection.body_text())])),
        }
    }
}

/// Path ids are parsed by hand so a malformed one gets the envelope too.
pub fn parse_id(field: &str, raw: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(raw).map_err(|_| ApiError::validation(vec![FieldError::new(field, "must be a UUID")]))
}
