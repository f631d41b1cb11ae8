//! Extractors that reject with [`ApiError`] instead of axum's plain-text rejections.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::server::api_error::ApiError;

/// JSON request body.
///
/// Any rejection (bad syntax, wrong field types, missing JSON content type)
/// becomes a 400 whose message is the parser's own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
        }
    }
}

/// The `:id` path segment, parsed as a customer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerId(pub i64);

impl CustomerId {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| ApiError::invalid_field("id", "customer id must be an integer"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CustomerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_field("id", &e.body_text()))?;

        Self::parse(&raw)
    }
}
