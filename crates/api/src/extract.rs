//! Request extractors that reject with [`AppError`] JSON bodies.
//!
//! Handlers authenticate and check ownership before looking at the body, so
//! a forbidden request is reported as 403 even when its body is also
//! invalid. [`JsonBody`] therefore only buffers the raw bytes; parsing and
//! validation happen in [`JsonBody::into_validated`].

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use dreamboard_core::error::{CoreError, FieldError};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Path parameters; a malformed segment is a 400 with the usual error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Raw request body, parsed on demand.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Bytes);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(JsonBody(bytes))
    }
}

impl JsonBody {
    /// Deserialize the body into `T` and run its validation rules.
    ///
    /// Malformed JSON and type mismatches are reported against the `body`
    /// field; rule violations list every offending field.
    pub fn into_validated<T>(self) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let value: T = serde_json::from_slice(&self.0).map_err(|e| {
            CoreError::InvalidFields(vec![FieldError::new("body", e.to_string())])
        })?;
        value.validate().map_err(CoreError::from)?;
        Ok(value)
    }
}
