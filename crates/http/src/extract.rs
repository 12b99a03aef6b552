//! JSON body extraction with field validation.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;

/// Field-level checks run on a request body after it deserializes.
pub trait Validate {
    /// Returns one `{field, error}` entry per failed check; empty when valid.
    fn validate(&self) -> Vec<serde_json::Value>;
}

/// Report `field` as required when `value` is blank.
pub fn require(field: &str, value: &str, details: &mut Vec<serde_json::Value>) {
    if value.trim().is_empty() {
        details.push(json!({"field": field, "error": "required"}));
    }
}

/// `Json<T>` that rejects malformed bodies and failed checks with
/// [`AppError::Validation`] before the handler runs.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError::validation(
                    vec![json!({"field": "body", "error": rejection.body_text()})],
                    "Invalid request body",
                )
            })?;

        let details = value.validate();
        if !details.is_empty() {
            return Err(AppError::validation(details, "Request validation failed"));
        }

        Ok(ValidJson(value))
    }
}
