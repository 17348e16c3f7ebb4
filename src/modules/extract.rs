use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// `Json<T>` that also runs `T::validate`, rejecting with
/// [`ApiError::InvalidRequest`] instead of axum's plain-text rejections.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "rejected request body");
            ApiError::InvalidRequest("Invalid request body".to_string())
        })?;

        value
            .validate()
            .map_err(|errors| ApiError::InvalidRequest(first_message(&errors)))?;

        Ok(Self(value))
    }
}

fn first_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| (field.clone(), e)))
        .map(|(field, e)| match &e.message {
            Some(message) => message.to_string(),
            None => format!("{} is invalid", field),
        })
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}
