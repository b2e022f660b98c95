use anyhow::anyhow;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::errors::AppError;

/// JSON extractor that runs `validator` rules after deserialization.
/// Malformed bodies map to 400, rule failures to 422, both with the
/// standard `{"error": ...}` payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        if let Err(errors) = value.validate() {
            let messages: Vec<String> = errors
                .field_errors()
                .iter()
                .flat_map(|(field, field_errors)| {
                    field_errors.iter().map(move |e| match &e.message {
                        Some(msg) => msg.to_string(),
                        None => format!("{} is invalid", field),
                    })
                })
                .collect();

            return Err(AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!("{}", messages.join(", ")),
            ));
        }

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match &rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        )),
        JsonRejection::JsonDataError(_) => {
            // serde's message for absent fields is the most actionable part
            // of the rejection; surface the field name when present.
            let text = rejection.body_text();
            match text
                .split_once("missing field `")
                .and_then(|(_, rest)| rest.split('`').next())
            {
                Some(field) => AppError::bad_request(anyhow!("{} is required", field)),
                None => AppError::bad_request(anyhow!("Invalid request body")),
            }
        }
        _ => AppError::bad_request(anyhow!("Invalid request body")),
    }
}
