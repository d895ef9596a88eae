use axum::{extract::rejection::JsonRejection, extract::FromRequest};

use crate::error::AppError;

/// `axum::Json` whose rejection is reported through `AppError`, so malformed
/// or incomplete bodies answer 400 with the usual JSON error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
