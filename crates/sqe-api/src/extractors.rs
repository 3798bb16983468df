// SPDX-License-Identifier: BUSL-1.1
//! Request validation plumbing.
//!
//! JSON deserialization failures and business-rule violations are both
//! 422 Unprocessable Entity — the client sent syntactically valid HTTP
//! with semantically invalid content.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request types that carry their own field-level validation.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap an axum JSON extraction and run the payload's validation.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(payload) = body.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    payload.validate().map_err(AppError::Validation)?;
    Ok(payload)
}
