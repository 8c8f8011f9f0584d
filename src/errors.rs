use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::models::summary::ConsistencyError;
use crate::models::validator::ValidationError;

#[derive(Debug)]
pub enum AppError {
    /// Batch failed validation; carries per-record diagnostics.
    Validation(ValidationError),
    /// Aggregation invariant broke — unreachable while the validator gate
    /// holds, so this is reported as an opaque server error.
    Consistency(ConsistencyError),
    /// 404 with a caller-supplied message, so each endpoint states what was
    /// missing.
    NotFound(&'static str),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "Validation error: {e}"),
            AppError::Consistency(e) => write!(f, "Consistency error: {e}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(e) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string(),
                "issues": e.issues,
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "error": msg
            })),
            AppError::Consistency(_) => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<ConsistencyError> for AppError {
    fn from(e: ConsistencyError) -> Self {
        AppError::Consistency(e)
    }
}
