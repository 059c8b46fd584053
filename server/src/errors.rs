// server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use storefront_core::CoreError;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Domain errors bubble up unchanged; the HTTP status is derived from
  /// the variant in `error_response`.
  #[error(transparent)]
  Core(#[from] CoreError),

  /// Transport-level validation (malformed payload fields) that never
  /// reaches the domain layer.
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

impl ResponseError for ApiError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      ApiError::Core(core) => core_error_response(core),
      ApiError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      ApiError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      ApiError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m})),
      ApiError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      ApiError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

/// Status mapping for the domain error taxonomy. `InsufficientStock`
/// carries the available quantity so clients can cap their retry.
fn core_error_response(err: &CoreError) -> HttpResponse {
  match err {
    CoreError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
    CoreError::InsufficientStock { available, .. } => {
      HttpResponse::BadRequest().json(json!({"error": err.to_string(), "available": available}))
    }
    CoreError::NotFound(_) => HttpResponse::NotFound().json(json!({"error": err.to_string()})),
    CoreError::DuplicateReview => HttpResponse::Conflict().json(json!({"error": err.to_string()})),
    CoreError::Storage { .. } => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
  }
}

// Define a Result type alias for the application
pub type Result<T, E = ApiError> = std::result::Result<T, E>;
