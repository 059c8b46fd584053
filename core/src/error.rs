// storefront_core/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
  /// The referenced entity does not exist, or is hidden from the caller
  /// (inactive products behave exactly like missing ones).
  #[error("{0} not found")]
  NotFound(String),

  /// Requested quantity cannot be satisfied by the product's current stock.
  /// Checked at mutation time only; there is no reservation.
  #[error("Insufficient stock: requested {requested}, available {available}")]
  InsufficientStock { available: i32, requested: i32 },

  /// One review per (user, product).
  #[error("A review for this product by this user already exists")]
  DuplicateReview,

  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("Storage error: {source}")]
  Storage {
    #[from]
    source: sqlx::Error,
  },
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;
