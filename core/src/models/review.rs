// core/src/models/review.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// At most one per (user, product). Customer reviews start unapproved;
/// staff/admin reviews land approved.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub rating: i16, // 1..=5, validated before insert
  pub comment: Option<String>,
  pub approved: bool,
  pub created_at: DateTime<Utc>,
}

/// Insert payload; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewReview {
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub rating: i16,
  pub comment: Option<String>,
  pub approved: bool,
}
