// core/src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One active cart per owner. Exactly one of `user_id` / `session_token`
/// is set (enforced by a CHECK in schema.sql).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cart {
  pub id: Uuid,
  pub user_id: Option<Uuid>,
  pub session_token: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Cart {
  pub fn is_anonymous(&self) -> bool {
    self.user_id.is_none()
  }
}
