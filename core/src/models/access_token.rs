// core/src/models/access_token.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Opaque bearer token. One live token per user; issuing is
/// get-or-create, logout revokes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AccessToken {
  pub token: String,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}
