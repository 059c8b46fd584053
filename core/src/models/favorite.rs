// core/src/models/favorite.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// At most one per (user, product); created on toggle-on, deleted on
/// toggle-off or explicit removal.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Favorite {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub created_at: DateTime<Utc>,
}
