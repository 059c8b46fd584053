// core/src/models/brand.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Brand {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub logo_url: Option<String>,
  pub website: Option<String>,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}
