// core/src/models/category.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub parent_id: Option<Uuid>, // Top-level categories have no parent
  pub is_active: bool,
  pub position: i32,
  pub created_at: DateTime<Utc>,
}
