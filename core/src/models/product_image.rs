// core/src/models/product_image.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductImage {
  pub id: Uuid,
  pub product_id: Uuid,
  pub url: String,
  pub alt_text: Option<String>,
  pub is_primary: bool,
  pub position: i32,
  pub created_at: DateTime<Utc>,
}
