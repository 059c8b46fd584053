// core/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub short_description: Option<String>,
  pub sku: String,
  pub category_id: Uuid,
  pub brand_id: Option<Uuid>,
  pub price_cents: i64,
  /// Pre-discount price; set only while the product is discounted.
  pub original_price_cents: Option<i64>,
  pub stock: i32,
  pub units_sold: i32,
  pub is_active: bool,
  pub is_featured: bool,
  pub on_offer: bool,
  /// Mean of approved review ratings; 0.0 until the first approval.
  pub average_rating: f64,
  pub review_count: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  pub fn in_stock(&self) -> bool {
    self.stock > 0
  }

  /// Percentage off the original price, when one is set above the
  /// current price.
  pub fn discount_percent(&self) -> Option<u8> {
    match self.original_price_cents {
      Some(original) if original > self.price_cents && original > 0 => {
        Some((((original - self.price_cents) * 100) / original) as u8)
      }
      _ => None,
    }
  }
}
