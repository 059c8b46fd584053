// core/src/catalog.rs

//! Read-side catalog operations. Only active rows are visible through
//! here; an inactive product behaves exactly like a missing one.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{Brand, Category, Product, ProductImage};
use crate::store::Store;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
  PriceAsc,
  PriceDesc,
  NameAsc,
  NameDesc,
  #[default]
  Newest,
  BestSelling,
  TopRated,
}

/// Listing filter. Boolean fields filter by equality when set;
/// `in_stock: Some(true)` means stock > 0. Search is a case-insensitive
/// match over name, descriptions and sku.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
  pub search: Option<String>,
  pub category_id: Option<Uuid>,
  pub brand_id: Option<Uuid>,
  pub min_price_cents: Option<i64>,
  pub max_price_cents: Option<i64>,
  pub featured: Option<bool>,
  pub on_offer: Option<bool>,
  pub in_stock: Option<bool>,
  pub sort: ProductSort,
}

impl ProductFilter {
  pub fn featured_only() -> Self {
    ProductFilter {
      featured: Some(true),
      ..Default::default()
    }
  }

  pub fn offers_only() -> Self {
    ProductFilter {
      on_offer: Some(true),
      ..Default::default()
    }
  }
}

/// Product plus its gallery, the detail-page shape.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
  #[serde(flatten)]
  pub product: Product,
  pub discount_percent: Option<u8>,
  pub images: Vec<ProductImage>,
}

pub async fn list_products(store: &dyn Store, filter: &ProductFilter) -> CoreResult<Vec<Product>> {
  store.list_products(filter).await
}

#[instrument(name = "catalog::get_product", skip(store))]
pub async fn get_product(store: &dyn Store, product_id: Uuid) -> CoreResult<ProductDetail> {
  let product = require_active_product(store, product_id).await?;
  let images = store.product_images(product.id).await?;
  let discount_percent = product.discount_percent();
  Ok(ProductDetail {
    product,
    discount_percent,
    images,
  })
}

pub async fn list_categories(store: &dyn Store) -> CoreResult<Vec<Category>> {
  store.list_categories().await
}

pub async fn list_brands(store: &dyn Store) -> CoreResult<Vec<Brand>> {
  store.list_brands().await
}

/// Resolves a category slug for the browse-by-category listing.
pub async fn category_by_slug(store: &dyn Store, slug: &str) -> CoreResult<Category> {
  store
    .category_by_slug(slug)
    .await?
    .ok_or_else(|| CoreError::NotFound(format!("category '{}'", slug)))
}

/// Shared visibility gate: missing and inactive products are the same
/// NotFound to callers.
pub(crate) async fn require_active_product(store: &dyn Store, product_id: Uuid) -> CoreResult<Product> {
  match store.product_by_id(product_id).await? {
    Some(product) if product.is_active => Ok(product),
    _ => Err(CoreError::NotFound("product".into())),
  }
}
