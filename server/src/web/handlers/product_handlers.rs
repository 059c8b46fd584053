// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use storefront_core::catalog::{self, ProductFilter, ProductSort};

use crate::errors::ApiError;
use crate::state::AppState;

// --- Request DTOs ---

/// Flat query-string mirror of [`ProductFilter`]. `category` takes a
/// slug and is resolved before filtering; `category_id` wins if both
/// are supplied.
#[derive(Deserialize, Debug, Default)]
pub struct ListProductsQuery {
  pub q: Option<String>,
  pub category: Option<String>,
  pub category_id: Option<Uuid>,
  pub brand_id: Option<Uuid>,
  pub min_price_cents: Option<i64>,
  pub max_price_cents: Option<i64>,
  pub featured: Option<bool>,
  pub on_offer: Option<bool>,
  pub in_stock: Option<bool>,
  pub sort: Option<ProductSort>,
}

impl ListProductsQuery {
  async fn into_filter(self, app_state: &AppState) -> Result<ProductFilter, ApiError> {
    let mut filter = ProductFilter {
      search: self.q.filter(|q| !q.trim().is_empty()),
      category_id: self.category_id,
      brand_id: self.brand_id,
      min_price_cents: self.min_price_cents,
      max_price_cents: self.max_price_cents,
      featured: self.featured,
      on_offer: self.on_offer,
      in_stock: self.in_stock,
      sort: self.sort.unwrap_or_default(),
    };
    if filter.category_id.is_none() {
      if let Some(slug) = self.category.as_deref() {
        let category = catalog::category_by_slug(app_state.store.as_ref(), slug).await?;
        filter.category_id = Some(category.id);
      }
    }
    Ok(filter)
  }
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, ApiError> {
  let filter = query_params.into_inner().into_filter(&app_state).await?;
  let products = catalog::list_products(app_state.store.as_ref(), &filter).await?;
  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({
      "products": products,
      "count": products.len(),
  })))
}

#[instrument(name = "handler::featured_products", skip(app_state))]
pub async fn featured_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let products = catalog::list_products(app_state.store.as_ref(), &ProductFilter::featured_only()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "products": products,
      "count": products.len(),
  })))
}

#[instrument(name = "handler::offer_products", skip(app_state))]
pub async fn offer_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let products = catalog::list_products(app_state.store.as_ref(), &ProductFilter::offers_only()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "products": products,
      "count": products.len(),
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
  let detail = catalog::get_product(app_state.store.as_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(detail))
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let categories = catalog::list_categories(app_state.store.as_ref()).await?;
  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

#[instrument(name = "handler::list_brands", skip(app_state))]
pub async fn list_brands_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let brands = catalog::list_brands(app_state.store.as_ref()).await?;
  Ok(HttpResponse::Ok().json(json!({ "brands": brands })))
}
