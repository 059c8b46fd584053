// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use storefront_core::cart;

use crate::errors::ApiError;
use crate::state::AppState;
use crate::web::identity::RequestIdentity;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct SetQuantityRequestPayload {
  pub quantity: i32,
}

// --- Handler Implementations ---

#[instrument(name = "handler::view_cart", skip(app_state, identity))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  identity: RequestIdentity,
) -> Result<HttpResponse, ApiError> {
  let store = app_state.store.as_ref();
  let resolved_cart = cart::resolve(store, &identity.0).await?;
  let view = cart::view(store, &resolved_cart).await?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, identity),
    fields(product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  identity: RequestIdentity,
) -> Result<HttpResponse, ApiError> {
  let store = app_state.store.as_ref();
  let resolved_cart = cart::resolve(store, &identity.0).await?;
  let line = cart::add(store, &resolved_cart, req_payload.product_id, req_payload.quantity).await?;

  info!(cart_id = %resolved_cart.id, line_id = %line.id, "Item added to cart.");

  // The full view is echoed so anonymous clients always receive the
  // session token of the cart they just wrote to.
  let view = cart::view(store, &resolved_cart).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Item added to cart.",
      "line": line,
      "cart": view,
  })))
}

#[instrument(
    name = "handler::set_cart_line_quantity",
    skip(app_state, path, req_payload, identity),
    fields(line_id = %path.as_ref(), quantity = %req_payload.quantity)
)]
pub async fn set_cart_line_quantity_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<SetQuantityRequestPayload>,
  identity: RequestIdentity,
) -> Result<HttpResponse, ApiError> {
  let store = app_state.store.as_ref();
  let resolved_cart = cart::resolve(store, &identity.0).await?;
  let updated = cart::set_quantity(store, &resolved_cart, path.into_inner(), req_payload.quantity).await?;
  let view = cart::view(store, &resolved_cart).await?;

  match updated {
    Some(line) => Ok(HttpResponse::Ok().json(json!({
        "message": "Quantity updated.",
        "line": line,
        "cart": view,
    }))),
    None => Ok(HttpResponse::Ok().json(json!({
        "message": "Item removed from cart.",
        "cart": view,
    }))),
  }
}

#[instrument(
    name = "handler::remove_from_cart",
    skip(app_state, path, identity),
    fields(line_id = %path.as_ref())
)]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  identity: RequestIdentity,
) -> Result<HttpResponse, ApiError> {
  let store = app_state.store.as_ref();
  let resolved_cart = cart::resolve(store, &identity.0).await?;
  cart::remove(store, &resolved_cart, path.into_inner()).await?;
  let view = cart::view(store, &resolved_cart).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Item removed from cart.",
      "cart": view,
  })))
}

#[instrument(name = "handler::clear_cart", skip(app_state, identity))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  identity: RequestIdentity,
) -> Result<HttpResponse, ApiError> {
  let store = app_state.store.as_ref();
  let resolved_cart = cart::resolve(store, &identity.0).await?;
  let removed = cart::clear(store, &resolved_cart).await?;
  let view = cart::view(store, &resolved_cart).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Cart cleared.",
      "removed": removed,
      "cart": view,
  })))
}
