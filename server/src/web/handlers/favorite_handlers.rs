// server/src/web/handlers/favorite_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use storefront_core::favorites;

use crate::errors::ApiError;
use crate::state::AppState;
use crate::web::identity::CurrentUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct ToggleFavoriteRequestPayload {
  pub product_id: Uuid,
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_favorites", skip(app_state, current_user), fields(user_id = %current_user.0.id))]
pub async fn list_favorites_handler(
  app_state: web::Data<AppState>,
  current_user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
  let favorites = favorites::list(app_state.store.as_ref(), current_user.0.id).await?;
  Ok(HttpResponse::Ok().json(json!({
      "favorites": favorites,
      "count": favorites.len(),
  })))
}

#[instrument(
    name = "handler::toggle_favorite",
    skip(app_state, req_payload, current_user),
    fields(user_id = %current_user.0.id, product_id = %req_payload.product_id)
)]
pub async fn toggle_favorite_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<ToggleFavoriteRequestPayload>,
  current_user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
  let outcome = favorites::toggle(app_state.store.as_ref(), current_user.0.id, req_payload.product_id).await?;
  info!(?outcome, "Favorite toggled.");
  Ok(HttpResponse::Ok().json(json!({
      "status": outcome,
      "product_id": req_payload.product_id,
  })))
}

#[instrument(
    name = "handler::remove_favorite",
    skip(app_state, path, current_user),
    fields(user_id = %current_user.0.id, product_id = %path.as_ref())
)]
pub async fn remove_favorite_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  current_user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
  favorites::remove(app_state.store.as_ref(), current_user.0.id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({"message": "Favorite removed."})))
}
