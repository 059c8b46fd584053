// server/src/web/handlers/review_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use storefront_core::reviews;

use crate::errors::ApiError;
use crate::state::AppState;
use crate::web::identity::CurrentUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct CreateReviewRequestPayload {
  pub rating: i16,
  #[serde(default)]
  pub comment: Option<String>,
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_product_reviews", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn list_product_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
  let reviews = reviews::list_for_product(app_state.store.as_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "reviews": reviews,
      "count": reviews.len(),
  })))
}

#[instrument(
    name = "handler::create_review",
    skip(app_state, path, req_payload, current_user),
    fields(user_id = %current_user.0.id, product_id = %path.as_ref(), rating = %req_payload.rating)
)]
pub async fn create_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<CreateReviewRequestPayload>,
  current_user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
  let payload = req_payload.into_inner();
  let review = reviews::create(
    app_state.store.as_ref(),
    &current_user.0,
    path.into_inner(),
    payload.rating,
    payload.comment,
  )
  .await?;
  info!(review_id = %review.id, approved = review.approved, "Review submitted.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Review submitted.",
      "review": review,
  })))
}

#[instrument(
    name = "handler::approve_review",
    skip(app_state, path, current_user),
    fields(user_id = %current_user.0.id, review_id = %path.as_ref())
)]
pub async fn approve_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  current_user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
  if !current_user.0.role.is_elevated() {
    return Err(ApiError::Forbidden("Staff access is required.".to_string()));
  }
  let review = reviews::approve(app_state.store.as_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Review approved.",
      "review": review,
  })))
}
