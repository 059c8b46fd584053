// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize; // For request payloads
use serde_json::json; // For JSON responses
use tracing::{info, instrument, warn};

use storefront_core::cart;
use storefront_core::models::{NewUser, User, UserRole};

use crate::errors::ApiError;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::identity::{CurrentUser, RequestIdentity};

const MIN_PASSWORD_LEN: usize = 8;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub email: String,
  pub password: String,
  pub password_confirm: String,
  pub first_name: String,
  pub last_name: String,
  #[serde(default)]
  pub phone: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub email: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::register",
    skip(app_state, req_payload, request_identity),
    fields(req_email = %req_payload.email)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
  request_identity: RequestIdentity,
) -> Result<HttpResponse, ApiError> {
  let payload = req_payload.into_inner();
  info!("Registration attempt for email: {}", payload.email);

  let email = payload.email.trim().to_lowercase();
  if email.is_empty() || !email.contains('@') {
    return Err(ApiError::Validation("A valid email address is required.".to_string()));
  }
  if payload.password.len() < MIN_PASSWORD_LEN {
    return Err(ApiError::Validation(format!(
      "Password must be at least {} characters long.",
      MIN_PASSWORD_LEN
    )));
  }
  if payload.password != payload.password_confirm {
    return Err(ApiError::Validation("Password confirmation does not match.".to_string()));
  }
  let first_name = payload.first_name.trim();
  let last_name = payload.last_name.trim();
  if first_name.is_empty() || last_name.is_empty() {
    return Err(ApiError::Validation("First and last name are required.".to_string()));
  }

  if app_state.store.user_by_email(&email).await?.is_some() {
    return Err(ApiError::Validation(
      "An account with this email already exists.".to_string(),
    ));
  }

  let password_hash = auth_service::hash_password(&payload.password)?;
  let user = app_state
    .store
    .insert_user(NewUser {
      email,
      password_hash,
      first_name: first_name.to_string(),
      last_name: last_name.to_string(),
      phone: payload.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
      role: UserRole::Customer,
    })
    .await?;

  let token = app_state.store.issue_access_token(user.id).await?;
  migrate_session_cart_fail_open(&app_state, &request_identity, &user).await;

  info!(user_id = %user.id, "Registration successful.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Registration successful.",
      "token": token.token,
      "user": user,
  })))
}

#[instrument(
    name = "handler::login",
    skip(app_state, req_payload, request_identity),
    fields(req_email = %req_payload.email)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
  request_identity: RequestIdentity,
) -> Result<HttpResponse, ApiError> {
  info!("Login attempt for email: {}", req_payload.email);

  let email = req_payload.email.trim().to_lowercase();
  // Unknown email and wrong password produce the same message.
  let mut user = match app_state.store.user_by_email(&email).await? {
    Some(user) => user,
    None => return Err(ApiError::Auth("Invalid email or password.".to_string())),
  };
  if !user.is_active {
    return Err(ApiError::Auth("This account has been disabled.".to_string()));
  }
  if !auth_service::verify_password(&user.password_hash, &req_payload.password)? {
    return Err(ApiError::Auth("Invalid email or password.".to_string()));
  }

  let now = Utc::now();
  app_state.store.record_login(user.id, now).await?;
  user.last_login_at = Some(now);

  let token = app_state.store.issue_access_token(user.id).await?;
  migrate_session_cart_fail_open(&app_state, &request_identity, &user).await;

  info!(user_id = %user.id, "Login successful.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Login successful.",
      "token": token.token,
      "user": user,
  })))
}

#[instrument(name = "handler::logout", skip(app_state, current_user), fields(user_id = %current_user.0.id))]
pub async fn logout_handler(
  app_state: web::Data<AppState>,
  current_user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
  app_state.store.revoke_access_tokens(current_user.0.id).await?;
  info!("Logout successful.");
  Ok(HttpResponse::Ok().json(json!({"message": "Logged out."})))
}

#[instrument(name = "handler::me", skip(current_user), fields(user_id = %current_user.0.id))]
pub async fn me_handler(current_user: CurrentUser) -> Result<HttpResponse, ApiError> {
  Ok(HttpResponse::Ok().json(current_user.0))
}

/// Merges an anonymous session cart into the user's cart after a
/// successful sign-in or registration. Fail-open: a migration error is
/// logged and the auth flow proceeds regardless.
async fn migrate_session_cart_fail_open(app_state: &AppState, request_identity: &RequestIdentity, user: &User) {
  let session_token = match request_identity.0.session.as_deref() {
    Some(token) => token,
    None => return,
  };
  match cart::migrate_session_cart(app_state.store.as_ref(), session_token, user.id).await {
    Ok(outcome) if !outcome.is_noop() => {
      info!(
        user_id = %user.id,
        merged = outcome.merged,
        moved = outcome.moved,
        "Session cart migrated on sign-in."
      );
    }
    Ok(_) => {}
    Err(err) => {
      warn!(user_id = %user.id, error = %err, "Session cart migration failed; continuing sign-in.");
    }
  }
}
