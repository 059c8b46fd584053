// server/src/web/identity.rs

//! Request identity extraction.
//!
//! A bearer token in `Authorization` resolves to a user through the
//! store; the `X-Session-Token` header rides along untouched for
//! anonymous carts. Both are optional on most routes, which is why the
//! extractor produces an [`Identity`] instead of failing outright.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use storefront_core::models::User;
use storefront_core::Identity;

use crate::errors::ApiError;
use crate::state::AppState;

/// Header carrying the anonymous cart token minted by the cart resolver.
pub const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

// --- Extractor for the full (possibly anonymous) request identity ---

#[derive(Debug, Clone)]
pub struct RequestIdentity(pub Identity);

impl FromRequest for RequestIdentity {
  type Error = ApiError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let app_state = req.app_data::<web::Data<AppState>>().cloned();
    let bearer = bearer_token(req);
    let session = header_value(req, SESSION_TOKEN_HEADER);

    Box::pin(async move {
      let app_state = match app_state {
        Some(state) => state,
        None => return Err(ApiError::Internal("AppState is not configured".to_string())),
      };
      // A token that is present but unknown is rejected here rather than
      // silently downgraded to an anonymous request.
      let user = match bearer {
        Some(token) => match app_state.store.user_by_access_token(&token).await? {
          Some(user) => Some(user),
          None => {
            warn!("Bearer token did not resolve to an active user.");
            return Err(ApiError::Auth("Invalid or expired access token.".to_string()));
          }
        },
        None => None,
      };
      Ok(RequestIdentity(Identity { user, session }))
    })
  }
}

// --- Extractor for routes that require an authenticated caller ---

#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
  type Error = ApiError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
    let identity_future = RequestIdentity::from_request(req, payload);
    Box::pin(async move {
      let RequestIdentity(identity) = identity_future.await?;
      match identity.user {
        Some(user) => Ok(CurrentUser(user)),
        None => Err(ApiError::Auth("Authentication required.".to_string())),
      }
    })
  }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
  let header = header_value(req, "Authorization")?;
  header.strip_prefix("Bearer ").map(|token| token.trim().to_string())
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
  req
    .headers()
    .get(name)
    .and_then(|value| value.to_str().ok())
    .map(|value| value.to_string())
    .filter(|value| !value.is_empty())
}
