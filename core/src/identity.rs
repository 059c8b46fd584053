// core/src/identity.rs

//! Explicit request identity, passed into every operation that depends
//! on "who is asking" instead of being read from ambient request state.

use uuid::Uuid;

use crate::models::User;

/// What the transport layer knows about the caller. The bearer token (if
/// any) has already been resolved to a [`User`]; the session token is
/// carried as-is.
#[derive(Debug, Clone, Default)]
pub struct Identity {
  pub user: Option<User>,
  pub session: Option<String>,
}

impl Identity {
  pub fn anonymous(session: Option<String>) -> Self {
    Identity { user: None, session }
  }

  pub fn authenticated(user: User) -> Self {
    Identity {
      user: Some(user),
      session: None,
    }
  }

  pub fn user_id(&self) -> Option<Uuid> {
    self.user.as_ref().map(|u| u.id)
  }
}

/// Cart ownership key. An authenticated user always wins over a session
/// token carried on the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOwner {
  User(Uuid),
  Session(String),
}

impl CartOwner {
  /// Derives the owner from an identity. `None` when the caller is
  /// anonymous and presented no session token; the cart resolver mints a
  /// fresh token in that case.
  pub fn from_identity(identity: &Identity) -> Option<CartOwner> {
    if let Some(user) = &identity.user {
      return Some(CartOwner::User(user.id));
    }
    identity.session.clone().map(CartOwner::Session)
  }
}
