// core/src/favorites.rs

//! Per-user favorites with an at-most-one-per-(user, product) guard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::catalog::require_active_product;
use crate::error::{CoreError, CoreResult};
use crate::models::Product;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
  Added,
  Removed,
}

/// Flips the favorite state for (user, product). Toggling twice is the
/// identity operation.
#[instrument(name = "favorites::toggle", skip(store), fields(user_id = %user_id, product_id = %product_id))]
pub async fn toggle(store: &dyn Store, user_id: Uuid, product_id: Uuid) -> CoreResult<ToggleOutcome> {
  let product = require_active_product(store, product_id).await?;
  if store.favorite(user_id, product.id).await?.is_some() {
    store.delete_favorite(user_id, product.id).await?;
    return Ok(ToggleOutcome::Removed);
  }
  store.insert_favorite(user_id, product.id).await?;
  Ok(ToggleOutcome::Added)
}

/// Explicit removal; NotFound when nothing was favorited.
#[instrument(name = "favorites::remove", skip(store), fields(user_id = %user_id, product_id = %product_id))]
pub async fn remove(store: &dyn Store, user_id: Uuid, product_id: Uuid) -> CoreResult<()> {
  if !store.delete_favorite(user_id, product_id).await? {
    return Err(CoreError::NotFound("favorite".into()));
  }
  Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteView {
  pub id: Uuid,
  pub created_at: DateTime<Utc>,
  pub product: Product,
}

/// The user's favorites, newest first.
pub async fn list(store: &dyn Store, user_id: Uuid) -> CoreResult<Vec<FavoriteView>> {
  let rows = store.favorites_with_products(user_id).await?;
  Ok(
    rows
      .into_iter()
      .map(|(favorite, product)| FavoriteView {
        id: favorite.id,
        created_at: favorite.created_at,
        product,
      })
      .collect(),
  )
}
