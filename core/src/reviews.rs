// core/src/reviews.rs

//! Product reviews: one per (user, product), integer ratings 1..=5,
//! approval workflow, and the approved-rating aggregates persisted on
//! the product row.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::require_active_product;
use crate::error::{CoreError, CoreResult};
use crate::models::{NewReview, Review, User};
use crate::store::Store;

/// Creates a review. Customer reviews start unapproved; staff/admin
/// reviews land approved and immediately refresh the product's
/// aggregates.
#[instrument(
  name = "reviews::create",
  skip(store, author, comment),
  fields(user_id = %author.id, product_id = %product_id, rating)
)]
pub async fn create(
  store: &dyn Store,
  author: &User,
  product_id: Uuid,
  rating: i16,
  comment: Option<String>,
) -> CoreResult<Review> {
  if !(1..=5).contains(&rating) {
    return Err(CoreError::Validation("rating must be between 1 and 5".into()));
  }
  let product = require_active_product(store, product_id).await?;
  if store.review_by_user_and_product(author.id, product.id).await?.is_some() {
    return Err(CoreError::DuplicateReview);
  }
  let comment = comment.filter(|c| !c.trim().is_empty());
  let review = store
    .insert_review(NewReview {
      user_id: author.id,
      product_id: product.id,
      rating,
      comment,
      approved: author.role.is_elevated(),
    })
    .await?;
  if review.approved {
    refresh_product_rating(store, product.id).await?;
  }
  Ok(review)
}

/// Approves a pending review and refreshes the product aggregates.
/// Already-approved reviews are returned unchanged.
#[instrument(name = "reviews::approve", skip(store), fields(review_id = %review_id))]
pub async fn approve(store: &dyn Store, review_id: Uuid) -> CoreResult<Review> {
  let review = match store.review_by_id(review_id).await? {
    Some(review) => review,
    None => return Err(CoreError::NotFound("review".into())),
  };
  if review.approved {
    return Ok(review);
  }
  let review = store.set_review_approved(review.id, true).await?;
  refresh_product_rating(store, review.product_id).await?;
  info!(review_id = %review.id, product_id = %review.product_id, "review approved");
  Ok(review)
}

/// Approved reviews for a product, newest first.
pub async fn list_for_product(store: &dyn Store, product_id: Uuid) -> CoreResult<Vec<Review>> {
  let product = require_active_product(store, product_id).await?;
  store.reviews_for_product(product.id, true).await
}

async fn refresh_product_rating(store: &dyn Store, product_id: Uuid) -> CoreResult<()> {
  let (average, count) = store.approved_review_stats(product_id).await?;
  store.update_product_rating(product_id, average, count).await
}
