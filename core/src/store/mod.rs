// core/src/store/mod.rs

//! Storage seam for the domain layer.
//!
//! [`Store`] exposes record primitives only; the domain rules (stock
//! checks, consolidation, migration, uniqueness guards) live in the
//! operation modules and are written once against this trait. Two
//! implementations ship: [`PgStore`] over PostgreSQL and [`MemoryStore`]
//! for tests and the `memory` backend mode.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::ProductFilter;
use crate::error::CoreResult;
use crate::identity::CartOwner;
use crate::models::{
  AccessToken, Brand, Cart, CartLine, Category, Favorite, NewCartLine, NewReview, NewUser, Product, ProductImage,
  Review, User,
};

pub type SharedStore = Arc<dyn Store>;

#[async_trait]
pub trait Store: Send + Sync {
  // --- users & access tokens ---

  async fn insert_user(&self, new_user: NewUser) -> CoreResult<User>;
  async fn user_by_id(&self, id: Uuid) -> CoreResult<Option<User>>;
  async fn user_by_email(&self, email: &str) -> CoreResult<Option<User>>;
  async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> CoreResult<()>;

  /// Get-or-create: a user keeps one live token until logout.
  async fn issue_access_token(&self, user_id: Uuid) -> CoreResult<AccessToken>;
  /// Inactive accounts resolve to None, same as an unknown token.
  async fn user_by_access_token(&self, token: &str) -> CoreResult<Option<User>>;
  async fn revoke_access_tokens(&self, user_id: Uuid) -> CoreResult<u64>;

  // --- catalog ---

  async fn insert_category(&self, category: Category) -> CoreResult<Category>;
  async fn list_categories(&self) -> CoreResult<Vec<Category>>;
  async fn category_by_slug(&self, slug: &str) -> CoreResult<Option<Category>>;
  async fn insert_brand(&self, brand: Brand) -> CoreResult<Brand>;
  async fn list_brands(&self) -> CoreResult<Vec<Brand>>;
  async fn insert_product(&self, product: Product) -> CoreResult<Product>;
  async fn product_by_id(&self, id: Uuid) -> CoreResult<Option<Product>>;
  async fn list_products(&self, filter: &ProductFilter) -> CoreResult<Vec<Product>>;
  async fn insert_product_image(&self, image: ProductImage) -> CoreResult<ProductImage>;
  /// Primary image first, then by position.
  async fn product_images(&self, product_id: Uuid) -> CoreResult<Vec<ProductImage>>;
  async fn update_product_rating(&self, product_id: Uuid, average: f64, count: i32) -> CoreResult<()>;

  // --- carts ---

  async fn cart_by_user(&self, user_id: Uuid) -> CoreResult<Option<Cart>>;
  async fn cart_by_session(&self, session_token: &str) -> CoreResult<Option<Cart>>;
  /// Returns the owner's existing cart when one is already there, so a
  /// lost create race collapses onto the winner's cart.
  async fn insert_cart(&self, owner: &CartOwner) -> CoreResult<Cart>;
  /// Deletes the cart's lines, then the cart row. Owned collections are
  /// removed explicitly here, never by schema-level cascade.
  async fn delete_cart(&self, cart_id: Uuid) -> CoreResult<()>;

  // --- cart lines ---

  async fn cart_lines(&self, cart_id: Uuid) -> CoreResult<Vec<CartLine>>;
  async fn cart_lines_with_products(&self, cart_id: Uuid) -> CoreResult<Vec<(CartLine, Product)>>;
  async fn cart_line(&self, cart_id: Uuid, line_id: Uuid) -> CoreResult<Option<CartLine>>;

  /// Consolidating insert: an existing line for the same product absorbs
  /// the quantity (summed) and keeps its original unit price snapshot.
  /// Returns the resulting line either way.
  async fn insert_cart_line(&self, line: NewCartLine) -> CoreResult<CartLine>;
  async fn set_cart_line_quantity(&self, line_id: Uuid, quantity: i32) -> CoreResult<CartLine>;
  async fn delete_cart_line(&self, line_id: Uuid) -> CoreResult<()>;
  /// Removes every line; the cart row stays. Returns the number removed.
  async fn clear_cart(&self, cart_id: Uuid) -> CoreResult<u64>;

  // --- favorites ---

  async fn favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Option<Favorite>>;
  /// Idempotent: returns the existing favorite when one is already there.
  async fn insert_favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Favorite>;
  async fn delete_favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<bool>;
  /// Newest first, joined with the product rows.
  async fn favorites_with_products(&self, user_id: Uuid) -> CoreResult<Vec<(Favorite, Product)>>;

  // --- reviews ---

  async fn review_by_user_and_product(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Option<Review>>;
  async fn insert_review(&self, review: NewReview) -> CoreResult<Review>;
  async fn review_by_id(&self, id: Uuid) -> CoreResult<Option<Review>>;
  async fn set_review_approved(&self, id: Uuid, approved: bool) -> CoreResult<Review>;
  async fn reviews_for_product(&self, product_id: Uuid, approved_only: bool) -> CoreResult<Vec<Review>>;
  /// Mean rating and count over approved reviews; (0.0, 0) when none.
  async fn approved_review_stats(&self, product_id: Uuid) -> CoreResult<(f64, i32)>;
}
