// core/src/cart.rs

//! Cart subsystem: one active cart per owner, consolidated lines with
//! unit-price snapshots, and the session-to-user migration that runs
//! when an anonymous visitor signs in.
//!
//! Callers resolve the cart once per request with [`resolve`] and pass
//! it to the line operations, so a freshly minted session token is
//! reused instead of minting a second cart mid-request.

use serde::Serialize;
use tracing::{event, info, instrument, Level};
use uuid::Uuid;

use crate::catalog::require_active_product;
use crate::error::{CoreError, CoreResult};
use crate::identity::{CartOwner, Identity};
use crate::models::{Cart, CartLine, NewCartLine, Product};
use crate::store::Store;

/// Resolves the caller's active cart, creating one if needed.
///
/// An authenticated user always wins over a session token carried on the
/// same request. Anonymous callers without a session token get a fresh
/// one minted here; it is persisted on the cart row and echoed in every
/// cart view so the client can replay it on later requests.
#[instrument(name = "cart::resolve", skip(store, identity), fields(user_id = ?identity.user_id()))]
pub async fn resolve(store: &dyn Store, identity: &Identity) -> CoreResult<Cart> {
  let owner = match CartOwner::from_identity(identity) {
    Some(owner) => owner,
    None => CartOwner::Session(mint_session_token()),
  };
  get_or_create(store, &owner).await
}

/// Adds a product to the cart.
///
/// An existing line for the product absorbs the quantity; a new line
/// snapshots the product's current price. Only the requested delta is
/// checked against stock, so a consolidated line can end up above stock.
/// Same for two concurrent adds that each pass the check. Both are
/// known, accepted behavior carried over from the source system.
#[instrument(
  name = "cart::add",
  skip(store, cart),
  fields(cart_id = %cart.id, product_id = %product_id, quantity)
)]
pub async fn add(store: &dyn Store, cart: &Cart, product_id: Uuid, quantity: i32) -> CoreResult<CartLine> {
  if quantity <= 0 {
    return Err(CoreError::Validation("quantity must be positive".into()));
  }
  let product = require_active_product(store, product_id).await?;
  check_stock(&product, quantity)?;
  let line = store
    .insert_cart_line(NewCartLine {
      cart_id: cart.id,
      product_id: product.id,
      quantity,
      unit_price_cents: product.price_cents,
    })
    .await?;
  info!(line_id = %line.id, quantity = line.quantity, "cart line upserted");
  Ok(line)
}

/// Absolute quantity update for a line of the cart.
///
/// `new_quantity <= 0` deletes the line and returns None. A quantity
/// above stock fails and leaves the line untouched.
#[instrument(
  name = "cart::set_quantity",
  skip(store, cart),
  fields(cart_id = %cart.id, line_id = %line_id, new_quantity)
)]
pub async fn set_quantity(
  store: &dyn Store,
  cart: &Cart,
  line_id: Uuid,
  new_quantity: i32,
) -> CoreResult<Option<CartLine>> {
  let line = match store.cart_line(cart.id, line_id).await? {
    Some(line) => line,
    None => return Err(CoreError::NotFound("cart line".into())),
  };
  let product = match store.product_by_id(line.product_id).await? {
    Some(product) => product,
    None => return Err(CoreError::NotFound("product".into())),
  };
  check_stock(&product, new_quantity)?;
  if new_quantity <= 0 {
    store.delete_cart_line(line.id).await?;
    event!(Level::DEBUG, line_id = %line.id, "line removed via zero quantity");
    return Ok(None);
  }
  let updated = store.set_cart_line_quantity(line.id, new_quantity).await?;
  Ok(Some(updated))
}

/// Removes a line from the cart. NotFound when the line does not belong
/// to it.
#[instrument(
  name = "cart::remove",
  skip(store, cart),
  fields(cart_id = %cart.id, line_id = %line_id)
)]
pub async fn remove(store: &dyn Store, cart: &Cart, line_id: Uuid) -> CoreResult<()> {
  let line = match store.cart_line(cart.id, line_id).await? {
    Some(line) => line,
    None => return Err(CoreError::NotFound("cart line".into())),
  };
  store.delete_cart_line(line.id).await
}

/// Empties the cart. Idempotent; the cart row stays.
#[instrument(name = "cart::clear", skip(store, cart), fields(cart_id = %cart.id))]
pub async fn clear(store: &dyn Store, cart: &Cart) -> CoreResult<u64> {
  let removed = store.clear_cart(cart.id).await?;
  info!(cart_id = %cart.id, removed, "cart cleared");
  Ok(removed)
}

pub async fn view(store: &dyn Store, cart: &Cart) -> CoreResult<CartView> {
  let rows = store.cart_lines_with_products(cart.id).await?;
  Ok(build_view(cart, rows))
}

#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
  pub id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub product_stock: i32,
  pub quantity: i32,
  pub unit_price_cents: i64,
  pub subtotal_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
  pub id: Uuid,
  /// Present on anonymous carts so the client can persist the token.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub session_token: Option<String>,
  pub lines: Vec<CartLineView>,
  pub total_cents: i64,
  pub total_items: i32,
}

/// Counts reported back to the sign-in flow for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOutcome {
  /// Lines whose quantity was summed into an existing user-cart line.
  pub merged: usize,
  /// Lines copied over with their captured unit price.
  pub moved: usize,
}

impl MigrationOutcome {
  pub fn is_noop(&self) -> bool {
    self.merged == 0 && self.moved == 0
  }
}

/// Merges the session cart into the user's cart, then deletes it.
///
/// Quantities for the same product are summed, never maxed. The user
/// line's price snapshot wins on merge; copied lines keep theirs. There
/// is no stock re-check here, so a merged line can exceed stock. Known,
/// accepted behavior. No-op when the session has no cart.
///
/// Call sites run this fail-open: an error is logged and never blocks
/// the sign-in.
#[instrument(name = "cart::migrate_session_cart", skip(store, session_token), fields(user_id = %user_id))]
pub async fn migrate_session_cart(
  store: &dyn Store,
  session_token: &str,
  user_id: Uuid,
) -> CoreResult<MigrationOutcome> {
  let anon_cart = match store.cart_by_session(session_token).await? {
    Some(cart) => cart,
    None => return Ok(MigrationOutcome::default()),
  };
  let user_cart = get_or_create(store, &CartOwner::User(user_id)).await?;
  if anon_cart.id == user_cart.id {
    return Ok(MigrationOutcome::default());
  }
  let mut outcome = MigrationOutcome::default();
  for line in store.cart_lines(anon_cart.id).await? {
    let landed = store
      .insert_cart_line(NewCartLine {
        cart_id: user_cart.id,
        product_id: line.product_id,
        quantity: line.quantity,
        unit_price_cents: line.unit_price_cents,
      })
      .await?;
    if landed.quantity == line.quantity {
      outcome.moved += 1;
    } else {
      outcome.merged += 1;
    }
  }
  store.delete_cart(anon_cart.id).await?;
  info!(merged = outcome.merged, moved = outcome.moved, "session cart migrated");
  Ok(outcome)
}

async fn get_or_create(store: &dyn Store, owner: &CartOwner) -> CoreResult<Cart> {
  let existing = match owner {
    CartOwner::User(user_id) => store.cart_by_user(*user_id).await?,
    CartOwner::Session(token) => store.cart_by_session(token).await?,
  };
  if let Some(cart) = existing {
    return Ok(cart);
  }
  let cart = store.insert_cart(owner).await?;
  event!(Level::DEBUG, cart_id = %cart.id, anonymous = cart.is_anonymous(), "created cart");
  Ok(cart)
}

fn check_stock(product: &Product, requested: i32) -> CoreResult<()> {
  if product.stock < requested {
    return Err(CoreError::InsufficientStock {
      available: product.stock,
      requested,
    });
  }
  Ok(())
}

fn mint_session_token() -> String {
  Uuid::new_v4().simple().to_string()
}

fn build_view(cart: &Cart, rows: Vec<(CartLine, Product)>) -> CartView {
  let mut lines = Vec::with_capacity(rows.len());
  let mut total_cents = 0i64;
  let mut total_items = 0i32;
  for (line, product) in rows {
    let subtotal_cents = line.subtotal_cents();
    total_cents += subtotal_cents;
    total_items += line.quantity;
    lines.push(CartLineView {
      id: line.id,
      product_id: product.id,
      product_name: product.name,
      product_stock: product.stock,
      quantity: line.quantity,
      unit_price_cents: line.unit_price_cents,
      subtotal_cents,
    });
  }
  CartView {
    id: cart.id,
    session_token: cart.session_token.clone(),
    lines,
    total_cents,
    total_items,
  }
}
