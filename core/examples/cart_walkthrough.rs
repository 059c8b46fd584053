// storefront_core/examples/cart_walkthrough.rs

use chrono::Utc;
use storefront_core::models::{Category, NewUser, Product, UserRole};
use storefront_core::store::Store;
use storefront_core::{cart, CoreError, Identity, MemoryStore};
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Cart Walkthrough Example ---");

  let store = MemoryStore::new();

  // 1. Seed a small catalog
  let category = store
    .insert_category(Category {
      id: Uuid::new_v4(),
      name: "Outdoor".to_string(),
      slug: "outdoor".to_string(),
      description: None,
      parent_id: None,
      is_active: true,
      position: 0,
      created_at: Utc::now(),
    })
    .await?;
  let mug = store.insert_product(demo_product(category.id, "Camp Mug", 2_500, 10)).await?;
  let stove = store
    .insert_product(demo_product(category.id, "Pocket Stove", 8_900, 4))
    .await?;

  // 2. An anonymous visitor adds items. No session token is presented, so
  //    the resolver mints one and stores it on the cart.
  let visitor = Identity::default();
  let anon_cart = cart::resolve(&store, &visitor).await?;
  let session_token = anon_cart.session_token.clone().unwrap();
  info!("Visitor got session token: {}", session_token);

  cart::add(&store, &anon_cart, mug.id, 2).await?;
  cart::add(&store, &anon_cart, stove.id, 1).await?;

  // 3. Later requests replay the token and land in the same cart.
  let returning = Identity::anonymous(Some(session_token.clone()));
  let same_cart = cart::resolve(&store, &returning).await?;
  assert_eq!(same_cart.id, anon_cart.id);
  cart::add(&store, &same_cart, mug.id, 1).await?; // consolidates to 3 mugs

  let view = cart::view(&store, &same_cart).await?;
  info!(
    "Anonymous cart: {} line(s), {} item(s), {} cents total",
    view.lines.len(),
    view.total_items,
    view.total_cents
  );

  // 4. The visitor signs in; their session cart merges into the account cart.
  let user = store
    .insert_user(NewUser {
      email: "sam@example.com".to_string(),
      password_hash: "$argon2id$demo".to_string(),
      first_name: "Sam".to_string(),
      last_name: "Shopper".to_string(),
      phone: None,
      role: UserRole::Customer,
    })
    .await?;
  let outcome = cart::migrate_session_cart(&store, &session_token, user.id).await?;
  info!("Migration outcome: {} merged, {} moved", outcome.merged, outcome.moved);

  // 5. The user's cart now holds everything the visitor picked.
  let user_cart = cart::resolve(&store, &Identity::authenticated(user)).await?;
  let view = cart::view(&store, &user_cart).await?;
  for line in &view.lines {
    info!(
      "  {} x{} @ {} cents = {} cents",
      line.product_name, line.quantity, line.unit_price_cents, line.subtotal_cents
    );
  }
  info!("User cart total: {} cents", view.total_cents);

  Ok(())
}

fn demo_product(category_id: Uuid, name: &str, price_cents: i64, stock: i32) -> Product {
  let now = Utc::now();
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: None,
    short_description: None,
    sku: format!("SKU-{}", name.to_uppercase().replace(' ', "-")),
    category_id,
    brand_id: None,
    price_cents,
    original_price_cents: None,
    stock,
    units_sold: 0,
    is_active: true,
    is_featured: false,
    on_offer: false,
    average_rating: 0.0,
    review_count: 0,
    created_at: now,
    updated_at: now,
  }
}
