// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::Level;
use uuid::Uuid;

use storefront_core::cart;
use storefront_core::models::{Brand, Category, NewUser, Product, ProductImage, User, UserRole};
use storefront_core::store::Store;
use storefront_core::{Identity, MemoryStore};

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixture builders ---
// Catalog rows are seed-shaped: the caller controls ids and timestamps,
// so tests can pin sort orders.

pub fn category_fixture(name: &str, slug: &str) -> Category {
  Category {
    id: Uuid::new_v4(),
    name: name.to_string(),
    slug: slug.to_string(),
    description: None,
    parent_id: None,
    is_active: true,
    position: 0,
    created_at: Utc::now(),
  }
}

pub fn brand_fixture(name: &str) -> Brand {
  Brand {
    id: Uuid::new_v4(),
    name: name.to_string(),
    description: None,
    logo_url: None,
    website: None,
    is_active: true,
    created_at: Utc::now(),
  }
}

pub fn product_fixture(category_id: Uuid, name: &str, price_cents: i64, stock: i32) -> Product {
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

pub fn image_fixture(product_id: Uuid, url: &str, is_primary: bool, position: i32) -> ProductImage {
  ProductImage {
    id: Uuid::new_v4(),
    product_id,
    url: url.to_string(),
    alt_text: None,
    is_primary,
    position,
    created_at: Utc::now(),
  }
}

// --- Seeding helpers ---

/// Inserts a product under a throwaway category.
pub async fn seed_product(store: &MemoryStore, name: &str, price_cents: i64, stock: i32) -> Product {
  let category = store
    .insert_category(category_fixture("General", &format!("general-{}", Uuid::new_v4().simple())))
    .await
    .unwrap();
  store
    .insert_product(product_fixture(category.id, name, price_cents, stock))
    .await
    .unwrap()
}

/// Overwrites the stored product row, keeping its id. The in-memory
/// store treats an insert with a known id as a replacement.
pub async fn reprice_product(store: &MemoryStore, product: &Product, price_cents: i64) -> Product {
  store
    .insert_product(Product {
      price_cents,
      ..product.clone()
    })
    .await
    .unwrap()
}

pub async fn seed_customer(store: &MemoryStore, email: &str) -> User {
  seed_user(store, email, UserRole::Customer).await
}

pub async fn seed_staff(store: &MemoryStore, email: &str) -> User {
  seed_user(store, email, UserRole::Staff).await
}

async fn seed_user(store: &MemoryStore, email: &str, role: UserRole) -> User {
  store
    .insert_user(NewUser {
      email: email.to_string(),
      password_hash: "$argon2id$fixture".to_string(),
      first_name: "Test".to_string(),
      last_name: "User".to_string(),
      phone: None,
      role,
    })
    .await
    .unwrap()
}

// --- Identity helpers ---

pub fn session_identity(token: &str) -> Identity {
  Identity::anonymous(Some(token.to_string()))
}

/// Resolves a brand-new anonymous cart (token minted by the resolver).
pub async fn anonymous_cart(store: &MemoryStore) -> storefront_core::models::Cart {
  cart::resolve(store, &Identity::default()).await.unwrap()
}
