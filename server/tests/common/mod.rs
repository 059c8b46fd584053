// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::Level;
use uuid::Uuid;

use storefront_core::models::{Brand, Category, NewUser, Product, User, UserRole};
use storefront_core::store::Store;
use storefront_core::{MemoryStore, SharedStore};
use storefront_server::services::auth_service;
use storefront_server::{AppConfig, AppState, StoreBackend};

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

/// Password every seeded login-capable user is hashed with.
pub const TEST_PASSWORD: &str = "hunter2hunter2";

// --- Application state over a fresh in-memory store ---

pub fn test_state() -> AppState {
  let store: SharedStore = Arc::new(MemoryStore::new());
  AppState {
    store,
    config: Arc::new(test_config()),
  }
}

fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    store_backend: StoreBackend::Memory,
    database_url: None,
    database_max_connections: 1,
  }
}

// --- Seeding helpers ---

/// Inserts a product under a throwaway category.
pub async fn seed_product(state: &AppState, name: &str, price_cents: i64, stock: i32) -> Product {
  let store = state.store.as_ref();
  let category = store
    .insert_category(category_fixture(
      "General",
      &format!("general-{}", Uuid::new_v4().simple()),
    ))
    .await
    .unwrap();
  store
    .insert_product(product_fixture(category.id, name, price_cents, stock))
    .await
    .unwrap()
}

/// Inserts a user whose stored hash verifies against [`TEST_PASSWORD`],
/// so the login endpoint works for them.
pub async fn seed_customer(state: &AppState, email: &str) -> User {
  seed_user(state, email, UserRole::Customer).await
}

pub async fn seed_staff(state: &AppState, email: &str) -> User {
  seed_user(state, email, UserRole::Staff).await
}

async fn seed_user(state: &AppState, email: &str, role: UserRole) -> User {
  let password_hash = auth_service::hash_password(TEST_PASSWORD).unwrap();
  state
    .store
    .insert_user(NewUser {
      email: email.to_string(),
      password_hash,
      first_name: "Test".to_string(),
      last_name: "User".to_string(),
      phone: None,
      role,
    })
    .await
    .unwrap()
}

/// Issues a bearer token straight from the store, skipping the login
/// endpoint for tests that are not about auth.
pub async fn bearer_for(state: &AppState, user: &User) -> String {
  state.store.issue_access_token(user.id).await.unwrap().token
}

// --- Fixture builders ---
// Catalog rows are seed-shaped: the caller controls ids and flags, so
// tests can stage featured/offer/inactive products directly.

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
