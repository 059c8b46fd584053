// tests/cart_migration_tests.rs
mod common; // Reference the common module

use common::*;
use storefront_core::store::Store;
use storefront_core::{cart, Identity, MemoryStore};

#[tokio::test]
async fn test_migration_sums_overlapping_lines_and_deletes_anon_cart() {
  setup_tracing();
  let store = MemoryStore::new();
  let shirt = seed_product(&store, "Shirt", 2_500, 50).await;
  let mug = seed_product(&store, "Mug", 1_200, 50).await;
  let user = seed_customer(&store, "dora@example.com").await;

  // User cart holds {shirt: 2}; the anonymous cart {shirt: 1, mug: 5}.
  let user_cart = cart::resolve(&store, &Identity::authenticated(user.clone())).await.unwrap();
  cart::add(&store, &user_cart, shirt.id, 2).await.unwrap();
  let anon_cart = anonymous_cart(&store).await;
  cart::add(&store, &anon_cart, shirt.id, 1).await.unwrap();
  cart::add(&store, &anon_cart, mug.id, 5).await.unwrap();
  let token = anon_cart.session_token.clone().unwrap();

  let outcome = cart::migrate_session_cart(&store, &token, user.id).await.unwrap();

  assert_eq!(outcome.merged, 1);
  assert_eq!(outcome.moved, 1);
  let lines = store.cart_lines(user_cart.id).await.unwrap();
  assert_eq!(lines.len(), 2);
  let shirt_line = lines.iter().find(|l| l.product_id == shirt.id).unwrap();
  let mug_line = lines.iter().find(|l| l.product_id == mug.id).unwrap();
  assert_eq!(shirt_line.quantity, 3); // 2 + 1, summed not maxed
  assert_eq!(mug_line.quantity, 5);

  // The anonymous cart and its lines are gone.
  assert!(store.cart_by_session(&token).await.unwrap().is_none());
  assert!(store.cart_lines(anon_cart.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_migration_creates_user_cart_when_missing() {
  setup_tracing();
  let store = MemoryStore::new();
  let book = seed_product(&store, "Book", 1_800, 10).await;
  let user = seed_customer(&store, "eli@example.com").await;

  let anon_cart = anonymous_cart(&store).await;
  cart::add(&store, &anon_cart, book.id, 2).await.unwrap();
  let token = anon_cart.session_token.clone().unwrap();

  let outcome = cart::migrate_session_cart(&store, &token, user.id).await.unwrap();

  assert_eq!(outcome.moved, 1);
  assert_eq!(outcome.merged, 0);
  let user_cart = store.cart_by_user(user.id).await.unwrap().expect("user cart created");
  let lines = store.cart_lines(user_cart.id).await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].quantity, 2);
}

#[tokio::test]
async fn test_migration_without_session_cart_is_a_noop() {
  setup_tracing();
  let store = MemoryStore::new();
  let user = seed_customer(&store, "fin@example.com").await;

  let outcome = cart::migrate_session_cart(&store, "no-such-token", user.id).await.unwrap();

  assert!(outcome.is_noop());
  // Nothing was created on the user's side either.
  assert!(store.cart_by_user(user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_migration_of_empty_session_cart_still_deletes_it() {
  setup_tracing();
  let store = MemoryStore::new();
  let user = seed_customer(&store, "gus@example.com").await;
  let anon_cart = anonymous_cart(&store).await;
  let token = anon_cart.session_token.clone().unwrap();

  let outcome = cart::migrate_session_cart(&store, &token, user.id).await.unwrap();

  assert!(outcome.is_noop());
  assert!(store.cart_by_session(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_migration_moved_lines_keep_their_price_snapshot() {
  setup_tracing();
  let store = MemoryStore::new();
  let lamp = seed_product(&store, "Lamp", 4_000, 10).await;
  let user = seed_customer(&store, "hana@example.com").await;

  let anon_cart = anonymous_cart(&store).await;
  cart::add(&store, &anon_cart, lamp.id, 1).await.unwrap();
  let token = anon_cart.session_token.clone().unwrap();

  // Price moves between capture and sign-in.
  reprice_product(&store, &lamp, 5_500).await;
  cart::migrate_session_cart(&store, &token, user.id).await.unwrap();

  let user_cart = store.cart_by_user(user.id).await.unwrap().unwrap();
  let lines = store.cart_lines(user_cart.id).await.unwrap();
  assert_eq!(lines[0].unit_price_cents, 4_000);
}

#[tokio::test]
async fn test_migration_merge_keeps_the_user_lines_price_snapshot() {
  setup_tracing();
  let store = MemoryStore::new();
  let chair = seed_product(&store, "Chair", 30_000, 10).await;
  let user = seed_customer(&store, "iris@example.com").await;

  let user_cart = cart::resolve(&store, &Identity::authenticated(user.clone())).await.unwrap();
  cart::add(&store, &user_cart, chair.id, 1).await.unwrap();

  reprice_product(&store, &chair, 35_000).await;
  let anon_cart = anonymous_cart(&store).await;
  cart::add(&store, &anon_cart, chair.id, 1).await.unwrap();
  let token = anon_cart.session_token.clone().unwrap();

  let outcome = cart::migrate_session_cart(&store, &token, user.id).await.unwrap();

  assert_eq!(outcome.merged, 1);
  let lines = store.cart_lines(user_cart.id).await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].quantity, 2);
  assert_eq!(lines[0].unit_price_cents, 30_000); // the user's earlier snapshot wins
}

#[tokio::test]
async fn test_migration_does_not_recheck_stock() {
  setup_tracing();
  let store = MemoryStore::new();
  let poster = seed_product(&store, "Poster", 900, 5).await;
  let user = seed_customer(&store, "jon@example.com").await;

  let user_cart = cart::resolve(&store, &Identity::authenticated(user.clone())).await.unwrap();
  cart::add(&store, &user_cart, poster.id, 4).await.unwrap();
  let anon_cart = anonymous_cart(&store).await;
  cart::add(&store, &anon_cart, poster.id, 3).await.unwrap();
  let token = anon_cart.session_token.clone().unwrap();

  cart::migrate_session_cart(&store, &token, user.id).await.unwrap();

  // 4 + 3 lands above the stock of 5; the merge never fails on stock.
  let lines = store.cart_lines(user_cart.id).await.unwrap();
  assert_eq!(lines[0].quantity, 7);
}
