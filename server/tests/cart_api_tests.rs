// tests/cart_api_tests.rs
//
// Cart flows over HTTP: session token minting and replay, line
// consolidation, quantity updates, and the sign-in migration.

mod common; // Reference the common module

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use common::*;
use storefront_server::web::configure_app_routes;
use storefront_server::web::identity::SESSION_TOKEN_HEADER;

#[actix_rt::test]
async fn test_anonymous_cart_is_minted_and_replayable() {
  setup_tracing();
  let state = test_state();
  let product = seed_product(&state, "Camp Mug", 2_500, 10).await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  // First touch without any token: the server mints one and echoes it.
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .set_json(json!({"product_id": product.id, "quantity": 2}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["line"]["quantity"], 2);
  let token = body["cart"]["session_token"].as_str().unwrap().to_string();

  // Replaying the token lands in the same cart and consolidates.
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((SESSION_TOKEN_HEADER, token.clone()))
      .set_json(json!({"product_id": product.id, "quantity": 3}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["cart"]["session_token"], token.as_str());
  assert_eq!(body["cart"]["lines"].as_array().unwrap().len(), 1);
  assert_eq!(body["cart"]["lines"][0]["quantity"], 5);
  assert_eq!(body["cart"]["total_cents"], 12_500);
  assert_eq!(body["cart"]["total_items"], 5);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/api/v1/cart")
      .insert_header((SESSION_TOKEN_HEADER, token))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["total_cents"], 12_500);
}

#[actix_rt::test]
async fn test_add_to_cart_defaults_quantity_to_one() {
  setup_tracing();
  let state = test_state();
  let product = seed_product(&state, "Spork", 400, 10).await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .set_json(json!({"product_id": product.id}))
      .to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["line"]["quantity"], 1);
}

#[actix_rt::test]
async fn test_add_to_cart_insufficient_stock_reports_available() {
  setup_tracing();
  let state = test_state();
  let product = seed_product(&state, "Rare Lantern", 18_000, 3).await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .set_json(json!({"product_id": product.id, "quantity": 5}))
      .to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Insufficient stock: requested 5, available 3");
  assert_eq!(body["available"], 3);
}

#[actix_rt::test]
async fn test_add_to_cart_unknown_product_is_not_found() {
  setup_tracing();
  let state = test_state();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .set_json(json!({"product_id": Uuid::new_v4(), "quantity": 1}))
      .to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "product not found");
}

#[actix_rt::test]
async fn test_set_quantity_updates_and_zero_removes() {
  setup_tracing();
  let state = test_state();
  let product = seed_product(&state, "Camp Chair", 6_500, 20).await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .set_json(json!({"product_id": product.id, "quantity": 2}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  let token = body["cart"]["session_token"].as_str().unwrap().to_string();
  let line_id = body["line"]["id"].as_str().unwrap().to_string();

  let resp = test::call_service(
    &app,
    test::TestRequest::patch()
      .uri(&format!("/api/v1/cart/items/{}", line_id))
      .insert_header((SESSION_TOKEN_HEADER, token.clone()))
      .set_json(json!({"quantity": 7}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Quantity updated.");
  assert_eq!(body["line"]["quantity"], 7);

  // Zero is the remove gesture.
  let resp = test::call_service(
    &app,
    test::TestRequest::patch()
      .uri(&format!("/api/v1/cart/items/{}", line_id))
      .insert_header((SESSION_TOKEN_HEADER, token))
      .set_json(json!({"quantity": 0}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Item removed from cart.");
  assert!(body["cart"]["lines"].as_array().unwrap().is_empty());
  assert_eq!(body["cart"]["total_items"], 0);
}

#[actix_rt::test]
async fn test_remove_line_and_clear_cart() {
  setup_tracing();
  let state = test_state();
  let mug = seed_product(&state, "Camp Mug", 2_500, 10).await;
  let spork = seed_product(&state, "Spork", 400, 10).await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .set_json(json!({"product_id": mug.id, "quantity": 1}))
      .to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  let token = body["cart"]["session_token"].as_str().unwrap().to_string();
  let mug_line = body["line"]["id"].as_str().unwrap().to_string();

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header((SESSION_TOKEN_HEADER, token.clone()))
      .set_json(json!({"product_id": spork.id, "quantity": 2}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(
    &app,
    test::TestRequest::delete()
      .uri(&format!("/api/v1/cart/items/{}", mug_line))
      .insert_header((SESSION_TOKEN_HEADER, token.clone()))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["cart"]["lines"].as_array().unwrap().len(), 1);

  let resp = test::call_service(
    &app,
    test::TestRequest::delete()
      .uri("/api/v1/cart")
      .insert_header((SESSION_TOKEN_HEADER, token))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["removed"], 1);
  assert!(body["cart"]["lines"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_authenticated_cart_has_no_session_token() {
  setup_tracing();
  let state = test_state();
  let product = seed_product(&state, "Camp Mug", 2_500, 10).await;
  let user = seed_customer(&state, "owner@example.com").await;
  let token = bearer_for(&state, &user).await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header(("Authorization", format!("Bearer {}", token)))
      .set_json(json!({"product_id": product.id, "quantity": 1}))
      .to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["cart"].get("session_token").is_none());
}

#[actix_rt::test]
async fn test_login_merges_the_anonymous_cart() {
  setup_tracing();
  let state = test_state();
  let product = seed_product(&state, "Camp Mug", 2_500, 10).await;
  let user = seed_customer(&state, "returning@example.com").await;
  let bearer = bearer_for(&state, &user).await;
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  // The user already has the product in their cart from an earlier visit.
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .insert_header(("Authorization", format!("Bearer {}", bearer)))
      .set_json(json!({"product_id": product.id, "quantity": 3}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  // Browsing logged out, they build up an anonymous cart.
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/cart/items")
      .set_json(json!({"product_id": product.id, "quantity": 2}))
      .to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  let session_token = body["cart"]["session_token"].as_str().unwrap().to_string();

  // Signing in with the session token attached merges the carts.
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/v1/auth/login")
      .insert_header((SESSION_TOKEN_HEADER, session_token.clone()))
      .set_json(json!({"email": "returning@example.com", "password": TEST_PASSWORD}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/api/v1/cart")
      .insert_header(("Authorization", format!("Bearer {}", bearer)))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["lines"].as_array().unwrap().len(), 1);
  assert_eq!(body["lines"][0]["quantity"], 5);
  assert_eq!(body["total_cents"], 12_500);
  assert!(body.get("session_token").is_none());

  // The anonymous cart is gone; replaying its token starts fresh.
  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/api/v1/cart")
      .insert_header((SESSION_TOKEN_HEADER, session_token))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["lines"].as_array().unwrap().is_empty());
}
