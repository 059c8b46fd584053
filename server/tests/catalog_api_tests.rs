// tests/catalog_api_tests.rs
//
// The unauthenticated read surface: health, product listing and
// filtering, product detail, categories and brands.

mod common; // Reference the common module

use actix_web::{http::StatusCode, test, web, App};
use serde_json::Value;

use common::*;
use storefront_core::models::Product;
use storefront_core::store::Store;
use storefront_server::web::configure_app_routes;

#[actix_rt::test]
async fn test_health_endpoint_reports_ok() {
  setup_tracing();
  let state = test_state();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;

  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_product_listing_hides_inactive_products() {
  setup_tracing();
  let state = test_state();
  let store = state.store.as_ref();
  let category = store.insert_category(category_fixture("Gear", "gear")).await.unwrap();
  store
    .insert_product(product_fixture(category.id, "Trail Pack", 9_000, 4))
    .await
    .unwrap();
  store
    .insert_product(Product {
      is_active: false,
      ..product_fixture(category.id, "Retired Pack", 5_000, 4)
    })
    .await
    .unwrap();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/products").to_request()).await;

  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["products"][0]["name"], "Trail Pack");
}

#[actix_rt::test]
async fn test_product_listing_supports_search_and_category_slug() {
  setup_tracing();
  let state = test_state();
  let store = state.store.as_ref();
  let gear = store.insert_category(category_fixture("Gear", "gear")).await.unwrap();
  let food = store.insert_category(category_fixture("Food", "food")).await.unwrap();
  store
    .insert_product(product_fixture(gear.id, "Trail Pack", 9_000, 4))
    .await
    .unwrap();
  store
    .insert_product(product_fixture(food.id, "Trail Mix", 700, 40))
    .await
    .unwrap();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/api/v1/products?q=trail").to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["count"], 2);

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/api/v1/products?q=trail&category=food").to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["products"][0]["name"], "Trail Mix");
}

#[actix_rt::test]
async fn test_unknown_category_slug_is_not_found() {
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
    test::TestRequest::get().uri("/api/v1/products?category=nope").to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "category 'nope' not found");
}

#[actix_rt::test]
async fn test_featured_and_offer_shortcuts() {
  setup_tracing();
  let state = test_state();
  let store = state.store.as_ref();
  let category = store.insert_category(category_fixture("Gear", "gear")).await.unwrap();
  store
    .insert_product(Product {
      is_featured: true,
      ..product_fixture(category.id, "Showcase Tent", 42_000, 2)
    })
    .await
    .unwrap();
  store
    .insert_product(Product {
      on_offer: true,
      original_price_cents: Some(12_000),
      ..product_fixture(category.id, "Clearance Stove", 9_000, 7)
    })
    .await
    .unwrap();
  store
    .insert_product(product_fixture(category.id, "Plain Mug", 1_200, 30))
    .await
    .unwrap();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/api/v1/products/featured").to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["products"][0]["name"], "Showcase Tent");

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/api/v1/products/offers").to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["count"], 1);
  assert_eq!(body["products"][0]["name"], "Clearance Stove");
}

#[actix_rt::test]
async fn test_product_detail_includes_discount_percent() {
  setup_tracing();
  let state = test_state();
  let store = state.store.as_ref();
  let category = store.insert_category(category_fixture("Gear", "gear")).await.unwrap();
  let product = store
    .insert_product(Product {
      on_offer: true,
      original_price_cents: Some(12_000),
      ..product_fixture(category.id, "Clearance Stove", 9_000, 7)
    })
    .await
    .unwrap();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&format!("/api/v1/products/{}", product.id))
      .to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["name"], "Clearance Stove");
  assert_eq!(body["discount_percent"], 25);
  assert!(body["images"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_inactive_product_detail_is_not_found() {
  setup_tracing();
  let state = test_state();
  let store = state.store.as_ref();
  let category = store.insert_category(category_fixture("Gear", "gear")).await.unwrap();
  let product = store
    .insert_product(Product {
      is_active: false,
      ..product_fixture(category.id, "Retired Pack", 5_000, 4)
    })
    .await
    .unwrap();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&format!("/api/v1/products/{}", product.id))
      .to_request(),
  )
  .await;

  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "product not found");
}

#[actix_rt::test]
async fn test_categories_and_brands_listing() {
  setup_tracing();
  let state = test_state();
  let store = state.store.as_ref();
  store.insert_category(category_fixture("Gear", "gear")).await.unwrap();
  store.insert_brand(brand_fixture("Northwind")).await.unwrap();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/categories").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["categories"][0]["slug"], "gear");

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/brands").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["brands"][0]["name"], "Northwind");
}
