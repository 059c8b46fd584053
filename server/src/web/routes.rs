// server/src/web/routes.rs

use actix_web::web;

// Placeholder for a simple health check handler function.
// In a real app, this might check DB connectivity or other critical services.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function will be called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes
      .service(
        web::scope("/auth")
          .route(
            "/register",
            web::post().to(crate::web::handlers::auth_handlers::register_handler),
          )
          .route(
            "/login",
            web::post().to(crate::web::handlers::auth_handlers::login_handler),
          )
          .route(
            "/logout",
            web::post().to(crate::web::handlers::auth_handlers::logout_handler),
          )
          .route("/me", web::get().to(crate::web::handlers::auth_handlers::me_handler)),
      )
      // Catalog Routes
      // Literal segments are registered before `{product_id}` so they are
      // matched first.
      .service(
        web::scope("/products")
          .route(
            "",
            web::get().to(crate::web::handlers::product_handlers::list_products_handler),
          )
          .route(
            "/featured",
            web::get().to(crate::web::handlers::product_handlers::featured_products_handler),
          )
          .route(
            "/offers",
            web::get().to(crate::web::handlers::product_handlers::offer_products_handler),
          )
          .route(
            "/{product_id}",
            web::get().to(crate::web::handlers::product_handlers::get_product_handler),
          )
          .route(
            "/{product_id}/reviews",
            web::get().to(crate::web::handlers::review_handlers::list_product_reviews_handler),
          )
          .route(
            "/{product_id}/reviews",
            web::post().to(crate::web::handlers::review_handlers::create_review_handler),
          ),
      )
      .route(
        "/categories",
        web::get().to(crate::web::handlers::product_handlers::list_categories_handler),
      )
      .route(
        "/brands",
        web::get().to(crate::web::handlers::product_handlers::list_brands_handler),
      )
      // Review Moderation Routes
      .service(web::scope("/reviews").route(
        "/{review_id}/approve",
        web::post().to(crate::web::handlers::review_handlers::approve_review_handler),
      ))
      // Cart Routes
      // Open to anonymous callers; identity is resolved per request.
      .service(
        web::scope("/cart")
          .route("", web::get().to(crate::web::handlers::cart_handlers::view_cart_handler))
          .route(
            "",
            web::delete().to(crate::web::handlers::cart_handlers::clear_cart_handler),
          )
          .route(
            "/items",
            web::post().to(crate::web::handlers::cart_handlers::add_to_cart_handler),
          )
          .route(
            "/items/{line_id}",
            web::patch().to(crate::web::handlers::cart_handlers::set_cart_line_quantity_handler),
          )
          .route(
            "/items/{line_id}",
            web::delete().to(crate::web::handlers::cart_handlers::remove_from_cart_handler),
          ),
      )
      // Favorites Routes
      .service(
        web::scope("/favorites")
          .route(
            "",
            web::get().to(crate::web::handlers::favorite_handlers::list_favorites_handler),
          )
          .route(
            "/toggle",
            web::post().to(crate::web::handlers::favorite_handlers::toggle_favorite_handler),
          )
          .route(
            "/{product_id}",
            web::delete().to(crate::web::handlers::favorite_handlers::remove_favorite_handler),
          ),
      ),
  );
}
