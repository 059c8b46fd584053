// server/src/main.rs

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use sqlx::postgres::PgPoolOptions;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

use storefront_core::{MemoryStore, PgStore, SharedStore};
use storefront_server::config::{AppConfig, StoreBackend};
use storefront_server::state::AppState;
use storefront_server::web::configure_app_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  // (Customize as needed, e.g., with JSON output, OpenTelemetry)
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting storefront server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg), // Arc the config for sharing
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      std::process::exit(1);
    }
  };

  // Select the storage backend
  let store: SharedStore = match app_config.store_backend {
    StoreBackend::Postgres => {
      let database_url = match app_config.database_url.as_deref() {
        Some(url) => url,
        None => {
          tracing::error!("DATABASE_URL is required for the postgres backend.");
          std::process::exit(1);
        }
      };
      let pool = match PgPoolOptions::new()
        .max_connections(app_config.database_max_connections)
        .connect(database_url)
        .await
      {
        Ok(pool) => {
          tracing::info!("Successfully connected to the database.");
          pool
        }
        Err(e) => {
          tracing::error!(error = %e, "Failed to connect to the database.");
          std::process::exit(1);
        }
      };
      Arc::new(PgStore::new(pool))
    }
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data will not survive a restart.");
      Arc::new(MemoryStore::new())
    }
  };

  // Create AppState
  let app_state = AppState {
    store,
    config: app_config.clone(),
  };

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
