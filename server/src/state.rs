// server/src/state.rs
use crate::config::AppConfig;
use std::sync::Arc;
use storefront_core::SharedStore;

#[derive(Clone)]
pub struct AppState {
  pub store: SharedStore,
  pub config: Arc<AppConfig>, // Share loaded config
}
