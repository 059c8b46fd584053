// storefront_core/examples/catalog_browse.rs

use chrono::Utc;
use storefront_core::catalog::{self, ProductFilter, ProductSort};
use storefront_core::models::{Category, Product};
use storefront_core::store::Store;
use storefront_core::{CoreError, MemoryStore};
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Catalog Browse Example ---");

  let store = MemoryStore::new();

  // 1. Seed two categories and a handful of products
  let kitchen = store.insert_category(demo_category("Kitchen", "kitchen")).await?;
  let outdoor = store.insert_category(demo_category("Outdoor", "outdoor")).await?;

  store
    .insert_product(demo_product(kitchen.id, "Cast Iron Pan", 4_500, 12, false))
    .await?;
  store
    .insert_product(demo_product(kitchen.id, "Chef Knife", 9_900, 6, true))
    .await?;
  store
    .insert_product(demo_product(outdoor.id, "Camp Kettle", 3_200, 0, false))
    .await?;
  store
    .insert_product(demo_product(outdoor.id, "Trail Knife", 7_500, 9, false))
    .await?;

  // 2. Plain listing, newest first by default
  let all = catalog::list_products(&store, &ProductFilter::default()).await?;
  info!("Catalog holds {} active products", all.len());

  // 3. Case-insensitive search over names and skus
  let knives = catalog::list_products(
    &store,
    &ProductFilter {
      search: Some("knife".to_string()),
      ..Default::default()
    },
  )
  .await?;
  for product in &knives {
    info!("  matched: {} ({} cents)", product.name, product.price_cents);
  }

  // 4. Filters compose: one category, in stock only, cheapest first
  let in_stock_kitchen = catalog::list_products(
    &store,
    &ProductFilter {
      category_id: Some(kitchen.id),
      in_stock: Some(true),
      sort: ProductSort::PriceAsc,
      ..Default::default()
    },
  )
  .await?;
  info!("In-stock kitchen products, cheapest first:");
  for product in &in_stock_kitchen {
    info!("  {} at {} cents", product.name, product.price_cents);
  }

  // 5. The featured shortcut used by the storefront landing page
  let featured = catalog::list_products(&store, &ProductFilter::featured_only()).await?;
  info!("{} featured product(s)", featured.len());

  Ok(())
}

fn demo_category(name: &str, slug: &str) -> Category {
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

fn demo_product(category_id: Uuid, name: &str, price_cents: i64, stock: i32, is_featured: bool) -> Product {
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
    is_featured,
    on_offer: false,
    average_rating: 0.0,
    review_count: 0,
    created_at: now,
    updated_at: now,
  }
}
