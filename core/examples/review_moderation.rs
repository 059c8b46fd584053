// storefront_core/examples/review_moderation.rs

use chrono::Utc;
use storefront_core::models::{Category, NewUser, Product, UserRole};
use storefront_core::store::Store;
use storefront_core::{reviews, CoreError, MemoryStore};
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Review Moderation Example ---");

  let store = MemoryStore::new();

  // 1. Seed a product and two users: a customer and a staff moderator
  let category = store
    .insert_category(Category {
      id: Uuid::new_v4(),
      name: "Kitchen".to_string(),
      slug: "kitchen".to_string(),
      description: None,
      parent_id: None,
      is_active: true,
      position: 0,
      created_at: Utc::now(),
    })
    .await?;
  let pan = store.insert_product(demo_product(category.id, "Cast Iron Pan", 4_500, 12)).await?;

  let customer = store.insert_user(demo_user("casey@example.com", UserRole::Customer)).await?;
  let moderator = store.insert_user(demo_user("mo@example.com", UserRole::Staff)).await?;

  // 2. The customer submits a review; it waits in the approval queue
  let review = reviews::create(&store, &customer, pan.id, 5, Some("Sears beautifully.".to_string())).await?;
  info!("Review {} submitted, approved = {}", review.id, review.approved);

  let visible = reviews::list_for_product(&store, pan.id).await?;
  info!("Public listing before approval: {} review(s)", visible.len());

  // 3. A second submission by the same customer is rejected
  match reviews::create(&store, &customer, pan.id, 1, None).await {
    Err(CoreError::DuplicateReview) => info!("Second review rejected: one per user and product"),
    other => panic!("expected DuplicateReview, got {:?}", other.map(|r| r.id)),
  }

  // 4. Staff approval publishes the review and refreshes the aggregates
  reviews::approve(&store, review.id).await?;

  let visible = reviews::list_for_product(&store, pan.id).await?;
  info!("Public listing after approval: {} review(s)", visible.len());

  let pan = store.product_by_id(pan.id).await?.unwrap();
  info!(
    "Product aggregates: average {} over {} review(s)",
    pan.average_rating, pan.review_count
  );

  // 5. Staff reviews skip the queue entirely
  let staff_review = reviews::create(&store, &moderator, pan.id, 4, None).await?;
  info!("Staff review approved immediately = {}", staff_review.approved);

  let pan = store.product_by_id(pan.id).await?.unwrap();
  info!(
    "Product aggregates: average {} over {} review(s)",
    pan.average_rating, pan.review_count
  );

  Ok(())
}

fn demo_user(email: &str, role: UserRole) -> NewUser {
  NewUser {
    email: email.to_string(),
    password_hash: "$argon2id$demo".to_string(),
    first_name: "Demo".to_string(),
    last_name: "User".to_string(),
    phone: None,
    role,
  }
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
