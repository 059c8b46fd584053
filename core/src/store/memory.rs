// core/src/store/memory.rs

//! Complete in-process [`Store`] implementation over RwLock-guarded
//! maps. Backs the test suites and the server's `memory` backend mode.
//!
//! Lock guards are blocking and MUST NOT be held across an await point;
//! every method locks, works, and drops the guard before returning.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::Store;
use crate::catalog::{ProductFilter, ProductSort};
use crate::error::{CoreError, CoreResult};
use crate::identity::CartOwner;
use crate::models::{
  AccessToken, Brand, Cart, CartLine, Category, Favorite, NewCartLine, NewReview, NewUser, Product, ProductImage,
  Review, User,
};

#[derive(Default)]
struct Tables {
  users: HashMap<Uuid, User>,
  tokens: HashMap<String, AccessToken>,
  categories: HashMap<Uuid, Category>,
  brands: HashMap<Uuid, Brand>,
  products: HashMap<Uuid, Product>,
  images: HashMap<Uuid, ProductImage>,
  carts: HashMap<Uuid, Cart>,
  cart_lines: HashMap<Uuid, CartLine>,
  favorites: HashMap<Uuid, Favorite>,
  reviews: HashMap<Uuid, Review>,
}

#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    MemoryStore::default()
  }
}

#[async_trait]
impl Store for MemoryStore {
  // --- users & access tokens ---

  async fn insert_user(&self, new_user: NewUser) -> CoreResult<User> {
    let mut tables = self.tables.write();
    if tables.users.values().any(|u| u.email == new_user.email) {
      return Err(CoreError::Validation("email already registered".into()));
    }
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      email: new_user.email,
      password_hash: new_user.password_hash,
      first_name: new_user.first_name,
      last_name: new_user.last_name,
      phone: new_user.phone,
      role: new_user.role,
      is_active: true,
      last_login_at: None,
      created_at: now,
      updated_at: now,
    };
    tables.users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn user_by_id(&self, id: Uuid) -> CoreResult<Option<User>> {
    Ok(self.tables.read().users.get(&id).cloned())
  }

  async fn user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
    Ok(self.tables.read().users.values().find(|u| u.email == email).cloned())
  }

  async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> CoreResult<()> {
    let mut tables = self.tables.write();
    if let Some(user) = tables.users.get_mut(&user_id) {
      user.last_login_at = Some(at);
      user.updated_at = at;
    }
    Ok(())
  }

  async fn issue_access_token(&self, user_id: Uuid) -> CoreResult<AccessToken> {
    let mut tables = self.tables.write();
    if let Some(token) = tables.tokens.values().find(|t| t.user_id == user_id) {
      return Ok(token.clone());
    }
    let token = AccessToken {
      token: Uuid::new_v4().simple().to_string(),
      user_id,
      created_at: Utc::now(),
    };
    tables.tokens.insert(token.token.clone(), token.clone());
    Ok(token)
  }

  async fn user_by_access_token(&self, token: &str) -> CoreResult<Option<User>> {
    let tables = self.tables.read();
    let user = tables
      .tokens
      .get(token)
      .and_then(|t| tables.users.get(&t.user_id))
      .filter(|u| u.is_active)
      .cloned();
    Ok(user)
  }

  async fn revoke_access_tokens(&self, user_id: Uuid) -> CoreResult<u64> {
    let mut tables = self.tables.write();
    let before = tables.tokens.len();
    tables.tokens.retain(|_, t| t.user_id != user_id);
    Ok((before - tables.tokens.len()) as u64)
  }

  // --- catalog ---

  async fn insert_category(&self, category: Category) -> CoreResult<Category> {
    self.tables.write().categories.insert(category.id, category.clone());
    Ok(category)
  }

  async fn list_categories(&self) -> CoreResult<Vec<Category>> {
    let mut categories: Vec<Category> = self
      .tables
      .read()
      .categories
      .values()
      .filter(|c| c.is_active)
      .cloned()
      .collect();
    categories.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(&b.name)));
    Ok(categories)
  }

  async fn category_by_slug(&self, slug: &str) -> CoreResult<Option<Category>> {
    Ok(
      self
        .tables
        .read()
        .categories
        .values()
        .find(|c| c.slug == slug && c.is_active)
        .cloned(),
    )
  }

  async fn insert_brand(&self, brand: Brand) -> CoreResult<Brand> {
    self.tables.write().brands.insert(brand.id, brand.clone());
    Ok(brand)
  }

  async fn list_brands(&self) -> CoreResult<Vec<Brand>> {
    let mut brands: Vec<Brand> = self
      .tables
      .read()
      .brands
      .values()
      .filter(|b| b.is_active)
      .cloned()
      .collect();
    brands.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(brands)
  }

  async fn insert_product(&self, product: Product) -> CoreResult<Product> {
    self.tables.write().products.insert(product.id, product.clone());
    Ok(product)
  }

  async fn product_by_id(&self, id: Uuid) -> CoreResult<Option<Product>> {
    Ok(self.tables.read().products.get(&id).cloned())
  }

  async fn list_products(&self, filter: &ProductFilter) -> CoreResult<Vec<Product>> {
    let tables = self.tables.read();
    let needle = filter.search.as_ref().map(|s| s.to_lowercase());
    let mut products: Vec<Product> = tables
      .products
      .values()
      .filter(|p| p.is_active)
      .filter(|p| needle.as_deref().map_or(true, |n| matches_search(p, n)))
      .filter(|p| filter.category_id.map_or(true, |id| p.category_id == id))
      .filter(|p| filter.brand_id.map_or(true, |id| p.brand_id == Some(id)))
      .filter(|p| filter.min_price_cents.map_or(true, |min| p.price_cents >= min))
      .filter(|p| filter.max_price_cents.map_or(true, |max| p.price_cents <= max))
      .filter(|p| filter.featured.map_or(true, |v| p.is_featured == v))
      .filter(|p| filter.on_offer.map_or(true, |v| p.on_offer == v))
      .filter(|p| filter.in_stock.map_or(true, |v| p.in_stock() == v))
      .cloned()
      .collect();
    sort_products(&mut products, filter.sort);
    Ok(products)
  }

  async fn insert_product_image(&self, image: ProductImage) -> CoreResult<ProductImage> {
    self.tables.write().images.insert(image.id, image.clone());
    Ok(image)
  }

  async fn product_images(&self, product_id: Uuid) -> CoreResult<Vec<ProductImage>> {
    let mut images: Vec<ProductImage> = self
      .tables
      .read()
      .images
      .values()
      .filter(|i| i.product_id == product_id)
      .cloned()
      .collect();
    images.sort_by_key(|i| (!i.is_primary, i.position, i.id));
    Ok(images)
  }

  async fn update_product_rating(&self, product_id: Uuid, average: f64, count: i32) -> CoreResult<()> {
    let mut tables = self.tables.write();
    if let Some(product) = tables.products.get_mut(&product_id) {
      product.average_rating = average;
      product.review_count = count;
      product.updated_at = Utc::now();
    }
    Ok(())
  }

  // --- carts ---

  async fn cart_by_user(&self, user_id: Uuid) -> CoreResult<Option<Cart>> {
    Ok(
      self
        .tables
        .read()
        .carts
        .values()
        .find(|c| c.user_id == Some(user_id))
        .cloned(),
    )
  }

  async fn cart_by_session(&self, session_token: &str) -> CoreResult<Option<Cart>> {
    Ok(
      self
        .tables
        .read()
        .carts
        .values()
        .find(|c| c.session_token.as_deref() == Some(session_token))
        .cloned(),
    )
  }

  async fn insert_cart(&self, owner: &CartOwner) -> CoreResult<Cart> {
    let mut tables = self.tables.write();
    let existing = match owner {
      CartOwner::User(user_id) => tables.carts.values().find(|c| c.user_id == Some(*user_id)),
      CartOwner::Session(token) => tables.carts.values().find(|c| c.session_token.as_deref() == Some(token)),
    };
    if let Some(cart) = existing {
      return Ok(cart.clone());
    }
    let now = Utc::now();
    let (user_id, session_token) = match owner {
      CartOwner::User(user_id) => (Some(*user_id), None),
      CartOwner::Session(token) => (None, Some(token.clone())),
    };
    let cart = Cart {
      id: Uuid::new_v4(),
      user_id,
      session_token,
      created_at: now,
      updated_at: now,
    };
    tables.carts.insert(cart.id, cart.clone());
    Ok(cart)
  }

  async fn delete_cart(&self, cart_id: Uuid) -> CoreResult<()> {
    let mut tables = self.tables.write();
    tables.cart_lines.retain(|_, l| l.cart_id != cart_id);
    tables.carts.remove(&cart_id);
    Ok(())
  }

  // --- cart lines ---

  async fn cart_lines(&self, cart_id: Uuid) -> CoreResult<Vec<CartLine>> {
    let mut lines: Vec<CartLine> = self
      .tables
      .read()
      .cart_lines
      .values()
      .filter(|l| l.cart_id == cart_id)
      .cloned()
      .collect();
    lines.sort_by_key(|l| (l.created_at, l.id));
    Ok(lines)
  }

  async fn cart_lines_with_products(&self, cart_id: Uuid) -> CoreResult<Vec<(CartLine, Product)>> {
    let lines = self.cart_lines(cart_id).await?;
    let tables = self.tables.read();
    Ok(
      lines
        .into_iter()
        .filter_map(|l| tables.products.get(&l.product_id).cloned().map(|p| (l, p)))
        .collect(),
    )
  }

  async fn cart_line(&self, cart_id: Uuid, line_id: Uuid) -> CoreResult<Option<CartLine>> {
    Ok(
      self
        .tables
        .read()
        .cart_lines
        .get(&line_id)
        .filter(|l| l.cart_id == cart_id)
        .cloned(),
    )
  }

  async fn insert_cart_line(&self, line: NewCartLine) -> CoreResult<CartLine> {
    let mut tables = self.tables.write();
    let now = Utc::now();
    if let Some(existing) = tables
      .cart_lines
      .values_mut()
      .find(|l| l.cart_id == line.cart_id && l.product_id == line.product_id)
    {
      existing.quantity += line.quantity;
      existing.updated_at = now;
      return Ok(existing.clone());
    }
    let row = CartLine {
      id: Uuid::new_v4(),
      cart_id: line.cart_id,
      product_id: line.product_id,
      quantity: line.quantity,
      unit_price_cents: line.unit_price_cents,
      created_at: now,
      updated_at: now,
    };
    tables.cart_lines.insert(row.id, row.clone());
    Ok(row)
  }

  async fn set_cart_line_quantity(&self, line_id: Uuid, quantity: i32) -> CoreResult<CartLine> {
    let mut tables = self.tables.write();
    match tables.cart_lines.get_mut(&line_id) {
      Some(line) => {
        line.quantity = quantity;
        line.updated_at = Utc::now();
        Ok(line.clone())
      }
      None => Err(CoreError::NotFound("cart line".into())),
    }
  }

  async fn delete_cart_line(&self, line_id: Uuid) -> CoreResult<()> {
    self.tables.write().cart_lines.remove(&line_id);
    Ok(())
  }

  async fn clear_cart(&self, cart_id: Uuid) -> CoreResult<u64> {
    let mut tables = self.tables.write();
    let before = tables.cart_lines.len();
    tables.cart_lines.retain(|_, l| l.cart_id != cart_id);
    Ok((before - tables.cart_lines.len()) as u64)
  }

  // --- favorites ---

  async fn favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Option<Favorite>> {
    Ok(
      self
        .tables
        .read()
        .favorites
        .values()
        .find(|f| f.user_id == user_id && f.product_id == product_id)
        .cloned(),
    )
  }

  async fn insert_favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Favorite> {
    let mut tables = self.tables.write();
    if let Some(existing) = tables
      .favorites
      .values()
      .find(|f| f.user_id == user_id && f.product_id == product_id)
    {
      return Ok(existing.clone());
    }
    let favorite = Favorite {
      id: Uuid::new_v4(),
      user_id,
      product_id,
      created_at: Utc::now(),
    };
    tables.favorites.insert(favorite.id, favorite.clone());
    Ok(favorite)
  }

  async fn delete_favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<bool> {
    let mut tables = self.tables.write();
    let id = tables
      .favorites
      .values()
      .find(|f| f.user_id == user_id && f.product_id == product_id)
      .map(|f| f.id);
    match id {
      Some(id) => {
        tables.favorites.remove(&id);
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn favorites_with_products(&self, user_id: Uuid) -> CoreResult<Vec<(Favorite, Product)>> {
    let tables = self.tables.read();
    let mut favorites: Vec<Favorite> = tables.favorites.values().filter(|f| f.user_id == user_id).cloned().collect();
    favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(
      favorites
        .into_iter()
        .filter_map(|f| tables.products.get(&f.product_id).cloned().map(|p| (f, p)))
        .collect(),
    )
  }

  // --- reviews ---

  async fn review_by_user_and_product(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Option<Review>> {
    Ok(
      self
        .tables
        .read()
        .reviews
        .values()
        .find(|r| r.user_id == user_id && r.product_id == product_id)
        .cloned(),
    )
  }

  async fn insert_review(&self, review: NewReview) -> CoreResult<Review> {
    let mut tables = self.tables.write();
    if tables
      .reviews
      .values()
      .any(|r| r.user_id == review.user_id && r.product_id == review.product_id)
    {
      return Err(CoreError::DuplicateReview);
    }
    let row = Review {
      id: Uuid::new_v4(),
      user_id: review.user_id,
      product_id: review.product_id,
      rating: review.rating,
      comment: review.comment,
      approved: review.approved,
      created_at: Utc::now(),
    };
    tables.reviews.insert(row.id, row.clone());
    Ok(row)
  }

  async fn review_by_id(&self, id: Uuid) -> CoreResult<Option<Review>> {
    Ok(self.tables.read().reviews.get(&id).cloned())
  }

  async fn set_review_approved(&self, id: Uuid, approved: bool) -> CoreResult<Review> {
    let mut tables = self.tables.write();
    match tables.reviews.get_mut(&id) {
      Some(review) => {
        review.approved = approved;
        Ok(review.clone())
      }
      None => Err(CoreError::NotFound("review".into())),
    }
  }

  async fn reviews_for_product(&self, product_id: Uuid, approved_only: bool) -> CoreResult<Vec<Review>> {
    let mut reviews: Vec<Review> = self
      .tables
      .read()
      .reviews
      .values()
      .filter(|r| r.product_id == product_id && (!approved_only || r.approved))
      .cloned()
      .collect();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(reviews)
  }

  async fn approved_review_stats(&self, product_id: Uuid) -> CoreResult<(f64, i32)> {
    let tables = self.tables.read();
    let ratings: Vec<i64> = tables
      .reviews
      .values()
      .filter(|r| r.product_id == product_id && r.approved)
      .map(|r| i64::from(r.rating))
      .collect();
    if ratings.is_empty() {
      return Ok((0.0, 0));
    }
    let count = ratings.len() as i32;
    let sum: i64 = ratings.iter().sum();
    Ok((sum as f64 / f64::from(count), count))
  }
}

fn matches_search(product: &Product, needle: &str) -> bool {
  let hit = |text: &str| text.to_lowercase().contains(needle);
  hit(&product.name)
    || product.description.as_deref().map_or(false, |d| hit(d))
    || product.short_description.as_deref().map_or(false, |d| hit(d))
    || hit(&product.sku)
}

fn sort_products(products: &mut [Product], sort: ProductSort) {
  match sort {
    ProductSort::PriceAsc => products.sort_by(|a, b| a.price_cents.cmp(&b.price_cents).then_with(|| a.id.cmp(&b.id))),
    ProductSort::PriceDesc => products.sort_by(|a, b| b.price_cents.cmp(&a.price_cents).then_with(|| a.id.cmp(&b.id))),
    ProductSort::NameAsc => products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))),
    ProductSort::NameDesc => products.sort_by(|a, b| b.name.cmp(&a.name).then_with(|| a.id.cmp(&b.id))),
    ProductSort::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))),
    ProductSort::BestSelling => products.sort_by(|a, b| b.units_sold.cmp(&a.units_sold).then_with(|| a.id.cmp(&b.id))),
    ProductSort::TopRated => products.sort_by(|a, b| {
      b.average_rating
        .partial_cmp(&a.average_rating)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.review_count.cmp(&a.review_count))
        .then_with(|| a.id.cmp(&b.id))
    }),
  }
}
