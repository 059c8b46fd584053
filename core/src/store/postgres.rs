// core/src/store/postgres.rs

//! PostgreSQL [`Store`] implementation over the sqlx runtime query API.
//!
//! Unique-index violations on guarded pairs are translated into their
//! domain errors; server/schema.sql defines the indexes. Owned
//! collections (cart lines) are deleted explicitly together with their
//! cart, never through schema-level cascade.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::QueryBuilder;
use tracing::instrument;
use uuid::Uuid;

use super::Store;
use crate::catalog::{ProductFilter, ProductSort};
use crate::error::{CoreError, CoreResult};
use crate::identity::CartOwner;
use crate::models::{
  AccessToken, Brand, Cart, CartLine, Category, Favorite, NewCartLine, NewReview, NewUser, Product, ProductImage,
  Review, User,
};

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    PgStore { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  match err {
    sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
    _ => false,
  }
}

#[async_trait]
impl Store for PgStore {
  // --- users & access tokens ---

  async fn insert_user(&self, new_user: NewUser) -> CoreResult<User> {
    let result = sqlx::query_as::<_, User>(
      r#"INSERT INTO users
           (id, email, password_hash, first_name, last_name, phone, role, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW(), NOW())
         RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.phone)
    .bind(new_user.role)
    .fetch_one(&self.pool)
    .await;
    match result {
      Ok(user) => Ok(user),
      Err(err) if is_unique_violation(&err) => Err(CoreError::Validation("email already registered".into())),
      Err(err) => Err(err.into()),
    }
  }

  async fn user_by_id(&self, id: Uuid) -> CoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> CoreResult<()> {
    sqlx::query("UPDATE users SET last_login_at = $2, updated_at = NOW() WHERE id = $1")
      .bind(user_id)
      .bind(at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn issue_access_token(&self, user_id: Uuid) -> CoreResult<AccessToken> {
    if let Some(token) = sqlx::query_as::<_, AccessToken>("SELECT * FROM access_tokens WHERE user_id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?
    {
      return Ok(token);
    }
    let result = sqlx::query_as::<_, AccessToken>(
      "INSERT INTO access_tokens (token, user_id, created_at) VALUES ($1, $2, NOW()) RETURNING *",
    )
    .bind(Uuid::new_v4().simple().to_string())
    .bind(user_id)
    .fetch_one(&self.pool)
    .await;
    match result {
      Ok(token) => Ok(token),
      // Lost an issue race; the winner's token is the user's token.
      Err(err) if is_unique_violation(&err) => {
        let token = sqlx::query_as::<_, AccessToken>("SELECT * FROM access_tokens WHERE user_id = $1")
          .bind(user_id)
          .fetch_optional(&self.pool)
          .await?;
        token.ok_or(CoreError::Storage { source: err })
      }
      Err(err) => Err(err.into()),
    }
  }

  async fn user_by_access_token(&self, token: &str) -> CoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      r#"SELECT u.* FROM users u
         JOIN access_tokens t ON t.user_id = u.id
         WHERE t.token = $1 AND u.is_active = TRUE"#,
    )
    .bind(token)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  async fn revoke_access_tokens(&self, user_id: Uuid) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM access_tokens WHERE user_id = $1")
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  // --- catalog ---

  async fn insert_category(&self, category: Category) -> CoreResult<Category> {
    let row = sqlx::query_as::<_, Category>(
      r#"INSERT INTO categories (id, name, slug, description, parent_id, is_active, position, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *"#,
    )
    .bind(category.id)
    .bind(&category.name)
    .bind(&category.slug)
    .bind(&category.description)
    .bind(category.parent_id)
    .bind(category.is_active)
    .bind(category.position)
    .bind(category.created_at)
    .fetch_one(&self.pool)
    .await?;
    Ok(row)
  }

  async fn list_categories(&self) -> CoreResult<Vec<Category>> {
    let categories =
      sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE is_active = TRUE ORDER BY position, name")
        .fetch_all(&self.pool)
        .await?;
    Ok(categories)
  }

  async fn category_by_slug(&self, slug: &str) -> CoreResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1 AND is_active = TRUE")
      .bind(slug)
      .fetch_optional(&self.pool)
      .await?;
    Ok(category)
  }

  async fn insert_brand(&self, brand: Brand) -> CoreResult<Brand> {
    let row = sqlx::query_as::<_, Brand>(
      r#"INSERT INTO brands (id, name, description, logo_url, website, is_active, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *"#,
    )
    .bind(brand.id)
    .bind(&brand.name)
    .bind(&brand.description)
    .bind(&brand.logo_url)
    .bind(&brand.website)
    .bind(brand.is_active)
    .bind(brand.created_at)
    .fetch_one(&self.pool)
    .await?;
    Ok(row)
  }

  async fn list_brands(&self) -> CoreResult<Vec<Brand>> {
    let brands = sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE is_active = TRUE ORDER BY name")
      .fetch_all(&self.pool)
      .await?;
    Ok(brands)
  }

  async fn insert_product(&self, product: Product) -> CoreResult<Product> {
    let row = sqlx::query_as::<_, Product>(
      r#"INSERT INTO products
           (id, name, description, short_description, sku, category_id, brand_id,
            price_cents, original_price_cents, stock, units_sold,
            is_active, is_featured, on_offer, average_rating, review_count,
            created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
         RETURNING *"#,
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.short_description)
    .bind(&product.sku)
    .bind(product.category_id)
    .bind(product.brand_id)
    .bind(product.price_cents)
    .bind(product.original_price_cents)
    .bind(product.stock)
    .bind(product.units_sold)
    .bind(product.is_active)
    .bind(product.is_featured)
    .bind(product.on_offer)
    .bind(product.average_rating)
    .bind(product.review_count)
    .bind(product.created_at)
    .bind(product.updated_at)
    .fetch_one(&self.pool)
    .await?;
    Ok(row)
  }

  async fn product_by_id(&self, id: Uuid) -> CoreResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  async fn list_products(&self, filter: &ProductFilter) -> CoreResult<Vec<Product>> {
    let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new("SELECT * FROM products WHERE is_active = TRUE");
    if let Some(search) = &filter.search {
      let pattern = format!("%{}%", search);
      qb.push(" AND (name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR description ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR short_description ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR sku ILIKE ")
        .push_bind(pattern)
        .push(")");
    }
    if let Some(category_id) = filter.category_id {
      qb.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(brand_id) = filter.brand_id {
      qb.push(" AND brand_id = ").push_bind(brand_id);
    }
    if let Some(min) = filter.min_price_cents {
      qb.push(" AND price_cents >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price_cents {
      qb.push(" AND price_cents <= ").push_bind(max);
    }
    if let Some(featured) = filter.featured {
      qb.push(" AND is_featured = ").push_bind(featured);
    }
    if let Some(on_offer) = filter.on_offer {
      qb.push(" AND on_offer = ").push_bind(on_offer);
    }
    if let Some(in_stock) = filter.in_stock {
      qb.push(if in_stock { " AND stock > 0" } else { " AND stock <= 0" });
    }
    qb.push(match filter.sort {
      ProductSort::PriceAsc => " ORDER BY price_cents ASC, id ASC",
      ProductSort::PriceDesc => " ORDER BY price_cents DESC, id ASC",
      ProductSort::NameAsc => " ORDER BY name ASC, id ASC",
      ProductSort::NameDesc => " ORDER BY name DESC, id ASC",
      ProductSort::Newest => " ORDER BY created_at DESC, id ASC",
      ProductSort::BestSelling => " ORDER BY units_sold DESC, id ASC",
      ProductSort::TopRated => " ORDER BY average_rating DESC, review_count DESC, id ASC",
    });
    let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
    Ok(products)
  }

  async fn insert_product_image(&self, image: ProductImage) -> CoreResult<ProductImage> {
    let row = sqlx::query_as::<_, ProductImage>(
      r#"INSERT INTO product_images (id, product_id, url, alt_text, is_primary, position, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *"#,
    )
    .bind(image.id)
    .bind(image.product_id)
    .bind(&image.url)
    .bind(&image.alt_text)
    .bind(image.is_primary)
    .bind(image.position)
    .bind(image.created_at)
    .fetch_one(&self.pool)
    .await?;
    Ok(row)
  }

  async fn product_images(&self, product_id: Uuid) -> CoreResult<Vec<ProductImage>> {
    let images = sqlx::query_as::<_, ProductImage>(
      "SELECT * FROM product_images WHERE product_id = $1 ORDER BY is_primary DESC, position ASC, id ASC",
    )
    .bind(product_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(images)
  }

  async fn update_product_rating(&self, product_id: Uuid, average: f64, count: i32) -> CoreResult<()> {
    sqlx::query("UPDATE products SET average_rating = $2, review_count = $3, updated_at = NOW() WHERE id = $1")
      .bind(product_id)
      .bind(average)
      .bind(count)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  // --- carts ---

  async fn cart_by_user(&self, user_id: Uuid) -> CoreResult<Option<Cart>> {
    let cart = sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE user_id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  async fn cart_by_session(&self, session_token: &str) -> CoreResult<Option<Cart>> {
    let cart = sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE session_token = $1")
      .bind(session_token)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  async fn insert_cart(&self, owner: &CartOwner) -> CoreResult<Cart> {
    let (user_id, session_token) = match owner {
      CartOwner::User(user_id) => (Some(*user_id), None),
      CartOwner::Session(token) => (None, Some(token.clone())),
    };
    let result = sqlx::query_as::<_, Cart>(
      r#"INSERT INTO carts (id, user_id, session_token, created_at, updated_at)
         VALUES ($1, $2, $3, NOW(), NOW())
         RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&session_token)
    .fetch_one(&self.pool)
    .await;
    match result {
      Ok(cart) => Ok(cart),
      // Lost a create race; the winner's cart is the owner's cart.
      Err(err) if is_unique_violation(&err) => {
        let existing = match owner {
          CartOwner::User(user_id) => self.cart_by_user(*user_id).await?,
          CartOwner::Session(token) => self.cart_by_session(token).await?,
        };
        existing.ok_or(CoreError::Storage { source: err })
      }
      Err(err) => Err(err.into()),
    }
  }

  #[instrument(name = "store::delete_cart", skip(self))]
  async fn delete_cart(&self, cart_id: Uuid) -> CoreResult<()> {
    let mut tx = self.pool.begin().await?;
    sqlx::query("DELETE FROM cart_lines WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&mut *tx)
      .await?;
    sqlx::query("DELETE FROM carts WHERE id = $1")
      .bind(cart_id)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;
    Ok(())
  }

  // --- cart lines ---

  async fn cart_lines(&self, cart_id: Uuid) -> CoreResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>("SELECT * FROM cart_lines WHERE cart_id = $1 ORDER BY created_at, id")
      .bind(cart_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(lines)
  }

  async fn cart_lines_with_products(&self, cart_id: Uuid) -> CoreResult<Vec<(CartLine, Product)>> {
    let lines = self.cart_lines(cart_id).await?;
    if lines.is_empty() {
      return Ok(Vec::new());
    }
    let product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
      .bind(&product_ids)
      .fetch_all(&self.pool)
      .await?;
    let by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();
    Ok(
      lines
        .into_iter()
        .filter_map(|l| by_id.get(&l.product_id).cloned().map(|p| (l, p)))
        .collect(),
    )
  }

  async fn cart_line(&self, cart_id: Uuid, line_id: Uuid) -> CoreResult<Option<CartLine>> {
    let line = sqlx::query_as::<_, CartLine>("SELECT * FROM cart_lines WHERE id = $1 AND cart_id = $2")
      .bind(line_id)
      .bind(cart_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(line)
  }

  async fn insert_cart_line(&self, line: NewCartLine) -> CoreResult<CartLine> {
    // Consolidation: the unique (cart_id, product_id) index turns a
    // second add into a quantity bump; the original price snapshot wins.
    let row = sqlx::query_as::<_, CartLine>(
      r#"INSERT INTO cart_lines (id, cart_id, product_id, quantity, unit_price_cents, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
         ON CONFLICT (cart_id, product_id)
         DO UPDATE SET quantity = cart_lines.quantity + EXCLUDED.quantity, updated_at = NOW()
         RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(line.cart_id)
    .bind(line.product_id)
    .bind(line.quantity)
    .bind(line.unit_price_cents)
    .fetch_one(&self.pool)
    .await?;
    Ok(row)
  }

  async fn set_cart_line_quantity(&self, line_id: Uuid, quantity: i32) -> CoreResult<CartLine> {
    let line = sqlx::query_as::<_, CartLine>(
      "UPDATE cart_lines SET quantity = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(line_id)
    .bind(quantity)
    .fetch_optional(&self.pool)
    .await?;
    line.ok_or_else(|| CoreError::NotFound("cart line".into()))
  }

  async fn delete_cart_line(&self, line_id: Uuid) -> CoreResult<()> {
    sqlx::query("DELETE FROM cart_lines WHERE id = $1")
      .bind(line_id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn clear_cart(&self, cart_id: Uuid) -> CoreResult<u64> {
    let result = sqlx::query("DELETE FROM cart_lines WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  // --- favorites ---

  async fn favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Option<Favorite>> {
    let favorite = sqlx::query_as::<_, Favorite>("SELECT * FROM favorites WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(favorite)
  }

  async fn insert_favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Favorite> {
    // The no-op DO UPDATE makes the insert idempotent while still
    // returning the surviving row.
    let favorite = sqlx::query_as::<_, Favorite>(
      r#"INSERT INTO favorites (id, user_id, product_id, created_at)
         VALUES ($1, $2, $3, NOW())
         ON CONFLICT (user_id, product_id) DO UPDATE SET user_id = EXCLUDED.user_id
         RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(product_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(favorite)
  }

  async fn delete_favorite(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn favorites_with_products(&self, user_id: Uuid) -> CoreResult<Vec<(Favorite, Product)>> {
    let favorites = sqlx::query_as::<_, Favorite>(
      "SELECT * FROM favorites WHERE user_id = $1 ORDER BY created_at DESC, id ASC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    if favorites.is_empty() {
      return Ok(Vec::new());
    }
    let product_ids: Vec<Uuid> = favorites.iter().map(|f| f.product_id).collect();
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
      .bind(&product_ids)
      .fetch_all(&self.pool)
      .await?;
    let by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();
    Ok(
      favorites
        .into_iter()
        .filter_map(|f| by_id.get(&f.product_id).cloned().map(|p| (f, p)))
        .collect(),
    )
  }

  // --- reviews ---

  async fn review_by_user_and_product(&self, user_id: Uuid, product_id: Uuid) -> CoreResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(review)
  }

  async fn insert_review(&self, review: NewReview) -> CoreResult<Review> {
    let result = sqlx::query_as::<_, Review>(
      r#"INSERT INTO reviews (id, user_id, product_id, rating, comment, approved, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, NOW())
         RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(review.user_id)
    .bind(review.product_id)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(review.approved)
    .fetch_one(&self.pool)
    .await;
    match result {
      Ok(row) => Ok(row),
      Err(err) if is_unique_violation(&err) => Err(CoreError::DuplicateReview),
      Err(err) => Err(err.into()),
    }
  }

  async fn review_by_id(&self, id: Uuid) -> CoreResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(review)
  }

  async fn set_review_approved(&self, id: Uuid, approved: bool) -> CoreResult<Review> {
    let review = sqlx::query_as::<_, Review>("UPDATE reviews SET approved = $2 WHERE id = $1 RETURNING *")
      .bind(id)
      .bind(approved)
      .fetch_optional(&self.pool)
      .await?;
    review.ok_or_else(|| CoreError::NotFound("review".into()))
  }

  async fn reviews_for_product(&self, product_id: Uuid, approved_only: bool) -> CoreResult<Vec<Review>> {
    let sql = if approved_only {
      "SELECT * FROM reviews WHERE product_id = $1 AND approved = TRUE ORDER BY created_at DESC, id ASC"
    } else {
      "SELECT * FROM reviews WHERE product_id = $1 ORDER BY created_at DESC, id ASC"
    };
    let reviews = sqlx::query_as::<_, Review>(sql)
      .bind(product_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(reviews)
  }

  async fn approved_review_stats(&self, product_id: Uuid) -> CoreResult<(f64, i32)> {
    let (average, count): (f64, i64) = sqlx::query_as(
      r#"SELECT COALESCE(CAST(AVG(rating) AS DOUBLE PRECISION), 0), COUNT(*)
         FROM reviews WHERE product_id = $1 AND approved = TRUE"#,
    )
    .bind(product_id)
    .fetch_one(&self.pool)
    .await?;
    Ok((average, count as i32))
  }
}
