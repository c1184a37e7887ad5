// src/services/cart_service.rs

//! Per-user cart CRUD. Every mutation validates against live product stock at
//! the time of the call; a (user, product) pair is kept unique by merging
//! duplicate adds into the existing row.

use crate::errors::{AppError, Result};
use crate::models::{CartItem, CartItemDetail};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub async fn get_cart(pool: &PgPool, user_id: Uuid) -> Result<Vec<CartItemDetail>> {
  let items = sqlx::query_as::<_, CartItemDetail>(
    "SELECT ci.id, ci.user_id, ci.product_id, ci.quantity, ci.added_at, \
            p.name AS product_name, p.price_cents, p.stock_quantity \
     FROM cart_items ci \
     JOIN products p ON ci.product_id = p.id \
     WHERE ci.user_id = $1 \
     ORDER BY ci.added_at",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;
  Ok(items)
}

/// Adds `quantity` of a product to the user's cart, merging with any existing
/// row for the same product. The merged quantity is bounded by current stock.
#[instrument(name = "cart_service::add_to_cart", skip(pool))]
pub async fn add_to_cart(pool: &PgPool, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem> {
  let mut tx = pool.begin().await?;

  let stock_quantity: i32 = sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))?;

  let existing_quantity: i32 =
    sqlx::query_scalar("SELECT quantity FROM cart_items WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .fetch_optional(&mut *tx)
      .await?
      .unwrap_or(0);

  if existing_quantity + quantity > stock_quantity {
    return Err(AppError::InsufficientStock { product_id });
  }

  let item = sqlx::query_as::<_, CartItem>(
    "INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3) \
     ON CONFLICT (user_id, product_id) DO UPDATE \
     SET quantity = cart_items.quantity + EXCLUDED.quantity, added_at = now() \
     RETURNING id, user_id, product_id, quantity, added_at",
  )
  .bind(user_id)
  .bind(product_id)
  .bind(quantity)
  .fetch_one(&mut *tx)
  .await?;

  tx.commit().await?;
  Ok(item)
}

/// Sets the quantity of one of the caller's cart rows, bounded by live stock.
#[instrument(name = "cart_service::update_item", skip(pool))]
pub async fn update_item(pool: &PgPool, user_id: Uuid, cart_item_id: Uuid, quantity: i32) -> Result<CartItem> {
  // Ownership check and stock lookup in one round trip.
  let row: Option<(Uuid, i32)> = sqlx::query_as(
    "SELECT ci.product_id, p.stock_quantity \
     FROM cart_items ci \
     JOIN products p ON ci.product_id = p.id \
     WHERE ci.id = $1 AND ci.user_id = $2",
  )
  .bind(cart_item_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?;

  let (product_id, stock_quantity) = row.ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

  if quantity > stock_quantity {
    return Err(AppError::InsufficientStock { product_id });
  }

  let item = sqlx::query_as::<_, CartItem>(
    "UPDATE cart_items SET quantity = $1 WHERE id = $2 \
     RETURNING id, user_id, product_id, quantity, added_at",
  )
  .bind(quantity)
  .bind(cart_item_id)
  .fetch_one(pool)
  .await?;
  Ok(item)
}

/// Removes one of the caller's cart rows; zero rows affected means the row
/// did not exist (or belongs to someone else) and is reported as NotFound.
pub async fn remove_item(pool: &PgPool, user_id: Uuid, cart_item_id: Uuid) -> Result<()> {
  let deleted = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
    .bind(cart_item_id)
    .bind(user_id)
    .execute(pool)
    .await?;

  if deleted.rows_affected() == 0 {
    return Err(AppError::NotFound("Cart item not found".to_string()));
  }
  Ok(())
}

pub async fn clear_cart(pool: &PgPool, user_id: Uuid) -> Result<()> {
  sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
    .bind(user_id)
    .execute(pool)
    .await?;
  Ok(())
}
