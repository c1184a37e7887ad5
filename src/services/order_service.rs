// src/services/order_service.rs

//! Order placement and order queries.
//!
//! Placement is the one correctness-critical flow in the application: price
//! capture, stock decrement and row insertion must land atomically or not at
//! all. Everything runs inside a single sqlx transaction; the stock decrement
//! is a conditional UPDATE whose affected-row count *is* the sufficiency
//! check, so two concurrent orders can never jointly oversell a product.

use crate::errors::{AppError, Result};
use crate::models::{Order, OrderItemDetail, OrderStatus, OrderSummary};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// One (product, quantity) pair of an incoming order request.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
  pub product_id: Uuid,
  pub quantity: i32,
}

/// Outcome of a successful placement, echoed back to the client.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
  pub order_id: Uuid,
  pub total_amount_cents: i64,
}

fn line_total(price_cents: i32, quantity: i32) -> i64 {
  price_cents as i64 * quantity as i64
}

/// Places an order: validates every line against the live catalog, captures
/// unit prices, decrements stock and persists the order header plus one row
/// per line, all-or-nothing.
///
/// The caller's cart is cleared after the transaction commits. That step is
/// best-effort by contract: a failure there is logged and swallowed, never
/// failing an already-placed order.
#[instrument(name = "order_service::place_order", skip(pool, lines, shipping_address), fields(user_id = %user_id, line_count = lines.len()))]
pub async fn place_order(
  pool: &PgPool,
  user_id: Uuid,
  lines: &[NewOrderLine],
  shipping_address: &str,
) -> Result<PlacedOrder> {
  let mut tx = pool.begin().await?;

  let mut total_amount_cents: i64 = 0;
  // (product_id, quantity, unit price at purchase)
  let mut captured: Vec<(Uuid, i32, i32)> = Vec::with_capacity(lines.len());

  for line in lines {
    let price_cents: i32 = sqlx::query_scalar("SELECT price_cents FROM products WHERE id = $1")
      .bind(line.product_id)
      .fetch_optional(&mut *tx)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Product {} not found", line.product_id)))?;

    // Conditional decrement: zero rows affected means the remaining stock is
    // insufficient. Doing the check and the write as one statement closes the
    // window between them under concurrent requests.
    let decremented = sqlx::query(
      "UPDATE products SET stock_quantity = stock_quantity - $1, updated_at = now() \
       WHERE id = $2 AND stock_quantity >= $1",
    )
    .bind(line.quantity)
    .bind(line.product_id)
    .execute(&mut *tx)
    .await?;

    if decremented.rows_affected() == 0 {
      warn!(product_id = %line.product_id, requested = line.quantity, "Insufficient stock; rolling back order");
      return Err(AppError::InsufficientStock { product_id: line.product_id });
    }

    total_amount_cents += line_total(price_cents, line.quantity);
    captured.push((line.product_id, line.quantity, price_cents));
  }

  let order_id: Uuid = sqlx::query_scalar(
    "INSERT INTO orders (user_id, total_amount_cents, status, shipping_address) \
     VALUES ($1, $2, 'pending', $3) RETURNING id",
  )
  .bind(user_id)
  .bind(total_amount_cents)
  .bind(shipping_address)
  .fetch_one(&mut *tx)
  .await?;

  for (product_id, quantity, price_cents) in &captured {
    sqlx::query("INSERT INTO order_items (order_id, product_id, quantity, price_cents) VALUES ($1, $2, $3, $4)")
      .bind(order_id)
      .bind(product_id)
      .bind(quantity)
      .bind(price_cents)
      .execute(&mut *tx)
      .await?;
  }

  tx.commit().await?;

  info!(%order_id, total_amount_cents, "Order placed");

  // Post-checkout cart clear. Runs outside the transaction: an error inside a
  // Postgres transaction would poison it, and this step must never undo the
  // committed order.
  if let Err(e) = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
    .bind(user_id)
    .execute(pool)
    .await
  {
    warn!(error = %e, %user_id, "Failed to clear cart after checkout");
  }

  Ok(PlacedOrder { order_id, total_amount_cents })
}

/// All orders belonging to `user_id`, newest first, with item counts.
pub async fn list_user_orders(pool: &PgPool, user_id: Uuid) -> Result<Vec<OrderSummary>> {
  let orders = sqlx::query_as::<_, OrderSummary>(
    "SELECT o.id, o.user_id, o.status, o.total_amount_cents, o.shipping_address, \
            o.created_at, o.updated_at, COUNT(oi.id) AS item_count \
     FROM orders o \
     LEFT JOIN order_items oi ON o.id = oi.order_id \
     WHERE o.user_id = $1 \
     GROUP BY o.id \
     ORDER BY o.created_at DESC",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;
  Ok(orders)
}

/// One order with its line items, scoped to the owning user.
pub async fn get_user_order(pool: &PgPool, user_id: Uuid, order_id: Uuid) -> Result<(Order, Vec<OrderItemDetail>)> {
  let order = sqlx::query_as::<_, Order>(
    "SELECT id, user_id, status, total_amount_cents, shipping_address, created_at, updated_at \
     FROM orders WHERE id = $1 AND user_id = $2",
  )
  .bind(order_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  let items = sqlx::query_as::<_, OrderItemDetail>(
    "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price_cents, p.name AS product_name \
     FROM order_items oi \
     JOIN products p ON oi.product_id = p.id \
     WHERE oi.order_id = $1",
  )
  .bind(order_id)
  .fetch_all(pool)
  .await?;

  Ok((order, items))
}

/// Admin listing: every order joined with purchaser identity and item count,
/// optionally filtered by status, paginated.
pub async fn list_all_orders(
  pool: &PgPool,
  status: Option<OrderStatus>,
  limit: i64,
  offset: i64,
) -> Result<Vec<OrderSummary>> {
  let base = "SELECT o.id, o.user_id, o.status, o.total_amount_cents, o.shipping_address, \
                     o.created_at, o.updated_at, COUNT(oi.id) AS item_count, \
                     u.email, u.first_name, u.last_name \
              FROM orders o \
              JOIN users u ON o.user_id = u.id \
              LEFT JOIN order_items oi ON o.id = oi.order_id";
  let tail = "GROUP BY o.id, u.email, u.first_name, u.last_name \
              ORDER BY o.created_at DESC LIMIT $1 OFFSET $2";

  let orders = match status {
    Some(status) => {
      sqlx::query_as::<_, OrderSummary>(&format!("{} WHERE o.status = $3 {}", base, tail))
        .bind(limit)
        .bind(offset)
        .bind(status)
        .fetch_all(pool)
        .await?
    }
    None => {
      sqlx::query_as::<_, OrderSummary>(&format!("{} {}", base, tail))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?
    }
  };
  Ok(orders)
}

/// Admin status transition. Zero rows affected is reported as NotFound rather
/// than silently succeeding.
#[instrument(name = "order_service::update_status", skip(pool))]
pub async fn update_status(pool: &PgPool, order_id: Uuid, status: OrderStatus) -> Result<()> {
  let updated = sqlx::query("UPDATE orders SET status = $1, updated_at = now() WHERE id = $2")
    .bind(status)
    .bind(order_id)
    .execute(pool)
    .await?;

  if updated.rows_affected() == 0 {
    return Err(AppError::NotFound("Order not found".to_string()));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn line_total_uses_widened_arithmetic() {
    assert_eq!(line_total(699_99, 3), 2_099_97);
    // Large catalog price times large quantity must not wrap i32.
    assert_eq!(line_total(i32::MAX, 2), i32::MAX as i64 * 2);
  }
}
