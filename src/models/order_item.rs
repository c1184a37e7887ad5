// src/models/order_item.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  /// Unit price captured at purchase time, decoupled from the live catalog
  /// price so historical orders stay accurate after price changes.
  pub price_cents: i32,
}

/// Line item joined with its product's display name for order detail views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItemDetail {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_cents: i32,
  pub product_name: String,
}
