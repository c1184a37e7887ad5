// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Lifecycle of an order. Placement always starts at `Pending`; every later
/// transition is an administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub status: OrderStatus,
  pub total_amount_cents: i64,
  pub shipping_address: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Order row as returned by the listing queries: the header plus an item
/// count, and (for the admin listing) the purchaser's identity.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderSummary {
  pub id: Uuid,
  pub user_id: Uuid,
  pub status: OrderStatus,
  pub total_amount_cents: i64,
  pub shipping_address: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub item_count: i64,
  #[sqlx(default)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[sqlx(default)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[sqlx(default)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"pending\"");
    assert_eq!(serde_json::to_string(&OrderStatus::Shipped).unwrap(), "\"shipped\"");
  }

  #[test]
  fn status_rejects_unknown_values() {
    assert!(serde_json::from_str::<OrderStatus>("\"refunded\"").is_err());
    assert_eq!(
      serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
      OrderStatus::Cancelled
    );
  }
}
