// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::services::order_service::{self, NewOrderLine};
use crate::state::AppState;
use crate::web::extractors::{AdminUser, AuthenticatedUser};
use crate::web::handlers::product_handlers::page_bounds;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
  pub product_id: Uuid,
  #[validate(range(min = 1, message = "Valid quantity required"))]
  pub quantity: i32,
}

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequestPayload {
  #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
  pub items: Vec<OrderLinePayload>,
  #[validate(length(min = 10, message = "Valid shipping address required"))]
  pub shipping_address: String,
}

#[derive(Deserialize, Debug)]
pub struct ListOrdersQuery {
  pub status: Option<OrderStatus>,
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusPayload {
  pub status: OrderStatus,
}

// --- Handlers ---

#[instrument(
  name = "handler::create_order",
  skip(app_state, payload, auth_user),
  fields(user_id = %auth_user.user_id, line_count = payload.items.len())
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  payload.validate()?;

  let lines: Vec<NewOrderLine> = payload
    .items
    .iter()
    .map(|item| NewOrderLine { product_id: item.product_id, quantity: item.quantity })
    .collect();

  let placed =
    order_service::place_order(&app_state.db_pool, auth_user.user_id, &lines, &payload.shipping_address).await?;

  info!(order_id = %placed.order_id, "Order created");
  Ok(HttpResponse::Created().json(json!({
    "message": "Order created successfully",
    "orderId": placed.order_id,
    "totalAmount": placed.total_amount_cents,
  })))
}

#[instrument(name = "handler::my_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_user_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_user_orders(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(
  name = "handler::get_order",
  skip(app_state, auth_user),
  fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (order, items) = order_service::get_user_order(&app_state.db_pool, auth_user.user_id, path.into_inner()).await?;

  let mut body = serde_json::to_value(&order).map_err(|e| AppError::Internal(e.to_string()))?;
  body["items"] = serde_json::to_value(&items).map_err(|e| AppError::Internal(e.to_string()))?;
  Ok(HttpResponse::Ok().json(json!({ "order": body })))
}

#[instrument(name = "handler::all_orders", skip(app_state, query, _admin))]
pub async fn get_all_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let (limit, offset) = page_bounds(query.limit, query.offset);
  let orders = order_service::list_all_orders(&app_state.db_pool, query.status, limit, offset).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::update_order_status", skip(app_state, payload, _admin), fields(order_id = %path.as_ref()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateStatusPayload>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  order_service::update_status(&app_state.db_pool, path.into_inner(), payload.status).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Order status updated successfully" })))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn order_payload(items: Vec<OrderLinePayload>, address: &str) -> CreateOrderRequestPayload {
    CreateOrderRequestPayload { items, shipping_address: address.to_string() }
  }

  #[test]
  fn order_requires_at_least_one_item() {
    let payload = order_payload(vec![], "10 Downing Street, London");
    assert!(payload.validate().is_err());
  }

  #[test]
  fn shipping_address_minimum_length_is_enforced() {
    let line = OrderLinePayload { product_id: Uuid::new_v4(), quantity: 1 };
    let payload = order_payload(vec![line], "too short");
    assert!(payload.validate().is_err());

    let line = OrderLinePayload { product_id: Uuid::new_v4(), quantity: 1 };
    let payload = order_payload(vec![line], "1 Long Enough Road, Springfield");
    assert!(payload.validate().is_ok());
  }

  #[test]
  fn nested_line_quantities_are_validated() {
    let line = OrderLinePayload { product_id: Uuid::new_v4(), quantity: 0 };
    let payload = order_payload(vec![line], "1 Long Enough Road, Springfield");
    assert!(payload.validate().is_err());
  }
}
