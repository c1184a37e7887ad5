// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::services::cart_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  #[validate(range(min = 1, message = "Valid quantity required"))]
  pub quantity: i32,
}

#[derive(Deserialize, Validate, Debug)]
pub struct UpdateCartItemPayload {
  #[validate(range(min = 1, message = "Valid quantity required"))]
  pub quantity: i32,
}

// --- Handlers ---

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let items = cart_service::get_cart(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "cartItems": items })))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, payload, auth_user),
  fields(user_id = %auth_user.user_id, product_id = %payload.product_id, quantity = %payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddToCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  payload.validate()?;

  let item =
    cart_service::add_to_cart(&app_state.db_pool, auth_user.user_id, payload.product_id, payload.quantity).await?;

  Ok(HttpResponse::Created().json(json!({
    "message": "Item added to cart successfully",
    "cartItem": item,
  })))
}

#[instrument(
  name = "handler::update_cart_item",
  skip(app_state, payload, auth_user),
  fields(user_id = %auth_user.user_id, cart_item_id = %path.as_ref())
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateCartItemPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  payload.validate()?;

  let item =
    cart_service::update_item(&app_state.db_pool, auth_user.user_id, path.into_inner(), payload.quantity).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Cart item updated successfully",
    "cartItem": item,
  })))
}

#[instrument(
  name = "handler::remove_from_cart",
  skip(app_state, auth_user),
  fields(user_id = %auth_user.user_id, cart_item_id = %path.as_ref())
)]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  cart_service::remove_item(&app_state.db_pool, auth_user.user_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Item removed from cart successfully" })))
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  cart_service::clear_cart(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Cart cleared successfully" })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quantity_must_be_positive() {
    let payload = AddToCartRequestPayload { product_id: Uuid::new_v4(), quantity: 0 };
    assert!(payload.validate().is_err());

    let payload = AddToCartRequestPayload { quantity: 1, ..payload };
    assert!(payload.validate().is_ok());
  }
}
