// src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{Category, Product};
use crate::state::AppState;
use crate::web::extractors::AdminUser;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub category: Option<String>,
  pub featured: Option<bool>,
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

pub(crate) fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
  let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
  let offset = offset.unwrap_or(0).max(0);
  (limit, offset)
}

#[instrument(name = "handler::list_products", skip(app_state, query))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let (limit, offset) = page_bounds(query.limit, query.offset);
  let featured_only = query.featured.unwrap_or(false);

  let products: Vec<Product> = sqlx::query_as(
    "SELECT p.id, p.name, p.description, p.price_cents, p.category_id, c.name AS category_name, \
            p.stock_quantity, p.featured, p.created_at, p.updated_at \
     FROM products p \
     LEFT JOIN categories c ON p.category_id = c.id \
     WHERE ($1::text IS NULL OR c.name = $1) AND (NOT $2 OR p.featured) \
     ORDER BY p.created_at DESC \
     LIMIT $3 OFFSET $4",
  )
  .bind(query.category.as_deref())
  .bind(featured_only)
  .bind(limit)
  .bind(offset)
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_categories", skip(app_state))]
pub async fn get_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories: Vec<Category> =
    sqlx::query_as("SELECT id, name, description, created_at FROM categories ORDER BY name")
      .fetch_all(&app_state.db_pool)
      .await?;

  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let product: Option<Product> = sqlx::query_as(
    "SELECT p.id, p.name, p.description, p.price_cents, p.category_id, c.name AS category_name, \
            p.stock_quantity, p.featured, p.created_at, p.updated_at \
     FROM products p \
     LEFT JOIN categories c ON p.category_id = c.id \
     WHERE p.id = $1",
  )
  .bind(product_id)
  .fetch_optional(&app_state.db_pool)
  .await?;

  match product {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => Err(AppError::NotFound(format!("Product {} not found", product_id))),
  }
}

// --- Admin catalog mutation ---

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
  #[validate(length(min = 1, message = "Product name required"))]
  pub name: String,
  pub description: Option<String>,
  #[validate(range(min = 0, message = "Valid price required"))]
  pub price_cents: i32,
  pub category_id: Option<Uuid>,
  #[validate(range(min = 0, message = "Valid stock quantity required"))]
  pub stock_quantity: i32,
  #[serde(default)]
  pub featured: bool,
}

async fn ensure_category_exists(app_state: &AppState, category_id: Option<Uuid>) -> Result<(), AppError> {
  let Some(category_id) = category_id else { return Ok(()) };
  let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM categories WHERE id = $1")
    .bind(category_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  if exists.is_none() {
    return Err(AppError::Validation(format!("Unknown category {}", category_id)));
  }
  Ok(())
}

#[instrument(name = "handler::create_product", skip(app_state, payload, _admin))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ProductPayload>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  payload.validate()?;
  ensure_category_exists(&app_state, payload.category_id).await?;

  let product_id: Uuid = sqlx::query_scalar(
    "INSERT INTO products (name, description, price_cents, category_id, stock_quantity, featured) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
  )
  .bind(&payload.name)
  .bind(&payload.description)
  .bind(payload.price_cents)
  .bind(payload.category_id)
  .bind(payload.stock_quantity)
  .bind(payload.featured)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(%product_id, "Product created");
  Ok(HttpResponse::Created().json(json!({
    "message": "Product created successfully",
    "productId": product_id,
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, payload, _admin), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<ProductPayload>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  payload.validate()?;
  ensure_category_exists(&app_state, payload.category_id).await?;

  let updated = sqlx::query(
    "UPDATE products \
     SET name = $1, description = $2, price_cents = $3, category_id = $4, \
         stock_quantity = $5, featured = $6, updated_at = now() \
     WHERE id = $7",
  )
  .bind(&payload.name)
  .bind(&payload.description)
  .bind(payload.price_cents)
  .bind(payload.category_id)
  .bind(payload.stock_quantity)
  .bind(payload.featured)
  .bind(product_id)
  .execute(&app_state.db_pool)
  .await?;

  if updated.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Product {} not found", product_id)));
  }
  Ok(HttpResponse::Ok().json(json!({ "message": "Product updated successfully" })))
}

/// Deletion is refused while order history references the product, so
/// historical order items keep a valid product row to join against.
#[instrument(name = "handler::delete_product", skip(app_state, _admin), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let mut tx = app_state.db_pool.begin().await?;

  let referenced: Option<Uuid> = sqlx::query_scalar("SELECT id FROM order_items WHERE product_id = $1 LIMIT 1")
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?;
  if referenced.is_some() {
    return Err(AppError::Conflict(
      "Product is referenced by existing orders and cannot be deleted".to_string(),
    ));
  }

  let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
    .bind(product_id)
    .execute(&mut *tx)
    .await?;
  tx.commit().await?;

  if deleted.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("Product {} not found", product_id)));
  }

  info!(%product_id, "Product deleted");
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_bounds_clamps_limit_and_offset() {
    assert_eq!(page_bounds(None, None), (20, 0));
    assert_eq!(page_bounds(Some(500), Some(-3)), (100, 0));
    assert_eq!(page_bounds(Some(0), Some(40)), (1, 40));
  }

  #[test]
  fn product_payload_rejects_negative_price_and_stock() {
    let payload = ProductPayload {
      name: "Widget".into(),
      description: None,
      price_cents: -1,
      category_id: None,
      stock_quantity: 3,
      featured: false,
    };
    assert!(payload.validate().is_err());

    let payload = ProductPayload { price_cents: 100, stock_quantity: -5, ..payload };
    assert!(payload.validate().is_err());
  }
}
