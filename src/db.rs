// src/db.rs

//! Pool construction, embedded migrations and the optional demo seed.
//!
//! The pool is built once at startup and handed down through `AppState`;
//! nothing in the application reaches for a global handle.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub async fn init_pool(config: &AppConfig) -> Result<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(config.db_max_connections)
    .connect(&config.database_url)
    .await?;

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .map_err(|e| AppError::Config(format!("Database migration failed: {}", e)))?;

  info!("Database pool ready, migrations applied.");
  Ok(pool)
}

/// Inserts a small demo catalog on startup when `SEED_DB=true`. Idempotent:
/// categories upsert by name and products are only inserted into an empty
/// catalog.
pub async fn seed_demo_catalog(pool: &PgPool) -> Result<()> {
  let categories = [
    ("Electronics", "Electronic devices and gadgets"),
    ("Clothing", "Fashion and apparel"),
    ("Books", "Books and literature"),
    ("Home & Garden", "Home improvement and garden supplies"),
  ];

  for (name, description) in categories {
    sqlx::query("INSERT INTO categories (name, description) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
      .bind(name)
      .bind(description)
      .execute(pool)
      .await?;
  }

  let product_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
  if product_count > 0 {
    return Ok(());
  }

  let products: [(&str, &str, i32, &str, i32, bool); 4] = [
    ("Smartphone X1", "Latest smartphone with advanced features", 69_999, "Electronics", 50, true),
    ("Laptop Pro", "High-performance laptop for professionals", 129_999, "Electronics", 30, true),
    ("Casual T-Shirt", "Comfortable cotton t-shirt", 2_499, "Clothing", 100, false),
    ("Programming Guide", "Complete guide to modern programming", 4_999, "Books", 25, true),
  ];

  for (name, description, price_cents, category, stock_quantity, featured) in products {
    let category_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM categories WHERE name = $1")
      .bind(category)
      .fetch_optional(pool)
      .await?;

    sqlx::query(
      "INSERT INTO products (name, description, price_cents, category_id, stock_quantity, featured) \
       VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(category_id)
    .bind(stock_quantity)
    .bind(featured)
    .execute(pool)
    .await?;
  }

  info!("Demo catalog seeded.");
  Ok(())
}
