// tests/order_flow.rs

//! End-to-end properties of the order placement flow against a real
//! PostgreSQL instance.
//!
//! These tests need `DATABASE_URL` pointing at a disposable database and are
//! `#[ignore]`d so `cargo test` stays green without infrastructure:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/storefront_test cargo test -- --ignored
//! ```

use serial_test::serial;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use storefront_api::errors::AppError;
use storefront_api::services::{cart_service, order_service};
use storefront_api::services::order_service::NewOrderLine;

async fn test_pool() -> PgPool {
  let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
  let pool = PgPoolOptions::new()
    .max_connections(20)
    .connect(&url)
    .await
    .expect("failed to connect to test database");
  sqlx::migrate!("./migrations").run(&pool).await.expect("migrations failed");
  pool
}

async fn create_user(pool: &PgPool) -> Uuid {
  sqlx::query_scalar(
    "INSERT INTO users (email, password_hash, first_name, last_name) \
     VALUES ($1, 'x', 'Test', 'User') RETURNING id",
  )
  .bind(format!("{}@test.invalid", Uuid::new_v4()))
  .fetch_one(pool)
  .await
  .expect("failed to insert test user")
}

async fn create_product(pool: &PgPool, price_cents: i32, stock_quantity: i32) -> Uuid {
  sqlx::query_scalar(
    "INSERT INTO products (name, price_cents, stock_quantity) \
     VALUES ($1, $2, $3) RETURNING id",
  )
  .bind(format!("test-product-{}", Uuid::new_v4()))
  .bind(price_cents)
  .bind(stock_quantity)
  .fetch_one(pool)
  .await
  .expect("failed to insert test product")
}

async fn stock_of(pool: &PgPool, product_id: Uuid) -> i32 {
  sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_one(pool)
    .await
    .expect("product disappeared")
}

async fn order_count(pool: &PgPool, user_id: Uuid) -> i64 {
  sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

const ADDRESS: &str = "42 Integration Test Lane, Springfield";

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn placing_an_order_decrements_stock_and_clears_cart() {
  let pool = test_pool().await;
  let user_id = create_user(&pool).await;
  let product_id = create_product(&pool, 69_999, 10).await;

  cart_service::add_to_cart(&pool, user_id, product_id, 3).await.unwrap();

  let lines = [NewOrderLine { product_id, quantity: 3 }];
  let placed = order_service::place_order(&pool, user_id, &lines, ADDRESS).await.unwrap();

  assert_eq!(placed.total_amount_cents, 3 * 69_999);
  assert_eq!(stock_of(&pool, product_id).await, 7);

  // The stored header total equals the sum over its item rows.
  let items_total: i64 =
    sqlx::query_scalar("SELECT COALESCE(SUM(price_cents::bigint * quantity), 0)::bigint FROM order_items WHERE order_id = $1")
      .bind(placed.order_id)
      .fetch_one(&pool)
      .await
      .unwrap();
  assert_eq!(items_total, placed.total_amount_cents);

  // Post-checkout the cart is empty.
  let cart = cart_service::get_cart(&pool, user_id).await.unwrap();
  assert!(cart.is_empty());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn insufficient_stock_commits_nothing_and_names_the_product() {
  let pool = test_pool().await;
  let user_id = create_user(&pool).await;
  let product_id = create_product(&pool, 2_499, 2).await;

  let lines = [NewOrderLine { product_id, quantity: 5 }];
  let err = order_service::place_order(&pool, user_id, &lines, ADDRESS).await.unwrap_err();

  match err {
    AppError::InsufficientStock { product_id: named } => assert_eq!(named, product_id),
    other => panic!("expected InsufficientStock, got {:?}", other),
  }
  assert_eq!(stock_of(&pool, product_id).await, 2);
  assert_eq!(order_count(&pool, user_id).await, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn unknown_product_rolls_back_earlier_lines() {
  let pool = test_pool().await;
  let user_id = create_user(&pool).await;
  let product_id = create_product(&pool, 4_999, 10).await;

  // First line is valid and decrements inside the transaction; the second
  // fails, so the decrement must be rolled back with everything else.
  let lines = [
    NewOrderLine { product_id, quantity: 2 },
    NewOrderLine { product_id: Uuid::new_v4(), quantity: 1 },
  ];
  let err = order_service::place_order(&pool, user_id, &lines, ADDRESS).await.unwrap_err();

  assert!(matches!(err, AppError::NotFound(_)));
  assert_eq!(stock_of(&pool, product_id).await, 10);
  assert_eq!(order_count(&pool, user_id).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn concurrent_orders_never_oversell() {
  let pool = test_pool().await;
  let product_id = create_product(&pool, 1_000, 5).await;

  let mut handles = Vec::new();
  for _ in 0..16 {
    let pool = pool.clone();
    handles.push(tokio::spawn(async move {
      let user_id = create_user(&pool).await;
      let lines = [NewOrderLine { product_id, quantity: 1 }];
      order_service::place_order(&pool, user_id, &lines, ADDRESS).await
    }));
  }

  let mut successes = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => successes += 1,
      Err(AppError::InsufficientStock { product_id: named }) => assert_eq!(named, product_id),
      Err(other) => panic!("unexpected error under contention: {:?}", other),
    }
  }

  assert_eq!(successes, 5);
  assert_eq!(stock_of(&pool, product_id).await, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn captured_prices_survive_catalog_price_changes() {
  let pool = test_pool().await;
  let user_id = create_user(&pool).await;
  let product_id = create_product(&pool, 10_000, 10).await;

  let lines = [NewOrderLine { product_id, quantity: 1 }];
  let placed = order_service::place_order(&pool, user_id, &lines, ADDRESS).await.unwrap();

  sqlx::query("UPDATE products SET price_cents = 99999 WHERE id = $1")
    .bind(product_id)
    .execute(&pool)
    .await
    .unwrap();

  let (order, items) = order_service::get_user_order(&pool, user_id, placed.order_id).await.unwrap();
  assert_eq!(order.total_amount_cents, 10_000);
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].price_cents, 10_000);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn cart_adds_merge_into_one_row_bounded_by_stock() {
  let pool = test_pool().await;
  let user_id = create_user(&pool).await;
  let product_id = create_product(&pool, 2_499, 6).await;

  cart_service::add_to_cart(&pool, user_id, product_id, 2).await.unwrap();
  let merged = cart_service::add_to_cart(&pool, user_id, product_id, 3).await.unwrap();
  assert_eq!(merged.quantity, 5);

  let cart = cart_service::get_cart(&pool, user_id).await.unwrap();
  assert_eq!(cart.len(), 1);
  assert_eq!(cart[0].quantity, 5);

  // A further add that would exceed stock (5 + 2 > 6) is rejected.
  let err = cart_service::add_to_cart(&pool, user_id, product_id, 2).await.unwrap_err();
  assert!(matches!(err, AppError::InsufficientStock { .. }));
}
