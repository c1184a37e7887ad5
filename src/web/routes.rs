// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{auth_handlers, cart_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/profile", web::get().to(auth_handlers::profile_handler)),
      )
      .service(
        web::scope("/products")
          .service(
            web::resource("")
              .route(web::get().to(product_handlers::list_products_handler))
              .route(web::post().to(product_handlers::create_product_handler)),
          )
          .route("/categories", web::get().to(product_handlers::get_categories_handler))
          .service(
            web::resource("/{product_id}")
              .route(web::get().to(product_handlers::get_product_handler))
              .route(web::put().to(product_handlers::update_product_handler))
              .route(web::delete().to(product_handlers::delete_product_handler)),
          ),
      )
      .service(
        web::scope("/cart")
          .service(
            web::resource("")
              .route(web::get().to(cart_handlers::get_cart_handler))
              .route(web::delete().to(cart_handlers::clear_cart_handler)),
          )
          .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
          .service(
            web::resource("/{cart_item_id}")
              .route(web::put().to(cart_handlers::update_cart_item_handler))
              .route(web::delete().to(cart_handlers::remove_from_cart_handler)),
          ),
      )
      .service(
        web::scope("/orders")
          .service(
            web::resource("")
              .route(web::post().to(order_handlers::create_order_handler))
              .route(web::get().to(order_handlers::get_all_orders_handler)),
          )
          // Registered before `{order_id}` so it is not captured as an id.
          .route("/my-orders", web::get().to(order_handlers::get_user_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
          .route("/{order_id}/status", web::put().to(order_handlers::update_order_status_handler)),
      ),
  );
}
