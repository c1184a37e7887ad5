// src/models/mod.rs

//! Contains data structures representing database entities and the
//! joined read models served by the listing endpoints.

pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

// Re-export the model structs for convenient access
pub use cart_item::{CartItem, CartItemDetail};
pub use category::Category;
pub use order::{Order, OrderStatus, OrderSummary};
pub use order_item::{OrderItem, OrderItemDetail};
pub use product::Product;
pub use user::{Role, User};
