// src/services/mod.rs

//! Business operations behind the HTTP handlers: credential handling,
//! session tokens, and the multi-statement cart/order flows.

pub mod auth_service;
pub mod cart_service;
pub mod order_service;
pub mod token_service;
