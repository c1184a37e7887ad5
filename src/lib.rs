// src/lib.rs

//! Storefront API: a REST e-commerce backend over PostgreSQL.
//!
//! The library surface exists for the binary in `main.rs` and for the
//! integration tests; it is not a published API.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
