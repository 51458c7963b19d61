//! Storage models and schema helpers for stockroom.
//!
//! This crate defines the item and line-item records shared by the store,
//! the HTTP API, the client and the adapters.

pub mod models;
pub mod schema;

pub use models::*;
