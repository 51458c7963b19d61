//! Core services for stockroom.
//!
//! This crate owns the `SurrealDB` backed item store, the stock batch unit of
//! work that applies buy/restock line items atomically, and the control plane
//! the HTTP layer calls into.

pub mod control;
pub mod store;
