//! Store interfaces and `SurrealDB` implementation.
//!
//! The store layer handles the item table: schema, seed data, snapshot reads
//! and transactional stock batches.

pub mod batch;
pub mod surreal;

pub use batch::{BatchError, BatchKind, StockBatch, StockViolation};
pub use surreal::{StoreError, StoreResult, SurrealItemStore};
