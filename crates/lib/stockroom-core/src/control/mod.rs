use std::{error::Error, fmt};

use surrealdb::{Connection, Surreal};

use crate::store::{BatchError, StockViolation, StoreError, SurrealItemStore};

pub mod stock;

/// Failure of a list, buy or restock operation.
///
/// `Store` is the internal-error kind; every other variant is a rejected
/// batch that left the store untouched.
#[derive(Debug)]
pub enum InventoryError {
    InvalidRequest(String),
    InsufficientStock { item_id: i64 },
    CapacityExceeded { item_id: i64 },
    NotFound { item_id: i64 },
    Store(StoreError),
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(message) => f.write_str(message),
            Self::InsufficientStock { item_id } => write!(
                f,
                "Item not found or not enough stock for item with id {item_id}"
            ),
            Self::CapacityExceeded { item_id } => write!(
                f,
                "Restock quantity exceeds maximum stock for item with id {item_id}"
            ),
            Self::NotFound { item_id } => write!(f, "Item not found with id {item_id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InventoryError {}

impl From<StoreError> for InventoryError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<StockViolation> for InventoryError {
    fn from(violation: StockViolation) -> Self {
        match violation {
            StockViolation::InvalidQuantity { .. } => Self::InvalidRequest(
                "Quantity must be positive for all items".to_string(),
            ),
            StockViolation::InsufficientStock { item_id } => Self::InsufficientStock { item_id },
            StockViolation::NotFound { item_id } => Self::NotFound { item_id },
            StockViolation::CapacityExceeded { item_id } => Self::CapacityExceeded { item_id },
        }
    }
}

impl From<BatchError> for InventoryError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Violation(violation) => Self::from(violation),
            BatchError::Store(err) => Self::Store(err),
        }
    }
}

/// Service object behind the inventory endpoints. Owns the item store.
pub struct InventoryControlPlane<C: Connection> {
    store: SurrealItemStore<C>,
}

impl<C: Connection> Clone for InventoryControlPlane<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C: Connection> InventoryControlPlane<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            store: SurrealItemStore::new(db),
        }
    }

    pub const fn store(&self) -> &SurrealItemStore<C> {
        &self.store
    }
}
