use std::{error::Error, fmt, sync::Arc};

use stockroom_store::models::Item;
use stockroom_store::schema::{ITEM_SCHEMA, TABLE_ITEM};
use surrealdb::{Connection, Surreal};

use crate::store::batch::{BatchKind, StockBatch};

#[derive(Debug)]
pub enum StoreError {
    Surreal(Box<surrealdb::Error>),
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surreal(err) => write!(f, "SurrealDB error: {err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Surreal(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

const LIST_ITEMS_QUERY: &str = "SELECT record::id(id) AS id, name, price, quantity, max_stock FROM item ORDER BY id ASC;";
const GET_ITEM_QUERY: &str = "SELECT record::id(id) AS id, name, price, quantity, max_stock FROM type::thing($table, $id);";
const ANY_ITEM_QUERY: &str = "SELECT VALUE record::id(id) FROM item LIMIT 1;";
const SEED_QUERY: &str = r"
BEGIN TRANSACTION;
INSERT INTO item $items;
COMMIT TRANSACTION;
";

/// Item store over a shared `SurrealDB` handle.
pub struct SurrealItemStore<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> Clone for SurrealItemStore<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealItemStore<C> {
    #[must_use]
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db: Arc::new(db),
        }
    }

    /// Defines the item table, its fields and the unique name index.
    ///
    /// # Errors
    /// Returns `StoreError` if any definition statement fails.
    pub async fn apply_schema(&self) -> StoreResult<()> {
        self.db.query(ITEM_SCHEMA).await?.check()?;
        Ok(())
    }

    /// Inserts `items` in a single transaction when the table is empty.
    ///
    /// Returns the number of inserted items; an already populated table is
    /// left as is and yields zero.
    ///
    /// # Errors
    /// Returns `StoreError` if an item is out of bounds or the database write fails.
    pub async fn seed_if_empty(&self, items: Vec<Item>) -> StoreResult<usize> {
        let mut response = self.db.query(ANY_ITEM_QUERY).await?;
        let existing: Vec<i64> = response.take(0)?;
        if !existing.is_empty() || items.is_empty() {
            return Ok(0);
        }
        for item in &items {
            ensure_within_capacity(item)?;
        }
        let count = items.len();
        self.db
            .query(SEED_QUERY)
            .bind(("items", items))
            .await?
            .check()?;
        Ok(count)
    }

    /// Lists every item ordered by id.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn list_items(&self) -> StoreResult<Vec<Item>> {
        let mut response = self.db.query(LIST_ITEMS_QUERY).await?;
        let records: Vec<Item> = response.take(0)?;
        Ok(records)
    }

    /// Fetches a single item by id.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn get_item(&self, id: i64) -> StoreResult<Option<Item>> {
        let mut response = self
            .db
            .query(GET_ITEM_QUERY)
            .bind(("table", TABLE_ITEM))
            .bind(("id", id))
            .await?;
        let mut records: Vec<Item> = response.take(0)?;
        Ok(records.pop())
    }

    /// Starts a buy batch. Nothing is written until the batch is committed.
    #[must_use]
    pub fn begin_buy(&self) -> StockBatch<C> {
        StockBatch::new(self.db.clone(), BatchKind::Buy)
    }

    /// Starts a restock batch. Nothing is written until the batch is committed.
    #[must_use]
    pub fn begin_restock(&self) -> StockBatch<C> {
        StockBatch::new(self.db.clone(), BatchKind::Restock)
    }
}

fn ensure_within_capacity(item: &Item) -> StoreResult<()> {
    if item.name.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!(
            "item {} requires a name",
            item.id
        )));
    }
    if item.quantity < 0 || item.headroom() < 0 {
        return Err(StoreError::InvalidInput(format!(
            "item {} quantity {} is outside 0..={}",
            item.id, item.quantity, item.max_stock
        )));
    }
    Ok(())
}
