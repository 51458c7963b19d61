use stockroom_store::models::{Item, LineItem};
use stockroom_store::schema::seed_items;
use surrealdb::Connection;
use tracing::{info, warn};

use crate::control::{InventoryControlPlane, InventoryError};
use crate::store::StockBatch;

impl<C: Connection> InventoryControlPlane<C> {
    /// Applies the item schema and, when `seed` is set, fills an empty store
    /// with the default catalog.
    ///
    /// Returns the number of seeded items.
    ///
    /// # Errors
    /// Returns `InventoryError::Store` if the schema or seed write fails.
    pub async fn initialize(&self, seed: bool) -> Result<usize, InventoryError> {
        self.store.apply_schema().await?;
        if !seed {
            return Ok(0);
        }
        let seeded = self.store.seed_if_empty(seed_items()).await?;
        if seeded > 0 {
            info!(items = seeded, "seeded empty item store");
        }
        Ok(seeded)
    }

    /// Returns every item ordered by id.
    ///
    /// # Errors
    /// Returns `InventoryError::Store` if the read fails.
    pub async fn list_items(&self) -> Result<Vec<Item>, InventoryError> {
        Ok(self.store.list_items().await?)
    }

    /// Decrements stock for every line, all or nothing.
    ///
    /// # Errors
    /// Returns `InvalidRequest` for a non-positive quantity, `InsufficientStock`
    /// when an item is missing or short, or `Store` on database failure.
    pub async fn buy_items(&self, lines: Vec<LineItem>) -> Result<(), InventoryError> {
        let mut batch = self.store.begin_buy();
        batch.stage_all(lines);
        commit_logged(batch).await
    }

    /// Increments stock for every line, all or nothing.
    ///
    /// # Errors
    /// Returns `InvalidRequest` for a non-positive quantity, `NotFound` for an
    /// unknown item, `CapacityExceeded` when a line would pass `max_stock`, or
    /// `Store` on database failure.
    pub async fn restock_items(&self, lines: Vec<LineItem>) -> Result<(), InventoryError> {
        let mut batch = self.store.begin_restock();
        batch.stage_all(lines);
        commit_logged(batch).await
    }
}

async fn commit_logged<C: Connection>(batch: StockBatch<C>) -> Result<(), InventoryError> {
    let kind = batch.kind();
    let lines = batch.len();
    match batch.commit().await {
        Ok(()) => {
            info!(kind = kind.as_str(), lines, "stock batch committed");
            Ok(())
        }
        Err(err) => {
            let err = InventoryError::from(err);
            warn!(kind = kind.as_str(), lines, error = %err, "stock batch rolled back");
            Err(err)
        }
    }
}
