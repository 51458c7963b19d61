//! Stock batches: the unit of work behind buy and restock.
//!
//! A [`StockBatch`] stages line items and applies them with one transactional
//! query on [`StockBatch::commit`]. Every line is guarded inside the
//! transaction, so the first failing guard cancels the whole batch. Dropping a
//! batch without committing discards the staged lines.

use std::{collections::BTreeMap, error::Error, fmt, sync::Arc};

use stockroom_store::models::LineItem;
use surrealdb::{Connection, Surreal};
use tracing::debug;

use crate::store::surreal::StoreError;

const VIOLATION_MARKER: &str = "stockroom::";

const BUY_SCRIPT: &str = r#"
BEGIN TRANSACTION;
FOR $line IN $lines {
    IF $line.quantity <= 0 {
        THROW string::concat("stockroom::invalid_request::", $line.id);
    };
    LET $current = (SELECT VALUE quantity FROM type::thing("item", $line.id))[0];
    IF $current = NONE OR $current < $line.quantity {
        THROW string::concat("stockroom::insufficient_stock::", $line.id);
    };
    UPDATE type::thing("item", $line.id) SET quantity -= $line.quantity;
};
COMMIT TRANSACTION;
"#;

const RESTOCK_SCRIPT: &str = r#"
BEGIN TRANSACTION;
FOR $line IN $lines {
    IF $line.quantity <= 0 {
        THROW string::concat("stockroom::invalid_request::", $line.id);
    };
    LET $current = (SELECT quantity, max_stock FROM type::thing("item", $line.id))[0];
    IF $current = NONE {
        THROW string::concat("stockroom::not_found::", $line.id);
    };
    IF $line.quantity > $current.max_stock - $current.quantity {
        THROW string::concat("stockroom::capacity_exceeded::", $line.id);
    };
    UPDATE type::thing("item", $line.id) SET quantity += $line.quantity;
};
COMMIT TRANSACTION;
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Buy,
    Restock,
}

impl BatchKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Restock => "restock",
        }
    }

    const fn script(self) -> &'static str {
        match self {
            Self::Buy => BUY_SCRIPT,
            Self::Restock => RESTOCK_SCRIPT,
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guard that failed inside a batch transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockViolation {
    InvalidQuantity { item_id: i64 },
    InsufficientStock { item_id: i64 },
    NotFound { item_id: i64 },
    CapacityExceeded { item_id: i64 },
}

impl StockViolation {
    #[must_use]
    pub const fn item_id(self) -> i64 {
        match self {
            Self::InvalidQuantity { item_id }
            | Self::InsufficientStock { item_id }
            | Self::NotFound { item_id }
            | Self::CapacityExceeded { item_id } => item_id,
        }
    }

    /// Decodes a guard failure raised by a batch script.
    ///
    /// The database wraps thrown values in its own error text, so the marker
    /// is searched for rather than matched exactly.
    #[must_use]
    pub fn from_message(message: &str) -> Option<Self> {
        let start = message.find(VIOLATION_MARKER)? + VIOLATION_MARKER.len();
        let (kind, tail) = message[start..].split_once("::")?;
        let digits: String = tail
            .chars()
            .enumerate()
            .take_while(|(index, ch)| ch.is_ascii_digit() || (*index == 0 && *ch == '-'))
            .map(|(_, ch)| ch)
            .collect();
        let item_id = digits.parse().ok()?;
        match kind {
            "invalid_request" => Some(Self::InvalidQuantity { item_id }),
            "insufficient_stock" => Some(Self::InsufficientStock { item_id }),
            "not_found" => Some(Self::NotFound { item_id }),
            "capacity_exceeded" => Some(Self::CapacityExceeded { item_id }),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum BatchError {
    Violation(StockViolation),
    Store(StoreError),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Violation(violation) => write!(f, "stock guard failed: {violation:?}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BatchError {}

impl From<StoreError> for BatchError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<surrealdb::Error> for BatchError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Store(StoreError::from(err))
    }
}

/// Unit of work for one buy or restock batch.
#[must_use = "a stock batch is discarded unless committed"]
pub struct StockBatch<C: Connection> {
    db: Arc<Surreal<C>>,
    kind: BatchKind,
    lines: Vec<LineItem>,
}

impl<C: Connection> StockBatch<C> {
    pub(crate) const fn new(db: Arc<Surreal<C>>, kind: BatchKind) -> Self {
        Self {
            db,
            kind,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BatchKind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Stages a line. Lines are checked in staging order on commit.
    pub fn stage(&mut self, line: LineItem) {
        self.lines.push(line);
    }

    pub fn stage_all(&mut self, lines: impl IntoIterator<Item = LineItem>) {
        self.lines.extend(lines);
    }

    /// Applies every staged line in one transaction.
    ///
    /// # Errors
    /// Returns `BatchError::Violation` for the first line whose guard fails
    /// (nothing from the batch is persisted), or `BatchError::Store` when the
    /// query itself fails.
    pub async fn commit(mut self) -> Result<(), BatchError> {
        let lines = std::mem::take(&mut self.lines);
        if lines.is_empty() {
            return Ok(());
        }
        let mut response = self
            .db
            .query(self.kind.script())
            .bind(("lines", lines))
            .await?;

        let errors: BTreeMap<usize, surrealdb::Error> = response.take_errors().into_iter().collect();
        if let Some(violation) = errors
            .values()
            .find_map(|err| StockViolation::from_message(&err.to_string()))
        {
            return Err(BatchError::Violation(violation));
        }
        if let Some((_, err)) = errors.into_iter().next() {
            return Err(BatchError::from(err));
        }
        Ok(())
    }
}

impl<C: Connection> Drop for StockBatch<C> {
    fn drop(&mut self) {
        if !self.lines.is_empty() {
            debug!(
                kind = self.kind.as_str(),
                lines = self.lines.len(),
                "discarding uncommitted stock batch"
            );
        }
    }
}
