//! # Record Store
//!
//! The immutable, loaded-once table of order records that every analytics call
//! reads from. A `RecordStore` is cheap to clone: clones share the same rows
//! through an `Arc`, so any number of concurrent sessions can filter the same
//! dataset without locking.
//!
//! Loading is the only I/O in the workspace and lives here, in `loader`.

pub mod error;
pub mod loader;

pub use error::StoreError;
pub use loader::read_records;

use chrono::NaiveDate;
use core_types::{CoreError, FilteredView, OrderRecord};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[OrderRecord]>,
    first_date: NaiveDate,
    last_date: NaiveDate,
}

impl RecordStore {
    /// Builds a store from already-parsed records.
    ///
    /// Fails with `StoreError::EmptyDataset` when `records` is empty and with
    /// `StoreError::InvalidRecord` when any record breaks its invariants.
    ///
    /// The grand total of all prices must fit in a `Decimal`. Prices are never
    /// negative, so every filtered or grouped sum then fits as well.
    pub fn new(records: Vec<OrderRecord>) -> Result<Self, StoreError> {
        let mut total = Decimal::ZERO;
        for (index, record) in records.iter().enumerate() {
            let row = index + 1;
            record
                .validate()
                .map_err(|source| StoreError::InvalidRecord { row, source })?;
            total = total.checked_add(record.total_price).ok_or_else(|| {
                StoreError::InvalidRecord {
                    row,
                    source: CoreError::InvalidInput(
                        "total_price".to_string(),
                        format!("order {} overflows the dataset revenue total", record.order_id),
                    ),
                }
            })?;
        }

        let mut dates = records.iter().map(|record| record.order_date);
        let Some(first) = dates.next() else {
            return Err(StoreError::EmptyDataset);
        };
        let (first_date, last_date) =
            dates.fold((first, first), |(lo, hi), date| (lo.min(date), hi.max(date)));

        Ok(Self {
            records: records.into(),
            first_date,
            last_date,
        })
    }

    /// Parses a CSV dataset and builds a store from it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        Self::new(read_records(reader)?)
    }

    /// Opens and parses a CSV dataset from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            rows = store.len(),
            first_date = %store.first_date,
            last_date = %store.last_date,
            "Loaded order dataset."
        );
        Ok(store)
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false` for a constructed store; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// An unfiltered view over every record, in load order.
    pub fn view(&self) -> FilteredView<'_> {
        self.records.iter().collect()
    }

    /// The earliest and latest order dates in the dataset.
    ///
    /// This is the default selection for a date-range picker.
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.first_date, self.last_date)
    }
}
