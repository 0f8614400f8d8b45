use crate::error::StoreError;
use core_types::OrderRecord;
use std::io::Read;

/// Parses CSV order data into records.
///
/// Columns are matched by header name, so extra columns are ignored and column
/// order does not matter. Text cells are kept verbatim, timestamps are
/// truncated to their calendar day and prices are read as exact decimals. Unlike
/// `RecordStore::new`, an input with zero data rows is not an error here: this
/// is also the reader for exported (possibly header-only) files.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<OrderRecord>, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let record: OrderRecord = row?.deserialize(Some(&headers))?;
        record
            .validate()
            .map_err(|source| StoreError::InvalidRecord { row: index + 1, source })?;
        records.push(record);
    }

    tracing::debug!(rows = records.len(), "Parsed order records.");
    Ok(records)
}
