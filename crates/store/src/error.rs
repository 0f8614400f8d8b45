use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("The order dataset contains no rows")]
    EmptyDataset,

    #[error("Failed to parse the order dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid order record at data row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: core_types::CoreError,
    },

    #[error("Failed to read the order dataset: {0}")]
    Io(#[from] std::io::Error),
}
