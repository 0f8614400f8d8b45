use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Metric '{0}' is not applicable to an empty view")]
    UndefinedMetric(String),

    #[error("Invalid grouping request: {0}")]
    InvalidGrouping(String),
}
