use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),

    #[error("Dataset error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Filter error: {0}")]
    Filter(#[from] filter::FilterError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),
}
