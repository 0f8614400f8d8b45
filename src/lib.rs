//! # Sales Lens
//!
//! Filtering and aggregation engine behind an e-commerce sales dashboard.
//!
//! A `SalesLens` owns the loaded order dataset and the dashboard settings. For
//! every user interaction the presentation layer hands it a `FilterSpec` and
//! gets back plain data: the KPIs and breakdowns to draw, or a CSV artifact to
//! offer for download. Rendering is not this crate's concern.
//!
//! ```ignore
//! let config = configuration::load_config()?;
//! let _guard = configuration::init_tracing(&config.logging)?;
//! let lens = SalesLens::open(&config)?;
//!
//! let spec = FilterSpec::new().with_category("Electronics");
//! let snapshot = lens.dashboard(&spec)?;
//! let download = lens.export(&spec)?;
//! ```

pub mod error;

pub use analytics::{AnalyticsEngine, DashboardSnapshot, Metrics};
pub use configuration::Config;
pub use core_types::{FilteredView, OrderRecord};
pub use error::LensError;
pub use export::ExportArtifact;
pub use filter::{DateRange, Field, FilterPipeline, FilterSpec};
pub use store::RecordStore;

/// One loaded dataset plus the settings used to analyze it.
///
/// Cloning is cheap and clones share the same records, so a server can hand a
/// clone to every session.
#[derive(Debug, Clone)]
pub struct SalesLens {
    store: RecordStore,
    engine: AnalyticsEngine,
    export_file_name: String,
}

impl SalesLens {
    pub fn new(store: RecordStore, config: &Config) -> Result<Self, LensError> {
        config.validate()?;
        Ok(Self {
            store,
            engine: AnalyticsEngine::with_top_n(config.dashboard.top_n)?,
            export_file_name: config.export.file_name.clone(),
        })
    }

    /// Loads the dataset named in `config` and builds a lens over it.
    pub fn open(config: &Config) -> Result<Self, LensError> {
        let store = RecordStore::from_path(&config.dataset.path)?;
        Self::new(store, config)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The full span of the dataset, the default date-picker selection.
    pub fn default_date_range(&self) -> DateRange {
        let (first, last) = self.store.date_bounds();
        DateRange::new(Some(first), Some(last)).unwrap_or_default()
    }

    /// Starts a progressive filter over the dataset, narrowed to `range`.
    ///
    /// Read the options for the next widget from the returned pipeline before
    /// applying its choice.
    pub fn pipeline(&self, range: Option<&DateRange>) -> Result<FilterPipeline<'_>, LensError> {
        Ok(FilterPipeline::new(self.store.records()).with_date_range(range)?)
    }

    pub fn filter(&self, spec: &FilterSpec) -> Result<FilteredView<'_>, LensError> {
        Ok(filter::apply(self.store.records(), spec)?)
    }

    /// Everything the dashboard draws for `spec`.
    pub fn dashboard(&self, spec: &FilterSpec) -> Result<DashboardSnapshot, LensError> {
        let view = self.filter(spec)?;
        tracing::info!(filter = %spec, rows = view.len(), "Building dashboard.");
        Ok(self.engine.snapshot(&view)?)
    }

    /// The download artifact for the rows matching `spec`.
    pub fn export(&self, spec: &FilterSpec) -> Result<ExportArtifact, LensError> {
        let view = self.filter(spec)?;
        Ok(export::export(&view, &self.export_file_name)?)
    }
}
