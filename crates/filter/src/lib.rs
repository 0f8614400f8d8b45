//! # Filter Evaluator
//!
//! Narrows a set of order records by date range, product category and customer
//! country. Filters are applied as a pipeline: each step runs over the output
//! of the previous one, and the choices offered for the next step are taken
//! from what is left. See [`FilterPipeline`].

pub mod error;
pub mod pipeline;
pub mod spec;

pub use error::FilterError;
pub use pipeline::{apply, FilterPipeline};
pub use spec::{choice_from_label, DateRange, Field, FilterSpec, ALL_LABEL};
