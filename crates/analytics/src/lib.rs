//! # Sales Lens Analytics Engine
//!
//! This crate turns a filtered set of orders into the numbers a sales dashboard
//! shows: headline KPIs and grouped, chart-ready breakdowns.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** This crate has no knowledge of where records come from or
//!   where results go. It depends only on `core-types`.
//! - **Stateless calculation:** Every entry point takes the rows as a borrowed
//!   slice and returns fresh values. Nothing is cached between calls, so the
//!   same rows may be analyzed from any number of threads at once.
//! - **Empty is not an error:** A view with no rows produces zeroed metrics,
//!   an N/A average order value and empty breakdowns.
//!
//! ## Public API
//!
//! - `summarize`: revenue, order count, average order value, unique customers.
//! - `group_by` + `GroupBy`: grouping by month, category, country, traffic
//!   source or product, with optional top-N ranking.
//! - `AnalyticsEngine`: the dashboard breakdowns and `DashboardSnapshot`.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod aggregation;
pub mod breakdowns;
pub mod engine;
pub mod error;
pub mod report;

pub use aggregation::{group_by, Aggregate, AggregateRow, Dimension, GroupBy, GroupKey, TopN};
pub use breakdowns::{DashboardSnapshot, TrafficShare};
pub use engine::{summarize, AnalyticsEngine, DEFAULT_TOP_N};
pub use error::AnalyticsError;
pub use report::Metrics;
