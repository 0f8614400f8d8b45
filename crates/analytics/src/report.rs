use crate::error::AnalyticsError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The headline KPIs of a set of orders.
///
/// This struct is the output of `summarize` and is handed to the presentation
/// layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_revenue: Decimal,
    pub order_count: usize,
    pub avg_order_value: Option<Decimal>, // None when there are no orders to average
    pub unique_customer_count: usize,
}

impl Metrics {
    /// Creates the metrics of an empty view.
    pub fn new() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            order_count: 0,
            avg_order_value: None,
            unique_customer_count: 0,
        }
    }

    /// The average order value, or `UndefinedMetric` for an empty view.
    pub fn require_avg_order_value(&self) -> Result<Decimal, AnalyticsError> {
        self.avg_order_value
            .ok_or_else(|| AnalyticsError::UndefinedMetric("avg_order_value".to_string()))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
