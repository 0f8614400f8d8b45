use crate::aggregation::{group_by, AggregateRow, GroupBy};
use crate::breakdowns::{self, DashboardSnapshot};
use crate::error::AnalyticsError;
use crate::report::Metrics;
use core_types::OrderRecord;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// How many products the top-products breakdown keeps unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 10;

/// Computes the headline KPIs over `rows`.
///
/// `avg_order_value` is `None` for an empty slice rather than a division by zero.
pub fn summarize(rows: &[&OrderRecord]) -> Metrics {
    if rows.is_empty() {
        return Metrics::new();
    }

    let total_revenue: Decimal = rows.iter().map(|record| record.total_price).sum();
    let order_count = rows.len();
    let unique_customer_count = rows
        .iter()
        .map(|record| record.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    Metrics {
        total_revenue,
        order_count,
        avg_order_value: Some(total_revenue / Decimal::from(order_count)),
        unique_customer_count,
    }
}

/// A stateless calculator for the dashboard's KPIs and breakdowns.
///
/// The only setting it carries is how many rows the top-products ranking keeps.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    top_n: usize,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose top-products breakdown keeps `top_n` rows.
    pub fn with_top_n(top_n: usize) -> Result<Self, AnalyticsError> {
        if top_n == 0 {
            return Err(AnalyticsError::InvalidGrouping(
                "top-N limit must be at least 1".to_string(),
            ));
        }
        Ok(Self { top_n })
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn summarize(&self, rows: &[&OrderRecord]) -> Metrics {
        summarize(rows)
    }

    pub fn group_by(
        &self,
        rows: &[&OrderRecord],
        request: &GroupBy,
    ) -> Result<Vec<AggregateRow>, AnalyticsError> {
        group_by(rows, request)
    }

    /// The ranked product table, truncated to this engine's `top_n`.
    pub fn top_products(&self, rows: &[&OrderRecord]) -> Result<Vec<AggregateRow>, AnalyticsError> {
        breakdowns::top_products(rows, self.top_n)
    }

    /// Computes every KPI and breakdown the dashboard shows for `rows`.
    #[tracing::instrument(name = "dashboard_snapshot", skip_all, fields(rows = rows.len()))]
    pub fn snapshot(&self, rows: &[&OrderRecord]) -> Result<DashboardSnapshot, AnalyticsError> {
        let snapshot = DashboardSnapshot {
            metrics: summarize(rows),
            monthly_revenue: breakdowns::monthly_revenue(rows)?,
            category_performance: breakdowns::category_performance(rows)?,
            traffic_sources: breakdowns::traffic_source_share(rows)?,
            top_products: self.top_products(rows)?,
            countries: breakdowns::country_rollup(rows)?,
        };

        tracing::debug!(
            revenue = %snapshot.metrics.total_revenue,
            months = snapshot.monthly_revenue.len(),
            categories = snapshot.category_performance.len(),
            countries = snapshot.countries.len(),
            "Computed dashboard snapshot."
        );
        Ok(snapshot)
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn order(id: &str, customer: &str, price: Decimal) -> OrderRecord {
        OrderRecord {
            order_id: id.to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            customer_id: customer.to_string(),
            customer_country: "US".to_string(),
            product_name: "Widget".to_string(),
            product_category: "Tools".to_string(),
            traffic_source: "Search".to_string(),
            total_price: price,
        }
    }

    #[test]
    fn empty_view_summary() {
        let metrics = summarize(&[]);
        assert_eq!(metrics.total_revenue, Decimal::ZERO);
        assert_eq!(metrics.order_count, 0);
        assert_eq!(metrics.avg_order_value, None);
        assert_eq!(metrics.unique_customer_count, 0);
        assert_eq!(
            metrics.require_avg_order_value(),
            Err(AnalyticsError::UndefinedMetric("avg_order_value".to_string()))
        );
    }

    #[test]
    fn summary_over_orders() {
        let records = [
            order("1", "alice", dec!(100)),
            order("2", "bob", dec!(20)),
            order("3", "alice", dec!(50.25)),
        ];
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let metrics = summarize(&rows);

        assert_eq!(metrics.total_revenue, dec!(170.25));
        assert_eq!(metrics.order_count, 3);
        assert_eq!(metrics.avg_order_value, Some(dec!(56.75)));
        assert_eq!(metrics.unique_customer_count, 2);
        assert_eq!(metrics.require_avg_order_value(), Ok(dec!(56.75)));
    }

    #[test]
    fn zero_priced_orders_still_count() {
        let records = [order("1", "alice", dec!(0))];
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let metrics = summarize(&rows);
        assert_eq!(metrics.order_count, 1);
        assert_eq!(metrics.avg_order_value, Some(Decimal::ZERO));
    }

    #[test]
    fn top_n_must_be_positive() {
        assert_eq!(AnalyticsEngine::new().top_n(), DEFAULT_TOP_N);
        assert_eq!(AnalyticsEngine::with_top_n(3).unwrap().top_n(), 3);
        assert!(matches!(
            AnalyticsEngine::with_top_n(0),
            Err(AnalyticsError::InvalidGrouping(_))
        ));
    }

    #[test]
    fn snapshot_of_an_empty_view_is_empty() {
        let snapshot = AnalyticsEngine::new().snapshot(&[]).unwrap();
        assert_eq!(snapshot.metrics, Metrics::new());
        assert!(snapshot.monthly_revenue.is_empty());
        assert!(snapshot.category_performance.is_empty());
        assert!(snapshot.traffic_sources.is_empty());
        assert!(snapshot.top_products.is_empty());
        assert!(snapshot.countries.is_empty());
    }
}
