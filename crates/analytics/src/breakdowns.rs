//! The fixed set of breakdowns the sales dashboard renders.

use crate::aggregation::{group_by, Aggregate, AggregateRow, Dimension, GroupBy};
use crate::error::AnalyticsError;
use crate::report::Metrics;
use core_types::OrderRecord;
use rust_decimal::Decimal;
use serde::Serialize;

/// One traffic source's revenue and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficShare {
    pub source: String,
    pub revenue: Decimal,
    pub share_pct: Option<Decimal>, // None when total revenue is zero
}

/// Everything the dashboard shows for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub metrics: Metrics,
    pub monthly_revenue: Vec<AggregateRow>,
    pub category_performance: Vec<AggregateRow>,
    pub traffic_sources: Vec<TrafficShare>,
    pub top_products: Vec<AggregateRow>,
    pub countries: Vec<AggregateRow>,
}

/// Revenue per calendar month, oldest first.
pub fn monthly_revenue(rows: &[&OrderRecord]) -> Result<Vec<AggregateRow>, AnalyticsError> {
    group_by(rows, &GroupBy::new(Dimension::Month).aggregate(Aggregate::Revenue))
}

/// Revenue and order count per product category.
pub fn category_performance(rows: &[&OrderRecord]) -> Result<Vec<AggregateRow>, AnalyticsError> {
    let request = GroupBy::new(Dimension::Category)
        .aggregate(Aggregate::Revenue)
        .aggregate(Aggregate::OrderCount);
    group_by(rows, &request)
}

/// Revenue per traffic source with its percentage of total revenue, rounded to 2 dp.
pub fn traffic_source_share(rows: &[&OrderRecord]) -> Result<Vec<TrafficShare>, AnalyticsError> {
    let grouped = group_by(
        rows,
        &GroupBy::new(Dimension::TrafficSource).aggregate(Aggregate::Revenue),
    )?;
    let total: Decimal = grouped.iter().filter_map(|row| row.revenue).sum();

    Ok(grouped
        .into_iter()
        .map(|row| {
            let revenue = row.revenue.unwrap_or_default();
            let share_pct = (!total.is_zero())
                .then(|| (revenue / total * Decimal::ONE_HUNDRED).round_dp(2));
            TrafficShare {
                source: row.key.to_string(),
                revenue,
                share_pct,
            }
        })
        .collect())
}

/// The `limit` products with the highest revenue.
pub fn top_products(rows: &[&OrderRecord], limit: usize) -> Result<Vec<AggregateRow>, AnalyticsError> {
    let request = GroupBy::new(Dimension::Product)
        .aggregate(Aggregate::Revenue)
        .top(Aggregate::Revenue, limit);
    group_by(rows, &request)
}

/// Revenue, distinct customers and order count per customer country.
pub fn country_rollup(rows: &[&OrderRecord]) -> Result<Vec<AggregateRow>, AnalyticsError> {
    let request = GroupBy::new(Dimension::Country)
        .aggregate(Aggregate::Revenue)
        .aggregate(Aggregate::UniqueCustomers)
        .aggregate(Aggregate::OrderCount);
    group_by(rows, &request)
}
