//! Grouping of orders into per-key aggregates.
//!
//! Groups are collected in a `BTreeMap` keyed by a borrowed view of the group
//! key, so output comes out in key order for free. For `Dimension::Month` that
//! order is chronological, which is what a trend line needs.

use crate::error::AnalyticsError;
use core_types::{OrderRecord, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// The record attribute(s) rows are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// `order_date` truncated to its calendar month.
    Month,
    Category,
    Country,
    TrafficSource,
    /// The composite `(product_name, product_category)`.
    Product,
}

/// A value computed per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Aggregate {
    /// Sum of `total_price`.
    Revenue,
    /// Number of rows.
    OrderCount,
    /// Number of distinct `customer_id`s.
    UniqueCustomers,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregate::Revenue => "revenue",
            Aggregate::OrderCount => "order_count",
            Aggregate::UniqueCustomers => "unique_customers",
        };
        f.write_str(name)
    }
}

/// Ranking and truncation of a grouping result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopN {
    pub by: Aggregate,
    pub limit: usize,
}

/// A grouping request: which dimension, which aggregates, and optional ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBy {
    pub dimension: Dimension,
    pub aggregates: Vec<Aggregate>,
    #[serde(default)]
    pub rank: Option<TopN>,
}

impl GroupBy {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            aggregates: Vec::new(),
            rank: None,
        }
    }

    /// Requests `aggregate` for every group. Requesting it twice is harmless.
    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        if !self.aggregates.contains(&aggregate) {
            self.aggregates.push(aggregate);
        }
        self
    }

    /// Keeps only the `limit` groups with the largest `by` value.
    pub fn top(mut self, by: Aggregate, limit: usize) -> Self {
        self.rank = Some(TopN { by, limit });
        self
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.aggregates.is_empty() {
            return Err(AnalyticsError::InvalidGrouping(
                "at least one aggregate must be requested".to_string(),
            ));
        }

        if let Some(rank) = &self.rank {
            if rank.limit == 0 {
                return Err(AnalyticsError::InvalidGrouping(
                    "top-N limit must be at least 1".to_string(),
                ));
            }
            if !self.aggregates.contains(&rank.by) {
                return Err(AnalyticsError::InvalidGrouping(format!(
                    "cannot rank by '{}' because it was not requested",
                    rank.by
                )));
            }
            if self.dimension == Dimension::Month {
                return Err(AnalyticsError::InvalidGrouping(
                    "monthly groupings are always chronological and cannot be ranked".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// The identity of one group.
///
/// Within one result every key has the same variant, so the derived ordering
/// is the natural one: chronological for months, lexicographic otherwise, and
/// name-then-category for products.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Month(YearMonth),
    Label(String),
    Product { name: String, category: String },
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Month(month) => write!(f, "{month}"),
            GroupKey::Label(label) => f.write_str(label),
            GroupKey::Product { name, category } => write!(f, "{name} ({category})"),
        }
    }
}

/// One group's key and the aggregates that were requested for it.
///
/// Aggregates that were not requested are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: GroupKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_customers: Option<usize>,
}

impl AggregateRow {
    /// The value of `aggregate` as a decimal, for ranking and comparisons.
    pub fn value(&self, aggregate: Aggregate) -> Option<Decimal> {
        match aggregate {
            Aggregate::Revenue => self.revenue,
            Aggregate::OrderCount => self.order_count.map(Decimal::from),
            Aggregate::UniqueCustomers => self.unique_customers.map(Decimal::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum KeyRef<'a> {
    Month(YearMonth),
    Label(&'a str),
    Product(&'a str, &'a str),
}

impl<'a> KeyRef<'a> {
    fn of(dimension: Dimension, record: &'a OrderRecord) -> Self {
        match dimension {
            Dimension::Month => KeyRef::Month(record.month()),
            Dimension::Category => KeyRef::Label(&record.product_category),
            Dimension::Country => KeyRef::Label(&record.customer_country),
            Dimension::TrafficSource => KeyRef::Label(&record.traffic_source),
            Dimension::Product => KeyRef::Product(&record.product_name, &record.product_category),
        }
    }

    fn to_key(self) -> GroupKey {
        match self {
            KeyRef::Month(month) => GroupKey::Month(month),
            KeyRef::Label(label) => GroupKey::Label(label.to_string()),
            KeyRef::Product(name, category) => GroupKey::Product {
                name: name.to_string(),
                category: category.to_string(),
            },
        }
    }
}

#[derive(Debug, Default)]
struct Accumulator<'a> {
    revenue: Decimal,
    orders: usize,
    customers: HashSet<&'a str>,
}

impl<'a> Accumulator<'a> {
    fn add(&mut self, record: &'a OrderRecord) {
        self.revenue += record.total_price;
        self.orders += 1;
        self.customers.insert(&record.customer_id);
    }

    fn into_row(self, key: GroupKey, aggregates: &[Aggregate]) -> AggregateRow {
        let wants = |aggregate| aggregates.contains(&aggregate);
        AggregateRow {
            key,
            revenue: wants(Aggregate::Revenue).then_some(self.revenue),
            order_count: wants(Aggregate::OrderCount).then_some(self.orders),
            unique_customers: wants(Aggregate::UniqueCustomers).then_some(self.customers.len()),
        }
    }
}

/// Groups `rows` as described by `request`.
///
/// Without ranking, rows come back in ascending key order (chronological for
/// `Dimension::Month`). With ranking, they are sorted by the ranking aggregate
/// descending, ties broken by key ascending, and truncated to the limit.
/// An empty `rows` yields an empty result; a malformed request is an error
/// even then.
pub fn group_by(
    rows: &[&OrderRecord],
    request: &GroupBy,
) -> Result<Vec<AggregateRow>, AnalyticsError> {
    request.validate()?;

    let mut groups: BTreeMap<KeyRef<'_>, Accumulator<'_>> = BTreeMap::new();
    for &record in rows {
        groups
            .entry(KeyRef::of(request.dimension, record))
            .or_default()
            .add(record);
    }

    let mut result: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(key, group)| group.into_row(key.to_key(), &request.aggregates))
        .collect();

    if let Some(rank) = request.rank {
        result.sort_by(|a, b| {
            b.value(rank.by)
                .cmp(&a.value(rank.by))
                .then_with(|| a.key.cmp(&b.key))
        });
        result.truncate(rank.limit);
    }

    tracing::trace!(
        dimension = ?request.dimension,
        groups = result.len(),
        "Grouped orders."
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::summarize;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn order(
        date: (i32, u32, u32),
        customer: &str,
        product: &str,
        category: &str,
        country: &str,
        source: &str,
        price: Decimal,
    ) -> OrderRecord {
        OrderRecord {
            order_id: format!("{customer}-{product}-{}", date.2),
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            customer_id: customer.to_string(),
            customer_country: country.to_string(),
            product_name: product.to_string(),
            product_category: category.to_string(),
            traffic_source: source.to_string(),
            total_price: price,
        }
    }

    fn scenario() -> Vec<OrderRecord> {
        vec![
            order((2024, 2, 1), "c3", "Phone", "Electronics", "DE", "Social", dec!(50)),
            order((2024, 1, 5), "c1", "Laptop", "Electronics", "US", "Search", dec!(100)),
            order((2024, 1, 20), "c2", "Novel", "Books", "US", "Email", dec!(20)),
        ]
    }

    fn label(text: &str) -> GroupKey {
        GroupKey::Label(text.to_string())
    }

    #[test]
    fn monthly_groups_are_chronological() {
        let records = scenario();
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let request = GroupBy::new(Dimension::Month).aggregate(Aggregate::Revenue);
        let result = group_by(&rows, &request).unwrap();

        let pairs: Vec<(String, Decimal)> = result
            .iter()
            .map(|row| (row.key.to_string(), row.revenue.unwrap()))
            .collect();
        assert_eq!(
            pairs,
            [("2024-01".to_string(), dec!(120)), ("2024-02".to_string(), dec!(50))]
        );
        assert_eq!(result[0].order_count, None);
    }

    #[test]
    fn months_order_across_years() {
        let records = vec![
            order((2024, 1, 3), "a", "X", "C", "US", "S", dec!(1)),
            order((2023, 12, 31), "a", "X", "C", "US", "S", dec!(2)),
            order((2023, 2, 1), "a", "X", "C", "US", "S", dec!(3)),
        ];
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let result = group_by(&rows, &GroupBy::new(Dimension::Month).aggregate(Aggregate::OrderCount)).unwrap();
        let months: Vec<String> = result.iter().map(|row| row.key.to_string()).collect();
        assert_eq!(months, ["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn equal_keys_merge_regardless_of_position() {
        let records = vec![
            order((2024, 1, 1), "a", "Mug", "Home", "US", "Email", dec!(5)),
            order((2024, 1, 2), "b", "Lamp", "Home", "FR", "Search", dec!(30)),
            order((2024, 1, 3), "a", "Pen", "Office", "US", "Email", dec!(2)),
            order((2024, 1, 4), "a", "Mug", "Home", "US", "Email", dec!(5)),
        ];
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let request = GroupBy::new(Dimension::Category)
            .aggregate(Aggregate::Revenue)
            .aggregate(Aggregate::OrderCount)
            .aggregate(Aggregate::UniqueCustomers);
        let result = group_by(&rows, &request).unwrap();

        assert_eq!(
            result,
            [
                AggregateRow {
                    key: label("Home"),
                    revenue: Some(dec!(40)),
                    order_count: Some(3),
                    unique_customers: Some(2),
                },
                AggregateRow {
                    key: label("Office"),
                    revenue: Some(dec!(2)),
                    order_count: Some(1),
                    unique_customers: Some(1),
                },
            ]
        );
    }

    #[test]
    fn products_group_by_name_and_category() {
        let records = vec![
            order((2024, 1, 1), "a", "Tote", "Bags", "US", "Email", dec!(15)),
            order((2024, 1, 2), "b", "Tote", "Gifts", "US", "Email", dec!(15)),
            order((2024, 1, 3), "c", "Tote", "Bags", "US", "Email", dec!(15)),
        ];
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let result = group_by(&rows, &GroupBy::new(Dimension::Product).aggregate(Aggregate::Revenue)).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(
            result[0].key,
            GroupKey::Product { name: "Tote".to_string(), category: "Bags".to_string() }
        );
        assert_eq!(result[0].revenue, Some(dec!(30)));
        assert_eq!(result[1].key.to_string(), "Tote (Gifts)");
    }

    #[test]
    fn top_n_ranks_descending_with_key_tie_break() {
        let records = vec![
            order((2024, 1, 1), "a", "Kite", "Toys", "US", "Email", dec!(10)),
            order((2024, 1, 1), "b", "Ball", "Toys", "US", "Email", dec!(10)),
            order((2024, 1, 1), "c", "Yoyo", "Toys", "US", "Email", dec!(25)),
            order((2024, 1, 1), "d", "Drum", "Toys", "US", "Email", dec!(5)),
        ];
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let request = GroupBy::new(Dimension::Product)
            .aggregate(Aggregate::Revenue)
            .top(Aggregate::Revenue, 3);
        let names: Vec<String> = group_by(&rows, &request)
            .unwrap()
            .into_iter()
            .map(|row| match row.key {
                GroupKey::Product { name, .. } => name,
                other => panic!("unexpected key {other:?}"),
            })
            .collect();
        assert_eq!(names, ["Yoyo", "Ball", "Kite"]);
    }

    #[test]
    fn limit_larger_than_group_count_keeps_everything() {
        let records = scenario();
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let request = GroupBy::new(Dimension::Country)
            .aggregate(Aggregate::OrderCount)
            .top(Aggregate::OrderCount, 10);
        let result = group_by(&rows, &request).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key, label("US"));
        assert_eq!(result[0].value(Aggregate::OrderCount), Some(dec!(2)));
    }

    #[test]
    fn empty_rows_give_empty_groups() {
        for dimension in [
            Dimension::Month,
            Dimension::Category,
            Dimension::Country,
            Dimension::TrafficSource,
            Dimension::Product,
        ] {
            let request = GroupBy::new(dimension).aggregate(Aggregate::Revenue);
            assert!(group_by(&[], &request).unwrap().is_empty());
        }
    }

    #[test]
    fn malformed_requests_fail_fast() {
        let invalid = [
            GroupBy::new(Dimension::Category),
            GroupBy::new(Dimension::Category)
                .aggregate(Aggregate::Revenue)
                .top(Aggregate::Revenue, 0),
            GroupBy::new(Dimension::Category)
                .aggregate(Aggregate::OrderCount)
                .top(Aggregate::Revenue, 5),
            GroupBy::new(Dimension::Month)
                .aggregate(Aggregate::Revenue)
                .top(Aggregate::Revenue, 5),
        ];
        for request in invalid {
            assert!(
                matches!(group_by(&[], &request), Err(AnalyticsError::InvalidGrouping(_))),
                "{request:?} should be rejected"
            );
        }
    }

    #[test]
    fn serializes_only_requested_aggregates() {
        let records = scenario();
        let rows: Vec<&OrderRecord> = records.iter().collect();
        let result = group_by(&rows, &GroupBy::new(Dimension::Month).aggregate(Aggregate::Revenue)).unwrap();
        let json = serde_json::to_value(&result[0]).unwrap();
        assert_eq!(json, serde_json::json!({ "key": "2024-01", "revenue": "120" }));
    }

    fn arb_records() -> impl Strategy<Value = Vec<OrderRecord>> {
        let categories = vec!["Books", "Electronics", "Garden", "Toys"];
        let customers = vec!["c1", "c2", "c3", "c4", "c5"];
        prop::collection::vec(
            (
                1u32..=12,
                1u32..=28,
                prop::sample::select(customers),
                prop::sample::select(categories),
                0u32..40,
                0i64..500_000,
            )
                .prop_map(|(month, day, customer, category, product, cents)| {
                    order(
                        (2024, month, day),
                        customer,
                        &format!("product-{product}"),
                        category,
                        "US",
                        "Search",
                        Decimal::new(cents, 2),
                    )
                }),
            0..80,
        )
    }

    proptest! {
        #[test]
        fn prop_category_revenue_adds_up_to_total(records in arb_records()) {
            let rows: Vec<&OrderRecord> = records.iter().collect();
            let request = GroupBy::new(Dimension::Category).aggregate(Aggregate::Revenue);
            let grouped: Decimal = group_by(&rows, &request)
                .unwrap()
                .iter()
                .filter_map(|row| row.revenue)
                .sum();
            prop_assert_eq!(grouped, summarize(&rows).total_revenue);
        }

        #[test]
        fn prop_each_group_matches_its_own_summary(records in arb_records()) {
            let rows: Vec<&OrderRecord> = records.iter().collect();
            let request = GroupBy::new(Dimension::Category)
                .aggregate(Aggregate::Revenue)
                .aggregate(Aggregate::OrderCount)
                .aggregate(Aggregate::UniqueCustomers);
            for row in group_by(&rows, &request).unwrap() {
                let members: Vec<&OrderRecord> = rows
                    .iter()
                    .copied()
                    .filter(|record| GroupKey::Label(record.product_category.clone()) == row.key)
                    .collect();
                let metrics = summarize(&members);
                prop_assert_eq!(row.revenue, Some(metrics.total_revenue));
                prop_assert_eq!(row.order_count, Some(metrics.order_count));
                prop_assert_eq!(row.unique_customers, Some(metrics.unique_customer_count));
            }
        }

        #[test]
        fn prop_top_ten_is_sorted_and_dominates_the_rest(records in arb_records()) {
            let rows: Vec<&OrderRecord> = records.iter().collect();
            let all = group_by(&rows, &GroupBy::new(Dimension::Product).aggregate(Aggregate::Revenue)).unwrap();
            let top = group_by(
                &rows,
                &GroupBy::new(Dimension::Product)
                    .aggregate(Aggregate::Revenue)
                    .top(Aggregate::Revenue, 10),
            )
            .unwrap();

            prop_assert_eq!(top.len(), all.len().min(10));
            prop_assert!(top.windows(2).all(|pair| pair[0].revenue >= pair[1].revenue));
            if let Some(tenth) = top.last().filter(|_| top.len() == 10) {
                for row in all.iter().filter(|row| !top.iter().any(|kept| kept.key == row.key)) {
                    prop_assert!(row.revenue <= tenth.revenue);
                }
            }
        }
    }
}
