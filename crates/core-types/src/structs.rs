use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One row of the historical order dataset.
///
/// Field order here is the column order of exported CSV files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    #[serde(
        deserialize_with = "crate::dates::deserialize_order_date",
        serialize_with = "crate::dates::serialize_order_date"
    )]
    pub order_date: NaiveDate,
    pub customer_id: String,
    pub customer_country: String,
    pub product_name: String,
    pub product_category: String,
    pub traffic_source: String,
    // Written and read as the exact decimal string so exports never lose precision.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

impl OrderRecord {
    /// Column names, in serialization order.
    pub const COLUMNS: [&'static str; 8] = [
        "order_id",
        "order_date",
        "customer_id",
        "customer_country",
        "product_name",
        "product_category",
        "traffic_source",
        "total_price",
    ];

    /// Checks the invariants every loaded record must satisfy.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.total_price < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "total_price".to_string(),
                format!("order {} has negative price {}", self.order_id, self.total_price),
            ));
        }
        Ok(())
    }

    /// The calendar month this order falls into.
    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.order_date)
    }
}

/// A calendar month, used as the time bucket for trend breakdowns.
///
/// Ordering is chronological: the derived `Ord` compares `year` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidInput(
                "month".to_string(),
                format!("{month} is not in 1..=12"),
            ));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number, `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The first calendar day of the bucket.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
