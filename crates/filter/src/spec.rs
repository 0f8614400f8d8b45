use crate::error::FilterError;
use chrono::NaiveDate;
use core_types::OrderRecord;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The label a selection widget shows for "no constraint".
pub const ALL_LABEL: &str = "All";

/// Maps a selection-widget label to a filter choice.
///
/// `"All"` becomes `None`; anything else is an exact-match constraint.
pub fn choice_from_label(label: &str) -> Option<String> {
    (label != ALL_LABEL).then(|| label.to_string())
}

/// `None` when `choice` is absent or is the "All" label.
pub(crate) fn constraint(choice: Option<&str>) -> Option<&str> {
    choice.filter(|choice| *choice != ALL_LABEL)
}

fn deserialize_choice<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(choice_from_label))
}

/// An inclusive range of calendar dates. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, FilterError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// A closed range `[start, end]`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        Self::new(Some(start), Some(end))
    }

    /// Interprets the dates returned by a date-range picker.
    ///
    /// No dates means no constraint. A picker that has only one date selected
    /// (the user picked a start but no end yet) is rejected instead of being
    /// guessed into a one-day or open-ended range.
    pub fn from_selection(selection: &[NaiveDate]) -> Result<Option<Self>, FilterError> {
        match selection {
            [] => Ok(None),
            [start, end] => Self::between(*start, *end).map(Some),
            _ => Err(FilterError::IncompleteDateRange {
                selected: selection.len(),
            }),
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }

    pub(crate) fn validate(&self) -> Result<(), FilterError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => {
                Err(FilterError::InvalidDateRange { start, end })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) => write!(f, "[{start}, ")?,
            None => write!(f, "(-inf, ")?,
        }
        match self.end {
            Some(end) => write!(f, "{end}]"),
            None => write!(f, "+inf)"),
        }
    }
}

/// A record field that can be constrained by exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Category,
    Country,
}

impl Field {
    pub fn value_of<'r>(&self, record: &'r OrderRecord) -> &'r str {
        match self {
            Field::Category => &record.product_category,
            Field::Country => &record.customer_country,
        }
    }
}

/// The set of constraints selected by a user for one interaction.
///
/// `None` on any field means the field is not constrained. A category or
/// country of `"All"` means the same, whether it arrives through serde, the
/// builders or a struct literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default, deserialize_with = "deserialize_choice")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_choice")]
    pub country: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category: String = category.into();
        self.category = (category != ALL_LABEL).then_some(category);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        let country: String = country.into();
        self.country = (country != ALL_LABEL).then_some(country);
        self
    }

    /// The exact-match choice for `field`, if any.
    pub fn choice(&self, field: Field) -> Option<&str> {
        let choice = match field {
            Field::Category => self.category.as_deref(),
            Field::Country => self.country.as_deref(),
        };
        constraint(choice)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        self.date_range.as_ref().map_or(Ok(()), DateRange::validate)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dates = self
            .date_range
            .map_or_else(|| ALL_LABEL.to_string(), |range| range.to_string());
        write!(
            f,
            "dates={} category={} country={}",
            dates,
            self.choice(Field::Category).unwrap_or(ALL_LABEL),
            self.choice(Field::Country).unwrap_or(ALL_LABEL)
        )
    }
}
