use crate::error::FilterError;
use crate::spec::{constraint, DateRange, Field, FilterSpec};
use core_types::{FilteredView, OrderRecord};
use std::collections::BTreeSet;

/// A sequence of successive narrowing steps over a set of records.
///
/// Every step filters the output of the previous one. The choices offered for
/// a field are always read from the current stage, so picking a category
/// first restricts the country options to countries that bought in that
/// category, and picking a country first does the same the other way round.
///
/// ```ignore
/// let mut pipeline = FilterPipeline::new(store.records()).with_date_range(Some(&range))?;
/// let categories = pipeline.options(Field::Category);
/// pipeline = pipeline.with_choice(Field::Category, Some("Books"));
/// let countries = pipeline.options(Field::Country); // only countries with Books orders
/// ```
#[derive(Debug, Clone)]
pub struct FilterPipeline<'a> {
    view: FilteredView<'a>,
}

impl<'a> FilterPipeline<'a> {
    pub fn new(records: impl IntoIterator<Item = &'a OrderRecord>) -> Self {
        Self {
            view: records.into_iter().collect(),
        }
    }

    /// Keeps the records whose `order_date` lies inside `range`.
    pub fn with_date_range(self, range: Option<&DateRange>) -> Result<Self, FilterError> {
        let Some(range) = range else {
            return Ok(self);
        };
        range.validate()?;
        Ok(self.retain(|record| range.contains(record.order_date)))
    }

    /// Keeps the records whose `field` equals `choice` exactly. `None` and
    /// `"All"` keep everything.
    pub fn with_choice(self, field: Field, choice: Option<&str>) -> Self {
        match constraint(choice) {
            Some(choice) => self.retain(|record| field.value_of(record) == choice),
            None => self,
        }
    }

    /// The distinct values of `field` present at this stage, sorted ascending.
    pub fn options(&self, field: Field) -> Vec<String> {
        self.view
            .iter()
            .map(|record| field.value_of(record))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn view(&self) -> &FilteredView<'a> {
        &self.view
    }

    pub fn finish(self) -> FilteredView<'a> {
        self.view
    }

    fn retain(self, keep: impl Fn(&OrderRecord) -> bool) -> Self {
        Self {
            view: self.view.iter().filter(|record| keep(*record)).collect(),
        }
    }
}

/// Applies every constraint in `spec` to `records`.
///
/// Steps run in the order the dashboard presents them: date range, then
/// category, then country. `records` may be a store's slice or an earlier
/// `FilteredView`. A malformed date range fails before any record is read.
pub fn apply<'a>(
    records: impl IntoIterator<Item = &'a OrderRecord>,
    spec: &FilterSpec,
) -> Result<FilteredView<'a>, FilterError> {
    spec.validate()?;

    let view = FilterPipeline::new(records)
        .with_date_range(spec.date_range.as_ref())?
        .with_choice(Field::Category, spec.choice(Field::Category))
        .with_choice(Field::Country, spec.choice(Field::Country))
        .finish();

    tracing::debug!(filter = %spec, matched = view.len(), "Applied order filter.");
    Ok(view)
}
