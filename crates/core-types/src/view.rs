use crate::structs::OrderRecord;
use std::ops::Deref;

/// The subsequence of a record store that satisfies a filter.
///
/// A view borrows its rows from the store it was cut from and keeps their
/// original order. It derefs to a slice so downstream calculators can take
/// `&[&OrderRecord]` and accept both views and ad-hoc row sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView<'a> {
    rows: Vec<&'a OrderRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn new(rows: Vec<&'a OrderRecord>) -> Self {
        Self { rows }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OrderRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Clones the borrowed rows into an owned collection.
    pub fn to_records(&self) -> Vec<OrderRecord> {
        self.rows.iter().map(|record| (*record).clone()).collect()
    }
}

impl<'a> Deref for FilteredView<'a> {
    type Target = [&'a OrderRecord];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

impl<'a> FromIterator<&'a OrderRecord> for FilteredView<'a> {
    fn from_iter<I: IntoIterator<Item = &'a OrderRecord>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'v, 'a> IntoIterator for &'v FilteredView<'a> {
    type Item = &'a OrderRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a OrderRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter().copied()
    }
}
