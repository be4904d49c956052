//! Extraction configuration.

use crate::corrections::NameCorrections;
use crate::error::{SeriesError, SeriesResult};
use eurochart_sheet::{CellValue, Sheet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive range of years accepted as year columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub first: i32,
    pub last: i32,
}

impl YearRange {
    /// Years covered by the dashboard's exports.
    pub const EUROSTAT: YearRange = YearRange {
        first: 2013,
        last: 2024,
    };

    pub fn new(first: i32, last: i32) -> SeriesResult<Self> {
        if first > last {
            return Err(SeriesError::InvalidYearRange { first, last });
        }
        Ok(Self { first, last })
    }

    #[must_use]
    pub fn single(year: i32) -> Self {
        Self {
            first: year,
            last: year,
        }
    }

    #[must_use]
    pub fn contains(&self, year: i64) -> bool {
        (i64::from(self.first)..=i64::from(self.last)).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::EUROSTAT
    }
}

/// How to find the header row that carries the year labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLocator {
    /// Row 0, as in the single-table page exports.
    #[default]
    FirstRow,
    /// A fixed row index.
    Row(usize),
    /// The first row with a text cell containing the marker (Eurostat's `TIME`).
    Containing(String),
}

impl HeaderLocator {
    /// Index of the header row, if the sheet has one.
    #[must_use]
    pub fn locate(&self, sheet: &Sheet) -> Option<usize> {
        match self {
            HeaderLocator::FirstRow => (!sheet.is_empty()).then_some(0),
            HeaderLocator::Row(index) => (*index < sheet.row_count()).then_some(*index),
            HeaderLocator::Containing(marker) => sheet.find_row_containing(marker),
        }
    }
}

/// Parameters shared by every chart's extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Accepted year columns.
    pub years: YearRange,
    /// Entity labels dropped by exact match (after trimming).
    pub exclude: BTreeSet<String>,
    /// Entity label prefixes dropped case-insensitively.
    pub exclude_prefixes: Vec<String>,
    /// Source spelling to canonical spelling.
    pub corrections: NameCorrections,
    pub header: HeaderLocator,
    /// First data row; defaults to the row after the header.
    pub data_start: Option<usize>,
    /// Keep entities that have no numeric value at all.
    pub keep_empty_entities: bool,
}

impl ExtractOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    #[must_use]
    pub fn exclude(mut self, label: impl Into<String>) -> Self {
        self.exclude.insert(label.into().trim().to_string());
        self
    }

    #[must_use]
    pub fn exclude_all<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for label in labels {
            self = self.exclude(label);
        }
        self
    }

    #[must_use]
    pub fn exclude_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exclude_prefixes.push(prefix.into().to_lowercase());
        self
    }

    #[must_use]
    pub fn with_corrections(mut self, corrections: NameCorrections) -> Self {
        self.corrections = corrections;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: HeaderLocator) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_data_start(mut self, row: usize) -> Self {
        self.data_start = Some(row);
        self
    }

    #[must_use]
    pub fn keep_empty_entities(mut self, keep: bool) -> Self {
        self.keep_empty_entities = keep;
        self
    }

    /// Whether rows labelled `name` are dropped.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        if self.exclude.contains(name) {
            return true;
        }
        let lower = name.to_lowercase();
        self.exclude_prefixes
            .iter()
            .any(|prefix| lower.starts_with(prefix.as_str()))
    }
}

/// Trimmed, non-empty text of a row's first cell.
pub(crate) fn entity_label(row: &[CellValue]) -> Option<&str> {
    row.first()
        .and_then(CellValue::as_text)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
