//! Paired-column category tables.
//!
//! Some exports put one category per pair of columns (value, flag): labels on
//! a heading row, then one row per (entity, group) with values at the same
//! stride. The radar and Sankey charts read this layout.

use crate::corrections::NameCorrections;
use eurochart_sheet::{CellValue, Reading, Sheet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where the labels and values sit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLayout {
    /// Row holding the category labels.
    pub label_row: usize,
    /// Column of the first category.
    pub first_column: usize,
    /// Columns between consecutive categories.
    pub stride: usize,
    /// Column holding each row's group label.
    pub group_column: usize,
}

impl Default for CategoryLayout {
    fn default() -> Self {
        Self {
            label_row: 1,
            first_column: 2,
            stride: 2,
            group_column: 1,
        }
    }
}

impl CategoryLayout {
    fn columns(&self, width: usize) -> impl Iterator<Item = usize> {
        (self.first_column..width).step_by(self.stride.max(1))
    }
}

/// One row of values, labelled by its group (an age band in the exports).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub label: String,
    pub values: Vec<f64>,
}

impl CategoryGroup {
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Categories and the groups measured against them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTable {
    pub categories: Vec<String>,
    pub groups: Vec<CategoryGroup>,
}

impl CategoryTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() || self.groups.is_empty()
    }

    #[must_use]
    pub fn group(&self, label: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// Largest value in the table, 0 when empty.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.groups.iter().map(CategoryGroup::max).fold(0.0, f64::max)
    }

    /// (group, category, value) for every cell.
    pub fn flows(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.groups.iter().flat_map(move |group| {
            self.categories
                .iter()
                .zip(&group.values)
                .map(move |(category, value)| (group.label.as_str(), category.as_str(), *value))
        })
    }
}

/// Read the rows whose entity label contains `entity` (case-insensitive).
///
/// Category labels go through `labels`. A value that is not a number reads
/// as 0 so every group has one value per category.
#[must_use]
pub fn extract_categories(
    sheet: &Sheet,
    entity: &str,
    layout: &CategoryLayout,
    labels: &NameCorrections,
) -> CategoryTable {
    let Ok(label_row) = sheet.row(layout.label_row) else {
        debug!(sheet = sheet.name(), row = layout.label_row, "no category label row");
        return CategoryTable::default();
    };

    let categories: Vec<(usize, String)> = layout
        .columns(label_row.len())
        .filter_map(|index| {
            let text = label_row[index].as_text()?.trim();
            (!text.is_empty()).then(|| (index, labels.correct(text).to_string()))
        })
        .collect();

    let needle = entity.to_lowercase();
    let groups: Vec<CategoryGroup> = sheet
        .rows()
        .skip(layout.label_row + 1)
        .filter(|row| {
            row.first()
                .and_then(CellValue::as_text)
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .map(|row| {
            let label = row
                .get(layout.group_column)
                .map(ToString::to_string)
                .unwrap_or_default();
            let values = categories
                .iter()
                .map(|(index, _)| match row.get(*index).map(CellValue::reading) {
                    Some(Reading::Number(value)) => value,
                    _ => 0.0,
                })
                .collect();
            CategoryGroup { label, values }
        })
        .collect();

    debug!(
        sheet = sheet.name(),
        entity,
        categories = categories.len(),
        groups = groups.len(),
        "extracted categories"
    );

    CategoryTable {
        categories: categories.into_iter().map(|(_, label)| label).collect(),
        groups,
    }
}
