//! Per-entity yearly values.

use eurochart_sheet::{CellValue, Sheet};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One recovered observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub entity: String,
    pub year: i32,
    pub value: f64,
}

/// Entity name to (year to value).
///
/// Entities with no values are only present when an extraction asked to
/// keep them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntitySeries {
    entities: BTreeMap<String, BTreeMap<i32, f64>>,
}

impl EntitySeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Record one value, creating the entity when needed.
    pub fn insert(&mut self, entity: impl Into<String>, year: i32, value: f64) {
        self.entities
            .entry(entity.into())
            .or_default()
            .insert(year, value);
    }

    /// Replace everything known about an entity.
    pub fn set_entity(&mut self, entity: impl Into<String>, values: BTreeMap<i32, f64>) {
        self.entities.insert(entity.into(), values);
    }

    pub fn remove(&mut self, entity: &str) -> Option<BTreeMap<i32, f64>> {
        self.entities.remove(entity)
    }

    #[must_use]
    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    #[must_use]
    pub fn get(&self, entity: &str) -> Option<&BTreeMap<i32, f64>> {
        self.entities.get(entity)
    }

    #[must_use]
    pub fn value(&self, entity: &str, year: i32) -> Option<f64> {
        self.entities.get(entity)?.get(&year).copied()
    }

    /// Entity names in sorted order.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<i32, f64>)> {
        self.entities.iter().map(|(name, years)| (name.as_str(), years))
    }

    /// Every observation, entity by entity.
    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        self.entities.iter().flat_map(|(entity, years)| {
            years.iter().map(move |(year, value)| SeriesPoint {
                entity: entity.clone(),
                year: *year,
                value: *value,
            })
        })
    }

    /// Values for one year, keyed by entity.
    #[must_use]
    pub fn for_year(&self, year: i32) -> BTreeMap<String, f64> {
        self.entities
            .iter()
            .filter_map(|(entity, years)| years.get(&year).map(|v| (entity.clone(), *v)))
            .collect()
    }

    /// Years in which `entity` has a value.
    #[must_use]
    pub fn years_with_data(&self, entity: &str) -> Vec<i32> {
        self.entities
            .get(entity)
            .map(|years| years.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Union of all years with any value.
    #[must_use]
    pub fn years(&self) -> BTreeSet<i32> {
        self.entities
            .values()
            .flat_map(|years| years.keys().copied())
            .collect()
    }

    /// Smallest and largest value across the series.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.entities
            .values()
            .flat_map(BTreeMap::values)
            .fold(None, |range, &v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn retain_entities<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entities.retain(|name, _| keep(name));
    }
}

/// Result of scanning one sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub series: EntitySeries,
    /// Valid year columns, left to right, without duplicates.
    pub years: Vec<i32>,
    /// Entity names that appeared on more than one row.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<String>,
}

impl Extraction {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.series.is_empty()
    }

    /// Lay the extraction out as a sheet: one row per entity, one column per year.
    #[must_use]
    pub fn to_sheet(&self) -> Sheet {
        let mut header = vec![CellValue::from("entity")];
        header.extend(self.years.iter().map(|year| CellValue::from(*year)));

        let mut sheet = Sheet::with_name("series");
        sheet.push_row(header);
        for (entity, values) in self.series.iter() {
            let mut row = vec![CellValue::from(entity)];
            row.extend(
                self.years
                    .iter()
                    .map(|year| CellValue::from(values.get(year).copied())),
            );
            sheet.push_row(row);
        }
        sheet
    }
}
