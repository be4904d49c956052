//! Gender and age-band cohorts gathered across the sheets of one workbook.

use crate::extract::extract;
use crate::metadata::{Gender, SheetMetadata};
use crate::options::{ExtractOptions, HeaderLocator, YearRange};
use eurochart_sheet::Book;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// The EU-27 aggregate, kept as its own entity even though aggregates are
/// excluded from the country list.
pub const EU27: &str = "European Union - 27 countries (from 2020)";

/// Labels of the flag legend rows under Eurostat tables.
pub const FLAG_ROWS: [&str; 8] = [
    ":",
    "GEO (Labels)",
    "Special value",
    "Observation flags:",
    "b",
    "bu",
    "e",
    "u",
];

/// Options for the per-cohort sheets: header on the `TIME` row, flag rows
/// and EU or euro-area aggregates dropped.
#[must_use]
pub fn cohort_options(years: YearRange) -> ExtractOptions {
    ExtractOptions::new()
        .with_years(years)
        .with_header(HeaderLocator::Containing("TIME".to_string()))
        .exclude_all(FLAG_ROWS)
        .exclude_prefix("european union")
        .exclude_prefix("euro area")
}

/// One bar of the pyramid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cohort {
    pub gender: Gender,
    pub age_start: u32,
    pub age_end: u32,
    pub value: f64,
}

impl Cohort {
    #[must_use]
    pub fn age_group(&self) -> String {
        format!("{}-{}", self.age_start, self.age_end)
    }
}

/// Entity to year to cohorts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CohortTable {
    data: BTreeMap<String, BTreeMap<i32, Vec<Cohort>>>,
    countries: BTreeSet<String>,
    years: BTreeSet<i32>,
}

impl CohortTable {
    /// Read every sheet that carries a description block.
    ///
    /// Sheets without one are skipped. Rows excluded by `options` are left
    /// out, except for the [`EU27`] aggregate which is kept apart from the
    /// country list.
    #[must_use]
    pub fn from_book(book: &Book, options: &ExtractOptions) -> Self {
        let permissive = ExtractOptions {
            exclude: BTreeSet::new(),
            exclude_prefixes: Vec::new(),
            ..options.clone()
        };

        let mut table = Self::default();
        for (name, sheet) in book.sheets() {
            let Some(meta) = SheetMetadata::extract(sheet) else {
                debug!(sheet = name, "skipping sheet without cohort metadata");
                continue;
            };

            let extraction = extract(sheet, &permissive);
            if extraction.years.is_empty() {
                warn!(sheet = name, "cohort sheet has no year columns");
                continue;
            }
            table.years.extend(extraction.years.iter().copied());

            for (entity, values) in extraction.series.iter() {
                let is_aggregate = entity == EU27;
                if !is_aggregate && options.is_excluded(entity) {
                    continue;
                }
                if !is_aggregate {
                    table.countries.insert(entity.to_string());
                }
                let years = table.data.entry(entity.to_string()).or_default();
                for (year, value) in values {
                    years.entry(*year).or_default().push(Cohort {
                        gender: meta.gender,
                        age_start: meta.age_start,
                        age_end: meta.age_end,
                        value: *value,
                    });
                }
            }
        }

        debug!(
            countries = table.countries.len(),
            years = table.years.len(),
            "collected cohorts"
        );
        table
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Countries in alphabetical order, aggregates excluded.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(String::as_str)
    }

    /// Every selectable entity: the EU-27 aggregate first when present,
    /// then the countries.
    #[must_use]
    pub fn entities(&self) -> Vec<&str> {
        let mut entities = Vec::with_capacity(self.countries.len() + 1);
        if self.data.contains_key(EU27) {
            entities.push(EU27);
        }
        entities.extend(self.countries());
        entities
    }

    #[must_use]
    pub fn contains(&self, entity: &str) -> bool {
        self.data.contains_key(entity)
    }

    /// All years seen in any cohort sheet.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }

    /// Years in which `entity` has at least one cohort value.
    #[must_use]
    pub fn years_with_data(&self, entity: &str) -> Vec<i32> {
        self.data
            .get(entity)
            .map(|years| {
                years
                    .iter()
                    .filter(|(_, cohorts)| !cohorts.is_empty())
                    .map(|(year, _)| *year)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Cohorts of `entity` in `year`; empty when there are none.
    #[must_use]
    pub fn cohorts(&self, entity: &str, year: i32) -> &[Cohort] {
        self.data
            .get(entity)
            .and_then(|years| years.get(&year))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
