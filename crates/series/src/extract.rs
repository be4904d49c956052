//! The sheet-to-series extractor.

use crate::options::{entity_label, ExtractOptions, YearRange};
use crate::series::{EntitySeries, Extraction};
use eurochart_sheet::{CellValue, Reading, Sheet};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// A header cell recognised as a year label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearColumn {
    pub index: usize,
    pub year: i32,
}

/// Find the year columns of a header row.
///
/// Column 0 holds the entity label and is never a year. A repeated year
/// keeps its leftmost column.
#[must_use]
pub fn scan_header(header: &[CellValue], years: &YearRange) -> Vec<YearColumn> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(index, cell)| {
            let year = cell.as_whole_number().filter(|y| years.contains(*y))?;
            let year = i32::try_from(year).ok()?;
            seen.insert(year).then_some(YearColumn { index, year })
        })
        .collect()
}

/// Year columns of a sheet under the given options.
#[must_use]
pub fn available_years(sheet: &Sheet, options: &ExtractOptions) -> Vec<i32> {
    header_columns(sheet, options)
        .map(|(_, columns)| columns.into_iter().map(|c| c.year).collect())
        .unwrap_or_default()
}

fn header_columns(sheet: &Sheet, options: &ExtractOptions) -> Option<(usize, Vec<YearColumn>)> {
    let header_row = options.header.locate(sheet)?;
    let header = sheet.row(header_row).ok()?;
    let columns = scan_header(header, &options.years);
    (!columns.is_empty()).then_some((header_row, columns))
}

/// Extract every year column of a sheet into an [`EntitySeries`].
///
/// Never fails: a sheet without a usable header yields an empty result, and
/// a cell that does not hold a number only loses its own (entity, year) pair.
/// When an entity label repeats, the later row replaces the earlier one and
/// the name is reported in [`Extraction::duplicates`].
#[must_use]
pub fn extract(sheet: &Sheet, options: &ExtractOptions) -> Extraction {
    let Some((header_row, columns)) = header_columns(sheet, options) else {
        debug!(sheet = sheet.name(), "no year columns found");
        return Extraction::default();
    };

    let start = options.data_start.unwrap_or(header_row + 1);
    let mut series = EntitySeries::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = Vec::new();
    let mut invalid_cells = 0usize;

    for row in sheet.rows().skip(start) {
        let Some(raw) = entity_label(row) else {
            continue;
        };
        if options.is_excluded(raw) {
            continue;
        }
        let name = options.corrections.correct(raw);
        if options.is_excluded(name) {
            continue;
        }

        let mut values = BTreeMap::new();
        for column in &columns {
            match row.get(column.index).map_or(Reading::Missing, CellValue::reading) {
                Reading::Number(value) => {
                    values.insert(column.year, value);
                }
                Reading::Missing => {}
                Reading::Invalid(_) => invalid_cells += 1,
            }
        }

        if !seen.insert(name.to_string()) {
            warn!(sheet = sheet.name(), entity = name, "entity repeats, keeping the later row");
            duplicates.push(name.to_string());
            series.remove(name);
        }
        if !values.is_empty() || options.keep_empty_entities {
            series.set_entity(name, values);
        }
    }

    let years: Vec<i32> = columns.iter().map(|c| c.year).collect();
    debug!(
        sheet = sheet.name(),
        years = years.len(),
        entities = series.len(),
        invalid_cells,
        "extracted series"
    );

    Extraction {
        series,
        years,
        duplicates,
    }
}

/// Values for a single year, keyed by entity.
///
/// Empty when the year is outside the configured range or absent from the
/// header.
#[must_use]
pub fn extract_year(sheet: &Sheet, year: i32, options: &ExtractOptions) -> BTreeMap<String, f64> {
    if !options.years.contains(i64::from(year)) {
        debug!(sheet = sheet.name(), year, "year outside configured range");
        return BTreeMap::new();
    }
    let narrowed = options.clone().with_years(YearRange::single(year));
    extract(sheet, &narrowed).series.for_year(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_header_bounds_and_order() {
        let row: Vec<CellValue> = vec![
            "GEO".into(),
            2012.into(),
            2021.into(),
            "".into(),
            "2020".into(),
            2025.into(),
            CellValue::Float(2022.0),
            CellValue::Float(2022.5),
            "TIME".into(),
        ];
        let columns = scan_header(&row, &YearRange::new(2013, 2024).unwrap());
        assert_eq!(
            columns,
            vec![
                YearColumn { index: 2, year: 2021 },
                YearColumn { index: 4, year: 2020 },
                YearColumn { index: 6, year: 2022 },
            ]
        );
    }

    #[test]
    fn test_scan_header_skips_label_column_and_duplicates() {
        let row: Vec<CellValue> = vec![2020.into(), 2021.into(), 2021.into()];
        let columns = scan_header(&row, &YearRange::default());
        assert_eq!(columns, vec![YearColumn { index: 1, year: 2021 }]);
    }

    #[test]
    fn test_extract_year_outside_range() {
        let sheet = Sheet::from_data(vec![
            vec![CellValue::from("GEO"), 2024.into()],
            vec![CellValue::from("Malta"), 88.into()],
        ]);
        let options = ExtractOptions::new().with_years(YearRange::new(2020, 2023).unwrap());
        assert!(extract_year(&sheet, 2024, &options).is_empty());
        assert_eq!(extract_year(&sheet, 2024, &ExtractOptions::new())["Malta"], 88.0);
    }
}
