//! # eurochart-series
//!
//! Turns spreadsheet grids into per-entity yearly series.
//!
//! The extractor locates a header row, keeps the columns whose label is a
//! year in the configured range, and reads one value per (entity, year).
//! Cells that do not hold a number drop only their own pair; a sheet without
//! a usable header yields an empty result rather than an error.
//!
//! ```
//! use eurochart_series::{extract, ExtractOptions};
//! use eurochart_sheet::{CellValue, Sheet};
//!
//! let sheet = Sheet::from_rows(
//!     "access",
//!     vec![
//!         vec!["Country".into(), 2020.into(), 2021.into()],
//!         vec!["Testland".into(), "45.2".into(), CellValue::from("u")],
//!     ],
//! );
//!
//! let extraction = extract(&sheet, &ExtractOptions::new());
//! assert_eq!(extraction.years, vec![2020, 2021]);
//! assert_eq!(extraction.series.value("Testland", 2020), Some(45.2));
//! assert_eq!(extraction.series.value("Testland", 2021), None);
//! ```

pub mod categories;
pub mod cohorts;
pub mod corrections;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod options;
pub mod series;

pub use categories::{extract_categories, CategoryGroup, CategoryLayout, CategoryTable};
pub use cohorts::{cohort_options, Cohort, CohortTable, EU27};
pub use corrections::NameCorrections;
pub use error::{SeriesError, SeriesResult};
pub use extract::{available_years, extract, extract_year, scan_header, YearColumn};
pub use metadata::{Gender, SheetMetadata};
pub use options::{ExtractOptions, HeaderLocator, YearRange};
pub use series::{EntitySeries, Extraction, SeriesPoint};
