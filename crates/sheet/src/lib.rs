//! Sheet/Book module for eurochart
//!
//! Loads Eurostat spreadsheet exports (XLSX or CSV) into a plain grid of
//! typed cells. Nothing here knows about years or countries; locating the
//! table inside a sheet is the extractor's job.
//!
//! # Examples
//!
//! ```
//! use eurochart_sheet::{Reading, Sheet};
//!
//! let sheet = Sheet::from_csv_str("GEO,2020,2021\nTestland,45.2,u\n").unwrap();
//!
//! assert_eq!(sheet.cell(1, 1).reading(), Reading::Number(45.2));
//! assert_eq!(sheet.cell(1, 2).reading(), Reading::Missing);
//! ```
//!
//! ## Working with books
//!
//! ```
//! use eurochart_sheet::{Book, Sheet};
//!
//! let mut book = Book::new();
//! book.add_sheet("Summary", Sheet::new()).unwrap();
//! book.add_sheet("Sheet 1", Sheet::new()).unwrap();
//!
//! assert_eq!(book.sheet_count(), 2);
//! ```

mod book;
mod cell;
mod csv;
mod error;
mod sheet;
mod xlsx;

/// Re-export book types.
pub use book::{Book, SheetFormat};
/// Re-export cell value types.
pub use cell::{CellValue, Reading};
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
