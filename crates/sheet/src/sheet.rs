use crate::cell::CellValue;
use crate::error::{Result, SheetError};

static NULL_CELL: CellValue = CellValue::Null;

/// A sheet representing a 2D grid of cells (row-major storage)
///
/// Rows may have different lengths; spreadsheet exports routinely drop
/// trailing empty cells.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        Sheet {
            name: "Sheet1".to_string(),
            data: converted,
        }
    }

    /// Create a sheet from rows of already-typed cells
    #[must_use]
    pub fn from_rows(name: &str, data: Vec<Vec<CellValue>>) -> Self {
        Sheet {
            name: name.to_string(),
            data,
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the width of the widest row
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the sheet is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a cell, failing when the position lies outside the grid
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
            })
    }

    /// Get a cell, treating positions past the end of a ragged row as null
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL_CELL)
    }

    /// Get a row by index
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.row_count(),
        })
    }

    /// Index of the first row with a text cell containing `needle`
    #[must_use]
    pub fn find_row_containing(&self, needle: &str) -> Option<usize> {
        self.data.iter().position(|row| {
            row.iter()
                .filter_map(CellValue::as_text)
                .any(|text| text.contains(needle))
        })
    }

    /// Append a row
    pub fn push_row<T: Into<CellValue>>(&mut self, row: Vec<T>) {
        self.data.push(row.into_iter().map(Into::into).collect());
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_rows() {
        let mut sheet = Sheet::with_name("Data");
        sheet.push_row(vec![CellValue::from("GEO"), 2020.into(), 2021.into()]);
        sheet.push_row(vec!["Belgium"]);

        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.col_count(), 3);
        assert_eq!(sheet.cell(1, 2), &CellValue::Null);
        assert!(sheet.get(1, 2).is_err());
    }

    #[test]
    fn test_find_row_containing() {
        let sheet = Sheet::from_data(vec![
            vec!["Dataset", ""],
            vec!["", "TIME"],
            vec!["GEO (Labels)", ""],
        ]);
        assert_eq!(sheet.find_row_containing("TIME"), Some(1));
        assert_eq!(sheet.find_row_containing("Unit"), None);
    }

    #[test]
    fn test_row_out_of_bounds() {
        let sheet = Sheet::new();
        assert!(matches!(
            sheet.row(3),
            Err(SheetError::RowIndexOutOfBounds { index: 3, count: 0 })
        ));
    }
}
