use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn workbook_error(e: XlsxError) -> SheetError {
    SheetError::Workbook(e.to_string())
}

fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut data: Vec<Vec<CellValue>> = Vec::new();

    // Ranges start at the first used cell; pad so row/column indices match
    // the spreadsheet's own coordinates
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for _ in 0..start_row {
        data.push(Vec::new());
    }

    for row in range.rows() {
        let mut row_data: Vec<CellValue> = vec![CellValue::Null; start_col as usize];
        row_data.extend(row.iter().map(data_to_cell_value));
        data.push(row_data);
    }

    Sheet::from_rows(name, data)
}

fn read_workbook<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<Book> {
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut book = Book::new();

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(workbook_error)?;
        book.add_sheet(&sheet_name, range_to_sheet(&sheet_name, &range))?;
    }

    Ok(book)
}

impl Sheet {
    /// Load the first sheet of an Excel file
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let book = Book::from_xlsx(path)?;
        Ok(book.first_sheet().cloned().unwrap_or_default())
    }
}

impl Book {
    /// Load a book from an Excel file (all sheets)
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let workbook: Xlsx<_> = open_workbook(path.as_ref()).map_err(workbook_error)?;
        read_workbook(workbook)
    }

    /// Load a book from an in-memory Excel file
    pub fn from_xlsx_bytes(bytes: Vec<u8>) -> Result<Self> {
        let workbook = Xlsx::new(Cursor::new(bytes)).map_err(workbook_error)?;
        read_workbook(workbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn eurostat_workbook() -> Workbook {
        let mut workbook = Workbook::new();
        let summary = workbook.add_worksheet();
        summary.set_name("Summary").unwrap();
        summary.write_string(0, 0, "Contents").unwrap();

        let data = workbook.add_worksheet();
        data.set_name("Sheet 1").unwrap();
        data.write_string(0, 0, "GEO (Labels)").unwrap();
        data.write_number(0, 1, 2020.0).unwrap();
        data.write_number(0, 2, 2021.0).unwrap();
        data.write_string(1, 0, "Belgium").unwrap();
        data.write_number(1, 1, 91.5).unwrap();
        data.write_string(1, 2, ":").unwrap();
        workbook
    }

    #[test]
    fn test_xlsx_from_bytes() {
        let bytes = eurostat_workbook().save_to_buffer().unwrap();
        let book = Book::from_xlsx_bytes(bytes).unwrap();

        assert_eq!(book.sheet_names(), vec!["Summary", "Sheet 1"]);
        let sheet = book.get_sheet("Sheet 1").unwrap();
        assert_eq!(sheet.cell(0, 1).as_whole_number(), Some(2020));
        assert_eq!(sheet.cell(1, 1).as_float(), Some(91.5));
        assert!(sheet.cell(1, 2).reading().is_missing());
    }

    #[test]
    fn test_xlsx_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tin00134.xlsx");
        eurostat_workbook().save(&path).unwrap();

        let first = Sheet::from_xlsx(&path).unwrap();
        assert_eq!(first.name(), "Summary");

        let book = Book::open(&path).unwrap();
        assert_eq!(book.sheet_count(), 2);
    }

    #[test]
    fn test_xlsx_keeps_offsets() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 1, "TIME").unwrap();

        let book = Book::from_xlsx_bytes(workbook.save_to_buffer().unwrap()).unwrap();
        let loaded = book.first_sheet().unwrap();
        assert_eq!(loaded.find_row_containing("TIME"), Some(2));
        assert_eq!(loaded.cell(2, 1).as_text(), Some("TIME"));
    }

    #[test]
    fn test_xlsx_garbage_bytes() {
        let result = Book::from_xlsx_bytes(b"not a zip".to_vec());
        assert!(matches!(result, Err(SheetError::Workbook(_))));
    }
}
