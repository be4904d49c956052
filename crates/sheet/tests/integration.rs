use eurochart_sheet::{Book, CellValue, Reading, Sheet, SheetError};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

// ===== Loading Tests =====

#[test]
fn test_open_csv_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tin00093.csv");
    std::fs::write(&path, "GEO (Labels),2023,2024\nAustria,5.1,4.8\nBulgaria,:,u\n").unwrap();

    let book = Book::open(&path).unwrap();
    let sheet = book.first_sheet().unwrap();

    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.cell(1, 2).reading(), Reading::Number(4.8));
    assert_eq!(sheet.cell(2, 1).reading(), Reading::Missing);
    assert_eq!(sheet.cell(2, 2).reading(), Reading::Missing);
}

#[test]
fn test_open_tsv_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.tsv");
    std::fs::write(&path, "GEO\t2024\nMalta\t88.0\n").unwrap();

    let book = Book::open(&path).unwrap();
    assert_eq!(book.first_sheet().unwrap().cell(1, 1), &CellValue::Float(88.0));
}

#[test]
fn test_open_unsupported() {
    let result = Book::open("europe.geojson");
    assert!(matches!(result, Err(SheetError::UnsupportedFormat(_))));
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    let result = Book::open(dir.path().join("absent.xlsx"));
    assert!(result.is_err());
}

// ===== Multi-sheet Workbooks =====

#[test]
fn test_multi_sheet_workbook_bytes() {
    let mut workbook = Workbook::new();
    for (index, gender) in ["Males", "Females"].iter().enumerate() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&format!("Sheet {}", index + 1)).unwrap();
        worksheet
            .write_string(6, 2, &format!("{gender} 16 to 24 years old"))
            .unwrap();
        worksheet.write_string(8, 0, "TIME").unwrap();
        worksheet.write_number(8, 1, 2023.0).unwrap();
    }
    let bytes = workbook.save_to_buffer().unwrap();

    let book = Book::from_bytes("internet_population.xlsx", bytes).unwrap();
    assert_eq!(book.sheet_count(), 2);

    let second = book.sheet_at(1).unwrap();
    assert_eq!(second.name(), "Sheet 2");
    assert_eq!(second.find_row_containing("Females"), Some(6));
    assert_eq!(second.find_row_containing("TIME"), Some(8));
    assert_eq!(second.cell(8, 1).as_whole_number(), Some(2023));
}

// ===== Cell Access =====

#[test]
fn test_sheet_from_data_mixed() {
    let sheet = Sheet::from_data(vec![
        vec![CellValue::from("Country"), 2020.into(), 2021.into()],
        vec![CellValue::from("Testland"), "45.2".into(), "u".into()],
    ]);

    assert_eq!(sheet.col_count(), 3);
    assert_eq!(sheet.get(1, 1).unwrap().reading(), Reading::Number(45.2));
    assert!(sheet.get(5, 0).is_err());
}
