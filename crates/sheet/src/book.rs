use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;
use std::path::Path;

/// Spreadsheet formats a book can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
    Tsv,
}

impl SheetFormat {
    /// Guess the format from a file name's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(SheetFormat::Xlsx),
            "csv" => Ok(SheetFormat::Csv),
            "tsv" => Ok(SheetFormat::Tsv),
            _ => Err(SheetError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A book containing multiple sheets (preserves insertion order)
#[derive(Debug, Clone)]
pub struct Book {
    name: String,
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Book1")
    }

    /// Create a new empty book with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Book {
            name: name.to_string(),
            sheets: IndexMap::new(),
        }
    }

    /// Wrap a single sheet in a book
    #[must_use]
    pub fn from_sheet(sheet: Sheet) -> Self {
        let mut sheets = IndexMap::new();
        sheets.insert(sheet.name().to_string(), sheet);
        Book {
            name: "Book1".to_string(),
            sheets,
        }
    }

    /// Load a book from a file, picking the reader by extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match SheetFormat::from_path(path)? {
            SheetFormat::Xlsx => Self::from_xlsx(path),
            SheetFormat::Csv => Ok(Self::from_sheet(Sheet::from_csv(path)?)),
            SheetFormat::Tsv => Ok(Self::from_sheet(Sheet::from_csv_with_options(
                path,
                &crate::CsvOptions::tsv(),
            )?)),
        }
    }

    /// Decode a book from fetched bytes; `name` decides the format
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self> {
        match SheetFormat::from_path(name)? {
            SheetFormat::Xlsx => Self::from_xlsx_bytes(bytes),
            SheetFormat::Csv => Ok(Self::from_sheet(Sheet::from_csv_reader(
                bytes.as_slice(),
                &crate::CsvOptions::default(),
            )?)),
            SheetFormat::Tsv => Ok(Self::from_sheet(Sheet::from_csv_reader(
                bytes.as_slice(),
                &crate::CsvOptions::tsv(),
            )?)),
        }
    }

    /// Get the book name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Check whether a sheet exists
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Add a sheet, failing if the name is taken
    pub fn add_sheet(&mut self, name: &str, mut sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets.get(name).ok_or_else(|| SheetError::SheetNotFound {
            name: name.to_string(),
        })
    }

    /// Get a sheet by position
    #[must_use]
    pub fn sheet_at(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get_index(index).map(|(_, sheet)| sheet)
    }

    /// The first sheet, where single-table exports keep their data
    #[must_use]
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheet_at(0)
    }

    /// Iterate over sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(name, sheet)| (name.as_str(), sheet))
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}
