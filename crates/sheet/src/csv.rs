use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::Sheet;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Delimited text options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions { delimiter: b',' }
    }
}

impl CsvOptions {
    /// Options for TSV (tab-separated values)
    #[must_use]
    pub fn tsv() -> Self {
        CsvOptions { delimiter: b'\t' }
    }
}

impl Sheet {
    /// Load a sheet from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_with_options(path, &CsvOptions::default())
    }

    /// Load a sheet from a delimited file
    pub fn from_csv_with_options<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(BufReader::new(file), options)
    }

    /// Load a sheet from a CSV string
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes(), &CsvOptions::default())
    }

    /// Load a sheet from a reader, inferring each cell's type
    ///
    /// Records may have different lengths; Eurostat CSVs are ragged.
    pub fn from_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false) // Header rows are located by the extractor
            .flexible(true)
            .from_reader(reader);

        let mut data: Vec<Vec<CellValue>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            data.push(record.iter().map(CellValue::parse).collect());
        }

        Ok(Sheet::from_rows("Sheet1", data))
    }

    /// Write the sheet as CSV; null cells become empty fields
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);

        for row in self.rows() {
            let record: Vec<String> = row.iter().map(CellValue::as_str).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// The sheet as a CSV string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_type_inference() {
        let sheet = Sheet::from_csv_str("GEO,2020,2021\nTestland,45.2,u\n").unwrap();
        assert_eq!(sheet.cell(0, 1), &CellValue::Int(2020));
        assert_eq!(sheet.cell(1, 1), &CellValue::Float(45.2));
        assert_eq!(sheet.cell(1, 2), &CellValue::String("u".to_string()));
    }

    #[test]
    fn test_csv_ragged() {
        let sheet = Sheet::from_csv_str("TIME,2020,2021\nBelgium\n").unwrap();
        assert_eq!(sheet.row(1).unwrap().len(), 1);
    }

    #[test]
    fn test_tsv() {
        let sheet = Sheet::from_csv_reader("GEO\t2020\nMalta\t88\n".as_bytes(), &CsvOptions::tsv())
            .unwrap();
        assert_eq!(sheet.cell(1, 0), &CellValue::String("Malta".to_string()));
        assert_eq!(sheet.cell(1, 1), &CellValue::Int(88));
    }

    #[test]
    fn test_to_csv_string() {
        let sheet = Sheet::from_data(vec![vec!["entity", "2020"], vec!["Testland", "45.2"]]);
        assert_eq!(sheet.to_csv_string().unwrap(), "entity,2020\nTestland,45.2\n");
    }

    #[test]
    fn test_write_csv_reports_writer_errors() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let sheet = Sheet::from_data(vec![vec!["entity"]]);
        assert!(sheet.write_csv(Closed).is_err());
    }
}
