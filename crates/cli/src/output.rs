//! Printing extractions.

use anyhow::Result;
use eurochart_series::Extraction;
use eurochart_sheet::{CellValue, Sheet};

/// Output format for extractions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Aligned table output (default)
    #[default]
    Table,
}

/// Render an extraction: one row per entity, one column per year.
pub fn format_extraction(extraction: &Extraction, format: OutputFormat) -> Result<String> {
    if extraction.is_empty() {
        return Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(extraction)?,
            OutputFormat::Csv | OutputFormat::Table => "(no data)".to_string(),
        });
    }

    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(extraction)?,
        OutputFormat::Csv => extraction.to_sheet().to_csv_string()?,
        OutputFormat::Table => format_table(&extraction.to_sheet()),
    })
}

/// Pad every column to its widest cell. Missing values print as `-`.
fn format_table(sheet: &Sheet) -> String {
    let text: Vec<Vec<String>> = sheet
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    CellValue::Null => "-".to_string(),
                    cell => cell.to_string(),
                })
                .collect()
        })
        .collect();

    let columns = text.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            text.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (index, row) in text.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (cell, width))| {
                // Labels read left to right, numbers line up on the right
                if col == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
        if index == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use eurochart_series::{extract, ExtractOptions};

    fn extraction() -> Extraction {
        let sheet = Sheet::from_data(vec![
            vec!["Country", "2020", "2021"],
            vec!["Testland", "45.2", "u"],
            vec!["Malta", "88", "90.5"],
        ]);
        extract(&sheet, &ExtractOptions::new())
    }

    #[test]
    fn test_table() {
        let table = format_extraction(&extraction(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "entity   | 2020 | 2021");
        assert_eq!(lines[1], "---------+------+-----");
        assert_eq!(lines[2], "Malta    |   88 | 90.5");
        assert_eq!(lines[3], "Testland | 45.2 |    -");
    }

    #[test]
    fn test_json() {
        let json = format_extraction(&extraction(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["years"], serde_json::json!([2020, 2021]));
        assert!(value.get("duplicates").is_none());
    }

    #[test]
    fn test_csv_leaves_missing_cells_empty() {
        let csv = format_extraction(&extraction(), OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("entity,2020,2021"));
        assert!(csv.contains("Testland,45.2,\n"));
    }

    #[test]
    fn test_empty() {
        let sheet = Sheet::from_data(vec![vec!["Country", "Notes"]]);
        let extraction = extract(&sheet, &ExtractOptions::new());
        assert_eq!(
            format_extraction(&extraction, OutputFormat::Table).unwrap(),
            "(no data)"
        );
    }
}
