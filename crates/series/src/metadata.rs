//! Description block at the top of multi-sheet Eurostat exports.

use eurochart_sheet::{CellValue, Sheet};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Rows above the table that may hold the description block.
pub const METADATA_ROWS: usize = 9;

const INDIVIDUAL_TYPE: &str = "Individual type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

/// Who a sheet describes: a gender and an age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SheetMetadata {
    pub gender: Gender,
    pub age_start: u32,
    pub age_end: u32,
}

impl SheetMetadata {
    /// Read the "Individual type" line, e.g. `Males 16 to 24 years old`.
    ///
    /// `None` when the block is absent or the line cannot be parsed.
    #[must_use]
    pub fn extract(sheet: &Sheet) -> Option<Self> {
        let row = sheet.rows().take(METADATA_ROWS).find(|row| {
            row.iter()
                .filter_map(CellValue::as_text)
                .any(|text| text.contains(INDIVIDUAL_TYPE))
        });
        let Some(row) = row else {
            debug!(sheet = sheet.name(), "no individual type row");
            return None;
        };

        let description = row
            .iter()
            .filter_map(CellValue::as_text)
            .find(|text| text.contains("Males") || text.contains("Females"))?;
        let parsed = Self::parse(description);
        if parsed.is_none() {
            debug!(sheet = sheet.name(), description, "unparseable age group");
        }
        parsed
    }

    /// Parse a description such as `Females 25 to 34 years old`.
    #[must_use]
    pub fn parse(description: &str) -> Option<Self> {
        // "Females" contains "males" but not "Males"
        let gender = if description.contains("Males") {
            Gender::Male
        } else {
            Gender::Female
        };

        let pattern = Regex::new(r"(\d+)\s+to\s+(\d+)").ok()?;
        let captures = pattern.captures(description)?;
        let age_start = captures.get(1)?.as_str().parse().ok()?;
        let age_end = captures.get(2)?.as_str().parse().ok()?;

        Some(Self {
            gender,
            age_start,
            age_end,
        })
    }

    /// Age band label such as `16-24`.
    #[must_use]
    pub fn age_group(&self) -> String {
        format!("{}-{}", self.age_start, self.age_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_description() {
        let meta = SheetMetadata::parse("Females 25 to 34 years old").unwrap();
        assert_eq!(meta.gender, Gender::Female);
        assert_eq!(meta.age_group(), "25-34");

        let meta = SheetMetadata::parse("Males 65 to 74 years old").unwrap();
        assert_eq!(meta.gender, Gender::Male);
        assert_eq!((meta.age_start, meta.age_end), (65, 74));

        assert!(SheetMetadata::parse("All individuals").is_none());
    }

    #[test]
    fn test_extract_from_block() {
        let sheet = Sheet::from_data(vec![
            vec!["Individuals - internet use", ""],
            vec!["", ""],
            vec!["Individual type", "Males 16 to 24 years old"],
            vec!["TIME", "2023"],
        ]);
        let meta = SheetMetadata::extract(&sheet).unwrap();
        assert_eq!(meta.gender, Gender::Male);
        assert_eq!(meta.age_group(), "16-24");
    }

    #[test]
    fn test_extract_ignores_rows_past_block() {
        let mut rows = vec![vec!["", ""]; METADATA_ROWS];
        rows.push(vec!["Individual type", "Males 16 to 24 years old"]);
        assert!(SheetMetadata::extract(&Sheet::from_data(rows)).is_none());
    }
}
