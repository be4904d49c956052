use serde::{Deserialize, Serialize};
use std::fmt;

/// Eurostat observation flags that may trail a value or stand in for one
/// (`b` break in series, `u` low reliability, `p` provisional, ...).
const FLAG_LETTERS: &str = "bcdefnprsuz";

/// Represents a cell value in a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// The numeric interpretation of a single cell.
///
/// Produced by [`CellValue::reading`]; every consumer that needs a number
/// matches on this instead of coercing cells ad hoc.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// A finite number.
    Number(f64),
    /// No observation: an empty cell or a Eurostat "not available" marker.
    Missing,
    /// Something that is neither a number nor a known marker.
    Invalid(String),
}

impl Reading {
    /// Interpret free text as an observation.
    ///
    /// Accepts plain numbers and numbers followed by observation flags
    /// (`"45.2 b"`). `":"`, `": u"` and bare flags (`"u"`, `"bu"`) are missing.
    #[must_use]
    pub fn parse(text: &str) -> Reading {
        let trimmed = text.trim();
        if trimmed.is_empty() || is_not_available(trimmed) {
            return Reading::Missing;
        }

        let mut tokens = trimmed.split_whitespace();
        let head = tokens.next().unwrap_or_default();
        let flags_only = tokens.all(is_flag_token);

        match head.parse::<f64>() {
            Ok(value) if value.is_finite() && flags_only => Reading::Number(value),
            _ => Reading::Invalid(trimmed.to_string()),
        }
    }

    /// The number, if this reading holds one.
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self {
            Reading::Number(value) => Some(*value),
            Reading::Missing | Reading::Invalid(_) => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }
}

fn is_flag_token(token: &str) -> bool {
    !token.is_empty() && token.len() <= 4 && token.chars().all(|c| FLAG_LETTERS.contains(c))
}

fn is_not_available(text: &str) -> bool {
    match text.strip_prefix(':') {
        Some(rest) => {
            let rest = rest.trim();
            rest.is_empty() || is_flag_token(rest)
        }
        None => is_flag_token(text),
    }
}

impl CellValue {
    /// Check if the value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Check if the value is null or whitespace-only text
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Interpret the cell as an observation. See [`Reading`].
    #[must_use]
    pub fn reading(&self) -> Reading {
        match self {
            CellValue::Null => Reading::Missing,
            CellValue::Int(i) => Reading::Number(*i as f64),
            CellValue::Float(f) if f.is_finite() => Reading::Number(*f),
            CellValue::Float(f) => Reading::Invalid(f.to_string()),
            CellValue::Bool(b) => Reading::Invalid(b.to_string()),
            CellValue::String(s) => Reading::parse(s),
        }
    }

    /// Interpret the cell as a whole number.
    ///
    /// Floats count only when they carry no fractional part; text is trimmed
    /// before parsing.
    #[must_use]
    pub fn as_whole_number(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            CellValue::String(s) => s.trim().parse().ok(),
            CellValue::Float(_) | CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    /// Try to get the value as a float
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        self.reading().number()
    }

    /// Borrow the text of a string cell
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a string
    #[must_use]
    pub fn as_str(&self) -> String {
        self.to_string()
    }

    /// Parse a string into a `CellValue` with type inference
    /// Tries: null -> bool -> int -> float -> string
    #[must_use]
    pub fn parse(s: &str) -> CellValue {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Null;
        }

        match trimmed.to_lowercase().as_str() {
            "true" => return CellValue::Bool(true),
            "false" => return CellValue::Bool(false),
            _ => {}
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }

        // "NaN" and "inf" stay text so they surface as invalid readings
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }

        CellValue::String(s.to_string())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => write!(f, "{fl}"),
            CellValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_null() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("  "), CellValue::Null);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(CellValue::parse("2020"), CellValue::Int(2020));
        assert_eq!(CellValue::parse("-2.5"), CellValue::Float(-2.5));
        assert_eq!(CellValue::parse("NaN"), CellValue::String("NaN".to_string()));
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(CellValue::parse(":"), CellValue::String(":".to_string()));
        assert_eq!(CellValue::parse("TRUE"), CellValue::Bool(true));
    }

    #[test]
    fn test_reading_numbers() {
        assert_eq!(CellValue::Int(42).reading(), Reading::Number(42.0));
        assert_eq!(CellValue::Float(45.2).reading(), Reading::Number(45.2));
        assert_eq!(CellValue::from("45.2").reading(), Reading::Number(45.2));
        assert_eq!(CellValue::from(" 81.7 b ").reading(), Reading::Number(81.7));
        assert_eq!(CellValue::from("12 bu").reading(), Reading::Number(12.0));
    }

    #[test]
    fn test_reading_missing_markers() {
        for marker in ["", ":", ": u", ":c", "u", "bu", "e"] {
            assert_eq!(CellValue::from(marker).reading(), Reading::Missing, "{marker:?}");
        }
        assert_eq!(CellValue::Null.reading(), Reading::Missing);
    }

    #[test]
    fn test_reading_invalid() {
        assert_eq!(
            CellValue::from("n/a").reading(),
            Reading::Invalid("n/a".to_string())
        );
        assert!(matches!(CellValue::Float(f64::NAN).reading(), Reading::Invalid(_)));
        assert!(matches!(CellValue::from("inf").reading(), Reading::Invalid(_)));
        assert!(matches!(CellValue::from("12 units").reading(), Reading::Invalid(_)));
        assert!(matches!(CellValue::Bool(true).reading(), Reading::Invalid(_)));
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(CellValue::Float(2021.0).as_whole_number(), Some(2021));
        assert_eq!(CellValue::Float(2021.5).as_whole_number(), None);
        assert_eq!(CellValue::from(" 2022 ").as_whole_number(), Some(2022));
        assert_eq!(CellValue::from("GEO").as_whole_number(), None);
    }
}
