//! # Cell Values
//!
//! Every CSV cell is auto-typed once at load time into a [`CellValue`].
//! Downstream code never re-parses strings; it asks the value for a number,
//! a label, or a hashable key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single auto-typed cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty or missing cell
    #[default]
    Null,
    /// Anything that parsed as a float (may be non-finite, e.g. `NaN`)
    Number(f64),
    /// Everything else, trimmed
    Text(String),
}

/// Hashable identity of a cell, used for distinct counts and grouping
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKey {
    Null,
    Number(u64),
    Text(String),
}

impl CellValue {
    /// Auto-type a raw cell: trim, empty → `Null`, float → `Number`, else `Text`
    pub fn auto_type(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The numeric value, only when the cell auto-typed to a finite number
    pub fn finite_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Whole-number value, for seasons and weeks
    pub fn as_i32(&self) -> Option<i32> {
        self.finite_number()
            .filter(|n| n.fract() == 0.0 && *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX))
            .map(|n| n as i32)
    }

    /// Best-effort numeric coercion; anything unusable becomes 0.
    pub fn coerce_f64(&self) -> f64 {
        match self {
            CellValue::Number(n) if n.is_finite() => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Text form of the cell, `None` for `Null`
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Case-insensitive, whitespace-trimmed comparison against a filter value
    pub fn matches_text(&self, other: &str) -> bool {
        let own = self.to_string();
        own.trim().to_lowercase() == other.trim().to_lowercase()
    }

    pub fn key(&self) -> CellKey {
        match self {
            CellValue::Null => CellKey::Null,
            // -0.0 and 0.0 are the same week/season
            CellValue::Number(n) if *n == 0.0 => CellKey::Number(0f64.to_bits()),
            CellValue::Number(n) => CellKey::Number(n.to_bits()),
            CellValue::Text(s) => CellKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_type() {
        assert_eq!(CellValue::auto_type(""), CellValue::Null);
        assert_eq!(CellValue::auto_type("   "), CellValue::Null);
        assert_eq!(CellValue::auto_type("300"), CellValue::Number(300.0));
        assert_eq!(CellValue::auto_type(" 12.5 "), CellValue::Number(12.5));
        assert_eq!(CellValue::auto_type("BUF"), CellValue::Text("BUF".to_string()));
        assert_eq!(CellValue::auto_type(" QB "), CellValue::Text("QB".to_string()));
    }

    #[test]
    fn test_non_finite_numbers_are_not_finite() {
        let nan = CellValue::auto_type("NaN");
        assert!(matches!(nan, CellValue::Number(_)));
        assert_eq!(nan.finite_number(), None);
        assert_eq!(nan.coerce_f64(), 0.0);
        assert_eq!(CellValue::auto_type("inf").coerce_f64(), 0.0);
    }

    #[test]
    fn test_coerce_degrades_to_zero() {
        assert_eq!(CellValue::Null.coerce_f64(), 0.0);
        assert_eq!(CellValue::from("n/a").coerce_f64(), 0.0);
        assert_eq!(CellValue::from("42").coerce_f64(), 42.0);
        assert_eq!(CellValue::from(7.5).coerce_f64(), 7.5);
    }

    #[test]
    fn test_as_i32() {
        assert_eq!(CellValue::from(2023.0).as_i32(), Some(2023));
        assert_eq!(CellValue::from(1.5).as_i32(), None);
        assert_eq!(CellValue::from("2023").as_i32(), None);
        assert_eq!(CellValue::Null.as_i32(), None);
    }

    #[test]
    fn test_display_matches_source_text() {
        assert_eq!(CellValue::from(2023.0).to_string(), "2023");
        assert_eq!(CellValue::from(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Null.label(), None);
    }

    #[test]
    fn test_matches_text() {
        assert!(CellValue::from(" wr ").matches_text("WR"));
        assert!(CellValue::from("QB").matches_text("qb "));
        assert!(!CellValue::from("QB").matches_text("RB"));
        assert!(CellValue::Null.matches_text(""));
    }

    #[test]
    fn test_key_identity() {
        assert_eq!(CellValue::from(1.0).key(), CellValue::from(1.0).key());
        assert_eq!(CellValue::from(0.0).key(), CellValue::from(-0.0).key());
        assert_ne!(CellValue::from(1.0).key(), CellValue::from("1").key());
        assert_ne!(CellValue::Null.key(), CellValue::from("").key());
    }
}
