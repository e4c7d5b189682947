//! Request validation: cell counts and titles

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, SheetError};

/// A validated, positive cell count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCount(NonZeroU32);

impl CellCount {
    pub fn new(count: u32) -> Result<Self> {
        NonZeroU32::new(count)
            .map(Self)
            .ok_or_else(|| SheetError::InvalidInput("cell count must be at least 1".into()))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for CellCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for CellCount {
    type Error = SheetError;

    fn try_from(value: i64) -> Result<Self> {
        let count = u32::try_from(value)
            .map_err(|_| SheetError::InvalidInput(format!("cell count {value} is out of range")))?;
        Self::new(count)
    }
}

impl TryFrom<f64> for CellCount {
    type Error = SheetError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(SheetError::InvalidInput(format!(
                "cell count must be a whole number, got {value}"
            )));
        }
        if value < 1.0 || value > f64::from(u32::MAX) {
            return Err(SheetError::InvalidInput(format!(
                "cell count {value} is out of range"
            )));
        }
        Self::new(value as u32)
    }
}

impl FromStr for CellCount {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
            return Err(SheetError::InvalidInput(format!(
                "'{trimmed}' is not a whole number"
            )));
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| SheetError::InvalidInput(format!("'{trimmed}' is not a whole number")))?;
        Self::try_from(value)
    }
}

/// One generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRequest {
    pub total_cells: CellCount,
    /// Trimmed, NFC-composed title; `None` when absent or blank
    pub title: Option<String>,
}

impl SheetRequest {
    pub fn new(total_cells: CellCount) -> Self {
        Self {
            total_cells,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl AsRef<str>) -> Self {
        let title = title.as_ref().trim();
        self.title = (!title.is_empty()).then(|| title.nfc().collect());
        self
    }

    /// Check the request against the caller's upper bound
    pub fn check_bound(&self, max_cells: u32) -> Result<()> {
        if self.total_cells.get() > max_cells {
            return Err(SheetError::InvalidInput(format!(
                "cell count {} exceeds the maximum of {max_cells}",
                self.total_cells
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert!(matches!(CellCount::new(0), Err(SheetError::InvalidInput(_))));
        assert!(matches!(CellCount::try_from(-5i64), Err(SheetError::InvalidInput(_))));
        assert!(matches!(CellCount::try_from(0i64), Err(SheetError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_non_integer() {
        assert!(matches!(CellCount::try_from(2.5f64), Err(SheetError::InvalidInput(_))));
        assert!(matches!(CellCount::try_from(f64::NAN), Err(SheetError::InvalidInput(_))));
        assert!(matches!("12.0".parse::<CellCount>(), Err(SheetError::InvalidInput(_))));
        assert!(matches!("abc".parse::<CellCount>(), Err(SheetError::InvalidInput(_))));
        assert!(matches!("".parse::<CellCount>(), Err(SheetError::InvalidInput(_))));
    }

    #[test]
    fn test_accepts_whole_numbers() {
        assert_eq!(CellCount::try_from(130.0f64).unwrap().get(), 130);
        assert_eq!(" 42 ".parse::<CellCount>().unwrap().get(), 42);
        assert_eq!(CellCount::try_from(1000i64).unwrap().to_string(), "1000");
    }

    #[test]
    fn test_bound_is_caller_policy() {
        let request = SheetRequest::new(CellCount::new(1001).unwrap());
        assert!(matches!(request.check_bound(1000), Err(SheetError::InvalidInput(_))));
        assert!(request.check_bound(2000).is_ok());
    }

    #[test]
    fn test_blank_title_is_absent() {
        let request = SheetRequest::new(CellCount::new(5).unwrap()).with_title("   ");
        assert_eq!(request.title, None);

        let request = SheetRequest::new(CellCount::new(5).unwrap()).with_title("  Quiz 4 ");
        assert_eq!(request.title.as_deref(), Some("Quiz 4"));
    }

    #[test]
    fn test_title_is_composed() {
        let request = SheetRequest::new(CellCount::new(5).unwrap()).with_title("Cafe\u{301}");
        assert_eq!(request.title.as_deref(), Some("Caf\u{e9}"));
    }
}
