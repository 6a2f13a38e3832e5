//! Domain value types: canonical identifiers, date ranges, fiscal years

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical, primary-exchange-qualified instrument code (e.g. `VOD.L`)
///
/// A `Ric` is only ever produced by a resolver; data tool functions take
/// resolved identifiers and never free-text company names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ric(String);

impl Ric {
    /// Create an identifier from a code string
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The raw code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier carries the given exchange suffix (e.g. `.L`)
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }
}

impl fmt::Display for Ric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ric {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range
    pub start: NaiveDate,
    /// Last day of the range
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start` must not be after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if start > end {
            return Err(crate::Error::Config(format!(
                "invalid date range: {start} is after {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The range spanning Jan 1 through Dec 31 of the given year
    pub fn calendar_year(year: i32) -> Self {
        // Jan 1 / Dec 31 exist for every year chrono can represent
        let start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid start of year");
        let end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid end of year");
        Self { start, end }
    }

    /// Whether the given date falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Fiscal year key for ESG indicator lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiscalYear(pub i32);

impl FiscalYear {
    /// Fallback applied when neither the caller nor the clock yields an
    /// unambiguous fiscal year
    pub const FALLBACK: FiscalYear = FiscalYear(2025);

    /// The year as an integer
    pub fn year(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ric_suffix() {
        let ric = Ric::new("VOD.L");
        assert_eq!(ric.as_str(), "VOD.L");
        assert!(ric.has_suffix(".L"));
        assert!(!ric.has_suffix(".N"));
        assert_eq!(ric.to_string(), "VOD.L");
    }

    #[test]
    fn test_calendar_year_range() {
        let range = DateRange::calendar_year(2026);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(DateRange::new(start, end).is_err());
    }

    #[test]
    fn test_fiscal_year_fallback() {
        assert_eq!(FiscalYear::FALLBACK.year(), 2025);
        assert_eq!(FiscalYear(2024).to_string(), "2024");
    }

    #[test]
    fn test_ric_serde_transparent() {
        let ric = Ric::new("BT.L");
        assert_eq!(serde_json::to_string(&ric).unwrap(), "\"BT.L\"");
    }
}
