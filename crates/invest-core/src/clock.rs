//! Injectable current-date source
//!
//! Date defaulting is the first thing the pipeline resolves, so the clock is a
//! seam: production uses [`SystemClock`], tests pin a [`FixedClock`].

use crate::types::{DateRange, FiscalYear};
use chrono::{Datelike, NaiveDate};

/// Source of "today" for date and fiscal-year defaulting
pub trait Clock: Send + Sync {
    /// The current calendar date
    fn today(&self) -> NaiveDate;

    /// Default date range: the current calendar year
    fn default_range(&self) -> DateRange {
        DateRange::calendar_year(self.today().year())
    }

    /// Fiscal year derived from the current date
    fn current_fiscal_year(&self) -> FiscalYear {
        FiscalYear(self.today().year())
    }
}

/// Wall-clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// Fixed-date implementation for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_defaults() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());

        let range = clock.default_range();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(clock.current_fiscal_year(), FiscalYear(2026));
    }
}
