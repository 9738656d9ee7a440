//! Shared traits and date windows for tracker primitives.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Half-open calendar window `[start, end)` used to scope reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end <= start {
            return Err(PeriodError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Builds the window covering a whole calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::InvalidMonth)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(PeriodError::InvalidMonth)?;
        Ok(Self { start, end })
    }

    /// Month window containing `date`.
    pub fn month_of(date: NaiveDate) -> Result<Self, PeriodError> {
        Self::month(date.year(), date.month())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`Period`] values.
pub enum PeriodError {
    InvalidRange,
    InvalidMonth,
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::InvalidRange => f.write_str("period end must be after start"),
            PeriodError::InvalidMonth => f.write_str("month is outside the calendar"),
        }
    }
}

impl std::error::Error for PeriodError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn december_rolls_into_next_year() {
        let period = Period::month(2024, 12).unwrap();
        assert_eq!(period.start, date(2024, 12, 1));
        assert_eq!(period.end, date(2025, 1, 1));
        assert!(period.contains(date(2024, 12, 31)));
        assert!(!period.contains(date(2025, 1, 1)));
    }

    #[test]
    fn rejects_inverted_and_impossible_windows() {
        assert_eq!(
            Period::new(date(2024, 3, 2), date(2024, 3, 1)),
            Err(PeriodError::InvalidRange)
        );
        assert_eq!(Period::month(2024, 13), Err(PeriodError::InvalidMonth));
    }

    #[test]
    fn month_of_covers_the_whole_month() {
        let period = Period::month_of(date(2024, 2, 17)).unwrap();
        assert_eq!(period, Period::month(2024, 2).unwrap());
        assert!(period.contains(date(2024, 2, 29)));
        assert_eq!(period.to_string(), "2024-02-01..2024-03-01");
    }
}
