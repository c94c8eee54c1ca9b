use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use std::fmt;

/// Inclusive date range bounding what a reconciliation may delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(AppError::InvalidWindow(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Single-day window.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Smallest window covering every date yielded, or `None` when empty.
    pub fn spanning<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl DateWindow {
    /// Window from optional explicit bounds, falling back to the span of the
    /// input dates for any bound left out.
    pub fn resolve<I>(from: Option<NaiveDate>, to: Option<NaiveDate>, dates: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        if let (Some(s), Some(e)) = (from, to) {
            return Self::new(s, e);
        }

        let span = Self::spanning(dates).ok_or_else(|| {
            AppError::InvalidWindow("input has no dates; pass both --from and --to".to_string())
        })?;

        Self::new(from.unwrap_or(span.start), to.unwrap_or(span.end))
    }
}
