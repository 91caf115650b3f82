//! Date boundaries of a filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use DateRange::{Between, DateIgnored, Since, Until};

/// Inclusive date window; `DateIgnored` lets every order through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    DateIgnored,
    /// From a given date onwards.
    Since(NaiveDate),
    /// Up to a given date.
    Until(NaiveDate),
    Between(NaiveDate, NaiveDate),
}

impl DateRange {
    /// Builds a range from two optional bounds.
    pub fn from_bounds(begin: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (begin, end) {
            (None, None) => DateIgnored,
            (Some(begin), None) => Since(begin),
            (None, Some(end)) => Until(end),
            (Some(begin), Some(end)) => Self::check_range(begin, end),
        }
    }

    /// Replaces the lower bound. A begin past the current end drops the end.
    pub fn with_begin(self, begin: NaiveDate) -> Self {
        match self {
            DateIgnored | Since(_) => Since(begin),
            Until(end) | Between(_, end) => Self::check_range(begin, end),
        }
    }

    /// Replaces the upper bound. An end before the current begin drops the begin.
    pub fn with_end(self, end: NaiveDate) -> Self {
        match self {
            DateIgnored | Until(_) => Until(end),
            Since(begin) | Between(begin, _) => {
                if end >= begin {
                    Between(begin, end)
                } else {
                    Until(end)
                }
            }
        }
    }

    pub fn begin(&self) -> Option<NaiveDate> {
        match self {
            Since(begin) | Between(begin, _) => Some(*begin),
            DateIgnored | Until(_) => None,
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match self {
            Until(end) | Between(_, end) => Some(*end),
            DateIgnored | Since(_) => None,
        }
    }

    pub fn is_restricted(&self) -> bool {
        !matches!(self, DateIgnored)
    }

    /// Undated orders never satisfy a restricted range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match (self, date) {
            (DateIgnored, _) => true,
            (_, None) => false,
            (Since(begin), Some(date)) => date >= *begin,
            (Until(end), Some(date)) => date <= *end,
            (Between(begin, end), Some(date)) => date >= *begin && date <= *end,
        }
    }

    fn check_range(begin: NaiveDate, end: NaiveDate) -> Self {
        if end >= begin {
            Between(begin, end)
        } else {
            Since(begin)
        }
    }
}
