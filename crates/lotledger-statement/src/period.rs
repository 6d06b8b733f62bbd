//! Reporting period and opening-balance partition.
//!
//! A period is an inclusive `[start, end]` date window; a missing bound is
//! open-ended. Entries dated before the window collapse into the opening
//! balance, entries inside it become statement rows, entries after it are
//! discarded (live reports pick `end = today` or later).

use chrono::NaiveDate;
use lotledger_core::Entry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An inclusive reporting window, open-ended on either side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First day included, or unbounded when `None`.
    pub start: Option<NaiveDate>,
    /// Last day included, or unbounded when `None`.
    pub end: Option<NaiveDate>,
}

impl Period {
    /// The window covering all of time.
    pub const UNBOUNDED: Self = Self {
        start: None,
        end: None,
    };

    /// Bounded on both sides.
    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Bounded below only.
    #[must_use]
    pub const fn since(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Bounded above only.
    #[must_use]
    pub const fn until(end: NaiveDate) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Is the date before the window (opening-balance territory)?
    #[must_use]
    pub fn precedes(&self, date: NaiveDate) -> bool {
        self.start.is_some_and(|s| date < s)
    }

    /// Is the date inside the window?
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        !self.precedes(date) && !self.follows(date)
    }

    /// Is the date after the window?
    #[must_use]
    pub fn follows(&self, date: NaiveDate) -> bool {
        self.end.is_some_and(|e| date > e)
    }
}

/// Result of splitting an entry list against a [`Period`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Net balance carried in from before the window.
    pub opening_balance: Decimal,
    /// In-window entries, date ascending, stream order preserved per date.
    pub entries: Vec<Entry>,
}

/// Split entries into an opening balance and in-window rows.
///
/// Each entry contributes `credit - debit`. Pre-window entries are summed
/// into the opening balance and excluded from the row set; post-window
/// entries contribute nothing at all.
#[must_use]
pub fn partition(entries: Vec<Entry>, period: Period) -> Partition {
    let mut opening_balance = Decimal::ZERO;
    let mut kept = Vec::with_capacity(entries.len());

    for entry in entries {
        if period.precedes(entry.date) {
            opening_balance += entry.delta();
        } else if period.contains(entry.date) {
            kept.push(entry);
        }
    }
    kept.sort_by_key(|e| e.date);

    Partition {
        opening_balance,
        entries: kept,
    }
}
