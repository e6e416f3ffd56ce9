//! Availability windows declared by applicants.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::reconciliation::Reconcilable;

/// Validation errors for availability windows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityValidationError {
    #[error("availability start {from} is after end {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },
    #[error("date must use the YYYY-MM-DD format")]
    InvalidDate,
}

/// Server-assigned identifier of a stored window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityId(i64);

impl AvailabilityId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Inclusive date range. Unique per (owner, from, to).
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use recruitment::domain::AvailabilityWindow;
///
/// let from = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
/// let to = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
/// assert!(AvailabilityWindow::new(None, from, to).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    id: Option<AvailabilityId>,
    from_date: NaiveDate,
    to_date: NaiveDate,
}

impl AvailabilityWindow {
    pub fn new(
        id: Option<AvailabilityId>,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Self, AvailabilityValidationError> {
        if from_date > to_date {
            return Err(AvailabilityValidationError::InvertedRange {
                from: from_date,
                to: to_date,
            });
        }
        Ok(Self {
            id,
            from_date,
            to_date,
        })
    }

    /// Parse `YYYY-MM-DD` dates into a window.
    pub fn parse(id: Option<i64>, from: &str, to: &str) -> Result<Self, AvailabilityValidationError> {
        let parse = |raw: &str| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| AvailabilityValidationError::InvalidDate)
        };
        Self::new(id.map(AvailabilityId::new), parse(from)?, parse(to)?)
    }

    pub const fn id(&self) -> Option<AvailabilityId> {
        self.id
    }

    pub const fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub const fn to_date(&self) -> NaiveDate {
        self.to_date
    }
}

impl Reconcilable for AvailabilityWindow {
    type Key = (NaiveDate, NaiveDate);

    fn natural_key(&self) -> Self::Key {
        (self.from_date, self.to_date)
    }

    fn has_identity(&self) -> bool {
        self.id.is_some()
    }
}
