//! Job applications and their review status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::user::UserId;
use super::Error;

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Unhandled,
    Accepted,
    Rejected,
}

/// Status text outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status `{value}`")]
pub struct UnknownStatus {
    pub value: String,
}

impl From<UnknownStatus> for Error {
    fn from(value: UnknownStatus) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": "status",
            "allowed": ApplicationStatus::ALL.map(ApplicationStatus::as_str),
        }))
    }
}

impl ApplicationStatus {
    pub const ALL: [Self; 3] = [Self::Unhandled, Self::Accepted, Self::Rejected];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unhandled => "unhandled",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a reviewer may move an application from `self` to `next`.
    ///
    /// No status is terminal; reviewers may revise decisions freely.
    pub const fn can_transition(self, _next: Self) -> bool {
        true
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus { value: s.to_owned() })
    }
}

/// Stored application, one per applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub owner: UserId,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What an upsert should do to the stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationWrite {
    /// Create as unhandled if absent, otherwise only refresh `updated_at`.
    Touch,
    /// Create or overwrite with the given status.
    SetStatus(ApplicationStatus),
}

impl ApplicationWrite {
    /// Status a newly created row receives.
    pub const fn initial_status(self) -> ApplicationStatus {
        match self {
            Self::Touch => ApplicationStatus::Unhandled,
            Self::SetStatus(status) => status,
        }
    }

    /// Apply the write to an existing application in memory.
    pub fn apply(self, existing: Option<Application>, owner: UserId, now: DateTime<Utc>) -> Application {
        match existing {
            None => Application {
                owner,
                status: self.initial_status(),
                created_at: now,
                updated_at: now,
            },
            Some(mut application) => {
                if let Self::SetStatus(status) = self {
                    application.status = status;
                }
                application.updated_at = now;
                application
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeDelta;
    use rstest::rstest;

    #[rstest]
    #[case("unhandled", ApplicationStatus::Unhandled)]
    #[case("accepted", ApplicationStatus::Accepted)]
    #[case("rejected", ApplicationStatus::Rejected)]
    fn parses_known_statuses(#[case] raw: &str, #[case] expected: ApplicationStatus) {
        assert_eq!(raw.parse::<ApplicationStatus>(), Ok(expected));
    }

    #[rstest]
    #[case("Accepted")]
    #[case("pending")]
    #[case("")]
    fn rejects_unknown_statuses(#[case] raw: &str) {
        let err = raw.parse::<ApplicationStatus>().expect_err("unknown status");
        assert_eq!(Error::from(err).code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn every_transition_is_allowed() {
        for from in ApplicationStatus::ALL {
            for to in ApplicationStatus::ALL {
                assert!(from.can_transition(to), "{from} -> {to}");
            }
        }
    }

    #[rstest]
    fn touch_creates_unhandled_then_keeps_status() {
        let owner = UserId::random();
        let t0 = Utc::now();
        let created = ApplicationWrite::Touch.apply(None, owner, t0);
        assert_eq!(created.status, ApplicationStatus::Unhandled);

        let accepted = ApplicationWrite::SetStatus(ApplicationStatus::Accepted).apply(
            Some(created),
            owner,
            t0 + TimeDelta::seconds(5),
        );
        let touched = ApplicationWrite::Touch.apply(Some(accepted), owner, t0 + TimeDelta::seconds(9));
        assert_eq!(touched.status, ApplicationStatus::Accepted);
        assert_eq!(touched.created_at, t0);
        assert_eq!(touched.updated_at, t0 + TimeDelta::seconds(9));
    }
}
