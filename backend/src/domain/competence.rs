//! Competence records held in an applicant's profile.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::reconciliation::Reconcilable;

/// Upper bound on declared experience.
pub const MAX_YEARS_OF_EXPERIENCE: f64 = 100.0;

/// Validation errors for competence records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompetenceValidationError {
    #[error("competence type id must be a positive integer")]
    InvalidTypeId,
    #[error("years of experience must be a finite number between 0 and {max}")]
    InvalidYears { max: u32 },
}

/// Identifier of a competence type from the reference catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct CompetenceTypeId(i32);

impl CompetenceTypeId {
    pub fn new(raw: i32) -> Result<Self, CompetenceValidationError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(CompetenceValidationError::InvalidTypeId)
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for CompetenceTypeId {
    type Error = CompetenceValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CompetenceTypeId> for i32 {
    fn from(value: CompetenceTypeId) -> Self {
        value.0
    }
}

impl fmt::Display for CompetenceTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Years of experience, finite and within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct YearsOfExperience(f64);

impl YearsOfExperience {
    pub fn new(raw: f64) -> Result<Self, CompetenceValidationError> {
        if raw.is_finite() && (0.0..=MAX_YEARS_OF_EXPERIENCE).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(CompetenceValidationError::InvalidYears {
                max: MAX_YEARS_OF_EXPERIENCE as u32,
            })
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for YearsOfExperience {
    type Error = CompetenceValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<YearsOfExperience> for f64 {
    fn from(value: YearsOfExperience) -> Self {
        value.0
    }
}

/// One competence entry. Unique per (owner, competence type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competence {
    pub competence_type_id: CompetenceTypeId,
    pub years_of_experience: YearsOfExperience,
}

impl Competence {
    pub fn new(competence_type_id: CompetenceTypeId, years_of_experience: YearsOfExperience) -> Self {
        Self {
            competence_type_id,
            years_of_experience,
        }
    }

    /// Validate raw values into a record.
    pub fn try_new(type_id: i32, years: f64) -> Result<Self, CompetenceValidationError> {
        Ok(Self::new(
            CompetenceTypeId::new(type_id)?,
            YearsOfExperience::new(years)?,
        ))
    }
}

impl Reconcilable for Competence {
    type Key = CompetenceTypeId;

    fn natural_key(&self) -> CompetenceTypeId {
        self.competence_type_id
    }

    /// The type id is the identity, so every competence is written by upsert.
    fn has_identity(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ReconciliationPlan;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn type_id_must_be_positive(#[case] raw: i32) {
        assert_eq!(
            CompetenceTypeId::new(raw),
            Err(CompetenceValidationError::InvalidTypeId)
        );
    }

    #[rstest]
    #[case(-0.5)]
    #[case(100.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn years_must_be_finite_and_bounded(#[case] raw: f64) {
        assert!(YearsOfExperience::new(raw).is_err());
    }

    #[rstest]
    #[case(0.0)]
    #[case(2.5)]
    #[case(100.0)]
    fn years_accepts_range(#[case] raw: f64) {
        assert_eq!(YearsOfExperience::new(raw).map(YearsOfExperience::get), Ok(raw));
    }

    #[rstest]
    fn overwrites_and_deletes_by_type() {
        let current = vec![
            Competence::try_new(1, 2.0).expect("valid"),
            Competence::try_new(2, 3.0).expect("valid"),
        ];
        let desired = vec![Competence::try_new(1, 5.0).expect("valid")];
        let result = ReconciliationPlan::compute(&current, desired.clone())
            .expect("plan")
            .apply(current);
        assert_eq!(result, desired);
    }

    #[rstest]
    fn deserialising_rejects_invalid_values() {
        let payload = serde_json::json!({ "competenceTypeId": 0, "yearsOfExperience": 1.0 });
        assert!(serde_json::from_value::<Competence>(payload).is_err());
    }
}
