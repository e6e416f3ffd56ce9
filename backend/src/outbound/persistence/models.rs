//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! reach the domain. Conversions into domain types re-run validation so a
//! corrupt row surfaces as a query error instead of an invalid value.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Application, ApplicationStatus, AvailabilityId, AvailabilityWindow, Competence, EmailAddress,
    Identity, NationalId, PasswordHash, PersonName, Role, StoredIdentity, UserId, Username,
};

use super::schema::{applications, availability, competence_profiles, users};

// ---------------------------------------------------------------------------
// Identity models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub national_id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl UserRow {
    pub(crate) fn into_stored(self) -> Result<StoredIdentity, String> {
        let identity = Identity {
            id: UserId::from_uuid(self.id),
            name: PersonName::for_field("name", &self.name).map_err(|err| err.to_string())?,
            surname: PersonName::for_field("surname", &self.surname)
                .map_err(|err| err.to_string())?,
            national_id: NationalId::new(self.national_id).map_err(|err| err.to_string())?,
            username: Username::new(self.username).map_err(|err| err.to_string())?,
            email: EmailAddress::new(self.email).map_err(|err| err.to_string())?,
            role: self.role.parse::<Role>().map_err(|err| err.to_string())?,
        };
        Ok(StoredIdentity {
            identity,
            password_hash: PasswordHash::new(self.password_hash),
        })
    }
}

/// Insertable struct for creating new identities.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub surname: &'a str,
    pub national_id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Profile models
// ---------------------------------------------------------------------------

/// Row struct for the competence_profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = competence_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompetenceRow {
    pub competence_type_id: i32,
    pub years_of_experience: f64,
}

impl TryFrom<CompetenceRow> for Competence {
    type Error = String;

    fn try_from(row: CompetenceRow) -> Result<Self, Self::Error> {
        Competence::try_new(row.competence_type_id, row.years_of_experience)
            .map_err(|err| err.to_string())
    }
}

/// Insertable struct for competence upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = competence_profiles)]
pub(crate) struct NewCompetenceRow {
    pub owner_id: Uuid,
    pub competence_type_id: i32,
    pub years_of_experience: f64,
}

/// Row struct for the availability table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = availability)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvailabilityRow {
    pub id: i64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl TryFrom<AvailabilityRow> for AvailabilityWindow {
    type Error = String;

    fn try_from(row: AvailabilityRow) -> Result<Self, Self::Error> {
        AvailabilityWindow::new(Some(AvailabilityId::new(row.id)), row.from_date, row.to_date)
            .map_err(|err| err.to_string())
    }
}

/// Insertable struct for availability windows. The id is assigned by the
/// database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = availability)]
pub(crate) struct NewAvailabilityRow {
    pub owner_id: Uuid,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Application models
// ---------------------------------------------------------------------------

/// Row struct for the applications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub owner_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = String;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            owner: UserId::from_uuid(row.owner_id),
            status: row
                .status
                .parse::<ApplicationStatus>()
                .map_err(|err| err.to_string())?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for application upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub owner_id: Uuid,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Row conversion guards.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn corrupt_status_is_reported() {
        let row = ApplicationRow {
            owner_id: Uuid::new_v4(),
            status: "pending".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let err = Application::try_from(row).expect_err("unknown status");
        assert!(err.contains("pending"));
    }

    #[rstest]
    fn inverted_availability_row_is_rejected() {
        let row = AvailabilityRow {
            id: 1,
            from_date: NaiveDate::from_ymd_opt(2026, 5, 2).expect("date"),
            to_date: NaiveDate::from_ymd_opt(2026, 5, 1).expect("date"),
        };
        assert!(AvailabilityWindow::try_from(row).is_err());
    }

    #[rstest]
    fn user_row_round_trips_into_identity() {
        let id = Uuid::new_v4();
        let row = UserRow {
            id,
            name: "Ada".into(),
            surname: "Lovelace".into(),
            national_id: "18151210-0001".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$2b$04$hash".into(),
            role: "admin".into(),
        };
        let stored = row.into_stored().expect("valid row");
        assert_eq!(stored.identity.id, UserId::from_uuid(id));
        assert_eq!(stored.identity.role, Role::Admin);
    }
}
