//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Uniqueness lives in the schema, so these suites check that constraint
//! violations come back as `Duplicate` naming the clashing field and that
//! the identity already stored is left untouched.

use recruitment::domain::ports::{UserPersistenceError, UserRepository};
use recruitment::domain::{LoginIdentifier, PasswordHash};
use recruitment::outbound::persistence::DieselUserRepository;
use rstest::{fixture, rstest};

mod support;

use support::{TestDatabase, handle_cluster_setup_failure, sample_identity, test_database};

#[fixture]
fn database() -> Option<TestDatabase> {
    match test_database(2) {
        Ok(db) => Some(db),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn created_identity_is_found_by_every_login_form(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselUserRepository::new(db.pool.clone());
    let new_identity = sample_identity("0001");

    let created = db.block_on(repo.create(&new_identity)).expect("create");
    assert_eq!(created, new_identity.to_identity());

    for raw in ["ada0001", "ADA0001@example.com", "199001150001"] {
        let login = LoginIdentifier::detect(raw).expect("identifier");
        let stored = db
            .block_on(repo.find_by_login(&login))
            .expect("lookup")
            .unwrap_or_else(|| panic!("{raw} should resolve"));
        assert_eq!(stored.identity.id, created.id);
        assert_eq!(stored.password_hash, new_identity.password_hash);
    }
}

#[rstest]
fn duplicate_national_id_is_a_conflict_and_first_identity_survives(
    database: Option<TestDatabase>,
) {
    let Some(db) = database else { return };
    let repo = DieselUserRepository::new(db.pool.clone());
    let first = sample_identity("0002");
    db.block_on(repo.create(&first)).expect("first create");

    let mut second = sample_identity("0003");
    second.national_id = first.national_id.clone();
    second.password_hash = PasswordHash::new("fixture$other password");
    let err = db.block_on(repo.create(&second)).expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::duplicate("national_id"));

    let login = LoginIdentifier::detect(first.national_id.as_ref()).expect("identifier");
    let stored = db
        .block_on(repo.find_by_login(&login))
        .expect("lookup")
        .expect("first identity still stored");
    assert_eq!(stored.identity, first.to_identity());
    assert_eq!(stored.password_hash, first.password_hash);
    assert!(
        db.block_on(repo.find_by_id(&second.id))
            .expect("lookup")
            .is_none()
    );
}

#[rstest]
#[case("username")]
#[case("email")]
fn other_unique_columns_name_their_field(database: Option<TestDatabase>, #[case] field: &str) {
    let Some(db) = database else { return };
    let repo = DieselUserRepository::new(db.pool.clone());
    let first = sample_identity("0004");
    db.block_on(repo.create(&first)).expect("first create");

    let mut second = sample_identity("0005");
    match field {
        "username" => second.username = first.username.clone(),
        _ => second.email = first.email.clone(),
    }
    let err = db.block_on(repo.create(&second)).expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::duplicate(field));
}

#[rstest]
fn password_hash_update_reports_missing_rows(database: Option<TestDatabase>) {
    let Some(db) = database else { return };
    let repo = DieselUserRepository::new(db.pool.clone());
    let identity = sample_identity("0006");
    db.block_on(repo.create(&identity)).expect("create");

    let replacement = PasswordHash::new("fixture$new password");
    assert!(
        db.block_on(repo.update_password_hash(&identity.id, &replacement))
            .expect("update")
    );
    let missing = sample_identity("0007");
    assert!(
        !db.block_on(repo.update_password_hash(&missing.id, &replacement))
            .expect("update")
    );

    let login = LoginIdentifier::detect("19900115-0006").expect("identifier");
    let stored = db
        .block_on(repo.find_by_login(&login))
        .expect("lookup")
        .expect("stored");
    assert_eq!(stored.password_hash, replacement);
}
