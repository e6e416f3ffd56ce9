//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered identities. `national_id`, `username` and `email` are each
    /// unique.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        surname -> Varchar,
        national_id -> Varchar,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reference catalogue of competence types.
    competence_types (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// One row per (owner, competence type).
    competence_profiles (owner_id, competence_type_id) {
        owner_id -> Uuid,
        competence_type_id -> Int4,
        years_of_experience -> Float8,
    }
}

diesel::table! {
    /// Availability windows, unique per (owner, from_date, to_date).
    availability (id) {
        id -> Int8,
        owner_id -> Uuid,
        from_date -> Date,
        to_date -> Date,
    }
}

diesel::table! {
    /// One application per owner.
    applications (owner_id) {
        owner_id -> Uuid,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(competence_profiles -> users (owner_id));
diesel::joinable!(competence_profiles -> competence_types (competence_type_id));
diesel::joinable!(availability -> users (owner_id));
diesel::joinable!(applications -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    competence_types,
    competence_profiles,
    availability,
    applications,
);
