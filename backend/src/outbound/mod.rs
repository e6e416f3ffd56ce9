//! Driven adapters behind the domain ports.
//!
//! `persistence` stores identities, competence profiles, availability and
//! applications in PostgreSQL through Diesel; `security` hashes passwords
//! with bcrypt and signs access and refresh tokens as HS256 JWTs. `memory`
//! holds the same repositories in process memory for database-less runs.

pub mod memory;
pub mod persistence;
pub mod security;
