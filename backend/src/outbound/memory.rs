//! In-memory repositories.
//!
//! They back the server when no database URL is configured and double as
//! the stores for unit and handler tests. Each store enforces the same
//! invariants as the PostgreSQL schema: unique national id, username and
//! email; one application per owner; reconciliation applied atomically per
//! owner and re-read afterwards. Data lives only as long as the process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, ProfileRepository, ProfileRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Application, ApplicationWrite, AvailabilityId, AvailabilityWindow, Competence, Identity,
    LoginIdentifier, NewIdentity, PasswordHash, Reconcilable, ReconciliationPlan, StoredIdentity,
    UserId,
};

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> MutexGuard<'a, T> {
    // Writes never leave a store half-updated, so poisoned data is usable.
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!(store = name, "recovering poisoned in-memory store");
        poisoned.into_inner()
    })
}

/// Identity store enforcing the same unique columns as the database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<StoredIdentity>>,
}

impl InMemoryUserRepository {
    /// Number of stored identities.
    pub fn len(&self) -> usize {
        lock(&self.rows, "users").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored hash for `id`, for assertions on password resets.
    pub fn password_hash(&self, id: &UserId) -> Option<PasswordHash> {
        lock(&self.rows, "users")
            .iter()
            .find(|row| row.identity.id == *id)
            .map(|row| row.password_hash.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, identity: &NewIdentity) -> Result<Identity, UserPersistenceError> {
        let mut rows = lock(&self.rows, "users");
        for row in rows.iter() {
            let existing = &row.identity;
            if existing.national_id == identity.national_id {
                return Err(UserPersistenceError::duplicate("national_id"));
            }
            if existing.username == identity.username {
                return Err(UserPersistenceError::duplicate("username"));
            }
            if existing.email == identity.email {
                return Err(UserPersistenceError::duplicate("email"));
            }
        }
        let stored = StoredIdentity {
            identity: identity.to_identity(),
            password_hash: identity.password_hash.clone(),
        };
        rows.push(stored.clone());
        Ok(stored.identity)
    }

    async fn find_by_login(
        &self,
        login: &LoginIdentifier,
    ) -> Result<Option<StoredIdentity>, UserPersistenceError> {
        let rows = lock(&self.rows, "users");
        let found = rows.iter().find(|row| match login {
            LoginIdentifier::Email(email) => row.identity.email == *email,
            LoginIdentifier::NationalId(id) => row.identity.national_id == *id,
            LoginIdentifier::Username(name) => row.identity.username.as_ref() == name.as_str(),
        });
        Ok(found.cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, UserPersistenceError> {
        let rows = lock(&self.rows, "users");
        Ok(rows
            .iter()
            .find(|row| row.identity.id == *id)
            .map(|row| row.identity.clone()))
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        let mut rows = lock(&self.rows, "users");
        match rows.iter_mut().find(|row| row.identity.id == *id) {
            Some(row) => {
                row.password_hash = hash.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Profile store that runs reconciliation plans under one lock.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    competences: Mutex<HashMap<UserId, Vec<Competence>>>,
    availability: Mutex<HashMap<UserId, Vec<AvailabilityWindow>>>,
    next_id: Mutex<i64>,
}

impl InMemoryProfileRepository {
    fn assign_id(&self, window: AvailabilityWindow) -> AvailabilityWindow {
        if window.has_identity() {
            return window;
        }
        let mut next = lock(&self.next_id, "availability id");
        *next += 1;
        AvailabilityWindow::new(
            Some(AvailabilityId::new(*next)),
            window.from_date(),
            window.to_date(),
        )
        .unwrap_or(window)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn competences(&self, owner: &UserId) -> Result<Vec<Competence>, ProfileRepositoryError> {
        let mut items = lock(&self.competences, "competences")
            .get(owner)
            .cloned()
            .unwrap_or_default();
        items.sort_by_key(|item| item.competence_type_id);
        Ok(items)
    }

    async fn availability(
        &self,
        owner: &UserId,
    ) -> Result<Vec<AvailabilityWindow>, ProfileRepositoryError> {
        let mut items = lock(&self.availability, "availability")
            .get(owner)
            .cloned()
            .unwrap_or_default();
        items.sort_by_key(|window| window.natural_key());
        Ok(items)
    }

    async fn reconcile_competences(
        &self,
        owner: &UserId,
        desired: Vec<Competence>,
    ) -> Result<Vec<Competence>, ProfileRepositoryError> {
        {
            let mut store = lock(&self.competences, "competences");
            let current = store.get(owner).cloned().unwrap_or_default();
            let plan = ReconciliationPlan::compute(&current, desired)
                .map_err(|err| ProfileRepositoryError::query(err.to_string()))?;
            store.insert(*owner, plan.apply(current));
        }
        self.competences(owner).await
    }

    async fn reconcile_availability(
        &self,
        owner: &UserId,
        desired: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, ProfileRepositoryError> {
        {
            let mut store = lock(&self.availability, "availability");
            let current = store.get(owner).cloned().unwrap_or_default();
            let plan = ReconciliationPlan::compute(&current, desired)
                .map_err(|err| ProfileRepositoryError::query(err.to_string()))?;
            let applied = plan
                .apply(current)
                .into_iter()
                .map(|window| self.assign_id(window))
                .collect();
            store.insert(*owner, applied);
        }
        self.availability(owner).await
    }
}

/// Application store keyed by owner.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    rows: Mutex<HashMap<UserId, Application>>,
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn find(&self, owner: &UserId) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(lock(&self.rows, "applications").get(owner).cloned())
    }

    async fn upsert(
        &self,
        owner: &UserId,
        write: ApplicationWrite,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationRepositoryError> {
        let mut rows = lock(&self.rows, "applications");
        let updated = write.apply(rows.remove(owner), *owner, now);
        rows.insert(*owner, updated.clone());
        Ok(updated)
    }
}
