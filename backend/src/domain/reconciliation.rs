//! Set reconciliation for owner-scoped child collections.
//!
//! A plan turns the stored set and a caller's desired set into deletes,
//! upserts and inserts. Adapters execute a plan inside one transaction and
//! re-read the result; [`ReconciliationPlan::apply`] gives the same answer
//! in memory.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use serde_json::json;

use super::Error;

/// An item that can take part in reconciliation.
pub trait Reconcilable: Clone {
    /// Key identifying an item within one owner's set.
    type Key: Clone + Eq + Hash + Debug;

    fn natural_key(&self) -> Self::Key;

    /// Whether the item carries an identity, making it an update candidate.
    fn has_identity(&self) -> bool;
}

/// Desired set contained the same natural key twice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate entry for key {key}")]
pub struct DuplicateKey {
    pub key: String,
}

impl From<DuplicateKey> for Error {
    fn from(value: DuplicateKey) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "code": "duplicate_key", "key": value.key }))
    }
}

/// Work needed to turn the stored set into the desired set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationPlan<T: Reconcilable> {
    /// Keys present in storage but absent from the desired set.
    pub to_delete: Vec<T::Key>,
    /// Desired items with an identity, written by natural key.
    pub to_upsert: Vec<T>,
    /// Desired items without an identity whose key is not stored yet.
    pub to_insert: Vec<T>,
}

impl<T: Reconcilable> ReconciliationPlan<T> {
    /// Compute the plan for `desired` against `current`.
    ///
    /// Fails before touching anything when `desired` repeats a natural key.
    ///
    /// # Examples
    /// ```
    /// use recruitment::domain::{Competence, ReconciliationPlan};
    ///
    /// let current = vec![Competence::try_new(1, 2.0).unwrap(), Competence::try_new(2, 3.0).unwrap()];
    /// let desired = vec![Competence::try_new(1, 5.0).unwrap()];
    /// let plan = ReconciliationPlan::compute(&current, desired).unwrap();
    /// assert_eq!(plan.to_delete.len(), 1);
    /// assert_eq!(plan.to_upsert.len(), 1);
    /// ```
    pub fn compute(current: &[T], desired: Vec<T>) -> Result<Self, DuplicateKey> {
        let desired_keys = validate_unique(&desired)?;
        let current_keys: HashSet<T::Key> = current.iter().map(Reconcilable::natural_key).collect();

        let to_delete = current
            .iter()
            .map(Reconcilable::natural_key)
            .filter(|key| !desired_keys.contains(key))
            .collect();

        let (to_upsert, fresh): (Vec<T>, Vec<T>) =
            desired.into_iter().partition(Reconcilable::has_identity);
        let to_insert = fresh
            .into_iter()
            .filter(|item| !current_keys.contains(&item.natural_key()))
            .collect();

        Ok(Self {
            to_delete,
            to_upsert,
            to_insert,
        })
    }

    /// Whether the plan has no work to do.
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_upsert.is_empty() && self.to_insert.is_empty()
    }

    /// Apply the plan to an in-memory copy of the stored set.
    pub fn apply(self, current: Vec<T>) -> Vec<T> {
        let deleted: HashSet<T::Key> = self.to_delete.into_iter().collect();
        let mut result: Vec<T> = current
            .into_iter()
            .filter(|item| !deleted.contains(&item.natural_key()))
            .collect();
        for item in self.to_upsert {
            let key = item.natural_key();
            match result.iter_mut().find(|existing| existing.natural_key() == key) {
                Some(existing) => *existing = item,
                None => result.push(item),
            }
        }
        for item in self.to_insert {
            let key = item.natural_key();
            if !result.iter().any(|existing| existing.natural_key() == key) {
                result.push(item);
            }
        }
        result
    }
}

/// Reject a desired set that repeats a natural key.
pub fn ensure_unique_keys<T: Reconcilable>(items: &[T]) -> Result<(), DuplicateKey> {
    validate_unique(items).map(drop)
}

fn validate_unique<T: Reconcilable>(items: &[T]) -> Result<HashSet<T::Key>, DuplicateKey> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        let key = item.natural_key();
        if !seen.insert(key.clone()) {
            return Err(DuplicateKey {
                key: format!("{key:?}"),
            });
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    //! Planner behaviour independent of storage.
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        key: u8,
        id: Option<u32>,
        value: &'static str,
    }

    impl Reconcilable for Item {
        type Key = u8;

        fn natural_key(&self) -> u8 {
            self.key
        }

        fn has_identity(&self) -> bool {
            self.id.is_some()
        }
    }

    fn stored(key: u8, value: &'static str) -> Item {
        Item {
            key,
            id: Some(u32::from(key)),
            value,
        }
    }

    fn fresh(key: u8, value: &'static str) -> Item {
        Item {
            key,
            id: None,
            value,
        }
    }

    #[rstest]
    fn empty_desired_deletes_everything() {
        let current = vec![stored(1, "a"), stored(2, "b")];
        let plan = ReconciliationPlan::compute(&current, Vec::new()).expect("plan");
        assert_eq!(plan.to_delete, vec![1, 2]);
        assert!(plan.apply(current).is_empty());
    }

    #[rstest]
    fn partitions_by_identity() {
        let current = vec![stored(1, "a")];
        let desired = vec![stored(1, "a2"), fresh(3, "c")];
        let plan = ReconciliationPlan::compute(&current, desired).expect("plan");
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.to_upsert, vec![stored(1, "a2")]);
        assert_eq!(plan.to_insert, vec![fresh(3, "c")]);
    }

    #[rstest]
    fn fresh_item_matching_stored_key_is_a_no_op() {
        let current = vec![stored(1, "a")];
        let plan = ReconciliationPlan::compute(&current, vec![fresh(1, "a")]).expect("plan");
        assert!(plan.is_empty());
        assert_eq!(plan.apply(current.clone()), current);
    }

    #[rstest]
    fn duplicate_keys_are_rejected() {
        let err = ReconciliationPlan::compute(&[], vec![fresh(4, "x"), stored(4, "y")])
            .expect_err("duplicate key");
        assert_eq!(err.key, "4");
    }

    #[rstest]
    fn applying_twice_is_idempotent() {
        let current = vec![stored(1, "a"), stored(2, "b")];
        let desired = vec![stored(2, "b2"), fresh(5, "e")];
        let once = ReconciliationPlan::compute(&current, desired.clone())
            .expect("plan")
            .apply(current);
        let twice = ReconciliationPlan::compute(&once, desired)
            .expect("plan")
            .apply(once.clone());
        assert_eq!(once, twice);
    }
}
