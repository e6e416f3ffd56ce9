//! `SKIP_TEST_CLUSTER` policy for the PostgreSQL-backed suites.
//!
//! Sandboxes without the permissions embedded PostgreSQL needs can opt out by
//! setting the variable; everywhere else a cluster failure is a test failure.

const SKIP_VARIABLE: &str = "SKIP_TEST_CLUSTER";

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes"]
        .iter()
        .any(|accepted| value.trim().eq_ignore_ascii_case(accepted))
}

/// Whether `SKIP_TEST_CLUSTER` is `1`, `true` or `yes` (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var(SKIP_VARIABLE).is_ok_and(|value| is_truthy(&value))
}

/// Return `None` with a skip marker when skipping is allowed, panic otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    assert!(
        should_skip_test_cluster(),
        "embedded PostgreSQL unavailable: {reason}; set {SKIP_VARIABLE}=1 to skip these suites"
    );
    eprintln!("{SKIP_VARIABLE}: skipping, {reason}");
    None
}
