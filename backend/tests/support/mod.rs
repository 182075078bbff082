//! Shared helpers for the embedded-PostgreSQL integration suite.
//!
//! Integration tests compile as separate crates under `tests/`, so helpers
//! that would otherwise be copy/pasted between suites live here.

pub mod embedded_db;

/// Render a `postgres` error with its SQLSTATE and message when available.
///
/// The default `Display` output often collapses database failures to a bare
/// `db error`, which hides what actually went wrong.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );

    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }

    summary
}

/// True when `SKIP_TEST_CLUSTER` is set to "1", "true", or "yes"
/// (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Turn a cluster bootstrap failure into either a skip or a hard failure.
///
/// Opting out requires `SKIP_TEST_CLUSTER=1`; anything else panics so CI
/// breakage is not silently masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
