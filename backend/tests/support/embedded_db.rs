//! Embedded PostgreSQL provisioning for integration tests.
//!
//! A single shared cluster serves the whole test binary. Each test receives a
//! throwaway database cloned from a template that already has the crate's
//! migrations applied, keeping per-test setup to a `CREATE DATABASE`.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const TEMPLATE_PREFIX: &str = "market_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);
const BOOTSTRAP_RETRIES: usize = 5;
const BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Return the shared embedded cluster, bootstrapping it on first use.
///
/// `postgresql_embedded` rolls a fresh random password per process. Pinning
/// one via `PG_PASSWORD` keeps a data directory left over from an earlier run
/// accepting connections instead of failing with 28P01.
pub fn shared_cluster() -> BootstrapResult<&'static ClusterHandle> {
    if std::env::var_os("PG_PASSWORD").is_none() {
        std::env::set_var("PG_PASSWORD", "market_embedded_test");
    }

    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if attempt >= BOOTSTRAP_RETRIES {
                    return Err(error);
                }
                std::thread::sleep(BOOTSTRAP_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Template name keyed on the migration contents so schema changes invalidate
/// stale templates.
fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short_hash}"))
}

fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn =
        PgConnection::establish(url).map_err(|err| format!("connect for migration: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("run migrations: {err}"))?;
    Ok(())
}

/// Creates or reuses a template database with the migrations applied.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        migrate_schema(&cluster.connection().database_url(&template_name))?;
    }
    Ok(template_name)
}

/// Provision a throwaway database cloned from the migrated template.
pub fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = None;
    for attempt in 1..=PROVISION_RETRIES {
        let result = ensure_template_database(cluster).and_then(|template| {
            let db_name = format!("test_{}", Uuid::new_v4());
            cluster
                .temporary_database_from_template(db_name.as_str(), template.as_str())
                .map_err(|err| {
                    format!("clone template: attempt {attempt}/{PROVISION_RETRIES}: {err:?}")
                })
        });
        match result {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }

    Err(last_error.unwrap_or_else(|| "clone template: exhausted retries".to_owned()))
}
