//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every test gets its own temporary database on a cluster shared across
//! the test binary, with the embedded migrations applied. The cluster
//! bootstrap must not run inside a Tokio runtime, so tests stay synchronous
//! and drive the repositories through [`PgDatabase::block_on`].
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; the suites then
//! print a skip marker instead of failing.

use std::future::Future;
use std::time::Duration;

use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

use fleetflow::outbound::persistence::{DbPool, PoolConfig, run_migrations};

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true" or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip or fail on a cluster setup error, depending on `SKIP_TEST_CLUSTER`.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(cluster) => return Ok(cluster),
            Err(err) if attempt < SHARED_CLUSTER_RETRIES => {
                eprintln!("pg-embed: shared cluster attempt {attempt} failed, retrying: {err}");
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
            Err(err) => return Err(err.to_string()),
        }
    }
}

/// A migrated temporary database with a pool and a runtime to drive it.
///
/// Fields drop in declaration order: the pool closes its connections before
/// the runtime stops and the temporary database is dropped last.
pub struct PgDatabase {
    pool: DbPool,
    runtime: Runtime,
    _database: TemporaryDatabase,
}

impl PgDatabase {
    fn provision() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = shared_cluster()?;
        let database = cluster
            .create_temporary_database()
            .map_err(|err| err.to_string())?;
        let url = database.url().to_owned();

        let pool = runtime.block_on(async {
            run_migrations(&url).await.map_err(|err| err.to_string())?;
            DbPool::new(PoolConfig::new(url.as_str()).with_max_size(2))
                .await
                .map_err(|err| err.to_string())
        })?;

        Ok(Self {
            pool,
            runtime,
            _database: database,
        })
    }

    /// A handle on the pool for building repositories.
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Run `future` to completion on this database's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Provision a fresh database, or `None` when the cluster is skipped.
pub fn pg_database() -> Option<PgDatabase> {
    match PgDatabase::provision() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
