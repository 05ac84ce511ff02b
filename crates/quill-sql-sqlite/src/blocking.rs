//! Synchronous executor driving the async one on a private runtime.

use quill_sql_core::builder::{AsyncExecutor, CompiledStatement, Executor, Row};
use tokio::runtime::{Builder, Runtime};

use crate::config::SqliteConfig;
use crate::error::Result;
use crate::executor::SqliteExecutor;

/// Runs compiled statements synchronously.
///
/// Owns a current-thread Tokio runtime and blocks on it for every call, so it
/// must not be used from inside another async runtime.
pub struct BlockingExecutor {
    runtime: Runtime,
    inner: SqliteExecutor,
}

impl BlockingExecutor {
    /// Starts a runtime and opens a pool with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExecuteError::Runtime`] when the runtime cannot be
    /// started and [`crate::ExecuteError::Connect`] when the database cannot
    /// be opened.
    pub fn connect(config: &SqliteConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let inner = runtime.block_on(SqliteExecutor::connect(config))?;
        Ok(Self { runtime, inner })
    }

    /// Returns the async executor this one drives.
    #[must_use]
    pub const fn inner(&self) -> &SqliteExecutor {
        &self.inner
    }

    /// Runs a statement given as plain SQL without parameters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExecuteError::Statement`] when the engine rejects it.
    pub fn execute_sql(&mut self, sql: &str) -> Result<u64> {
        self.runtime.block_on(self.inner.execute_sql(sql))
    }
}

impl Executor for BlockingExecutor {
    type Error = crate::error::ExecuteError;

    fn execute(&mut self, statement: &CompiledStatement) -> Result<u64> {
        self.runtime.block_on(self.inner.execute(statement))
    }

    fn fetch_all(&mut self, statement: &CompiledStatement) -> Result<Vec<Row>> {
        self.runtime.block_on(self.inner.fetch_all(statement))
    }
}

impl std::fmt::Debug for BlockingExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingExecutor")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
