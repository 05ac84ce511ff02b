//! # quill-sql-sqlite
//!
//! Runs `quill-sql-core` statements against SQLite through `sqlx`.
//!
//! - [`SqliteExecutor`] implements the core's async executor over a
//!   `SqlitePool`.
//! - [`BlockingExecutor`] implements the synchronous executor by driving a
//!   private Tokio runtime.
//! - [`SqliteConfig`] holds connection settings, optionally read from
//!   `QUILL_DATABASE_URL` and `QUILL_MAX_CONNECTIONS`.
//!
//! Engine errors are reported verbatim in [`ExecuteError::Statement`], next
//! to the SQL text that caused them. Every statement is logged at `debug`
//! level through `tracing`.
//!
//! ## Example
//!
//! ```rust
//! use quill_sql_core::builder::{Column, ConflictAlgorithm, Update};
//! use quill_sql_core::schema::{Table, TableRef};
//! use quill_sql_sqlite::{SqliteConfig, SqliteExecutor};
//!
//! struct Users;
//!
//! impl Table for Users {
//!     const NAME: &'static str = "users";
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let executor = SqliteExecutor::connect(&SqliteConfig::new()).await?;
//! executor
//!     .execute_sql("CREATE TABLE users (id INTEGER PRIMARY KEY, age INTEGER)")
//!     .await?;
//! executor.execute_sql("INSERT INTO users VALUES (1, 30)").await?;
//!
//! let id: Column<i64, i64, i64, Users> = Column::new("id");
//! let age: Column<i32, i32, i32, Users> = Column::new("age");
//!
//! let updated = Update::with_conflict_algorithm(ConflictAlgorithm::Abort)
//!     .table(&TableRef::<Users>::new())
//!     .set(&age, 31)
//!     .where_clause(id.eq(1))
//!     .execute_async(&executor)
//!     .await?;
//! assert_eq!(updated, 1);
//! # Ok::<(), quill_sql_sqlite::ExecuteError>(())
//! # }).unwrap();
//! ```

mod blocking;
mod config;
mod error;
mod executor;

pub use blocking::BlockingExecutor;
pub use config::{SqliteConfig, DATABASE_URL_VAR, MAX_CONNECTIONS_VAR};
pub use error::{ExecuteError, Result};
pub use executor::SqliteExecutor;
