//! Error types for running statements against SQLite.

use quill_sql_core::builder::DecodeError;
use thiserror::Error;

/// Errors raised while connecting to SQLite or running a statement.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The pool could not be opened.
    #[error("cannot connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// The engine rejected a statement. The engine's diagnostic is kept
    /// verbatim as the source.
    #[error("statement failed: {sql}: {source}")]
    Statement {
        /// The SQL text that was sent.
        sql: String,
        /// The engine error.
        #[source]
        source: sqlx::Error,
    },

    /// A value read back did not match the requested type.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A column holds a value of a storage class that cannot be read back.
    #[error("unsupported type {type_name} in column '{column}'")]
    UnsupportedType {
        /// Name of the result column.
        column: String,
        /// Storage class reported by the engine.
        type_name: String,
    },

    /// A configuration value could not be parsed.
    #[error("invalid value '{value}' for {key}")]
    InvalidConfig {
        /// The configuration key.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The blocking runtime could not be started.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Result type alias for executor operations.
pub type Result<T> = std::result::Result<T, ExecuteError>;
