//! Async executor over a SQLite pool.

use quill_sql_core::builder::{AsyncExecutor, CompiledStatement, Row, SqlValue};
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{Column as _, Row as _, Sqlite, TypeInfo as _, ValueRef as _};
use tracing::{debug, warn};

use crate::config::SqliteConfig;
use crate::error::{ExecuteError, Result};

/// Runs compiled statements on a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Creates an executor over an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Connect`] when the database cannot be opened.
    pub async fn connect(config: &SqliteConfig) -> Result<Self> {
        Ok(Self::new(config.connect().await?))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs a statement given as plain SQL without parameters, such as DDL.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Statement`] when the engine rejects it.
    pub async fn execute_sql(&self, sql: &str) -> Result<u64> {
        let statement = CompiledStatement::new(String::from(sql), vec![], None);
        self.execute(&statement).await
    }
}

impl AsyncExecutor for SqliteExecutor {
    type Error = ExecuteError;

    async fn execute(&self, statement: &CompiledStatement) -> Result<u64> {
        log_statement(statement);
        let result = bind_all(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| rejected(statement, e))?;
        let rows = result.rows_affected();
        debug!(rows, "Statement executed");
        Ok(rows)
    }

    async fn fetch_all(&self, statement: &CompiledStatement) -> Result<Vec<Row>> {
        log_statement(statement);
        let rows = bind_all(statement)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| rejected(statement, e))?;
        debug!(rows = rows.len(), "Rows fetched");
        rows.iter().map(|row| decode_row(statement, row)).collect()
    }
}

fn log_statement(statement: &CompiledStatement) {
    debug!(
        sql = %statement.sql(),
        args = statement.args().len(),
        table = statement.table().unwrap_or_default(),
        "Executing SQL"
    );
}

fn rejected(statement: &CompiledStatement, source: sqlx::Error) -> ExecuteError {
    warn!(sql = %statement.sql(), error = %source, "Statement rejected");
    ExecuteError::Statement {
        sql: statement.sql().to_string(),
        source,
    }
}

fn bind_all(
    statement: &CompiledStatement,
) -> sqlx::query::Query<'_, Sqlite, SqliteArguments<'_>> {
    statement
        .args()
        .iter()
        .cloned()
        .fold(sqlx::query(statement.sql()), bind_param)
}

/// Binds a SqlValue parameter to a raw query.
fn bind_param<'q>(
    query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

/// Converts a result row to values by the storage class of each cell.
fn decode_row(statement: &CompiledStatement, row: &SqliteRow) -> Result<Row> {
    (0..row.len())
        .map(|index| decode_cell(statement, row, index))
        .collect()
}

fn decode_cell(statement: &CompiledStatement, row: &SqliteRow, index: usize) -> Result<SqlValue> {
    let engine = |source: sqlx::Error| rejected(statement, source);
    let raw = row.try_get_raw(index).map_err(engine)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => SqlValue::Int(row.try_get_unchecked(index).map_err(engine)?),
        "REAL" => SqlValue::Float(row.try_get_unchecked(index).map_err(engine)?),
        "TEXT" => SqlValue::Text(row.try_get_unchecked(index).map_err(engine)?),
        "BLOB" => SqlValue::Blob(row.try_get_unchecked(index).map_err(engine)?),
        _ => {
            return Err(ExecuteError::UnsupportedType {
                column: row.column(index).name().to_string(),
                type_name,
            })
        }
    };
    Ok(value)
}
