//! Type-safe single-column SELECT builder using the typestate pattern.
//!
//! A single-column select is what comparison and assignment operators accept
//! as a subquery, and it reads values of the column's return type back
//! through an executor.

use core::marker::PhantomData;

use crate::schema::{TableInfo, TableRef};

use super::column::{Column, ColumnDef};
use super::expr::Expr;
use super::statement::{AsyncExecutor, CompiledStatement, Executor};
use super::value::{DecodeError, FromSqlValue, SqlValue};

// Typestate markers

/// Marker: No table specified yet.
pub struct NoFrom;
/// Marker: Table has been specified.
pub struct HasFrom;

/// Rendered SQL with its bound values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawSql {
    sql: String,
    args: Vec<SqlValue>,
}

impl RawSql {
    pub(crate) fn sql(&self) -> &str {
        &self.sql
    }

    pub(crate) fn args(&self) -> &[SqlValue] {
        &self.args
    }
}

/// A finished single-column SELECT usable as a subquery.
///
/// `E` is the equivalent type of the selected column. The subquery must
/// produce at most one row when compared against; the engine reports
/// violations when the statement runs.
pub struct SubQuery<E> {
    raw: RawSql,
    _equivalent: PhantomData<fn() -> E>,
}

impl<E> SubQuery<E> {
    pub(crate) fn into_raw(self) -> RawSql {
        self.raw
    }

    /// Returns the SQL string.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.raw.sql
    }

    /// Returns the parameters.
    #[must_use]
    pub fn args(&self) -> &[SqlValue] {
        &self.raw.args
    }
}

impl<E> Clone for SubQuery<E> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _equivalent: PhantomData,
        }
    }
}

impl<E> core::fmt::Debug for SubQuery<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubQuery").field("raw", &self.raw).finish()
    }
}

/// A type-safe single-column SELECT builder.
///
/// `R` is the read-back type of the selected column, `E` its equivalent type.
pub struct Select<R, E, From> {
    column: ColumnDef,
    distinct: bool,
    from: Option<TableInfo>,
    where_clause: Option<Expr>,
    order_by: Vec<(ColumnDef, bool)>,
    limit: Option<u64>,
    _state: PhantomData<fn() -> (R, E, From)>,
}

impl<R, E> Select<R, E, NoFrom> {
    /// Starts a SELECT of one column.
    #[must_use]
    pub fn column<T, P>(column: &Column<T, R, E, P>) -> Self {
        Self::start(column, false)
    }

    /// Starts a SELECT DISTINCT of one column.
    #[must_use]
    pub fn column_distinct<T, P>(column: &Column<T, R, E, P>) -> Self {
        Self::start(column, true)
    }

    fn start<T, P>(column: &Column<T, R, E, P>, distinct: bool) -> Self {
        Self {
            column: column.def().clone(),
            distinct,
            from: None,
            where_clause: None,
            order_by: vec![],
            limit: None,
            _state: PhantomData,
        }
    }

    /// Specifies the table to select from.
    #[must_use]
    pub fn from<P>(self, table: &TableRef<P>) -> Select<R, E, HasFrom> {
        Select {
            column: self.column,
            distinct: self.distinct,
            from: Some(table.info().clone()),
            where_clause: self.where_clause,
            order_by: self.order_by,
            limit: self.limit,
            _state: PhantomData,
        }
    }
}

impl<R, E> Select<R, E, HasFrom> {
    /// Adds a WHERE clause. A second call combines both with AND.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Adds an ORDER BY term.
    #[must_use]
    pub fn order_by<T2, R2, E2, P2>(mut self, column: &Column<T2, R2, E2, P2>, ascending: bool) -> Self {
        self.order_by.push((column.def().clone(), ascending));
        self
    }

    /// Sets the LIMIT clause.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Renders the SQL text.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        self.column.append_selection_sql(&mut sql);

        if let Some(table) = &self.from {
            sql.push_str(" FROM ");
            table.append_from_clause(&mut sql);
        }

        if let Some(where_expr) = &self.where_clause {
            sql.push_str(" WHERE ");
            where_expr.append_sql(&mut sql);
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, (column, ascending)) in self.order_by.iter().enumerate() {
                if i != 0 {
                    sql.push_str(", ");
                }
                column.append_sql(&mut sql);
                if !ascending {
                    sql.push_str(" DESC");
                }
            }
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        sql
    }

    /// Returns the bound values in placeholder order.
    #[must_use]
    pub fn args(&self) -> Vec<SqlValue> {
        self.where_clause
            .as_ref()
            .map(Expr::args)
            .unwrap_or_default()
    }

    /// Builds the SELECT statement and returns SQL with parameters.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        (self.to_sql(), self.args())
    }

    /// Freezes the SELECT into a statement for an executor.
    #[must_use]
    pub fn compile(self) -> CompiledStatement {
        let table = self.from.as_ref().map(|t| t.name().to_string());
        let (sql, args) = self.build();
        CompiledStatement::new(sql, args, table)
    }

    /// Turns the SELECT into a subquery.
    #[must_use]
    pub fn into_subquery(self) -> SubQuery<E> {
        let (sql, args) = self.build();
        SubQuery {
            raw: RawSql { sql, args },
            _equivalent: PhantomData,
        }
    }
}

impl<R: FromSqlValue, E> Select<R, E, HasFrom> {
    /// Runs the SELECT and decodes the first column of every row.
    ///
    /// # Errors
    ///
    /// Returns the executor's error, or a decode failure converted into it.
    pub fn fetch_all<X>(self, executor: &mut X) -> Result<Vec<R>, X::Error>
    where
        X: Executor,
        X::Error: From<DecodeError>,
    {
        let rows = executor.fetch_all(&self.compile())?;
        decode_rows(rows).map_err(Into::into)
    }

    /// Runs the SELECT on an async executor and decodes the first column of
    /// every row.
    ///
    /// # Errors
    ///
    /// Returns the executor's error, or a decode failure converted into it.
    #[allow(clippy::future_not_send)]
    pub async fn fetch_all_async<X>(self, executor: &X) -> Result<Vec<R>, X::Error>
    where
        X: AsyncExecutor,
        X::Error: From<DecodeError>,
    {
        let rows = executor.fetch_all(&self.compile()).await?;
        decode_rows(rows).map_err(Into::into)
    }
}

fn decode_rows<R: FromSqlValue>(rows: Vec<Vec<SqlValue>>) -> Result<Vec<R>, DecodeError> {
    rows.into_iter()
        .map(|row| R::from_sql_value(row.into_iter().next().unwrap_or(SqlValue::Null)))
        .collect()
}

/// Values accepted where a subquery is expected.
pub trait IntoSubQuery {
    /// Equivalent type of the selected column.
    type Equivalent;

    /// Converts into a subquery.
    fn into_subquery(self) -> SubQuery<Self::Equivalent>;
}

impl<E> IntoSubQuery for SubQuery<E> {
    type Equivalent = E;

    fn into_subquery(self) -> SubQuery<E> {
        self
    }
}

impl<R, E> IntoSubQuery for Select<R, E, HasFrom> {
    type Equivalent = E;

    fn into_subquery(self) -> SubQuery<E> {
        Self::into_subquery(self)
    }
}
