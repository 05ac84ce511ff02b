//! Type-safe UPDATE statement builder using the typestate pattern.
//!
//! The statement is built as a chain of stages:
//!
//! ```text
//! Update ─┬─────────────────────────────┬─> UpdateTable<P> ─> UpdateSet<P> ─┬─────────────> terminal
//!         └─> UpdateConflict (OR ...) ──┘                      (set 1..n)   └─> UpdateWhere<P> ─> terminal
//! ```
//!
//! Every stage owns the statement built so far and hands it to the next one
//! by value, so a chain cannot be branched or finished twice. Bound values
//! are appended while the chain is built, in the order their placeholders
//! appear in the rendered text.

use core::marker::PhantomData;

use crate::schema::{TableInfo, TableRef};

use super::column::{Column, ColumnDef, Equivalent};
use super::conflict::ConflictAlgorithm;
use super::expr::{Expr, Node};
use super::select::IntoSubQuery;
use super::statement::{AsyncExecutor, CompiledStatement, Deferred, Executor};
use super::value::SqlValue;

/// One clause of the statement, rendered in construction order.
#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Keyword(&'static str),
    Conflict(ConflictAlgorithm),
    Table(TableInfo),
    Set(Vec<Expr>),
    Where(Expr),
}

impl Clause {
    fn append_sql(&self, sql: &mut String) {
        match self {
            Self::Keyword(keyword) => sql.push_str(keyword),
            Self::Conflict(algorithm) => sql.push_str(algorithm.as_sql()),
            Self::Table(table) => table.append_from_clause(sql),
            Self::Set(assignments) => {
                sql.push_str("SET ");
                for (i, assignment) in assignments.iter().enumerate() {
                    if i != 0 {
                        sql.push(',');
                    }
                    assignment.append_sql(sql);
                }
            }
            Self::Where(expr) => {
                sql.push_str("WHERE ");
                expr.append_sql(sql);
            }
        }
    }
}

/// The statement accumulated by a chain of stages.
#[derive(Debug, Clone, PartialEq)]
struct StatementChain {
    clauses: Vec<Clause>,
    args: Vec<SqlValue>,
    table: Option<TableInfo>,
}

impl StatementChain {
    fn update() -> Self {
        Self {
            clauses: vec![Clause::Keyword("UPDATE")],
            args: vec![],
            table: None,
        }
    }

    fn push_table(&mut self, table: &TableInfo) {
        self.clauses.push(Clause::Table(table.clone()));
        self.table = Some(table.clone());
    }

    fn push_assignment(&mut self, assignment: Expr) {
        assignment.add_args(&mut self.args);
        if let Some(Clause::Set(assignments)) = self.clauses.last_mut() {
            assignments.push(assignment);
        } else {
            self.clauses.push(Clause::Set(vec![assignment]));
        }
    }

    fn push_where(&mut self, expr: Expr) {
        expr.add_args(&mut self.args);
        self.clauses.push(Clause::Where(expr));
    }

    fn to_sql(&self) -> String {
        let mut sql = String::new();
        for (i, clause) in self.clauses.iter().enumerate() {
            if i != 0 {
                sql.push(' ');
            }
            clause.append_sql(&mut sql);
        }
        sql
    }

    fn compile(self) -> CompiledStatement {
        let sql = self.to_sql();
        let table = self.table.map(|t| t.name().to_string());
        CompiledStatement::new(sql, self.args, table)
    }
}

fn assignment_value<T, R, E, P>(column: &Column<T, R, E, P>, value: T) -> Expr {
    Node::Value {
        column: target(column),
        op: " = ?",
        value: column.to_sql_arg(value),
    }
    .into()
}

fn assignment_column<T, R, E, P, T2, R2, E2, P2>(
    column: &Column<T, R, E, P>,
    other: &Column<T2, R2, E2, P2>,
) -> Expr {
    Node::Column {
        column: target(column),
        op: "=",
        other: other.def().clone(),
    }
    .into()
}

fn assignment_select<T, R, E, P, S: IntoSubQuery>(column: &Column<T, R, E, P>, select: S) -> Expr {
    Node::Select {
        column: target(column),
        op: "=",
        select: select.into_subquery().into_raw(),
    }
    .into()
}

fn target<T, R, E, P>(column: &Column<T, R, E, P>) -> ColumnDef {
    column.def().clone().into_update_target()
}

/// Entry point of an UPDATE statement.
#[must_use = "an UPDATE needs a table and at least one assignment"]
pub struct Update {
    chain: StatementChain,
}

impl Update {
    /// Starts a plain UPDATE.
    pub fn new() -> Self {
        Self {
            chain: StatementChain::update(),
        }
    }

    /// Starts an `UPDATE OR <algorithm>`.
    pub fn with_conflict_algorithm(algorithm: ConflictAlgorithm) -> UpdateConflict {
        let mut chain = StatementChain::update();
        chain.clauses.push(Clause::Conflict(algorithm));
        UpdateConflict { chain }
    }

    /// Specifies the table to update.
    pub fn table<P>(self, table: &TableRef<P>) -> UpdateTable<P> {
        UpdateTable::new(self.chain, table)
    }
}

impl Default for Update {
    fn default() -> Self {
        Self::new()
    }
}

/// An UPDATE with a conflict algorithm, waiting for its table.
#[must_use = "an UPDATE needs a table and at least one assignment"]
pub struct UpdateConflict {
    chain: StatementChain,
}

impl UpdateConflict {
    /// Specifies the table to update.
    pub fn table<P>(self, table: &TableRef<P>) -> UpdateTable<P> {
        UpdateTable::new(self.chain, table)
    }
}

/// An UPDATE of table `P` without assignments yet.
#[must_use = "an UPDATE needs at least one assignment"]
pub struct UpdateTable<P> {
    chain: StatementChain,
    _table: PhantomData<fn() -> P>,
}

impl<P> UpdateTable<P> {
    fn new(mut chain: StatementChain, table: &TableRef<P>) -> Self {
        chain.push_table(table.info());
        Self {
            chain,
            _table: PhantomData,
        }
    }

    fn into_set(mut self, assignment: Expr) -> UpdateSet<P> {
        self.chain.push_assignment(assignment);
        UpdateSet {
            chain: self.chain,
            _table: PhantomData,
        }
    }

    /// Adds a SET assignment to a value.
    pub fn set<T, R, E>(self, column: &Column<T, R, E, P>, value: T) -> UpdateSet<P> {
        self.into_set(assignment_value(column, value))
    }

    /// Adds a SET assignment to another column.
    pub fn set_col<T, R, E, T2, R2, E2: Equivalent<E>, P2>(
        self,
        column: &Column<T, R, E, P>,
        other: &Column<T2, R2, E2, P2>,
    ) -> UpdateSet<P> {
        self.into_set(assignment_column(column, other))
    }

    /// Adds a SET assignment to the result of a subquery.
    pub fn set_select<T, R, E, S>(self, column: &Column<T, R, E, P>, select: S) -> UpdateSet<P>
    where
        S: IntoSubQuery,
        S::Equivalent: Equivalent<E>,
    {
        self.into_set(assignment_select(column, select))
    }
}

/// An UPDATE of table `P` with at least one assignment.
#[must_use = "an UPDATE does nothing until it is executed"]
pub struct UpdateSet<P> {
    chain: StatementChain,
    _table: PhantomData<fn() -> P>,
}

impl<P> UpdateSet<P> {
    /// Adds another SET assignment to a value.
    pub fn set<T, R, E>(mut self, column: &Column<T, R, E, P>, value: T) -> Self {
        self.chain.push_assignment(assignment_value(column, value));
        self
    }

    /// Adds another SET assignment to a column.
    pub fn set_col<T, R, E, T2, R2, E2: Equivalent<E>, P2>(
        mut self,
        column: &Column<T, R, E, P>,
        other: &Column<T2, R2, E2, P2>,
    ) -> Self {
        self.chain.push_assignment(assignment_column(column, other));
        self
    }

    /// Adds another SET assignment to the result of a subquery.
    pub fn set_select<T, R, E, S>(mut self, column: &Column<T, R, E, P>, select: S) -> Self
    where
        S: IntoSubQuery,
        S::Equivalent: Equivalent<E>,
    {
        self.chain.push_assignment(assignment_select(column, select));
        self
    }

    /// Adds the WHERE clause.
    pub fn where_clause(mut self, expr: Expr) -> UpdateWhere<P> {
        self.chain.push_where(expr);
        UpdateWhere {
            chain: self.chain,
            _table: PhantomData,
        }
    }
}

/// An UPDATE of table `P` restricted by a WHERE clause.
#[must_use = "an UPDATE does nothing until it is executed"]
pub struct UpdateWhere<P> {
    chain: StatementChain,
    _table: PhantomData<fn() -> P>,
}

macro_rules! impl_terminal {
    ($($stage:ident),+) => {$(
        impl<P> $stage<P> {
            /// Renders the SQL text. Rendering twice yields the same text.
            #[must_use]
            pub fn to_sql(&self) -> String {
                self.chain.to_sql()
            }

            /// Returns the values bound so far, in placeholder order.
            #[must_use]
            pub fn args(&self) -> &[SqlValue] {
                &self.chain.args
            }

            /// Builds the UPDATE statement and returns SQL with parameters.
            #[must_use]
            pub fn build(self) -> (String, Vec<SqlValue>) {
                self.compile().into_parts()
            }

            /// Freezes the UPDATE into a statement for an executor.
            #[must_use]
            pub fn compile(self) -> CompiledStatement {
                self.chain.compile()
            }

            /// Runs the UPDATE and returns the number of affected rows.
            ///
            /// # Errors
            ///
            /// Returns the executor's error.
            pub fn execute<X: Executor>(self, executor: &mut X) -> Result<u64, X::Error> {
                executor.execute(&self.compile())
            }

            /// Runs the UPDATE on an async executor and returns the number of
            /// affected rows.
            ///
            /// # Errors
            ///
            /// Returns the executor's error.
            #[allow(clippy::future_not_send)]
            pub async fn execute_async<X: AsyncExecutor>(self, executor: &X) -> Result<u64, X::Error> {
                executor.execute(&self.compile()).await
            }

            /// Returns a handle that runs the UPDATE once per subscription.
            pub fn deferred(self) -> Deferred {
                Deferred::new(self.compile())
            }
        }
    )+};
}

impl_terminal!(UpdateSet, UpdateWhere);
