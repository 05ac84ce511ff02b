//! The boundary between building and running a statement.
//!
//! A finished builder stage is frozen into a [`CompiledStatement`] and handed
//! to an [`Executor`] or [`AsyncExecutor`]. The core never talks to a
//! database itself.

use super::value::SqlValue;

/// One result row, column values in projection order.
pub type Row = Vec<SqlValue>;

/// A frozen statement: SQL text, bound values and the table it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    sql: String,
    args: Vec<SqlValue>,
    table: Option<String>,
}

impl CompiledStatement {
    /// Creates a statement from its parts.
    #[must_use]
    pub const fn new(sql: String, args: Vec<SqlValue>, table: Option<String>) -> Self {
        Self { sql, args, table }
    }

    /// Returns the SQL string.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the bound values, in placeholder order.
    #[must_use]
    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }

    /// Returns the name of the table the statement reads or writes.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Splits the statement into SQL and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.args)
    }
}

/// Runs compiled statements synchronously.
pub trait Executor {
    /// The error reported by the engine.
    type Error;

    /// Runs a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the statement is rejected.
    fn execute(&mut self, statement: &CompiledStatement) -> Result<u64, Self::Error>;

    /// Runs a query and returns every row.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the query is rejected.
    fn fetch_all(&mut self, statement: &CompiledStatement) -> Result<Vec<Row>, Self::Error>;
}

/// Runs compiled statements asynchronously.
#[allow(async_fn_in_trait)]
pub trait AsyncExecutor {
    /// The error reported by the engine.
    type Error;

    /// Runs a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the statement is rejected.
    async fn execute(&self, statement: &CompiledStatement) -> Result<u64, Self::Error>;

    /// Runs a query and returns every row.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the query is rejected.
    async fn fetch_all(&self, statement: &CompiledStatement) -> Result<Vec<Row>, Self::Error>;
}

/// A statement waiting for a subscriber.
///
/// Building happened once, when the chain was finished. Each subscription
/// runs the statement once, and only when the returned future is polled;
/// dropping the future before that cancels the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred {
    statement: CompiledStatement,
}

impl Deferred {
    pub(crate) const fn new(statement: CompiledStatement) -> Self {
        Self { statement }
    }

    /// Returns the statement this handle will run.
    #[must_use]
    pub const fn statement(&self) -> &CompiledStatement {
        &self.statement
    }

    /// Runs the statement on an async executor and yields the affected row
    /// count.
    ///
    /// # Errors
    ///
    /// Returns the executor's error.
    #[allow(clippy::future_not_send)]
    pub async fn subscribe<X: AsyncExecutor>(&self, executor: &X) -> Result<u64, X::Error> {
        executor.execute(&self.statement).await
    }

    /// Runs the statement on a synchronous executor.
    ///
    /// # Errors
    ///
    /// Returns the executor's error.
    pub fn subscribe_blocking<X: Executor>(&self, executor: &mut X) -> Result<u64, X::Error> {
        executor.execute(&self.statement)
    }

    /// Returns the wrapped statement.
    #[must_use]
    pub fn into_statement(self) -> CompiledStatement {
        self.statement
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records every statement it is asked to run.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) seen: RefCell<Vec<CompiledStatement>>,
        pub(crate) rows: Vec<Row>,
    }

    impl Executor for Recorder {
        type Error = crate::builder::DecodeError;

        fn execute(&mut self, statement: &CompiledStatement) -> Result<u64, Self::Error> {
            self.seen.borrow_mut().push(statement.clone());
            Ok(1)
        }

        fn fetch_all(&mut self, statement: &CompiledStatement) -> Result<Vec<Row>, Self::Error> {
            self.seen.borrow_mut().push(statement.clone());
            Ok(self.rows.clone())
        }
    }

    impl AsyncExecutor for Recorder {
        type Error = crate::builder::DecodeError;

        async fn execute(&self, statement: &CompiledStatement) -> Result<u64, Self::Error> {
            self.seen.borrow_mut().push(statement.clone());
            Ok(1)
        }

        async fn fetch_all(&self, statement: &CompiledStatement) -> Result<Vec<Row>, Self::Error> {
            self.seen.borrow_mut().push(statement.clone());
            Ok(self.rows.clone())
        }
    }

    fn statement() -> CompiledStatement {
        CompiledStatement::new(
            String::from("UPDATE t SET x = ?"),
            vec![SqlValue::Int(1)],
            Some(String::from("t")),
        )
    }

    #[test]
    fn test_compiled_statement_accessors() {
        let compiled = statement();
        assert_eq!(compiled.sql(), "UPDATE t SET x = ?");
        assert_eq!(compiled.args(), &[SqlValue::Int(1)]);
        assert_eq!(compiled.table(), Some("t"));
        let (sql, args) = compiled.into_parts();
        assert_eq!(sql, "UPDATE t SET x = ?");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_deferred_is_lazy() {
        let recorder = Recorder::default();
        let deferred = Deferred::new(statement());

        let pending = deferred.subscribe(&recorder);
        assert!(recorder.seen.borrow().is_empty());
        drop(pending);
        assert!(recorder.seen.borrow().is_empty());

        let count = futures::executor::block_on(deferred.subscribe(&recorder));
        assert_eq!(count, Ok(1));
        assert_eq!(recorder.seen.borrow().len(), 1);
    }

    #[test]
    fn test_deferred_runs_once_per_subscription() {
        let mut recorder = Recorder::default();
        let deferred = Deferred::new(statement());

        futures::executor::block_on(deferred.subscribe(&recorder)).unwrap();
        futures::executor::block_on(deferred.subscribe(&recorder)).unwrap();
        deferred.subscribe_blocking(&mut recorder).unwrap();

        let seen = recorder.seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|s| s == deferred.statement()));
    }
}
