//! Type-Safe SQL Builder
//!
//! This module provides a typed column algebra and statement builders using
//! the typestate pattern. Invalid statement shapes are caught at compile time.
//!
//! # Example
//!
//! ```rust
//! use quill_sql_core::builder::{Column, Update};
//! use quill_sql_core::schema::{Table, TableRef};
//!
//! struct Users;
//!
//! impl Table for Users {
//!     const NAME: &'static str = "users";
//! }
//!
//! let id: Column<i64, i64, i64, Users> = Column::new("id");
//! let age: Column<i32, i32, i32, Users> = Column::new("age");
//!
//! let (sql, params) = Update::new()
//!     .table(&TableRef::<Users>::new())
//!     .set(&age, 30)
//!     .where_clause(id.eq(7))
//!     .build();
//!
//! assert_eq!(sql, "UPDATE users SET age = ? WHERE users.id = ?");
//! assert_eq!(params.len(), 2);
//! ```

mod between;
mod column;
mod conflict;
mod expr;
mod function;
mod select;
mod statement;
mod update;
pub mod value;

pub use between::Between;
pub use column::{Column, Equivalent, Numeric};
pub use conflict::ConflictAlgorithm;
pub use expr::Expr;
pub use function::FunctionColumn;
pub use select::{HasFrom, IntoSubQuery, NoFrom, Select, SubQuery};
pub use statement::{AsyncExecutor, CompiledStatement, Deferred, Executor, Row};
pub use update::{Update, UpdateConflict, UpdateSet, UpdateTable, UpdateWhere};
pub use value::{DecodeError, FromSqlValue, SqlValue, ToSqlValue};
