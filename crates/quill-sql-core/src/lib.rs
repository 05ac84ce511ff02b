//! # quill-sql-core
//!
//! A typed, composable SQL statement builder.
//!
//! This crate provides:
//! - Column descriptors typed by value, read-back and equivalent type
//! - Comparison, `BETWEEN` and subquery expressions over those columns
//! - Arithmetic producing computed columns that compose like any other
//! - An UPDATE builder with conflict resolution, using the typestate pattern
//! - A render/execute boundary: compiled statements handed to an executor
//!
//! ## Type-Safe SQL Building
//!
//! Columns are only comparable with columns of an equivalent type, and an
//! UPDATE of one table only accepts that table's columns as targets:
//!
//! ```rust
//! use quill_sql_core::builder::{Column, ConflictAlgorithm, Update};
//! use quill_sql_core::schema::{Table, TableRef};
//!
//! struct Books;
//!
//! impl Table for Books {
//!     const NAME: &'static str = "books";
//! }
//!
//! let pages: Column<i64, i64, i64, Books> = Column::new("pages");
//! let price: Column<f64, f64, f64, Books> = Column::new("price");
//!
//! let (sql, params) = Update::with_conflict_algorithm(ConflictAlgorithm::Ignore)
//!     .table(&TableRef::<Books>::new())
//!     .set(&price, 9.5)
//!     .where_clause(pages.between(100).and(300))
//!     .build();
//!
//! assert_eq!(sql, "UPDATE OR IGNORE books SET price = ? WHERE books.pages BETWEEN ? AND ?");
//! assert_eq!(params.len(), 3);
//!
//! // This would NOT compile:
//! // let query = Update::new()
//! //     .table(&TableRef::<Books>::new())
//! //     .build();  // Error: no SET assignment
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values are bound through `?` placeholders:
//!
//! ```rust
//! use quill_sql_core::builder::Column;
//! use quill_sql_core::schema::Table;
//!
//! struct Users;
//!
//! impl Table for Users {
//!     const NAME: &'static str = "users";
//! }
//!
//! let name: Column<String, String, String, Users> = Column::new("name");
//! let user_input = String::from("'; DROP TABLE users; --");
//! let (sql, params) = name.eq(user_input).build();
//!
//! assert_eq!(sql, "users.name = ?");
//! assert_eq!(params.len(), 1);
//! ```
//!
//! The one exception is arithmetic between a column and a literal, which
//! writes the literal into the SQL text; see [`builder::FunctionColumn`].

pub mod builder;
pub mod schema;

pub use builder::{
    AsyncExecutor, Column, CompiledStatement, ConflictAlgorithm, Executor, Expr, FunctionColumn,
    Select, SqlValue, Update,
};
pub use schema::{Anonymous, Table, TableInfo, TableRef};
