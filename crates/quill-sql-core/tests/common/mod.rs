#![allow(dead_code)]

//! Schema shared by the integration tests: a small library catalogue.

use quill_sql_core::builder::{Column, Expr, SqlValue};
use quill_sql_core::schema::{Table, TableRef};

pub struct Author;

impl Table for Author {
    const NAME: &'static str = "author";
}

pub struct Book;

impl Table for Book {
    const NAME: &'static str = "book";
}

pub fn authors() -> TableRef<Author> {
    TableRef::new()
}

pub fn books() -> TableRef<Book> {
    TableRef::new()
}

pub mod author {
    use super::{Author, Column};

    pub fn id() -> Column<i64, i64, i64, Author> {
        Column::new("id")
    }

    pub fn name() -> Column<String, String, String, Author> {
        Column::new("name")
    }

    pub fn rating() -> Column<i32, i32, i32, Author> {
        Column::new("rating").nullable()
    }
}

pub mod book {
    use super::{Book, Column};

    pub fn id() -> Column<i64, i64, i64, Book> {
        Column::new("id")
    }

    pub fn title() -> Column<String, String, String, Book> {
        Column::new("title")
    }

    pub fn author_id() -> Column<i64, i64, i64, Book> {
        Column::new("author_id")
    }

    pub fn pages() -> Column<i64, i64, i64, Book> {
        Column::new("pages")
    }

    pub fn price() -> Column<f64, f64, f64, Book> {
        Column::new("price")
    }

    pub fn in_print() -> Column<bool, bool, bool, Book> {
        Column::new("in_print")
    }
}

/// Renders an expression and checks that placeholders and bound values
/// line up.
pub fn render(expr: Expr) -> (String, Vec<SqlValue>) {
    let (sql, args) = expr.build();
    assert_placeholders(&sql, &args);
    (sql, args)
}

pub fn assert_placeholders(sql: &str, args: &[SqlValue]) {
    assert_eq!(
        sql.matches('?').count(),
        args.len(),
        "placeholder count mismatch in {sql}"
    );
}
