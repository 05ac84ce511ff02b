#![allow(dead_code)]

//! Library catalogue schema and a seeded in-memory database.

use quill_sql_core::builder::Column;
use quill_sql_core::schema::{Table, TableRef};
use quill_sql_sqlite::{SqliteConfig, SqliteExecutor};

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

    pub fn rating() -> Column<i32, Option<i32>, i32, Author> {
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

    pub fn published() -> Column<chrono::NaiveDate, chrono::NaiveDate, chrono::NaiveDate, Book> {
        Column::new("published")
    }
}

const SCHEMA: [&str; 2] = [
    "CREATE TABLE author (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        rating INTEGER
    )",
    "CREATE TABLE book (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL UNIQUE,
        author_id INTEGER NOT NULL REFERENCES author(id),
        pages INTEGER NOT NULL,
        price REAL NOT NULL,
        in_print BOOLEAN NOT NULL DEFAULT 1,
        published TEXT
    )",
];

const SEED: [&str; 2] = [
    "INSERT INTO author (id, name, rating) VALUES
        (1, 'Austen', 5),
        (2, 'Herbert', 4),
        (3, 'Anonymous', NULL)",
    "INSERT INTO book (id, title, author_id, pages, price, in_print, published) VALUES
        (1, 'Emma', 1, 474, 9.5, 1, '1815-12-23'),
        (2, 'Persuasion', 1, 249, 7.0, 1, '1817-12-20'),
        (3, 'Dune', 2, 412, 12.0, 1, '1965-08-01'),
        (4, 'Dune Messiah', 2, 256, 10.0, 0, '1969-10-15')",
];

/// Opens an in-memory database holding the seeded catalogue.
pub async fn seeded_executor() -> SqliteExecutor {
    let executor = SqliteExecutor::connect(&SqliteConfig::new())
        .await
        .expect("Failed to create in-memory SQLite pool");
    for sql in SCHEMA.iter().chain(SEED.iter()) {
        executor.execute_sql(sql).await.unwrap();
    }
    executor
}
