//! Schema traits for type-safe table and column definitions.
//!
//! Table descriptors are supplied by the caller's schema registry: a marker
//! type implementing [`Table`] per table plus a [`TableRef`] handle used when
//! a statement names the table.

use core::fmt;
use core::marker::PhantomData;

/// Trait for table metadata.
///
/// Implemented by one marker type per database table. The marker is used as
/// the `P` parameter of `Column<T, R, E, P>` so that columns of one table
/// cannot be assigned in an UPDATE of another.
pub trait Table {
    /// The SQL table name.
    const NAME: &'static str;
}

/// Synthetic table owning column-with-column arithmetic results.
///
/// Such results are not bound to the row context of either operand's table,
/// so they carry no qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anonymous;

impl Table for Anonymous {
    const NAME: &'static str = "";
}

/// Untyped table information carried by column descriptors and statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    name: &'static str,
    alias: Option<String>,
}

impl TableInfo {
    pub(crate) const fn new(name: &'static str, alias: Option<String>) -> Self {
        Self { name, alias }
    }

    /// Returns a copy scoped under an internal alias.
    ///
    /// An empty alias keeps the row context of the table while dropping the
    /// qualifier from rendered names.
    #[must_use]
    pub fn internal_alias(&self, alias: &str) -> Self {
        Self {
            name: self.name,
            alias: Some(String::from(alias)),
        }
    }

    /// The SQL table name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The alias, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns whether this is the synthetic anonymous table.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// The prefix used to qualify column names, if any.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        match self.alias.as_deref() {
            Some("") => None,
            Some(alias) => Some(alias),
            None if self.name.is_empty() => None,
            None => Some(self.name),
        }
    }

    /// Appends the table as it appears in a FROM or UPDATE target position.
    pub(crate) fn append_from_clause(&self, sql: &mut String) {
        sql.push_str(self.name);
        if let Some(alias) = self.alias.as_deref().filter(|a| !a.is_empty()) {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }
    }
}

/// A handle to table `P` used by statement builders.
pub struct TableRef<P> {
    info: TableInfo,
    _table: PhantomData<fn() -> P>,
}

impl<P: Table> TableRef<P> {
    /// Creates a handle to table `P`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            info: TableInfo::new(P::NAME, None),
            _table: PhantomData,
        }
    }

    /// Returns a new handle to the same table under an alias.
    #[must_use]
    pub fn aliased(&self, alias: &str) -> Self {
        Self {
            info: TableInfo::new(P::NAME, Some(String::from(alias))),
            _table: PhantomData,
        }
    }
}

impl<P> TableRef<P> {
    /// Returns the untyped table information.
    #[must_use]
    pub const fn info(&self) -> &TableInfo {
        &self.info
    }

    /// The SQL table name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.info.name
    }

    /// The alias, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.info.alias()
    }
}

impl<P: Table> Default for TableRef<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for TableRef<P> {
    fn clone(&self) -> Self {
        Self {
            info: self.info.clone(),
            _table: PhantomData,
        }
    }
}

impl<P> fmt::Debug for TableRef<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRef").field("info", &self.info).finish()
    }
}
