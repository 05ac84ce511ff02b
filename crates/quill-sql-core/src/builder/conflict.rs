//! Conflict resolution for UPDATE statements.

use core::fmt;

/// How the engine resolves a constraint violation raised by an UPDATE.
///
/// Rendered right after the `UPDATE` keyword, e.g. `UPDATE OR IGNORE t ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictAlgorithm {
    /// Abort and roll back the whole transaction.
    Rollback,
    /// Abort the statement and undo its changes. The engine's default.
    Abort,
    /// Abort the statement but keep changes already made by it.
    Fail,
    /// Skip the offending row and carry on.
    Ignore,
    /// Delete the conflicting rows, then apply the update.
    Replace,
}

impl ConflictAlgorithm {
    /// Returns the SQL clause.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Rollback => "OR ROLLBACK",
            Self::Abort => "OR ABORT",
            Self::Fail => "OR FAIL",
            Self::Ignore => "OR IGNORE",
            Self::Replace => "OR REPLACE",
        }
    }

    /// All algorithms, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Rollback,
        Self::Abort,
        Self::Fail,
        Self::Ignore,
        Self::Replace,
    ];
}

impl fmt::Display for ConflictAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
