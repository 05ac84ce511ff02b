//! Two-phase BETWEEN builder.

use core::fmt;
use core::marker::PhantomData;

use super::column::{Column, ColumnDef, Equivalent};
use super::expr::{Expr, Node};
use super::value::SqlValue;

/// One bound of a BETWEEN: a bound value or a column reference.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BetweenOperand {
    Value(SqlValue),
    Column(ColumnDef),
}

impl BetweenOperand {
    pub(crate) fn append_sql(&self, sql: &mut String) {
        match self {
            Self::Value(_) => sql.push('?'),
            Self::Column(column) => column.append_sql(sql),
        }
    }

    pub(crate) fn add_args(&self, args: &mut Vec<SqlValue>) {
        if let Self::Value(value) = self {
            args.push(value.clone());
        }
    }
}

/// A started `[NOT] BETWEEN` waiting for its upper bound.
///
/// Created by `Column::between` and friends. The builder is consumed by
/// [`Between::and`] or [`Between::and_col`], so it cannot be completed twice.
#[must_use = "a BETWEEN needs its upper bound; call `and` or `and_col`"]
pub struct Between<T, E> {
    column: ColumnDef,
    encoder: fn(T) -> SqlValue,
    first: BetweenOperand,
    negated: bool,
    _equivalent: PhantomData<fn() -> E>,
}

impl<T, E> Between<T, E> {
    pub(crate) fn new<R, P>(
        column: &Column<T, R, E, P>,
        first: BetweenOperand,
        negated: bool,
    ) -> Self {
        Self {
            column: column.def().clone(),
            encoder: column.encoder(),
            first,
            negated,
            _equivalent: PhantomData,
        }
    }

    /// Completes the BETWEEN with a value as the upper bound.
    pub fn and(self, value: T) -> Expr {
        let second = BetweenOperand::Value((self.encoder)(value));
        self.finish(second)
    }

    /// Completes the BETWEEN with a column as the upper bound.
    pub fn and_col<T2, R2, E2: Equivalent<E>, P2>(self, column: &Column<T2, R2, E2, P2>) -> Expr {
        let second = BetweenOperand::Column(column.def().clone());
        self.finish(second)
    }

    fn finish(self, second: BetweenOperand) -> Expr {
        Node::Between {
            column: self.column,
            first: self.first,
            second,
            negated: self.negated,
        }
        .into()
    }
}

impl<T, E> fmt::Debug for Between<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Between")
            .field("column", &self.column)
            .field("first", &self.first)
            .field("negated", &self.negated)
            .finish_non_exhaustive()
    }
}
