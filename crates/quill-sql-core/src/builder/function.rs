//! Arithmetic over numeric columns.
//!
//! Every operator yields a function column, itself a [`Column`], so results
//! feed back into comparisons, further arithmetic and SELECT projections.
//! All results are typed `f64` with the [`Numeric`] equivalent type, whatever
//! the operand types; `int + int` is still a double-typed column here even
//! though the engine may evaluate it with integer arithmetic.
//!
//! Column-with-column arithmetic binds nothing: both sides are column
//! references and the result belongs to the [`Anonymous`] table.
//! Column-with-literal arithmetic writes the literal into the SQL text with
//! [`SqlValue::to_sql_inline`] instead of a `?` placeholder, and the result
//! stays scoped to the left operand's table under an empty internal alias.

use crate::schema::{Anonymous, TableInfo, TableRef};

use super::column::{Column, ColumnDef, ColumnKind, Equivalent, FunctionSql, Numeric};
use super::value::ToSqlValue;

/// A double-typed computed column.
pub type FunctionColumn<P> = Column<f64, f64, Numeric, P>;

fn function_def(table: TableInfo, function: FunctionSql) -> ColumnDef {
    let mut def = ColumnDef {
        table,
        name: String::new(),
        all_from_table: false,
        nullable: true,
        alias: None,
        kind: ColumnKind::Function(function),
    };
    def.name = def.to_sql();
    def
}

impl<T, R, E: Equivalent<Numeric>, P> Column<T, R, E, P> {
    fn with_column<T2, R2, E2, P2>(
        &self,
        op: &'static str,
        other: &Column<T2, R2, E2, P2>,
    ) -> FunctionColumn<Anonymous>
    where
        E2: Equivalent<Numeric>,
    {
        let function = FunctionSql {
            prefix: "(",
            joiner: op,
            suffix: String::from(")"),
            operands: vec![self.def().clone(), other.def().clone()],
        };
        let table = TableRef::<Anonymous>::new().info().clone();
        Column::from_def(function_def(table, function), f64::to_sql_value)
    }

    fn with_value(&self, op: &'static str, value: T) -> FunctionColumn<P> {
        let literal = self.encode(value).to_sql_inline();
        let function = FunctionSql {
            prefix: "(",
            joiner: "",
            suffix: format!("{op}{literal})"),
            operands: vec![self.def().clone()],
        };
        let table = self.table().internal_alias("");
        Column::from_def(function_def(table, function), f64::to_sql_value)
    }

    /// This column + column.
    #[must_use]
    pub fn add_col<T2, R2, E2: Equivalent<Numeric>, P2>(
        &self,
        other: &Column<T2, R2, E2, P2>,
    ) -> FunctionColumn<Anonymous> {
        self.with_column(" + ", other)
    }

    /// This column + value.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, value: T) -> FunctionColumn<P> {
        self.with_value(" + ", value)
    }

    /// This column - column.
    #[must_use]
    pub fn sub_col<T2, R2, E2: Equivalent<Numeric>, P2>(
        &self,
        other: &Column<T2, R2, E2, P2>,
    ) -> FunctionColumn<Anonymous> {
        self.with_column(" - ", other)
    }

    /// This column - value.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn sub(&self, value: T) -> FunctionColumn<P> {
        self.with_value(" - ", value)
    }

    /// This column * column.
    #[must_use]
    pub fn mul_col<T2, R2, E2: Equivalent<Numeric>, P2>(
        &self,
        other: &Column<T2, R2, E2, P2>,
    ) -> FunctionColumn<Anonymous> {
        self.with_column(" * ", other)
    }

    /// This column * value.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, value: T) -> FunctionColumn<P> {
        self.with_value(" * ", value)
    }

    /// This column / column.
    #[must_use]
    pub fn div_col<T2, R2, E2: Equivalent<Numeric>, P2>(
        &self,
        other: &Column<T2, R2, E2, P2>,
    ) -> FunctionColumn<Anonymous> {
        self.with_column(" / ", other)
    }

    /// This column / value.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn div(&self, value: T) -> FunctionColumn<P> {
        self.with_value(" / ", value)
    }

    /// This column % column.
    #[must_use]
    pub fn rem_col<T2, R2, E2: Equivalent<Numeric>, P2>(
        &self,
        other: &Column<T2, R2, E2, P2>,
    ) -> FunctionColumn<Anonymous> {
        self.with_column(" % ", other)
    }

    /// This column % value.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn rem(&self, value: T) -> FunctionColumn<P> {
        self.with_value(" % ", value)
    }
}

impl<P> FunctionColumn<P> {
    /// Returns the literal written into the SQL text, if any.
    ///
    /// Column-with-literal results carry no bound arguments; the value lives
    /// in the rendered name.
    #[must_use]
    pub fn inlined_literal(&self) -> Option<&str> {
        match &self.def().kind {
            ColumnKind::Function(function) if function.operands.len() == 1 => {
                let suffix = function.suffix.strip_suffix(')')?;
                suffix.rsplit(' ').next()
            }
            _ => None,
        }
    }
}
