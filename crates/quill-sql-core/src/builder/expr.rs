//! Renderable boolean expressions.
//!
//! Every [`Expr`] node renders its SQL fragment with `?` placeholders and
//! contributes its bound values in the same left-to-right order, so the two
//! always stay in lock-step.

use super::between::BetweenOperand;
use super::column::ColumnDef;
use super::select::RawSql;
use super::value::SqlValue;

/// Expression node variants.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    /// `<column><op>` where `op` carries the `?` placeholder, e.g. ` >?`.
    Value {
        column: ColumnDef,
        op: &'static str,
        value: SqlValue,
    },
    /// `<column> <op> <other>`.
    Column {
        column: ColumnDef,
        op: &'static str,
        other: ColumnDef,
    },
    /// `<column> <op> (<select>)`.
    Select {
        column: ColumnDef,
        op: &'static str,
        select: RawSql,
    },
    /// `<column> [NOT ]BETWEEN <first> AND <second>`.
    Between {
        column: ColumnDef,
        first: BetweenOperand,
        second: BetweenOperand,
        negated: bool,
    },
    /// `<column> <op>`, e.g. `IS NULL`.
    Postfix { column: ColumnDef, op: &'static str },
    /// `<column> [NOT ]IN (?,...)`.
    InList {
        column: ColumnDef,
        values: Vec<SqlValue>,
        negated: bool,
    },
    /// `(<left> <op> <right>)`.
    Compound {
        left: Box<Expr>,
        op: &'static str,
        right: Box<Expr>,
    },
    /// `NOT (<expr>)`.
    Not(Box<Expr>),
    /// A raw SQL fragment without arguments.
    Raw(String),
}

/// A boolean SQL expression built from typed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    node: Node,
}

impl From<Node> for Expr {
    fn from(node: Node) -> Self {
        Self { node }
    }
}

impl Expr {
    /// Creates an expression from raw SQL.
    ///
    /// **Warning**: Only use this for SQL fragments that don't contain user input.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Node::Raw(sql.into()).into()
    }

    /// Appends this expression's SQL fragment.
    pub fn append_sql(&self, sql: &mut String) {
        match &self.node {
            Node::Value { column, op, .. } => {
                column.append_sql(sql);
                sql.push_str(op);
            }
            Node::Column { column, op, other } => {
                column.append_sql(sql);
                sql.push(' ');
                sql.push_str(op);
                sql.push(' ');
                other.append_sql(sql);
            }
            Node::Select { column, op, select } => {
                column.append_sql(sql);
                sql.push(' ');
                sql.push_str(op);
                sql.push_str(" (");
                sql.push_str(select.sql());
                sql.push(')');
            }
            Node::Between {
                column,
                first,
                second,
                negated,
            } => {
                column.append_sql(sql);
                sql.push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                first.append_sql(sql);
                sql.push_str(" AND ");
                second.append_sql(sql);
            }
            Node::Postfix { column, op } => {
                column.append_sql(sql);
                sql.push(' ');
                sql.push_str(op);
            }
            Node::InList {
                column,
                values,
                negated,
            } => {
                column.append_sql(sql);
                sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for i in 0..values.len() {
                    if i != 0 {
                        sql.push(',');
                    }
                    sql.push('?');
                }
                sql.push(')');
            }
            Node::Compound { left, op, right } => {
                sql.push('(');
                left.append_sql(sql);
                sql.push(' ');
                sql.push_str(op);
                sql.push(' ');
                right.append_sql(sql);
                sql.push(')');
            }
            Node::Not(inner) => {
                sql.push_str("NOT (");
                inner.append_sql(sql);
                sql.push(')');
            }
            Node::Raw(raw) => sql.push_str(raw),
        }
    }

    /// Appends this expression's bound values, in placeholder order.
    pub fn add_args(&self, args: &mut Vec<SqlValue>) {
        match &self.node {
            Node::Value { value, .. } => args.push(value.clone()),
            Node::Select { select, .. } => args.extend(select.args().iter().cloned()),
            Node::Between { first, second, .. } => {
                first.add_args(args);
                second.add_args(args);
            }
            Node::InList { values, .. } => args.extend(values.iter().cloned()),
            Node::Compound { left, right, .. } => {
                left.add_args(args);
                right.add_args(args);
            }
            Node::Not(inner) => inner.add_args(args),
            Node::Column { .. } | Node::Postfix { .. } | Node::Raw(_) => {}
        }
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Node::Compound {
            left: Box::new(self),
            op: "AND",
            right: Box::new(other),
        }
        .into()
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Node::Compound {
            left: Box::new(self),
            op: "OR",
            right: Box::new(other),
        }
        .into()
    }

    /// Negates the expression with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Node::Not(Box::new(self)).into()
    }

    /// Returns the SQL string.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        self.append_sql(&mut sql);
        sql
    }

    /// Returns the bound values.
    #[must_use]
    pub fn args(&self) -> Vec<SqlValue> {
        let mut args = Vec::new();
        self.add_args(&mut args);
        args
    }

    /// Consumes the expression and returns the SQL and parameters.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        (self.to_sql(), self.args())
    }
}
