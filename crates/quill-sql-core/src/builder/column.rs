//! Typed column descriptors and the comparison algebra.

use core::fmt;
use core::marker::PhantomData;

use crate::schema::{Table, TableInfo, TableRef};

use super::between::{Between, BetweenOperand};
use super::expr::{Expr, Node};
use super::select::{IntoSubQuery, SubQuery};
use super::value::{SqlValue, ToSqlValue};

/// Marker equivalent type shared by every numeric column.
///
/// Arithmetic results are typed `Column<f64, f64, Numeric, _>`. Every
/// numeric Rust type is [`Equivalent`] to `Numeric` and to every other
/// numeric type, in both directions, so any two numeric columns compare and
/// assign either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeric {}

/// Declares that columns with equivalent type `Self` may be compared with,
/// or assigned to, columns with equivalent type `E`.
pub trait Equivalent<E: ?Sized> {}

impl<E: ?Sized> Equivalent<E> for E {}

macro_rules! impl_numeric_equivalent {
    () => {};
    ($head:ty $(, $tail:ty)*) => {
        impl Equivalent<Numeric> for $head {}
        impl Equivalent<$head> for Numeric {}
        $(
            impl Equivalent<$tail> for $head {}
            impl Equivalent<$head> for $tail {}
        )*
        impl_numeric_equivalent!($($tail),*);
    };
}

impl_numeric_equivalent!(i64, i32, i16, i8, u32, u16, u8, f64, f32);

/// Rendering of a computed column: `prefix operand (joiner operand)* suffix`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FunctionSql {
    pub(crate) prefix: &'static str,
    pub(crate) joiner: &'static str,
    pub(crate) suffix: String,
    pub(crate) operands: Vec<ColumnDef>,
}

/// The closed set of column variants.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColumnKind {
    /// A column of a table.
    Table,
    /// A computed column; its name is the rendered sub-expression.
    Function(FunctionSql),
    /// The target of an UPDATE assignment; rendered unqualified.
    UpdateTarget,
}

/// Untyped column descriptor shared by expressions and statements.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ColumnDef {
    pub(crate) table: TableInfo,
    pub(crate) name: String,
    pub(crate) all_from_table: bool,
    pub(crate) nullable: bool,
    pub(crate) alias: Option<String>,
    pub(crate) kind: ColumnKind,
}

impl ColumnDef {
    /// Appends the name of this column as used in expressions.
    pub(crate) fn append_sql(&self, sql: &mut String) {
        if let Some(alias) = &self.alias {
            sql.push_str(alias);
            return;
        }
        self.append_expression(sql);
    }

    /// Appends this column as a projection of a SELECT.
    pub(crate) fn append_selection_sql(&self, sql: &mut String) {
        if self.all_from_table {
            if let Some(qualifier) = self.table.qualifier() {
                sql.push_str(qualifier);
                sql.push('.');
            }
            sql.push('*');
            return;
        }
        self.append_expression(sql);
        if let Some(alias) = &self.alias {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }
    }

    fn append_expression(&self, sql: &mut String) {
        match &self.kind {
            ColumnKind::Table => {
                if let Some(qualifier) = self.table.qualifier() {
                    sql.push_str(qualifier);
                    sql.push('.');
                }
                sql.push_str(&self.name);
            }
            ColumnKind::UpdateTarget => sql.push_str(&self.name),
            ColumnKind::Function(function) => {
                sql.push_str(function.prefix);
                for (i, operand) in function.operands.iter().enumerate() {
                    if i != 0 {
                        sql.push_str(function.joiner);
                    }
                    operand.append_sql(sql);
                }
                sql.push_str(&function.suffix);
            }
        }
    }

    pub(crate) fn to_sql(&self) -> String {
        let mut sql = String::new();
        self.append_sql(&mut sql);
        sql
    }

    pub(crate) fn into_update_target(self) -> Self {
        Self {
            kind: ColumnKind::UpdateTarget,
            alias: None,
            ..self
        }
    }
}

/// A typed handle to a table column or a computed expression.
///
/// - `T`: the native value type, accepted by comparisons and assignments
/// - `R`: the type a value of this column is read back as
/// - `E`: the equivalent type, deciding which columns are comparable
/// - `P`: the owning table
pub struct Column<T, R, E, P> {
    def: ColumnDef,
    encoder: fn(T) -> SqlValue,
    _types: PhantomData<fn() -> (R, E, P)>,
}

impl<T: ToSqlValue, R, E, P: Table> Column<T, R, E, P> {
    /// Creates a non-null column of table `P` using the default encoder.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_encoder(name, T::to_sql_value)
    }
}

impl<T, R, E, P: Table> Column<T, R, E, P> {
    /// Creates a non-null column of table `P` with a custom value encoder.
    #[must_use]
    pub fn with_encoder(name: &str, encoder: fn(T) -> SqlValue) -> Self {
        Self {
            def: ColumnDef {
                table: TableRef::<P>::new().info().clone(),
                name: String::from(name),
                all_from_table: false,
                nullable: false,
                alias: None,
                kind: ColumnKind::Table,
            },
            encoder,
            _types: PhantomData,
        }
    }

    /// Returns a copy of this column bound to an aliased table handle.
    #[must_use]
    pub fn of(&self, table: &TableRef<P>) -> Self {
        let mut def = self.def.clone();
        def.table = table.info().clone();
        Self::from_def(def, self.encoder)
    }
}

impl<T, R, E, P> Column<T, R, E, P> {
    pub(crate) const fn from_def(def: ColumnDef, encoder: fn(T) -> SqlValue) -> Self {
        Self {
            def,
            encoder,
            _types: PhantomData,
        }
    }

    pub(crate) const fn def(&self) -> &ColumnDef {
        &self.def
    }

    pub(crate) fn encode(&self, value: T) -> SqlValue {
        (self.encoder)(value)
    }

    pub(crate) const fn encoder(&self) -> fn(T) -> SqlValue {
        self.encoder
    }

    /// Marks the column as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.def.nullable = true;
        self
    }

    /// Marks the column as selecting every column of its table (`table.*`).
    #[must_use]
    pub fn all_from_table(mut self) -> Self {
        self.def.all_from_table = true;
        self
    }

    /// Returns a new descriptor with the given alias; `self` is unchanged.
    #[must_use]
    pub fn aliased(&self, alias: &str) -> Self {
        let mut def = self.def.clone();
        def.alias = Some(String::from(alias));
        Self::from_def(def, self.encoder)
    }

    /// The column name (for a function column, its rendered expression).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// The owning table.
    #[must_use]
    pub const fn table(&self) -> &TableInfo {
        &self.def.table
    }

    /// The alias, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.def.alias.as_deref()
    }

    /// Whether the column accepts NULL.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.def.nullable
    }

    /// Whether this column stands for `table.*`.
    #[must_use]
    pub const fn is_all_from_table(&self) -> bool {
        self.def.all_from_table
    }

    /// Whether this column is a computed (function) column.
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self.def.kind, ColumnKind::Function(_))
    }

    /// The name used when this column is referenced in a query.
    #[must_use]
    pub fn name_in_query(&self) -> String {
        self.def.to_sql()
    }

    /// Encodes a value with this column's value encoder.
    #[must_use]
    pub fn to_sql_arg(&self, value: T) -> SqlValue {
        self.encode(value)
    }

    fn value_expr(&self, op: &'static str, value: T) -> Expr {
        Node::Value {
            column: self.def.clone(),
            op,
            value: self.encode(value),
        }
        .into()
    }

    fn column_expr<T2, R2, E2, P2>(&self, op: &'static str, other: &Column<T2, R2, E2, P2>) -> Expr {
        Node::Column {
            column: self.def.clone(),
            op,
            other: other.def.clone(),
        }
        .into()
    }

    fn select_expr<E2>(&self, op: &'static str, select: SubQuery<E2>) -> Expr {
        Node::Select {
            column: self.def.clone(),
            op,
            select: select.into_raw(),
        }
        .into()
    }

    /// This column = value.
    #[must_use]
    pub fn eq(&self, value: T) -> Expr {
        self.value_expr(" = ?", value)
    }

    /// This column = column.
    #[must_use]
    pub fn eq_col<T2, R2, E2: Equivalent<E>, P2>(&self, other: &Column<T2, R2, E2, P2>) -> Expr {
        self.column_expr("=", other)
    }

    /// This column = (SELECT ...).
    #[must_use]
    pub fn eq_select<S>(&self, select: S) -> Expr
    where
        S: IntoSubQuery,
        S::Equivalent: Equivalent<E>,
    {
        self.select_expr("=", select.into_subquery())
    }

    /// This column != value.
    #[must_use]
    pub fn not_eq(&self, value: T) -> Expr {
        self.value_expr(" != ?", value)
    }

    /// This column != column.
    #[must_use]
    pub fn not_eq_col<T2, R2, E2: Equivalent<E>, P2>(
        &self,
        other: &Column<T2, R2, E2, P2>,
    ) -> Expr {
        self.column_expr("!=", other)
    }

    /// This column != (SELECT ...).
    #[must_use]
    pub fn not_eq_select<S>(&self, select: S) -> Expr
    where
        S: IntoSubQuery,
        S::Equivalent: Equivalent<E>,
    {
        self.select_expr("!=", select.into_subquery())
    }

    /// This column > value.
    #[must_use]
    pub fn gt(&self, value: T) -> Expr {
        self.value_expr(" >?", value)
    }

    /// This column > column.
    #[must_use]
    pub fn gt_col<T2, R2, E2: Equivalent<E>, P2>(&self, other: &Column<T2, R2, E2, P2>) -> Expr {
        self.column_expr(">", other)
    }

    /// This column > (SELECT ...).
    #[must_use]
    pub fn gt_select<S>(&self, select: S) -> Expr
    where
        S: IntoSubQuery,
        S::Equivalent: Equivalent<E>,
    {
        self.select_expr(">", select.into_subquery())
    }

    /// This column >= value.
    #[must_use]
    pub fn gt_eq(&self, value: T) -> Expr {
        self.value_expr(" >=?", value)
    }

    /// This column >= column.
    #[must_use]
    pub fn gt_eq_col<T2, R2, E2: Equivalent<E>, P2>(
        &self,
        other: &Column<T2, R2, E2, P2>,
    ) -> Expr {
        self.column_expr(">=", other)
    }

    /// This column >= (SELECT ...).
    #[must_use]
    pub fn gt_eq_select<S>(&self, select: S) -> Expr
    where
        S: IntoSubQuery,
        S::Equivalent: Equivalent<E>,
    {
        self.select_expr(">=", select.into_subquery())
    }

    /// This column < value.
    #[must_use]
    pub fn lt(&self, value: T) -> Expr {
        self.value_expr(" <?", value)
    }

    /// This column < column.
    #[must_use]
    pub fn lt_col<T2, R2, E2: Equivalent<E>, P2>(&self, other: &Column<T2, R2, E2, P2>) -> Expr {
        self.column_expr("<", other)
    }

    /// This column < (SELECT ...).
    #[must_use]
    pub fn lt_select<S>(&self, select: S) -> Expr
    where
        S: IntoSubQuery,
        S::Equivalent: Equivalent<E>,
    {
        self.select_expr("<", select.into_subquery())
    }

    /// This column <= value.
    #[must_use]
    pub fn lt_eq(&self, value: T) -> Expr {
        self.value_expr(" <=?", value)
    }

    /// This column <= column.
    #[must_use]
    pub fn lt_eq_col<T2, R2, E2: Equivalent<E>, P2>(
        &self,
        other: &Column<T2, R2, E2, P2>,
    ) -> Expr {
        self.column_expr("<=", other)
    }

    /// This column <= (SELECT ...).
    #[must_use]
    pub fn lt_eq_select<S>(&self, select: S) -> Expr
    where
        S: IntoSubQuery,
        S::Equivalent: Equivalent<E>,
    {
        self.select_expr("<=", select.into_subquery())
    }

    /// This column IS NULL.
    #[must_use]
    pub fn is_null(&self) -> Expr {
        Node::Postfix {
            column: self.def.clone(),
            op: "IS NULL",
        }
        .into()
    }

    /// This column IS NOT NULL.
    #[must_use]
    pub fn is_not_null(&self) -> Expr {
        Node::Postfix {
            column: self.def.clone(),
            op: "IS NOT NULL",
        }
        .into()
    }

    /// This column IN (values).
    #[must_use]
    pub fn in_list(&self, values: impl IntoIterator<Item = T>) -> Expr {
        Node::InList {
            column: self.def.clone(),
            values: values.into_iter().map(|v| self.encode(v)).collect(),
            negated: false,
        }
        .into()
    }

    /// This column NOT IN (values).
    #[must_use]
    pub fn not_in_list(&self, values: impl IntoIterator<Item = T>) -> Expr {
        Node::InList {
            column: self.def.clone(),
            values: values.into_iter().map(|v| self.encode(v)).collect(),
            negated: true,
        }
        .into()
    }

    /// Starts a BETWEEN with a value as the lower bound.
    #[must_use]
    pub fn between(&self, value: T) -> Between<T, E> {
        Between::new(self, BetweenOperand::Value(self.encode(value)), false)
    }

    /// Starts a BETWEEN with a column as the lower bound.
    #[must_use]
    pub fn between_col<T2, R2, E2: Equivalent<E>, P2>(
        &self,
        column: &Column<T2, R2, E2, P2>,
    ) -> Between<T, E> {
        Between::new(self, BetweenOperand::Column(column.def.clone()), false)
    }

    /// Starts a NOT BETWEEN with a value as the lower bound.
    #[must_use]
    pub fn not_between(&self, value: T) -> Between<T, E> {
        Between::new(self, BetweenOperand::Value(self.encode(value)), true)
    }

    /// Starts a NOT BETWEEN with a column as the lower bound.
    #[must_use]
    pub fn not_between_col<T2, R2, E2: Equivalent<E>, P2>(
        &self,
        column: &Column<T2, R2, E2, P2>,
    ) -> Between<T, E> {
        Between::new(self, BetweenOperand::Column(column.def.clone()), true)
    }
}

impl<T, R, E, P> Clone for Column<T, R, E, P> {
    fn clone(&self) -> Self {
        Self::from_def(self.def.clone(), self.encoder)
    }
}

impl<T, R, E, P> fmt::Debug for Column<T, R, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column").field("def", &self.def).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Book;

    impl Table for Book {
        const NAME: &'static str = "book";
    }

    struct Author;

    impl Table for Author {
        const NAME: &'static str = "author";
    }

    fn pages() -> Column<i64, i64, i64, Book> {
        Column::new("pages")
    }

    fn title() -> Column<String, String, String, Book> {
        Column::new("title")
    }

    fn books_written() -> Column<i32, i32, i32, Author> {
        Column::new("books_written")
    }

    fn render(expr: &Expr) -> (String, Vec<SqlValue>) {
        let mut sql = String::new();
        let mut args = Vec::new();
        expr.append_sql(&mut sql);
        expr.add_args(&mut args);
        (sql, args)
    }

    #[test]
    fn test_name_in_query_is_qualified() {
        assert_eq!(pages().name_in_query(), "book.pages");
    }

    #[test]
    fn test_aliased_returns_new_descriptor() {
        let col = pages();
        let aliased = col.aliased("p");
        assert_eq!(col.alias(), None);
        assert_eq!(aliased.alias(), Some("p"));
        assert_eq!(aliased.name_in_query(), "p");
    }

    #[test]
    fn test_column_of_aliased_table() {
        let table = TableRef::<Book>::new().aliased("b");
        assert_eq!(pages().of(&table).name_in_query(), "b.pages");
    }

    #[test]
    fn test_ordering_against_values() {
        assert_eq!(render(&pages().gt(5)), ("book.pages >?".into(), vec![SqlValue::Int(5)]));
        assert_eq!(render(&pages().gt_eq(5)).0, "book.pages >=?");
        assert_eq!(render(&pages().lt(5)).0, "book.pages <?");
        assert_eq!(render(&pages().lt_eq(5)).0, "book.pages <=?");
    }

    #[test]
    fn test_equality_against_value() {
        let (sql, args) = render(&title().eq(String::from("Dune")));
        assert_eq!(sql, "book.title = ?");
        assert_eq!(args, vec![SqlValue::Text(String::from("Dune"))]);
        assert_eq!(render(&title().not_eq(String::from("x"))).0, "book.title != ?");
    }

    #[test]
    fn test_compare_numeric_columns_of_different_tables() {
        let (sql, args) = render(&pages().gt_col(&books_written()));
        assert_eq!(sql, "book.pages > author.books_written");
        assert!(args.is_empty());

        let (sql, _) = render(&books_written().lt_eq_col(&pages()));
        assert_eq!(sql, "author.books_written <= book.pages");

        let doubled = books_written().mul(2);
        let (sql, _) = render(&doubled.lt_col(&pages().add(1)));
        assert_eq!(sql, "(author.books_written * 2) < (book.pages + 1)");
    }

    #[test]
    fn test_numeric_equivalence_is_symmetric() {
        fn equivalent<A: Equivalent<B>, B>() {}
        equivalent::<i32, i64>();
        equivalent::<i64, i32>();
        equivalent::<u8, f64>();
        equivalent::<f32, i16>();
        equivalent::<Numeric, u16>();
        equivalent::<u32, Numeric>();
        equivalent::<String, String>();
    }

    #[test]
    fn test_null_checks() {
        let col = title().nullable();
        assert!(col.is_nullable());
        assert_eq!(render(&col.is_null()), ("book.title IS NULL".into(), vec![]));
        assert_eq!(render(&col.is_not_null()).0, "book.title IS NOT NULL");
    }

    #[test]
    fn test_in_list() {
        let (sql, args) = render(&pages().in_list([1, 2, 3]));
        assert_eq!(sql, "book.pages IN (?,?,?)");
        assert_eq!(args.len(), 3);
        assert_eq!(render(&pages().not_in_list([1])).0, "book.pages NOT IN (?)");
    }

    #[test]
    fn test_custom_encoder() {
        fn encode_flag(value: bool) -> SqlValue {
            SqlValue::Int(i64::from(value))
        }
        let flag: Column<bool, bool, bool, Book> = Column::with_encoder("available", encode_flag);
        let (_, args) = render(&flag.eq(true));
        assert_eq!(args, vec![SqlValue::Int(1)]);
    }

    #[test]
    fn test_selection_rendering() {
        let mut sql = String::new();
        pages().all_from_table().def().append_selection_sql(&mut sql);
        assert_eq!(sql, "book.*");

        let mut sql = String::new();
        pages().aliased("p").def().append_selection_sql(&mut sql);
        assert_eq!(sql, "book.pages AS p");
    }
}
