//! SQL values, value encoders and read-back decoding.
//!
//! Every literal that reaches a statement is turned into a [`SqlValue`] by the
//! column's value encoder and bound positionally through a `?` placeholder.
//! [`SqlValue::to_sql_inline`] exists for the one place that bakes a literal
//! into the SQL text: column-with-literal arithmetic.

use thiserror::Error;

/// A SQL value that can be used as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the SQL representation for inline use.
    ///
    /// **Warning**: Prefer bound parameters. Text is quote-escaped. Floats
    /// always carry a decimal point or exponent so the engine keeps them
    /// REAL: `2.0` stays `2.0`, not the integer `2`. NaN renders as `NULL`,
    /// which is what SQLite stores for it, and infinities as the overflowing
    /// literals `9e999` / `-9e999`, which SQLite reads back as infinity.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) if f.is_nan() => String::from("NULL"),
            Self::Float(f) if f.is_infinite() => {
                String::from(if f.is_sign_positive() { "9e999" } else { "-9e999" })
            }
            Self::Float(f) => format!("{f:?}"),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Returns the parameter placeholder.
    #[must_use]
    pub const fn placeholder() -> &'static str {
        "?"
    }

    /// Returns a short name of the value kind, used in decode errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool(_) => "BOOLEAN",
            Self::Int(_) => "INTEGER",
            Self::Float(_) => "REAL",
            Self::Text(_) => "TEXT",
            Self::Blob(_) => "BLOB",
        }
    }
}

/// Trait for types that can be converted to SQL values.
///
/// This is the default value encoder of a column: `Column::new` stores
/// `T::to_sql_value` as the encoder.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

macro_rules! impl_to_sql_int {
    ($($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )+
    };
}

impl_to_sql_int!(i32, i16, i8, u32, u16, u8);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

/// A value read back from the engine did not match the column's return type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {found} value as {expected}")]
pub struct DecodeError {
    /// The Rust type that was requested.
    pub expected: &'static str,
    /// The kind of SQL value that was found.
    pub found: &'static str,
}

impl DecodeError {
    /// Creates a decode error for the given value.
    #[must_use]
    pub const fn new(expected: &'static str, found: &SqlValue) -> Self {
        Self {
            expected,
            found: found.kind(),
        }
    }
}

/// Trait for types a column can be read back as.
pub trait FromSqlValue: Sized {
    /// Converts a `SqlValue` into the read-back type.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the value has an incompatible kind.
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError>;
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
        Ok(value)
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Bool(b) => Ok(b),
            // SQLite stores booleans as integers
            SqlValue::Int(n) => Ok(n != 0),
            other => Err(DecodeError::new("bool", &other)),
        }
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Int(n) => Ok(n),
            SqlValue::Bool(b) => Ok(Self::from(b)),
            other => Err(DecodeError::new("i64", &other)),
        }
    }
}

macro_rules! impl_from_sql_int {
    ($($ty:ty),+) => {
        $(
            impl FromSqlValue for $ty {
                fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
                    match value {
                        SqlValue::Int(n) => Self::try_from(n).map_err(|_| DecodeError {
                            expected: stringify!($ty),
                            found: "out of range INTEGER",
                        }),
                        SqlValue::Bool(b) => Ok(Self::from(b)),
                        other => Err(DecodeError::new(stringify!($ty), &other)),
                    }
                }
            }
        )+
    };
}

impl_from_sql_int!(i32, i16, i8, u32, u16, u8);

impl FromSqlValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Float(f) => Ok(f),
            SqlValue::Int(n) => Ok(n as Self),
            other => Err(DecodeError::new("f64", &other)),
        }
    }
}

impl FromSqlValue for f32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Float(f) => Ok(f as Self),
            SqlValue::Int(n) => Ok(n as Self),
            other => Err(DecodeError::new("f32", &other)),
        }
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Text(s) => Ok(s),
            other => Err(DecodeError::new("String", &other)),
        }
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Blob(b) => Ok(b),
            SqlValue::Text(s) => Ok(s.into_bytes()),
            other => Err(DecodeError::new("Vec<u8>", &other)),
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

#[cfg(feature = "chrono")]
mod temporal {
    use chrono::{DateTime, NaiveDate, Utc};

    use super::{DecodeError, FromSqlValue, SqlValue, ToSqlValue};

    const DATE_FORMAT: &str = "%Y-%m-%d";

    impl ToSqlValue for DateTime<Utc> {
        fn to_sql_value(self) -> SqlValue {
            SqlValue::Text(self.to_rfc3339())
        }
    }

    impl FromSqlValue for DateTime<Utc> {
        fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
            match value {
                SqlValue::Text(ref s) => DateTime::parse_from_rfc3339(s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| DecodeError::new("DateTime<Utc>", &value)),
                other => Err(DecodeError::new("DateTime<Utc>", &other)),
            }
        }
    }

    impl ToSqlValue for NaiveDate {
        fn to_sql_value(self) -> SqlValue {
            SqlValue::Text(self.format(DATE_FORMAT).to_string())
        }
    }

    impl FromSqlValue for NaiveDate {
        fn from_sql_value(value: SqlValue) -> Result<Self, DecodeError> {
            match value {
                SqlValue::Text(ref s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .map_err(|_| DecodeError::new("NaiveDate", &value)),
                other => Err(DecodeError::new("NaiveDate", &other)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_value_inline_null() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
    }

    #[test]
    fn test_sql_value_inline_numbers() {
        assert_eq!(SqlValue::Int(-100).to_sql_inline(), "-100");
        assert_eq!(SqlValue::Float(2.5).to_sql_inline(), "2.5");
    }

    #[test]
    fn test_sql_value_inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
    }

    #[test]
    fn test_sql_value_inline_blob() {
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x45, 0x4C, 0x4C, 0x4F]).to_sql_inline(),
            "X'48454C4C4F'"
        );
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(true.to_sql_value(), SqlValue::Bool(true));
        assert_eq!(42_u8.to_sql_value(), SqlValue::Int(42));
        assert_eq!(2.5_f64.to_sql_value(), SqlValue::Float(2.5));
        assert_eq!(
            "hello".to_sql_value(),
            SqlValue::Text(String::from("hello"))
        );
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(42_i32).to_sql_value(), SqlValue::Int(42));
    }

    #[test]
    fn test_from_sql_value_widening() {
        assert_eq!(f64::from_sql_value(SqlValue::Int(3)), Ok(3.0));
        assert_eq!(bool::from_sql_value(SqlValue::Int(1)), Ok(true));
        assert_eq!(Option::<i64>::from_sql_value(SqlValue::Null), Ok(None));
    }

    #[test]
    fn test_from_sql_value_mismatch() {
        let err = i64::from_sql_value(SqlValue::Text(String::from("x"))).unwrap_err();
        assert_eq!(err.expected, "i64");
        assert_eq!(err.found, "TEXT");
        assert_eq!(err.to_string(), "cannot decode TEXT value as i64");
    }

    #[test]
    fn test_sql_value_inline_float_keeps_decimal_point() {
        assert_eq!(SqlValue::Float(2.0).to_sql_inline(), "2.0");
        assert_eq!(SqlValue::Float(-0.5).to_sql_inline(), "-0.5");
        assert_eq!(SqlValue::Float(1e20).to_sql_inline(), "1e20");
    }

    #[test]
    fn test_sql_value_inline_non_finite_floats() {
        assert_eq!(SqlValue::Float(f64::NAN).to_sql_inline(), "NULL");
        assert_eq!(SqlValue::Float(f64::INFINITY).to_sql_inline(), "9e999");
        assert_eq!(SqlValue::Float(f64::NEG_INFINITY).to_sql_inline(), "-9e999");
    }

    #[test]
    fn test_i32_out_of_range() {
        assert!(i32::from_sql_value(SqlValue::Int(i64::MAX)).is_err());
    }

    #[test]
    fn test_narrow_integers_in_range() {
        assert_eq!(i16::from_sql_value(SqlValue::Int(-300)), Ok(-300));
        assert_eq!(i8::from_sql_value(SqlValue::Int(-128)), Ok(-128));
        assert_eq!(u32::from_sql_value(SqlValue::Int(4_000_000_000)), Ok(4_000_000_000));
        assert_eq!(u16::from_sql_value(SqlValue::Int(65_535)), Ok(65_535));
        assert_eq!(u8::from_sql_value(SqlValue::Int(255)), Ok(255));
        assert_eq!(u8::from_sql_value(SqlValue::Bool(true)), Ok(1));
    }

    #[test]
    fn test_narrow_integers_out_of_range() {
        let err = i16::from_sql_value(SqlValue::Int(40_000)).unwrap_err();
        assert_eq!(err.expected, "i16");
        assert_eq!(err.found, "out of range INTEGER");
        assert!(i8::from_sql_value(SqlValue::Int(128)).is_err());
        assert!(u32::from_sql_value(SqlValue::Int(-1)).is_err());
        assert!(u32::from_sql_value(SqlValue::Int(1 << 32)).is_err());
        assert!(u16::from_sql_value(SqlValue::Int(65_536)).is_err());
        assert_eq!(
            u8::from_sql_value(SqlValue::Int(256)),
            Err(DecodeError {
                expected: "u8",
                found: "out of range INTEGER",
            })
        );
        assert_eq!(
            u8::from_sql_value(SqlValue::Text(String::from("1"))),
            Err(DecodeError {
                expected: "u8",
                found: "TEXT",
            })
        );
    }

    #[test]
    fn test_f32_read_back() {
        assert_eq!(f32::from_sql_value(SqlValue::Float(1.5)), Ok(1.5));
        assert_eq!(f32::from_sql_value(SqlValue::Int(4)), Ok(4.0));
        assert!(f32::from_sql_value(SqlValue::Blob(vec![1])).is_err());
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_naive_date_round_trip() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let value = date.to_sql_value();
        assert_eq!(value, SqlValue::Text(String::from("2024-02-29")));
        assert_eq!(chrono::NaiveDate::from_sql_value(value), Ok(date));
    }
}
