//! Conversion from `sea_query::Value` into entity field types.
//!
//! Integer conversions accept any integer variant as long as the number fits
//! the target width, since drivers disagree on how wide a column's integer is.

use sea_query::Value;
use std::fmt;

/// Error type for value extraction failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value is null but the target type is not an `Option`
    NullValue,
    /// The value type doesn't match the expected type
    TypeMismatch { expected: String, actual: String },
    /// The value matched but could not be converted (e.g. overflow)
    ConversionError(String),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::NullValue => write!(f, "Value is null"),
            ValueError::TypeMismatch { expected, actual } => {
                write!(f, "Type mismatch: expected {expected}, got {actual}")
            }
            ValueError::ConversionError(msg) => write!(f, "Conversion error: {msg}"),
        }
    }
}

impl std::error::Error for ValueError {}

/// Types that can be read out of a result-set value
pub trait FromValue: Sized {
    /// Convert `value`, failing on null or on a mismatched variant
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

/// Whether `value` is the null of its variant
pub fn is_null(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Bytes(None)
            | Value::Json(None)
            | Value::Uuid(None)
            | Value::ChronoDate(None)
            | Value::ChronoTime(None)
            | Value::ChronoDateTime(None)
            | Value::ChronoDateTimeUtc(None)
    )
}

fn mismatch<T>(value: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected: std::any::type_name::<T>().to_string(),
        actual: format!("{value:?}"),
    }
}

fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::TinyInt(Some(v)) => Some(i128::from(*v)),
        Value::SmallInt(Some(v)) => Some(i128::from(*v)),
        Value::Int(Some(v)) => Some(i128::from(*v)),
        Value::BigInt(Some(v)) => Some(i128::from(*v)),
        Value::TinyUnsigned(Some(v)) => Some(i128::from(*v)),
        Value::SmallUnsigned(Some(v)) => Some(i128::from(*v)),
        Value::Unsigned(Some(v)) => Some(i128::from(*v)),
        Value::BigUnsigned(Some(v)) => Some(i128::from(*v)),
        _ => None,
    }
}

macro_rules! impl_from_value_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    if is_null(&value) {
                        return Err(ValueError::NullValue);
                    }
                    let n = as_integer(&value).ok_or_else(|| mismatch::<$t>(&value))?;
                    <$t>::try_from(n).map_err(|_| {
                        ValueError::ConversionError(format!(
                            "{n} does not fit in {}",
                            stringify!($t)
                        ))
                    })
                }
            }
        )*
    };
}

impl_from_value_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Double(Some(v)) => Ok(v),
            Value::Float(Some(v)) => Ok(f64::from(v)),
            ref other if is_null(other) => Err(ValueError::NullValue),
            other => match as_integer(&other) {
                Some(n) => Ok(n as f64),
                None => Err(mismatch::<f64>(&other)),
            },
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(Some(v)) => Ok(v),
            Value::Double(Some(v)) => Ok(v as f32),
            ref other if is_null(other) => Err(ValueError::NullValue),
            other => Err(mismatch::<f32>(&other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(Some(v)) => Ok(v),
            ref other if is_null(other) => Err(ValueError::NullValue),
            // MySQL reports BOOLEAN columns as TINYINT(1)
            other => match as_integer(&other) {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(mismatch::<bool>(&other)),
            },
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(Some(v)) => Ok(v),
            ref other if is_null(other) => Err(ValueError::NullValue),
            other => Err(mismatch::<String>(&other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bytes(Some(v)) => Ok(v),
            Value::String(Some(v)) => Ok(v.into_bytes()),
            ref other if is_null(other) => Err(ValueError::NullValue),
            other => Err(mismatch::<Vec<u8>>(&other)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Json(Some(v)) => Ok(*v),
            Value::String(Some(s)) => serde_json::from_str(&s)
                .map_err(|e| ValueError::ConversionError(format!("invalid JSON text: {e}"))),
            ref other if is_null(other) => Err(ValueError::NullValue),
            other => Err(mismatch::<serde_json::Value>(&other)),
        }
    }
}

macro_rules! impl_from_value_via_sea_query {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    if is_null(&value) {
                        return Err(ValueError::NullValue);
                    }
                    let shown = format!("{value:?}");
                    <$t as sea_query::ValueType>::try_from(value).map_err(|_| ValueError::TypeMismatch {
                        expected: stringify!($t).to_string(),
                        actual: shown,
                    })
                }
            }
        )*
    };
}

impl_from_value_via_sea_query!(
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    uuid::Uuid,
);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        if is_null(&value) {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}
