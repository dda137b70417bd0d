//! Value types for slapdb
//!
//! This module defines:
//! - [`FieldType`]: the declared type of a record field
//! - [`Value`]: one variant per storable kind
//! - [`Scalar`]: the mapping between Rust field types and [`Value`]
//!
//! ## Type Rules
//!
//! - The set of kinds is closed. A field whose Rust type does not implement
//!   [`Scalar`] cannot be part of a record.
//! - No implicit coercions: `Int(1) != UInt(1) != Float(1.0)`.
//! - `Option<T>` fields carry an explicit "absent" state (`None`) that is
//!   distinct from the zero value of `T`.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::{Error, Result};

/// Declared type of a record field
///
/// Decoding is driven by this tag, never by the stored bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// UTF-8 string
    Text,
    /// 64-bit signed integer
    Int,
    /// 64-bit unsigned integer
    UInt,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Raw byte blob
    Bytes,
    /// UTC timestamp with nanosecond precision
    Timestamp,
}

impl FieldType {
    /// Short type name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Int => "int",
            FieldType::UInt => "uint",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Bytes => "bytes",
            FieldType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single storable field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 string
    Text(String),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit unsigned integer
    UInt(u64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Declared type this value belongs to
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Text(_) => FieldType::Text,
            Value::Int(_) => FieldType::Int,
            Value::UInt(_) => FieldType::UInt,
            Value::Float(_) => FieldType::Float,
            Value::Bool(_) => FieldType::Bool,
            Value::Bytes(_) => FieldType::Bytes,
            Value::Timestamp(_) => FieldType::Timestamp,
        }
    }

    /// Returns true if this is the zero value of its type
    ///
    /// `-0.0` is not zero: only the all-zero bit pattern counts.
    /// The zero timestamp is the Unix epoch (`DateTime::<Utc>::default()`).
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Int(i) => *i == 0,
            Value::UInt(u) => *u == 0,
            Value::Float(f) => f.to_bits() == 0,
            Value::Bool(b) => !*b,
            Value::Bytes(b) => b.is_empty(),
            Value::Timestamp(t) => *t == DateTime::<Utc>::default(),
        }
    }

    fn mismatch(self, expected: FieldType) -> Error {
        Error::TypeConversion(format!(
            "expected {}, found {}",
            expected,
            self.field_type()
        ))
    }
}

/// Conversion between a Rust field type and [`Value`]
///
/// Implemented for `String`, `i64`, `i32`, `u64`, `u32`, `f64`, `bool`,
/// `Vec<u8>`, `DateTime<Utc>` and `Option<T>` of any of them.
pub trait Scalar: Sized {
    /// Declared type of fields of this Rust type
    const TYPE: FieldType;

    /// Whether the field has an explicit absent state
    const OPTIONAL: bool = false;

    /// Current value, or `None` when the field is absent
    fn to_value(&self) -> Option<Value>;

    /// Convert a decoded value back into the field type
    fn from_value(value: Value) -> Result<Self>;
}

impl Scalar for String {
    const TYPE: FieldType = FieldType::Text;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Text(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch(Self::TYPE)),
        }
    }
}

impl Scalar for i64 {
    const TYPE: FieldType = FieldType::Int;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Int(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other.mismatch(Self::TYPE)),
        }
    }
}

impl Scalar for i32 {
    const TYPE: FieldType = FieldType::Int;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Int(i64::from(*self)))
    }

    fn from_value(value: Value) -> Result<Self> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide)
            .map_err(|_| Error::TypeConversion(format!("{} does not fit in i32", wide)))
    }
}

impl Scalar for u64 {
    const TYPE: FieldType = FieldType::UInt;

    fn to_value(&self) -> Option<Value> {
        Some(Value::UInt(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::UInt(u) => Ok(u),
            other => Err(other.mismatch(Self::TYPE)),
        }
    }
}

impl Scalar for u32 {
    const TYPE: FieldType = FieldType::UInt;

    fn to_value(&self) -> Option<Value> {
        Some(Value::UInt(u64::from(*self)))
    }

    fn from_value(value: Value) -> Result<Self> {
        let wide = u64::from_value(value)?;
        u32::try_from(wide)
            .map_err(|_| Error::TypeConversion(format!("{} does not fit in u32", wide)))
    }
}

impl Scalar for f64 {
    const TYPE: FieldType = FieldType::Float;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            other => Err(other.mismatch(Self::TYPE)),
        }
    }
}

impl Scalar for bool {
    const TYPE: FieldType = FieldType::Bool;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other.mismatch(Self::TYPE)),
        }
    }
}

impl Scalar for Vec<u8> {
    const TYPE: FieldType = FieldType::Bytes;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Bytes(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(other.mismatch(Self::TYPE)),
        }
    }
}

impl Scalar for DateTime<Utc> {
    const TYPE: FieldType = FieldType::Timestamp;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Timestamp(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(t) => Ok(t),
            other => Err(other.mismatch(Self::TYPE)),
        }
    }
}

impl<T: Scalar> Scalar for Option<T> {
    const TYPE: FieldType = T::TYPE;
    const OPTIONAL: bool = true;

    fn to_value(&self) -> Option<Value> {
        self.as_ref().and_then(T::to_value)
    }

    fn from_value(value: Value) -> Result<Self> {
        T::from_value(value).map(Some)
    }
}
