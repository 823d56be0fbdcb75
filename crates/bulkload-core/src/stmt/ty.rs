use super::{Value, ValueEnum};
use crate::{Error, Result};

/// The type of a batch column, from the engine's point of view.
///
/// Nullability is a property of the column, not of the type: an
/// `Option<i32>` property maps to `Type::I32` on a nullable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 16-bit integer
    I16,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// 64-bit floating point number
    F64,

    /// String type
    String,

    /// Binary data
    Bytes,

    /// Integral code of an enumerated type
    Enum,
}

impl Type {
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::I16 | Self::I32 | Self::I64)
    }

    /// Returns the name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Type::Bool => "Bool",
            Type::I16 => "I16",
            Type::I32 => "I32",
            Type::I64 => "I64",
            Type::F64 => "F64",
            Type::String => "String",
            Type::Bytes => "Bytes",
            Type::Enum => "Enum",
        }
    }

    /// The value a non-nullable column of this type holds when nothing was
    /// supplied.
    ///
    /// Callers on hot paths should go through [`default_value`](crate::default_value),
    /// which caches the result.
    pub fn zero(&self) -> Value {
        match self {
            Type::Bool => Value::Bool(false),
            Type::I16 => Value::I16(0),
            Type::I32 => Value::I32(0),
            Type::I64 => Value::I64(0),
            Type::F64 => Value::F64(0.0),
            Type::String => Value::String(String::new()),
            Type::Bytes => Value::Bytes(vec![]),
            Type::Enum => Value::Enum(ValueEnum::from_code(0)),
        }
    }

    /// Converts `value` so that it is a member of this type.
    ///
    /// Enum values are lowered to their integral code, integers are widened
    /// or narrowed with range checks, and integers convert to floats. Null
    /// values are passed through.
    pub fn cast(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }

        Ok(match (value, self) {
            // Identity
            (value @ Value::Bool(_), Type::Bool) => value,
            (value @ Value::I16(_), Type::I16) => value,
            (value @ Value::I32(_), Type::I32) => value,
            (value @ Value::I64(_), Type::I64) => value,
            (value @ Value::F64(_), Type::F64) => value,
            (value @ Value::String(_), Type::String) => value,
            (value @ Value::Bytes(_), Type::Bytes) => value,
            (value @ Value::Enum(_), Type::Enum) => value,

            // Enums lower to their code
            (Value::Enum(value), ty) => return ty.cast(Value::I64(value.code)),

            // Integers
            (value, Type::I16) => {
                let v = integer(value, self)?;
                Value::I16(
                    i16::try_from(v)
                        .map_err(|_| Error::type_conversion(Value::I64(v), "I16"))?,
                )
            }
            (value, Type::I32) => {
                let v = integer(value, self)?;
                Value::I32(
                    i32::try_from(v)
                        .map_err(|_| Error::type_conversion(Value::I64(v), "I32"))?,
                )
            }
            (value, Type::I64) => Value::I64(integer(value, self)?),
            (value, Type::Enum) => Value::Enum(ValueEnum::from_code(integer(value, self)?)),
            (value, Type::F64) => Value::F64(integer(value, self)? as f64),

            (value, ty) => return Err(Error::type_conversion(value, ty.name())),
        })
    }
}

fn integer(value: Value, ty: &Type) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::type_conversion(value, ty.name()))
}
