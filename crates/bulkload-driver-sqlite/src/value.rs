use bulkload_core::{
    stmt::{self, Value as CoreValue, ValueEnum},
    Error, Result,
};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a core value of type `ty`.
    pub fn from_sql(row: &Row, index: usize, ty: &stmt::Type) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::driver_operation_failed)?;

        let core_value = match value {
            SqlValue::Null => CoreValue::Null,
            SqlValue::Integer(value) => match ty {
                stmt::Type::Bool => CoreValue::Bool(value != 0),
                stmt::Type::F64 => CoreValue::F64(value as f64),
                stmt::Type::Enum => CoreValue::Enum(ValueEnum::from_code(value)),
                ty => ty.cast(CoreValue::I64(value))?,
            },
            SqlValue::Real(value) => match ty {
                stmt::Type::F64 => CoreValue::F64(value),
                _ => return Err(Error::type_conversion(CoreValue::F64(value), ty.name())),
            },
            SqlValue::Text(value) => match ty {
                stmt::Type::String => CoreValue::String(value),
                _ => return Err(Error::type_conversion(CoreValue::String(value), ty.name())),
            },
            SqlValue::Blob(value) => match ty {
                stmt::Type::Bytes => CoreValue::Bytes(value),
                _ => return Err(Error::type_conversion(CoreValue::Bytes(value), ty.name())),
            },
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        match &self.0 {
            Value::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Value::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            Value::I16(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            Value::I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Value::Enum(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(v.code))),
            Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Value::Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}
