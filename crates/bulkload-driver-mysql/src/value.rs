use bulkload_core::{
    stmt::{self, Value as CoreValue, ValueEnum},
    Error, Result,
};
use mysql_async::prelude::ToValue;

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl ToValue for Value {
    fn to_value(&self) -> mysql_async::Value {
        match &self.0 {
            CoreValue::Bool(value) => value.to_value(),
            CoreValue::I16(value) => value.to_value(),
            CoreValue::I32(value) => value.to_value(),
            CoreValue::I64(value) => value.to_value(),
            CoreValue::Enum(value) => value.code.to_value(),
            CoreValue::F64(value) => value.to_value(),
            CoreValue::String(value) => value.to_value(),
            CoreValue::Bytes(value) => value.to_value(),
            CoreValue::Null => mysql_async::Value::NULL,
        }
    }
}

impl Value {
    /// Converts a MySQL value to a core value of type `ty`.
    ///
    /// The text protocol returns every value as bytes, so byte values are
    /// parsed according to the requested type.
    pub fn from_sql(value: mysql_async::Value, ty: &stmt::Type) -> Result<Self> {
        use mysql_async::Value as MyValue;

        let core = match (value, ty) {
            (MyValue::NULL, _) => CoreValue::Null,
            (MyValue::Int(v), stmt::Type::Bool) => CoreValue::Bool(v != 0),
            (MyValue::Int(v), stmt::Type::Enum) => CoreValue::Enum(ValueEnum::from_code(v)),
            (MyValue::Int(v), ty) => ty.cast(CoreValue::I64(v))?,
            (MyValue::UInt(v), ty) => {
                let v = i64::try_from(v)?;
                Self::from_sql(MyValue::Int(v), ty)?.into_inner()
            }
            (MyValue::Float(v), stmt::Type::F64) => CoreValue::F64(v.into()),
            (MyValue::Double(v), stmt::Type::F64) => CoreValue::F64(v),
            (MyValue::Bytes(v), stmt::Type::Bytes) => CoreValue::Bytes(v),
            (MyValue::Bytes(v), ty) => {
                let text = String::from_utf8(v).map_err(Error::driver_operation_failed)?;
                parse_text(text, ty)?
            }
            (value, ty) => {
                return Err(Error::invalid_result(format!(
                    "cannot read MySQL value {value:?} as {}",
                    ty.name()
                )))
            }
        };

        Ok(Self(core))
    }

    pub fn into_inner(self) -> CoreValue {
        self.0
    }
}

fn parse_text(text: String, ty: &stmt::Type) -> Result<CoreValue> {
    let invalid = |text: &str| Error::type_conversion(CoreValue::from(text), ty.name());

    Ok(match ty {
        stmt::Type::String => CoreValue::String(text),
        stmt::Type::Bool => CoreValue::Bool(text != "0"),
        stmt::Type::F64 => CoreValue::F64(text.parse().map_err(|_| invalid(&text))?),
        stmt::Type::Bytes => CoreValue::Bytes(text.into_bytes()),
        ty => {
            let v: i64 = text.parse().map_err(|_| invalid(&text))?;
            ty.cast(CoreValue::I64(v))?
        }
    })
}
