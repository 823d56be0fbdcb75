use bulkload_core::{
    stmt::{self, Value as CoreValue, ValueEnum},
    Error, Result,
};
use bytes::BytesMut;
use tokio_postgres::{
    types::{to_sql_checked, IsNull, ToSql, Type},
    Row,
};

#[derive(Debug)]
pub struct Value(pub(crate) CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

type BoxError = Box<dyn std::error::Error + Sync + Send>;

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match &self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(value) => value.to_sql(ty, out),
            CoreValue::I16(value) => integer(i64::from(*value), ty, out),
            CoreValue::I32(value) => integer(i64::from(*value), ty, out),
            CoreValue::I64(value) => integer(*value, ty, out),
            CoreValue::Enum(value) => integer(value.code, ty, out),
            CoreValue::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            CoreValue::String(value) => value.to_sql(ty, out),
            CoreValue::Bytes(value) => value.to_sql(ty, out),
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Encodes an integer in the width the server asked for.
fn integer(value: i64, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        Type::FLOAT8 => (value as f64).to_sql(ty, out),
        _ => value.to_sql(ty, out),
    }
}

/// Converts a PostgreSQL value within a row to a core value of type `ty`.
pub(crate) fn from_row(row: &Row, index: usize, ty: &stmt::Type) -> Result<CoreValue> {
    let column_ty = row.columns()[index].type_();

    let value = if *column_ty == Type::TEXT
        || *column_ty == Type::VARCHAR
        || *column_ty == Type::BPCHAR
        || *column_ty == Type::NAME
    {
        get::<String>(row, index)?.map(CoreValue::String)
    } else if *column_ty == Type::BOOL {
        get::<bool>(row, index)?.map(CoreValue::Bool)
    } else if *column_ty == Type::INT2 {
        get::<i16>(row, index)?.map(|v| CoreValue::I64(v.into()))
    } else if *column_ty == Type::INT4 {
        get::<i32>(row, index)?.map(|v| CoreValue::I64(v.into()))
    } else if *column_ty == Type::INT8 {
        get::<i64>(row, index)?.map(CoreValue::I64)
    } else if *column_ty == Type::FLOAT4 {
        get::<f32>(row, index)?.map(|v| CoreValue::F64(v.into()))
    } else if *column_ty == Type::FLOAT8 {
        get::<f64>(row, index)?.map(CoreValue::F64)
    } else if *column_ty == Type::BYTEA {
        get::<Vec<u8>>(row, index)?.map(CoreValue::Bytes)
    } else {
        return Err(Error::invalid_result(format!(
            "unsupported PostgreSQL column type `{column_ty}`"
        )));
    };

    let Some(value) = value else {
        return Ok(CoreValue::Null);
    };

    match (value, ty) {
        (CoreValue::I64(code), stmt::Type::Enum) => Ok(CoreValue::Enum(ValueEnum::from_code(code))),
        (value, ty) => ty.cast(value),
    }
}

fn get<'a, T>(row: &'a Row, index: usize) -> Result<Option<T>>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get::<usize, Option<T>>(index)
        .map_err(Error::driver_operation_failed)
}
