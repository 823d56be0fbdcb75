use bulkload_core::{
    batch::{Column, RowBatch},
    stmt::{Name, Type},
    Error, Result,
};
use tokio_postgres::Client;

const COLUMNS: &str = "\
SELECT column_name::text, data_type::text, is_nullable::text, column_default::text, is_identity::text
FROM information_schema.columns
WHERE table_schema = COALESCE($1::text, current_schema()) AND table_name = $2
ORDER BY ordinal_position";

const PRIMARY_KEY: &str = "\
SELECT kcu.column_name::text
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_name = tc.constraint_name
 AND kcu.table_schema = tc.table_schema
 AND kcu.table_name = tc.table_name
WHERE tc.constraint_type = 'PRIMARY KEY'
  AND tc.table_schema = COALESCE($1::text, current_schema())
  AND tc.table_name = $2";

/// Describes `table` from `information_schema`.
pub(crate) async fn table(client: &Client, table: &Name) -> Result<RowBatch> {
    let schema = table.schema();
    let name = table.table();

    let columns = client
        .query(COLUMNS, &[&schema, &name])
        .await
        .map_err(Error::driver_operation_failed)?;

    if columns.is_empty() {
        return Err(Error::invalid_result(format!("table `{table}` does not exist")));
    }

    let primary_key: Vec<String> = client
        .query(PRIMARY_KEY, &[&schema, &name])
        .await
        .map_err(Error::driver_operation_failed)?
        .iter()
        .map(|row| row.try_get(0))
        .collect::<std::result::Result<_, _>>()
        .map_err(Error::driver_operation_failed)?;

    let mut batch = RowBatch::new(table.clone());

    for row in columns {
        let get = |index: usize| -> Result<Option<String>> {
            row.try_get(index).map_err(Error::driver_operation_failed)
        };

        let column_name = get(0)?.unwrap_or_default();
        let data_type = get(1)?.unwrap_or_default();
        let nullable = get(2)?.is_some_and(|v| v == "YES");
        let default = get(3)?;
        let identity = get(4)?.is_some_and(|v| v == "YES");

        let mut column = Column::new(&column_name, data_type_to_type(&data_type)?);

        if !nullable {
            column = column.not_null();
        }

        if primary_key.iter().any(|pk| *pk == column_name) {
            column = column.primary_key();
        }

        if identity || default.is_some_and(|d| d.starts_with("nextval(")) {
            column = column.auto_increment();
        }

        batch.add_column(column)?;
    }

    Ok(batch)
}

fn data_type_to_type(data_type: &str) -> Result<Type> {
    Ok(match data_type {
        "boolean" => Type::Bool,
        "smallint" => Type::I16,
        "integer" => Type::I32,
        "bigint" => Type::I64,
        "real" | "double precision" | "numeric" => Type::F64,
        "text" | "character varying" | "character" | "name" => Type::String,
        "bytea" => Type::Bytes,
        other => {
            return Err(Error::invalid_result(format!(
                "unsupported PostgreSQL column type `{other}`"
            )))
        }
    })
}
