use bulkload_core::{
    batch::{Column, RowBatch},
    stmt::{Name, Type},
    Error, Result,
};
use mysql_async::{prelude::Queryable, Conn};

const COLUMNS: &str = "\
SELECT COLUMN_NAME, DATA_TYPE, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY, EXTRA
FROM information_schema.COLUMNS
WHERE TABLE_SCHEMA = COALESCE(?, DATABASE()) AND TABLE_NAME = ?
ORDER BY ORDINAL_POSITION";

type ColumnRow = (String, String, String, String, String, String);

/// Describes `table` from `information_schema`.
pub(crate) async fn table(conn: &mut Conn, table: &Name) -> Result<RowBatch> {
    let rows: Vec<ColumnRow> = conn
        .exec(COLUMNS, (table.schema(), table.table()))
        .await
        .map_err(Error::driver_operation_failed)?;

    if rows.is_empty() {
        return Err(Error::invalid_result(format!("table `{table}` does not exist")));
    }

    let mut batch = RowBatch::new(table.clone());

    for (name, data_type, column_type, is_nullable, key, extra) in rows {
        let mut column = Column::new(name, data_type_to_type(&data_type, &column_type)?);

        if is_nullable != "YES" {
            column = column.not_null();
        }
        if key == "PRI" {
            column = column.primary_key();
        }
        if extra.contains("auto_increment") {
            column = column.auto_increment();
        }

        batch.add_column(column)?;
    }

    Ok(batch)
}

fn data_type_to_type(data_type: &str, column_type: &str) -> Result<Type> {
    Ok(match data_type {
        "tinyint" if column_type.starts_with("tinyint(1)") => Type::Bool,
        "bit" | "boolean" => Type::Bool,
        "tinyint" | "smallint" => Type::I16,
        "mediumint" | "int" => Type::I32,
        "bigint" => Type::I64,
        "float" | "double" | "decimal" => Type::F64,
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum" => {
            Type::String
        }
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => Type::Bytes,
        other => {
            return Err(Error::invalid_result(format!(
                "unsupported MySQL column type `{other}`"
            )))
        }
    })
}
