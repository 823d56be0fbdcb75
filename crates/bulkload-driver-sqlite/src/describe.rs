use bulkload_core::{
    batch::{Column, RowBatch},
    stmt::{Name, Type},
    Error, Result,
};
use bulkload_sql::Serializer;
use rusqlite::Connection;

struct ColumnInfo {
    name: String,
    declared: String,
    not_null: bool,
    pk: bool,
}

/// Describes `table` with `PRAGMA table_info`.
pub(crate) fn table(connection: &Connection, table: &Name) -> Result<RowBatch> {
    let serializer = Serializer::sqlite();

    let sql = match table.schema() {
        Some(schema) => format!(
            "PRAGMA {}.table_info({})",
            serializer.ident(schema),
            serializer.ident(table.table())
        ),
        None => format!("PRAGMA table_info({})", serializer.ident(table.table())),
    };

    let mut stmt = connection
        .prepare(&sql)
        .map_err(Error::driver_operation_failed)?;

    let infos = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get("name")?,
                declared: row.get("type")?,
                not_null: row.get::<_, i64>("notnull")? != 0,
                pk: row.get::<_, i64>("pk")? != 0,
            })
        })
        .map_err(Error::driver_operation_failed)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)?;

    if infos.is_empty() {
        return Err(Error::invalid_result(format!("table `{table}` does not exist")));
    }

    // An `INTEGER PRIMARY KEY` is an alias for the rowid
    let rowid_alias = infos.iter().filter(|info| info.pk).count() == 1;

    let mut batch = RowBatch::new(table.clone());

    for info in infos {
        let ty = affinity(&info.declared);
        let mut column = Column::new(&info.name, ty);

        if info.not_null {
            column = column.not_null();
        }
        if info.pk {
            column = column.primary_key();
            if rowid_alias && info.declared.eq_ignore_ascii_case("INTEGER") {
                column = column.auto_increment();
            }
        }

        batch.add_column(column)?;
    }

    Ok(batch)
}

/// Maps a declared column type to a value type using SQLite's affinity rules.
fn affinity(declared: &str) -> Type {
    let declared = declared.to_ascii_uppercase();

    if declared.contains("BOOL") {
        Type::Bool
    } else if declared.contains("SMALLINT") {
        Type::I16
    } else if declared.contains("INT") {
        Type::I64
    } else if declared.contains("CHAR") || declared.contains("CLOB") || declared.contains("TEXT") {
        Type::String
    } else if declared.contains("REAL") || declared.contains("FLOA") || declared.contains("DOUB") {
        Type::F64
    } else if declared.is_empty() || declared.contains("BLOB") {
        Type::Bytes
    } else {
        // NUMERIC affinity
        Type::F64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affinity_rules() {
        assert_eq!(affinity("INTEGER"), Type::I64);
        assert_eq!(affinity("varchar(20)"), Type::String);
        assert_eq!(affinity("BOOLEAN"), Type::Bool);
        assert_eq!(affinity("double precision"), Type::F64);
        assert_eq!(affinity(""), Type::Bytes);
    }
}
