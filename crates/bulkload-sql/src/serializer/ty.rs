use super::{Flavor, Formatter, Params, ToSql};

use bulkload_core::stmt::Type;

impl ToSql for &Type {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let flavor = f.serializer.flavor;

        let name = match self {
            Type::Bool => "BOOLEAN",
            Type::I16 => "SMALLINT",
            Type::I32 if flavor == Flavor::Mysql => "INT",
            Type::I32 => "INTEGER",
            // SQLite only recognizes `INTEGER` as a 64-bit integer affinity
            Type::I64 | Type::Enum if flavor == Flavor::Sqlite => "INTEGER",
            Type::I64 | Type::Enum => "BIGINT",
            Type::F64 => match flavor {
                Flavor::Sqlite => "REAL",
                Flavor::Mysql => "DOUBLE",
                Flavor::Postgresql => "DOUBLE PRECISION",
            },
            Type::String => "TEXT",
            Type::Bytes if flavor == Flavor::Postgresql => "BYTEA",
            Type::Bytes => "BLOB",
        };

        f.dst.push_str(name);
    }
}
