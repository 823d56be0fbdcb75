use super::{Comma, Flavor, Formatter, Ident, Params, Period, ToSql};

use crate::stmt::{self, Name};

impl ToSql for &stmt::Statement {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            stmt::Statement::AddColumn(stmt) => stmt.to_sql(f),
            stmt::Statement::CopyIn(stmt) => stmt.to_sql(f),
            stmt::Statement::CreateIndex(stmt) => stmt.to_sql(f),
            stmt::Statement::DropColumn(stmt) => stmt.to_sql(f),
            stmt::Statement::DropIndex(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Select(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::AddColumn {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let table = &self.table;
        let column = &self.column;
        fmt!(f, "ALTER TABLE " table " ADD COLUMN " column);
    }
}

impl ToSql for &stmt::DropColumn {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let table = &self.table;
        let column = Ident(&self.column);
        fmt!(f, "ALTER TABLE " table " DROP COLUMN " column);
    }
}

impl ToSql for &stmt::CreateIndex {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let columns = Comma(self.columns.iter().map(Ident));

        // SQLite qualifies the index, not the table, with the schema
        if f.serializer.flavor == Flavor::Sqlite {
            let index = QualifiedIndex(&self.on, &self.name);
            let table = Ident(self.on.table());
            fmt!(f, "CREATE INDEX " index " ON " table " (" columns ")");
        } else {
            let index = Ident(&self.name);
            let table = &self.on;
            fmt!(f, "CREATE INDEX " index " ON " table " (" columns ")");
        }
    }
}

impl ToSql for &stmt::DropIndex {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match f.serializer.flavor {
            Flavor::Mysql => {
                let index = Ident(&self.name);
                let table = &self.on;
                fmt!(f, "DROP INDEX " index " ON " table);
            }
            Flavor::Postgresql | Flavor::Sqlite => {
                let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
                let index = QualifiedIndex(&self.on, &self.name);
                fmt!(f, "DROP INDEX " if_exists index);
            }
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let columns = Comma(self.columns.iter().map(Ident));
        let rows = Comma(self.rows.iter().map(Tuple));
        let table = &self.table;
        fmt!(f, "INSERT INTO " table " (" columns ") VALUES " rows);
    }
}

impl ToSql for &stmt::CopyIn {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let columns = Comma(self.columns.iter().map(Ident));
        let table = &self.table;
        fmt!(f, "COPY " table " (" columns ") FROM STDIN");
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let columns = Comma(self.columns.iter().map(Ident));
        let table = &self.table;
        fmt!(f, "SELECT " columns " FROM " table);

        if let Some(filter) = &self.filter {
            let column = Ident(&filter.column);
            let low = &filter.low;
            let high = &filter.high;
            fmt!(f, " WHERE " column " BETWEEN " low " AND " high);
        }

        if !self.order_by.is_empty() {
            let order_by = Comma(self.order_by.iter().map(Ident));
            fmt!(f, " ORDER BY " order_by);
        }
    }
}

/// Parenthesized, comma separated values.
struct Tuple<'a>(&'a Vec<stmt::Value>);

impl ToSql for Tuple<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let values = Comma(self.0.iter());
        fmt!(f, "(" values ")");
    }
}

/// An index name qualified with the schema of the table it belongs to.
struct QualifiedIndex<'a>(&'a Name, &'a str);

impl ToSql for QualifiedIndex<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let parts = self.0.schema().into_iter().chain([self.1]).map(Ident);
        let name = Period(parts);
        fmt!(f, name);
    }
}
