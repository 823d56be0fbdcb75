use super::{Formatter, Ident, Params, ToSql};

use crate::stmt::ColumnDef;

impl ToSql for &ColumnDef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let name = Ident(&self.name);
        let ty = &self.ty;
        fmt!(f, name " " ty);

        if !self.nullable {
            fmt!(f, " NOT NULL");
        }
    }
}
