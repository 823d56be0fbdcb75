use super::{Formatter, Ident, Params, Period, ToSql};

use bulkload_core::stmt::Name;

impl ToSql for &Name {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let parts = Period(self.0.iter().map(Ident));
        fmt!(f, parts);
    }
}
