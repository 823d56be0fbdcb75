use super::{Flavor, Formatter, ToSql};

use bulkload_core::stmt::Value;

pub trait Params {
    fn push(&mut self, param: &Value) -> Placeholder;
}

/// A 1-based bind parameter position.
pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

/// Used when rendering fragments that never bind values.
pub(super) struct NoParams;

impl Params for NoParams {
    fn push(&mut self, _: &Value) -> Placeholder {
        Placeholder(0)
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match f.serializer.flavor {
            Flavor::Mysql => f.dst.push('?'),
            Flavor::Postgresql => f.dst.push_str(&format!("${}", self.0)),
            Flavor::Sqlite => f.dst.push_str(&format!("?{}", self.0)),
        }
    }
}
