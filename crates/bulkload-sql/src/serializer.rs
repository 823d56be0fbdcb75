#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Period};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column_def;
mod name;
mod statement;
mod ty;
mod value;

use crate::stmt::Statement;

use bulkload_core::{driver::Provider, stmt::Name};

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    pub fn for_provider(provider: Provider) -> Serializer {
        match provider {
            Provider::Sqlite => Serializer::sqlite(),
            Provider::Mysql => Serializer::mysql(),
            Provider::Postgresql => Serializer::postgresql(),
        }
    }

    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    /// Quotes a single identifier for this dialect.
    pub fn ident(&self, ident: &str) -> String {
        self.fragment(Ident(ident))
    }

    /// Quotes every part of a possibly schema-qualified name.
    pub fn name(&self, name: &Name) -> String {
        self.fragment(name)
    }

    /// Renders the `position`th (1-based) bind parameter.
    pub fn placeholder(&self, position: usize) -> String {
        self.fragment(Placeholder(position))
    }

    fn fragment(&self, fragment: impl ToSql) -> String {
        let mut ret = String::new();
        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params: &mut params::NoParams,
        };
        fragment.to_sql(&mut fmt);
        ret
    }

    /// True when every occurrence of a placeholder needs its own parameter,
    /// i.e. placeholders are not numbered.
    pub fn positional_only(&self) -> bool {
        self.flavor.is_mysql()
    }

    pub fn is_sqlite(&self) -> bool {
        self.flavor.is_sqlite()
    }

    pub fn is_mysql(&self) -> bool {
        self.flavor.is_mysql()
    }

    pub fn is_postgresql(&self) -> bool {
        self.flavor.is_postgresql()
    }
}
