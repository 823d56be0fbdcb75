use super::{Name, Statement};

/// A statement to drop a SQL index.
#[derive(Debug, Clone)]
pub struct DropIndex {
    /// Name of the index, unqualified.
    pub name: String,

    /// Table the index belongs to. MySQL names it in the statement; other
    /// dialects use its schema to qualify the index name.
    pub on: Name,

    /// Whether or not to add an `IF EXISTS` clause. MySQL has no such clause
    /// and ignores the flag.
    pub if_exists: bool,
}

impl Statement {
    /// Drops an index.
    ///
    /// This function _does not_ add an `IF EXISTS` clause.
    pub fn drop_index(name: impl Into<String>, on: &Name) -> Self {
        DropIndex {
            name: name.into(),
            on: on.clone(),
            if_exists: false,
        }
        .into()
    }

    /// Drops an index if it exists.
    pub fn drop_index_if_exists(name: impl Into<String>, on: &Name) -> Self {
        DropIndex {
            name: name.into(),
            on: on.clone(),
            if_exists: true,
        }
        .into()
    }
}

impl From<DropIndex> for Statement {
    fn from(value: DropIndex) -> Self {
        Self::DropIndex(value)
    }
}
