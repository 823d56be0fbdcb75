use super::Operation;

use crate::stmt::Name;

/// Asks the database for a table's columns. The response is an empty batch.
#[derive(Debug, Clone)]
pub struct Describe {
    pub table: Name,
}

impl From<Describe> for Operation {
    fn from(value: Describe) -> Self {
        Self::Describe(value)
    }
}
