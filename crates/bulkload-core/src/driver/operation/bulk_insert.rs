use super::Operation;

use crate::{
    batch::Column,
    driver::BulkCopyOptions,
    stmt::{Name, Value},
};

/// Streams `rows` into `table`, flushing every `batch_size` rows.
///
/// `rows` are already rendered: one value per entry of `columns`, with
/// missing cells resolved and excluded columns dropped.
#[derive(Debug, Clone)]
pub struct BulkInsert {
    pub table: Name,

    /// Columns being written, in row order
    pub columns: Vec<Column>,

    pub rows: Vec<Vec<Value>>,

    pub batch_size: usize,

    pub options: BulkCopyOptions,
}

impl From<BulkInsert> for Operation {
    fn from(value: BulkInsert) -> Self {
        Self::BulkInsert(value)
    }
}
