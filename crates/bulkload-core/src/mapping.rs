//! Builders describing how a destination table is laid out before it is
//! frozen into a [`RowBatch`](crate::RowBatch) schema.

mod column;
pub use column::ColumnMapping;

mod table;
pub use table::TableMapping;
