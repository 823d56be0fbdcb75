pub mod db;
pub use db::{Builder, Config, Db};

mod engine;
pub use engine::{populate, populate_tuples, project, BatchUpdate, BulkLoad, TRACKER_COLUMN};

mod transaction;
pub use transaction::Transaction;

#[cfg(test)]
mod mock;

pub use bulkload_core::{
    batch::{Cell, Column, Row, RowBatch, RowState},
    default_value,
    driver::{self, BulkCopyOptions, Capability, Connection, Driver, Operation, Provider, Response},
    mapping::{ColumnMapping, TableMapping},
    record::{PropertyDescriptor, Record, RecordDescriptor},
    stmt::{self, Name, Primitive, Type, Value, ValueEnum},
    DefaultValues, Error, RecordResolver, Resolver, Result,
};

pub use bulkload_sql::CommandTemplate;

pub use tokio_util::sync::CancellationToken;
