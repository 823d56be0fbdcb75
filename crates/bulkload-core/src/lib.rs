pub mod batch;
pub use batch::{Cell, Column, Row, RowBatch, RowState};

mod defaults;
pub use defaults::{default_value, DefaultValues};

pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, IntoError};

pub mod mapping;
pub use mapping::{ColumnMapping, TableMapping};

pub mod record;
pub use record::{PropertyDescriptor, Record, RecordDescriptor};

mod resolver;
pub use resolver::{RecordResolver, Resolver};

pub mod stmt;

/// A Result type alias that uses bulkload's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
