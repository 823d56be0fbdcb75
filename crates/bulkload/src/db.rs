mod builder;
pub use builder::{Builder, DEFAULT_BATCH_SIZE};

mod config;
pub use config::Config;

mod connect;

use crate::{
    engine::{BatchUpdate, BulkLoad, Target},
    Transaction,
};

use bulkload_core::{
    batch::RowBatch,
    driver::{operation, BulkCopyOptions, Capability, Driver, Operation, Provider, Response},
    mapping::{ColumnMapping, TableMapping},
    record::Record,
    stmt::Name,
    Connection, Error, Resolver, Result,
};

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A handle to one configured database.
///
/// Cloning is cheap; clones share the driver, the configured defaults, and
/// the single open-transaction slot.
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    driver: Box<dyn Driver>,
    batch_size: usize,
    bulk_options: BulkCopyOptions,

    /// Set while a [`Transaction`] is open on this handle.
    transaction_open: AtomicBool,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(
        driver: Box<dyn Driver>,
        batch_size: usize,
        bulk_options: BulkCopyOptions,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                driver,
                batch_size,
                bulk_options,
                transaction_open: AtomicBool::new(false),
            }),
        }
    }

    pub fn provider(&self) -> Provider {
        self.shared.driver.provider()
    }

    pub fn capability(&self) -> &'static Capability {
        self.shared.driver.capability()
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    /// Rows per round trip used when an engine call does not set its own.
    pub fn batch_size(&self) -> usize {
        self.shared.batch_size
    }

    /// Bulk-copy options used when a load does not set its own.
    pub fn bulk_options(&self) -> BulkCopyOptions {
        self.shared.bulk_options
    }

    pub(crate) async fn connect(&self) -> Result<Box<dyn Connection>> {
        let connection = self.shared.driver.connect().await?;
        tracing::debug!(provider = %self.provider(), "connection opened");
        Ok(connection)
    }

    /// Runs a single operation on a fresh connection.
    pub async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        self.connect().await?.exec(op.into()).await
    }

    /// Reads the live schema of `table` into an empty batch.
    pub async fn describe(&self, table: impl Into<Name>) -> Result<RowBatch> {
        let table = table.into();
        self.exec(operation::Describe { table })
            .await?
            .rows
            .into_schema()
    }

    /// Builds the table mapping for `T`.
    ///
    /// Property to column pairs and key columns come from `resolver`; column
    /// types and nullability come from the live table.
    pub async fn mapping_for<T: Record>(&self, resolver: &impl Resolver) -> Result<TableMapping> {
        let table = resolver.table_name::<T>();

        if table.is_empty() {
            return Err(Error::configuration(format!(
                "no table name resolved for `{}`",
                std::any::type_name::<T>()
            )));
        }

        let schema = self.describe(table.clone()).await.map_err(|err| {
            err.context(Error::configuration(format!(
                "failed to resolve the schema of `{table}`"
            )))
        })?;

        let primary_keys = resolver.primary_key_column_names::<T>();

        let mut mapping = TableMapping::new(table.table());
        if let Some(schema) = table.schema() {
            mapping = mapping.schema(schema);
        }

        for (property, column_name) in resolver.mappings::<T>() {
            let column = schema.column(&column_name).ok_or_else(|| {
                Error::configuration(format!(
                    "property `{property}` maps to `{column_name}`, which is not a column of `{table}`"
                ))
            })?;

            let primary_key = column.primary_key
                || primary_keys
                    .iter()
                    .any(|pk| pk.eq_ignore_ascii_case(&column.name));

            mapping.push(
                ColumnMapping::new(&column.name)?
                    .ty(column.ty)?
                    .nullable(column.nullable)
                    .primary_key(primary_key)
                    .auto_increment(column.auto_increment)
                    .property(property),
            );
        }

        mapping.validate()?;
        Ok(mapping)
    }

    /// Starts a bulk load of `batch` on its own connection.
    pub fn bulk_load(&self, batch: RowBatch) -> BulkLoad<'static> {
        BulkLoad::new(self, Target::Db(self.clone()), batch)
    }

    /// Starts a batch update of `batch` with `template` on its own
    /// connection.
    pub fn batch_update(
        &self,
        batch: RowBatch,
        template: impl Into<String>,
    ) -> BatchUpdate<'static> {
        BatchUpdate::new(self, Target::Db(self.clone()), batch, template.into())
    }

    /// Opens a transaction on a dedicated connection.
    ///
    /// Only one transaction may be open per handle at a time; a second call
    /// fails with an invalid-operation error until the first one ends.
    pub async fn transaction(&self) -> Result<Transaction<'_>> {
        if self.shared.transaction_open.swap(true, Ordering::AcqRel) {
            return Err(Error::invalid_operation(
                "a transaction is already open on this database handle",
            ));
        }

        match Transaction::begin(self).await {
            Ok(transaction) => Ok(transaction),
            Err(err) => {
                self.release_transaction();
                Err(err)
            }
        }
    }

    pub(crate) fn release_transaction(&self) {
        self.shared.transaction_open.store(false, Ordering::Release);
    }
}
