use super::{
    cleanup::{self, Cleanup, Task},
    correlate::correlate,
    Session, Target,
};
use crate::Db;

use bulkload_core::{
    batch::{Column, RowBatch},
    driver::{
        operation::{BulkInsert, Transaction as TransactionOp},
        BulkCopyOptions, Capability, Provider,
    },
    stmt::{Name, Type, Value},
    Connection, Error, Result,
};
use bulkload_sql::{stmt::ColumnDef, Serializer, Statement};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Temporary column used to line loaded rows up with their generated keys.
pub const TRACKER_COLUMN: &str = "__bulkload_tracker";

/// A pending bulk load of one batch.
///
/// Created by [`Db::bulk_load`] or [`Transaction::bulk_load`](crate::Transaction::bulk_load).
#[derive(Debug)]
#[must_use = "a bulk load does nothing until `exec` or `spawn` is called"]
pub struct BulkLoad<'a> {
    target: Target<'a>,
    provider: Provider,
    capability: &'static Capability,
    batch: RowBatch,
    plan: Plan,
}

#[derive(Debug, Clone)]
pub(crate) struct Plan {
    pub(crate) batch_size: usize,
    pub(crate) options: BulkCopyOptions,
    pub(crate) primary_keys: Vec<String>,
    pub(crate) strict_correlation: bool,
}

impl<'a> BulkLoad<'a> {
    pub(crate) fn new(db: &Db, target: Target<'a>, batch: RowBatch) -> Self {
        Self {
            target,
            provider: db.provider(),
            capability: db.capability(),
            batch,
            plan: Plan {
                batch_size: db.batch_size(),
                options: db.bulk_options(),
                primary_keys: vec![],
                strict_correlation: false,
            },
        }
    }

    /// Rows per flush of the bulk channel.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.plan.batch_size = batch_size;
        self
    }

    pub fn options(mut self, options: BulkCopyOptions) -> Self {
        self.plan.options = options;
        self
    }

    /// Columns whose server-assigned values are read back into the batch
    /// after the load.
    pub fn primary_keys<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plan.primary_keys = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Fail the load when a loaded row cannot be matched to its batch row,
    /// instead of logging and leaving its keys unset.
    pub fn strict_correlation(mut self, strict: bool) -> Self {
        self.plan.strict_correlation = strict;
        self
    }

    /// Loads the batch and returns it with generated keys filled in.
    pub async fn exec(self) -> Result<RowBatch> {
        let BulkLoad {
            target,
            provider,
            capability,
            mut batch,
            plan,
        } = self;

        plan.validate(&batch)?;

        let span = tracing::debug_span!(
            "bulk_load",
            table = %batch.table(),
            rows = batch.len(),
            %provider
        );

        async move {
            let session = Session::open(target).await?;
            tracing::debug!("connection open");

            run(session, provider, capability, &mut batch, &plan).await?;
            Ok(batch)
        }
        .instrument(span)
        .await
    }
}

impl BulkLoad<'static> {
    /// Runs the load on a background task.
    ///
    /// If `cancel` is cancelled before the task starts, the load never runs
    /// and the task returns a cancellation error. A load that has started
    /// always runs to completion: neither cancelling the token nor dropping
    /// the handle stops rows that are already streaming to the server.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<Result<RowBatch>> {
        tokio::spawn(async move {
            if cancel.is_cancelled() {
                return Err(Error::cancelled("bulk load"));
            }
            self.exec().await
        })
    }
}

impl Plan {
    /// Checks everything that can be checked before a connection is opened.
    pub(crate) fn validate(&self, batch: &RowBatch) -> Result<()> {
        if batch.columns().is_empty() || batch.is_empty() {
            return Err(Error::validation_empty_batch(
                batch.columns().len(),
                batch.len(),
            ));
        }

        if batch.table().is_empty() {
            return Err(Error::validation_missing_table_name());
        }

        if self.batch_size == 0 {
            return Err(Error::validation_batch_size());
        }

        batch.validate()?;

        for name in &self.primary_keys {
            if batch.column_index(name).is_none() {
                return Err(Error::validation_unknown_column(name.as_str()));
            }
        }

        if batch.column_index(TRACKER_COLUMN).is_some() {
            return Err(Error::validation(format!(
                "batch for `{}` already has a `{TRACKER_COLUMN}` column",
                batch.table()
            )));
        }

        if self.primary_keys.is_empty() && self.transfer_columns(batch).is_empty() {
            return Err(Error::validation(format!(
                "batch for `{}` has no writable columns",
                batch.table()
            )));
        }

        Ok(())
    }

    fn is_primary_key(&self, column: &str) -> bool {
        self.primary_keys
            .iter()
            .any(|name| name.eq_ignore_ascii_case(column))
    }

    /// Columns sent to the server. Server-generated columns are left out
    /// unless identity values are kept.
    fn transfer_columns(&self, batch: &RowBatch) -> Vec<usize> {
        batch
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| {
                self.options.keep_identity
                    || !(column.auto_increment || self.is_primary_key(&column.name))
            })
            .map(|(index, _)| index)
            .collect()
    }

    fn bulk_insert(&self, batch: &RowBatch) -> BulkInsert {
        let columns = self.transfer_columns(batch);

        let rows = (0..batch.len())
            .map(|row| {
                columns
                    .iter()
                    .map(|&column| self.render(batch, row, column))
                    .collect()
            })
            .collect();

        BulkInsert {
            table: batch.table().clone(),
            columns: columns
                .iter()
                .map(|&column| batch.columns()[column].clone())
                .collect(),
            rows,
            batch_size: self.batch_size,
            options: self.options,
        }
    }

    fn render(&self, batch: &RowBatch, row: usize, column: usize) -> Value {
        let value = batch.value(row, column);

        if value.is_null() && !self.options.keep_nulls {
            if let Some(default) = &batch.columns()[column].default {
                return default.clone();
            }
        }

        value
    }
}

/// Runs a validated load on an open session. Teardown always runs, and the
/// batch never keeps the tracker column, whatever the outcome.
pub(crate) async fn run(
    mut session: Session<'_>,
    provider: Provider,
    capability: &Capability,
    batch: &mut RowBatch,
    plan: &Plan,
) -> Result<()> {
    let serializer = Serializer::for_provider(provider);
    let external = session.is_external();
    let mut cleanup = Cleanup::new();

    let res = load(
        session.connection(),
        &serializer,
        capability,
        batch,
        plan,
        external,
        &mut cleanup,
    )
    .await;

    let report = cleanup.run(session, &serializer, batch).await;
    tracing::debug!(ran = report.ran, failed = report.failed, "cleanup finished");

    res
}

async fn load(
    connection: &mut dyn Connection,
    serializer: &Serializer,
    capability: &Capability,
    batch: &mut RowBatch,
    plan: &Plan,
    external: bool,
    cleanup: &mut Cleanup,
) -> Result<()> {
    report_unsupported(capability, &plan.options);

    let tracking = !plan.primary_keys.is_empty();

    if tracking {
        if external && !capability.transactional_ddl {
            tracing::warn!("tracker DDL implicitly commits the surrounding transaction");
        }

        prepare_tracker(connection, serializer, batch, cleanup).await?;
        tracing::debug!("tracker prepared");
    }

    batch.mark_added();

    let count = transfer(connection, batch, plan, external).await?;
    tracing::debug!(rows = count, "transfer complete");

    if tracking {
        for name in &plan.primary_keys {
            if let Some(column) = batch.column_mut(name) {
                column.set_read_only(false);
            }
        }

        let outcome = correlate(
            connection,
            serializer,
            batch,
            &plan.primary_keys,
            plan.strict_correlation,
        )
        .await?;

        tracing::debug!(
            matched = outcome.matched,
            mismatched = outcome.mismatched,
            missing = outcome.missing,
            "keys correlated"
        );
    }

    Ok(())
}

fn report_unsupported(capability: &Capability, options: &BulkCopyOptions) {
    if options.table_lock && !capability.table_lock {
        tracing::debug!("provider cannot lock the table for a bulk load; `table_lock` ignored");
    }
    if !options.check_constraints && !capability.toggle_check_constraints {
        tracing::debug!("provider always checks constraints; `check_constraints` ignored");
    }
    if !options.fire_triggers && !capability.toggle_triggers {
        tracing::debug!("provider always fires triggers; `fire_triggers` ignored");
    }
}

pub(crate) fn tracker_index_name(table: &Name) -> String {
    format!("ix_{}_{TRACKER_COLUMN}", table.table())
}

/// Adds the tracker column to the batch and to the table, numbering rows
/// from 1, and indexes the physical column.
async fn prepare_tracker(
    connection: &mut dyn Connection,
    serializer: &Serializer,
    batch: &mut RowBatch,
    cleanup: &mut Cleanup,
) -> Result<()> {
    let tracker = batch.add_column(Column::new(TRACKER_COLUMN, Type::I64))?;
    cleanup.defer(Task::RemoveBatchColumn(TRACKER_COLUMN.to_string()));

    for row in 0..batch.len() {
        batch.set(row, tracker, Value::I64(i64::try_from(row + 1)?))?;
    }

    let table = batch.table().clone();

    cleanup::execute(
        connection,
        serializer,
        &Statement::add_column(&table, ColumnDef::new(TRACKER_COLUMN, Type::I64, true)),
    )
    .await?;

    cleanup.defer(Task::DropColumn {
        table: table.clone(),
        column: TRACKER_COLUMN.to_string(),
    });

    let index = tracker_index_name(&table);
    let drop_index = Task::DropIndex {
        name: index.clone(),
        table: table.clone(),
    };

    // A leftover index may or may not exist
    if let Err(err) = drop_index.run(connection, serializer, batch).await {
        tracing::debug!(%err, "no previous tracker index dropped");
    }

    let create_index = Statement::create_index(index, &table, vec![TRACKER_COLUMN.to_string()]);
    if let Err(err) = cleanup::execute(connection, serializer, &create_index).await {
        tracing::warn!(%err, "failed to index the tracker column");
    }

    cleanup.defer(drop_index);
    Ok(())
}

/// Streams the batch through the bulk channel, inside an engine-owned
/// transaction unless the caller owns one or the options say otherwise.
async fn transfer(
    connection: &mut dyn Connection,
    batch: &RowBatch,
    plan: &Plan,
    external: bool,
) -> Result<u64> {
    let op = plan.bulk_insert(batch);

    if external || !plan.options.use_internal_transaction {
        return connection.exec(op.into()).await?.rows.into_count();
    }

    connection
        .exec(
            TransactionOp::Start {
                write_lock: plan.options.table_lock,
            }
            .into(),
        )
        .await?;
    tracing::debug!("transaction started");

    let res = match connection.exec(op.into()).await {
        Ok(response) => response.rows.into_count(),
        Err(err) => Err(err),
    };

    // A failed COMMIT may leave the transaction open
    let res = match res {
        Ok(count) => connection
            .exec(TransactionOp::Commit.into())
            .await
            .map(|_| count),
        Err(err) => Err(err),
    };

    match res {
        Ok(count) => {
            tracing::debug!("transaction committed");
            Ok(count)
        }
        Err(err) => {
            match connection.exec(TransactionOp::Rollback.into()).await {
                Ok(_) => tracing::debug!("transaction rolled back"),
                Err(rollback) => tracing::warn!(%rollback, "rollback failed"),
            }
            Err(err)
        }
    }
}
