use super::{Session, Target};
use crate::Db;

use bulkload_core::{
    batch::RowBatch,
    driver::{
        operation::{BatchExecute, Transaction as TransactionOp},
        Provider,
    },
    Connection, Error, Result,
};
use bulkload_sql::{BoundCommand, CommandTemplate, Serializer};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// A pending update of every row in a batch, one command execution per row.
///
/// Created by [`Db::batch_update`] or
/// [`Transaction::batch_update`](crate::Transaction::batch_update).
#[derive(Debug)]
#[must_use = "a batch update does nothing until `exec` or `spawn` is called"]
pub struct BatchUpdate<'a> {
    target: Target<'a>,
    provider: Provider,
    batch: RowBatch,
    template: String,
    batch_size: usize,
}

impl<'a> BatchUpdate<'a> {
    pub(crate) fn new(db: &Db, target: Target<'a>, batch: RowBatch, template: String) -> Self {
        Self {
            target,
            provider: db.provider(),
            batch,
            template,
            batch_size: db.batch_size(),
        }
    }

    /// Rows sent per round trip.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Runs the command for every row and returns the number of rows
    /// affected.
    pub async fn exec(self) -> Result<u64> {
        let BatchUpdate {
            target,
            provider,
            mut batch,
            template,
            batch_size,
        } = self;

        let serializer = Serializer::for_provider(provider);
        let command = prepare(&serializer, &batch, &template, batch_size)?;

        let span = tracing::debug_span!(
            "batch_update",
            table = %batch.table(),
            rows = batch.len(),
            %provider
        );

        async move {
            batch.mark_modified();

            let rows = (0..batch.len())
                .map(|row| command.bind_row(&batch.row_values(row)))
                .collect();

            let op = BatchExecute {
                sql: command.sql,
                rows,
                batch_size,
            };

            let mut session = Session::open(target).await?;
            tracing::debug!("connection open");

            let external = session.is_external();
            let res = execute(session.connection(), op, external).await;
            session.release();

            let count = res?;
            tracing::debug!(rows = count, "update complete");
            Ok(count)
        }
        .instrument(span)
        .await
    }
}

impl BatchUpdate<'static> {
    /// Runs the update on a background task.
    ///
    /// Cancelling `cancel` before the task starts prevents the update from
    /// running. Once started it runs to completion.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<Result<u64>> {
        tokio::spawn(async move {
            if cancel.is_cancelled() {
                return Err(Error::cancelled("batch update"));
            }
            self.exec().await
        })
    }
}

/// Validates the batch and binds the template to its columns.
fn prepare(
    serializer: &Serializer,
    batch: &RowBatch,
    template: &str,
    batch_size: usize,
) -> Result<BoundCommand> {
    if batch.columns().is_empty() || batch.is_empty() {
        return Err(Error::validation_empty_batch(
            batch.columns().len(),
            batch.len(),
        ));
    }

    let template = CommandTemplate::parse(template)?;

    if batch_size == 0 {
        return Err(Error::validation_batch_size());
    }

    template.render(serializer, batch.columns())
}

async fn execute(connection: &mut dyn Connection, op: BatchExecute, external: bool) -> Result<u64> {
    if external {
        return connection.exec(op.into()).await?.rows.into_count();
    }

    connection
        .exec(TransactionOp::Start { write_lock: false }.into())
        .await?;

    let res = match connection.exec(op.into()).await {
        Ok(response) => response.rows.into_count(),
        Err(err) => Err(err),
    };

    let res = match res {
        Ok(count) => connection
            .exec(TransactionOp::Commit.into())
            .await
            .map(|_| count),
        Err(err) => Err(err),
    };

    if res.is_err() {
        if let Err(rollback) = connection.exec(TransactionOp::Rollback.into()).await {
            tracing::warn!(%rollback, "rollback failed");
        }
    }

    res
}
