use crate::{
    engine::{BatchUpdate, BulkLoad, Target},
    Db,
};

use bulkload_core::{
    batch::RowBatch,
    driver::{operation, Operation, Response},
    Connection, Result,
};

/// An open transaction on a dedicated connection.
///
/// Engine calls made through a transaction neither commit nor roll back;
/// the caller decides with [`commit`](Self::commit) or
/// [`rollback`](Self::rollback). If dropped without either, the transaction
/// is rolled back in the background.
#[derive(Debug)]
pub struct Transaction<'db> {
    db: &'db Db,

    /// `Option` so that `Drop` can move it into a spawned task.
    connection: Option<Box<dyn Connection>>,

    /// Whether commit or rollback has completed.
    finished: bool,
}

impl<'db> Transaction<'db> {
    pub(crate) async fn begin(db: &'db Db) -> Result<Transaction<'db>> {
        let mut connection = db.connect().await?;

        connection
            .exec(operation::Transaction::Start { write_lock: false }.into())
            .await?;

        tracing::debug!("transaction started");

        Ok(Transaction {
            db,
            connection: Some(connection),
            finished: false,
        })
    }

    pub async fn commit(mut self) -> Result<()> {
        self.exec(operation::Transaction::Commit).await?;
        self.finished = true;
        tracing::debug!("transaction committed");
        Ok(())
    }

    pub async fn rollback(mut self) -> Result<()> {
        self.exec(operation::Transaction::Rollback).await?;
        self.finished = true;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    /// Runs a single operation inside the transaction.
    pub async fn exec(&mut self, op: impl Into<Operation>) -> Result<Response> {
        self.connection().exec(op.into()).await
    }

    /// Starts a bulk load of `batch` inside this transaction.
    pub fn bulk_load(&mut self, batch: RowBatch) -> BulkLoad<'_> {
        let db = self.db;
        BulkLoad::new(db, Target::Transaction(self.connection()), batch)
    }

    /// Starts a batch update of `batch` with `template` inside this
    /// transaction.
    pub fn batch_update(
        &mut self,
        batch: RowBatch,
        template: impl Into<String>,
    ) -> BatchUpdate<'_> {
        let db = self.db;
        BatchUpdate::new(
            db,
            Target::Transaction(self.connection()),
            batch,
            template.into(),
        )
    }

    fn connection(&mut self) -> &mut (dyn Connection + 'static) {
        self.connection
            .as_deref_mut()
            .expect("connection taken after commit/rollback")
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let (Some(mut connection), Ok(handle)) = (
                self.connection.take(),
                tokio::runtime::Handle::try_current(),
            ) {
                handle.spawn(async move {
                    if let Err(err) = connection
                        .exec(operation::Transaction::Rollback.into())
                        .await
                    {
                        tracing::warn!(%err, "rollback of dropped transaction failed");
                    }
                });
            }
        }

        self.db.release_transaction();
    }
}
