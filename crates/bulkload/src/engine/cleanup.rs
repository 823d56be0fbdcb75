//! Teardown that runs after every bulk load, whether or not it succeeded.
//!
//! Each task catches and logs its own failure so that teardown never hides
//! the error of the step it follows.

use super::Session;

use bulkload_core::{
    batch::RowBatch,
    driver::operation::Execute,
    stmt::{Name, Value},
    Connection, Result,
};
use bulkload_sql::{Serializer, Statement};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Task {
    DropIndex { name: String, table: Name },
    DropColumn { table: Name, column: String },
    RemoveBatchColumn(String),
}

impl Task {
    /// Tasks run in this order regardless of when they were registered.
    fn stage(&self) -> u8 {
        match self {
            Task::DropIndex { .. } => 0,
            Task::DropColumn { .. } => 1,
            Task::RemoveBatchColumn(_) => 2,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Task::DropIndex { .. } => "drop tracker index",
            Task::DropColumn { .. } => "drop tracker column",
            Task::RemoveBatchColumn(_) => "remove batch tracker column",
        }
    }

    pub(super) async fn run(
        &self,
        connection: &mut dyn Connection,
        serializer: &Serializer,
        batch: &mut RowBatch,
    ) -> Result<()> {
        match self {
            Task::DropIndex { name, table } => {
                let stmt = if serializer.is_mysql() {
                    Statement::drop_index(name.as_str(), table)
                } else {
                    Statement::drop_index_if_exists(name.as_str(), table)
                };
                execute(connection, serializer, &stmt).await
            }
            Task::DropColumn { table, column } => {
                let stmt = Statement::drop_column(table, column.as_str());
                execute(connection, serializer, &stmt).await
            }
            Task::RemoveBatchColumn(column) => batch.remove_column(column).map(drop),
        }
    }
}

/// Serializes and executes a statement that binds no parameters.
pub(crate) async fn execute(
    connection: &mut dyn Connection,
    serializer: &Serializer,
    stmt: &Statement,
) -> Result<()> {
    let mut params: Vec<Value> = vec![];
    let sql = serializer.serialize(stmt, &mut params);
    connection.exec(Execute { sql }.into()).await?;
    Ok(())
}

/// Outcome of a teardown, for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Report {
    pub(crate) ran: usize,
    pub(crate) failed: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Cleanup {
    tasks: Vec<Task>,
}

impl Cleanup {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn defer(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Runs every registered task once, then releases the session.
    pub(crate) async fn run(
        mut self,
        mut session: Session<'_>,
        serializer: &Serializer,
        batch: &mut RowBatch,
    ) -> Report {
        self.tasks.sort_by_key(Task::stage);

        let mut report = Report::default();

        for task in self.tasks {
            report.ran += 1;

            match task.run(session.connection(), serializer, batch).await {
                Ok(()) => tracing::debug!(task = task.name(), "cleanup task done"),
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(task = task.name(), %err, "cleanup task failed");
                }
            }
        }

        session.release();
        report
    }
}
