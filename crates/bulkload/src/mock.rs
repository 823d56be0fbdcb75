//! A recording driver for exercising the engines without a database.

use crate::Db;

use bulkload_core::{
    async_trait,
    batch::RowBatch,
    driver::{
        operation::{self, Operation},
        Driver, Provider, Response,
    },
    stmt::Value,
    Connection, Error, Result,
};
use std::{
    borrow::Cow,
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex},
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Begin,
    Commit,
    Rollback,
    Execute(String),
    Query {
        sql: String,
        params: Vec<Value>,
    },
    BulkInsert {
        table: String,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    BatchExecute {
        sql: String,
        rows: Vec<Vec<Value>>,
        batch_size: usize,
    },
    Describe(String),
}

impl Call {
    pub(crate) fn is_execute_of(&self, prefix: &str) -> bool {
        matches!(self, Call::Execute(sql) if sql.starts_with(prefix))
    }
}

type FailWhen = Arc<dyn Fn(&Call) -> bool + Send + Sync>;

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    releases: usize,
    fail_when: Option<FailWhen>,
    query_results: VecDeque<Vec<Vec<Value>>>,
    schema: Option<RowBatch>,
}

#[derive(Clone)]
pub(crate) struct Mock {
    provider: Provider,
    state: Arc<Mutex<State>>,
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mock")
            .field("provider", &self.provider)
            .finish()
    }
}

impl Mock {
    pub(crate) fn new(provider: Provider) -> Self {
        Self {
            provider,
            state: Default::default(),
        }
    }

    pub(crate) async fn db(&self) -> Db {
        Db::builder()
            .driver(self.clone())
            .batch_size(2)
            .build()
            .await
            .unwrap()
    }

    /// Fails every operation matching `f` with a driver error.
    pub(crate) fn fail_when(&self, f: impl Fn(&Call) -> bool + Send + Sync + 'static) -> &Self {
        self.state.lock().unwrap().fail_when = Some(Arc::new(f));
        self
    }

    /// Queues the rows returned by the next query.
    pub(crate) fn query_result(&self, rows: Vec<Vec<Value>>) -> &Self {
        self.state.lock().unwrap().query_results.push_back(rows);
        self
    }

    pub(crate) fn describe_as(&self, schema: RowBatch) -> &Self {
        self.state.lock().unwrap().schema = Some(schema);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of connections dropped so far.
    pub(crate) fn releases(&self) -> usize {
        self.state.lock().unwrap().releases
    }
}

#[async_trait]
impl Driver for Mock {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed("mock://")
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(MockConnection {
            state: self.state.clone(),
        }))
    }
}

struct MockConnection {
    state: Arc<Mutex<State>>,
}

impl fmt::Debug for MockConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MockConnection")
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.releases += 1;
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let call = match &op {
            Operation::Transaction(operation::Transaction::Start { .. }) => Call::Begin,
            Operation::Transaction(operation::Transaction::Commit) => Call::Commit,
            Operation::Transaction(operation::Transaction::Rollback) => Call::Rollback,
            Operation::Execute(op) => Call::Execute(op.sql.clone()),
            Operation::Query(op) => Call::Query {
                sql: op.sql.clone(),
                params: op.params.clone(),
            },
            Operation::BulkInsert(op) => Call::BulkInsert {
                table: op.table.to_string(),
                columns: op.columns.iter().map(|c| c.name.clone()).collect(),
                rows: op.rows.clone(),
            },
            Operation::BatchExecute(op) => Call::BatchExecute {
                sql: op.sql.clone(),
                rows: op.rows.clone(),
                batch_size: op.batch_size,
            },
            Operation::Describe(op) => Call::Describe(op.table.to_string()),
        };

        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());

        if state.fail_when.as_ref().is_some_and(|f| f(&call)) {
            return Err(Error::driver_operation_failed(std::io::Error::other(
                "injected failure",
            )));
        }

        match call {
            Call::BulkInsert { rows, .. } | Call::BatchExecute { rows, .. } => {
                Ok(Response::count(rows.len() as u64))
            }
            Call::Query { .. } => Ok(Response::values(
                state.query_results.pop_front().unwrap_or_default(),
            )),
            Call::Describe(table) => match &state.schema {
                Some(schema) => Ok(Response::schema(schema.clone())),
                None => Err(Error::invalid_result(format!("table `{table}` does not exist"))),
            },
            _ => Ok(Response::count(0)),
        }
    }
}
