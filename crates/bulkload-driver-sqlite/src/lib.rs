mod describe;

mod value;
pub(crate) use value::Value;

use bulkload_core::{
    async_trait,
    driver::{
        operation::{BatchExecute, BulkInsert, Describe, Execute, Operation, Query, Transaction},
        Capability, Driver, Provider, Response,
    },
    Error, Result,
};
use bulkload_sql::{Serializer, Statement};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};
use url::Url;

#[derive(Debug, Clone)]
pub enum Sqlite {
    File(PathBuf),

    /// Every connection shares one in-memory database, which lives as long
    /// as the driver.
    InMemory(Arc<Mutex<RusqliteConnection>>),
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)?;

        if url.scheme() != "sqlite" {
            return Err(Error::configuration(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Ok(Self::InMemory(Arc::new(Mutex::new(connection))))
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn provider(&self) -> Provider {
        Provider::Sqlite
    }

    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory(_) => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn bulkload_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory(shared) => Connection {
                connection: shared.clone(),
            },
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: Arc<Mutex<RusqliteConnection>>,
}

impl Connection {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, RusqliteConnection>> {
        self.connection
            .lock()
            .map_err(|_| Error::invalid_operation("sqlite connection poisoned by a panic"))
    }
}

#[async_trait]
impl bulkload_core::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let connection = self.lock()?;

        match op {
            Operation::Execute(Execute { sql }) => {
                connection
                    .execute_batch(&sql)
                    .map_err(Error::driver_operation_failed)?;
                Ok(Response::count(connection.changes() as u64))
            }
            Operation::Query(op) => query(&connection, op),
            Operation::BulkInsert(op) => bulk_insert(&connection, op),
            Operation::BatchExecute(op) => batch_execute(&connection, op),
            Operation::Describe(Describe { table }) => {
                describe::table(&connection, &table).map(Response::schema)
            }
            Operation::Transaction(op) => {
                let sql = match op {
                    Transaction::Start { write_lock: true } => "BEGIN IMMEDIATE",
                    Transaction::Start { write_lock: false } => "BEGIN",
                    Transaction::Commit => "COMMIT",
                    Transaction::Rollback => "ROLLBACK",
                };
                connection
                    .execute(sql, [])
                    .map_err(Error::driver_operation_failed)?;
                Ok(Response::count(0))
            }
        }
    }
}

fn query(connection: &RusqliteConnection, op: Query) -> Result<Response> {
    let mut stmt = connection
        .prepare_cached(&op.sql)
        .map_err(Error::driver_operation_failed)?;

    let params = op.params.into_iter().map(Value::from).collect::<Vec<_>>();

    let mut rows = stmt
        .query(rusqlite::params_from_iter(params.iter()))
        .map_err(Error::driver_operation_failed)?;

    let mut ret = vec![];

    while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
        let mut items = Vec::with_capacity(op.ret.len());
        for (index, ty) in op.ret.iter().enumerate() {
            items.push(Value::from_sql(row, index, ty)?.into_inner());
        }
        ret.push(items);
    }

    Ok(Response::values(ret))
}

/// Streams rows as multi-row `INSERT` statements, one per flush.
fn bulk_insert(connection: &RusqliteConnection, op: BulkInsert) -> Result<Response> {
    if !op.options.check_constraints {
        connection
            .execute_batch("PRAGMA ignore_check_constraints = ON;")
            .map_err(Error::driver_operation_failed)?;
    }

    let res = insert_rows(connection, &op);

    if !op.options.check_constraints {
        if let Err(err) = connection.execute_batch("PRAGMA ignore_check_constraints = OFF;") {
            tracing::warn!(%err, "failed to re-enable check constraints");
        }
    }

    res.map(Response::count)
}

fn insert_rows(connection: &RusqliteConnection, op: &BulkInsert) -> Result<u64> {
    let serializer = Serializer::sqlite();
    let columns: Vec<String> = op.columns.iter().map(|c| c.name.clone()).collect();

    let per_stmt = (Capability::SQLITE.max_params / columns.len().max(1)).max(1);
    let chunk_size = op.batch_size.min(per_stmt).max(1);

    let mut count = 0;

    for chunk in op.rows.chunks(chunk_size) {
        let mut params: Vec<bulkload_core::stmt::Value> = vec![];
        let sql = serializer.serialize(
            &Statement::insert(&op.table, columns.clone(), chunk.to_vec()),
            &mut params,
        );

        let mut stmt = connection
            .prepare_cached(&sql)
            .map_err(Error::driver_operation_failed)?;

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        count += stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)? as u64;

        tracing::trace!(rows = chunk.len(), "flushed");
    }

    Ok(count)
}

fn batch_execute(connection: &RusqliteConnection, op: BatchExecute) -> Result<Response> {
    let mut stmt = connection
        .prepare_cached(&op.sql)
        .map_err(Error::driver_operation_failed)?;

    let mut count = 0;

    for chunk in op.rows.chunks(op.batch_size.max(1)) {
        for row in chunk {
            let params = row.iter().cloned().map(Value::from).collect::<Vec<_>>();
            count += stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver_operation_failed)? as u64;
        }
    }

    Ok(Response::count(count))
}
