mod copy;
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
use bytes::Bytes;
use futures_util::{future::try_join_all, pin_mut, SinkExt};
use std::{borrow::Cow, str::FromStr};
use tokio_postgres::{types::ToSql, Client, Config, NoTls};
use url::Url;

/// Flush the COPY buffer once it grows past this many bytes.
const COPY_BUFFER: usize = 64 * 1024;

#[derive(Debug)]
pub struct PostgreSQL {
    url: String,
    config: Config,
}

impl PostgreSQL {
    /// Create a new PostgreSQL driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)?;

        if !Provider::Postgresql.accepts_scheme(url.scheme()) {
            return Err(Error::configuration(format!(
                "connection URL does not have a `postgresql` scheme; url={url_str}"
            )));
        }

        if url.host_str().is_none() {
            return Err(Error::configuration(format!(
                "missing host in connection URL; url={url_str}"
            )));
        }

        if url.path().is_empty() || url.path() == "/" {
            return Err(Error::configuration(format!(
                "no database specified - missing path in connection URL; url={url_str}"
            )));
        }

        let config = Config::from_str(&url_str).map_err(Error::driver_operation_failed)?;

        Ok(Self {
            url: url_str,
            config,
        })
    }
}

#[async_trait]
impl Driver for PostgreSQL {
    fn provider(&self) -> Provider {
        Provider::Postgresql
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    async fn connect(&self) -> Result<Box<dyn bulkload_core::Connection>> {
        let (client, connection) = self
            .config
            .connect(NoTls)
            .await
            .map_err(Error::driver_operation_failed)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("connection error: {e}");
            }
        });

        Ok(Box::new(Connection::new(client)))
    }
}

#[derive(Debug)]
pub struct Connection {
    client: Client,
    in_transaction: bool,
}

impl Connection {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            in_transaction: false,
        }
    }
}

#[async_trait]
impl bulkload_core::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::Execute(Execute { sql }) => {
                self.client
                    .batch_execute(&sql)
                    .await
                    .map_err(Error::driver_operation_failed)?;
                Ok(Response::count(0))
            }
            Operation::Query(op) => self.query(op).await,
            Operation::BulkInsert(op) => self.bulk_insert(op).await,
            Operation::BatchExecute(op) => self.batch_execute(op).await,
            Operation::Describe(Describe { table }) => describe::table(&self.client, &table)
                .await
                .map(Response::schema),
            Operation::Transaction(op) => {
                let (sql, in_transaction) = match op {
                    Transaction::Start { .. } => ("BEGIN", true),
                    Transaction::Commit => ("COMMIT", false),
                    Transaction::Rollback => ("ROLLBACK", false),
                };
                self.client
                    .batch_execute(sql)
                    .await
                    .map_err(Error::driver_operation_failed)?;
                self.in_transaction = in_transaction;
                Ok(Response::count(0))
            }
        }
    }
}

impl Connection {
    async fn query(&mut self, op: Query) -> Result<Response> {
        let params = op.params.into_iter().map(Value::from).collect::<Vec<_>>();
        let refs = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        let rows = self
            .client
            .query(&op.sql, &refs)
            .await
            .map_err(Error::driver_operation_failed)?;

        let mut ret = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut items = Vec::with_capacity(op.ret.len());
            for (index, ty) in op.ret.iter().enumerate() {
                items.push(value::from_row(row, index, ty)?);
            }
            ret.push(items);
        }

        Ok(Response::values(ret))
    }

    /// Streams rows through `COPY .. FROM STDIN`, one COPY per chunk.
    async fn bulk_insert(&mut self, op: BulkInsert) -> Result<Response> {
        let serializer = Serializer::postgresql();

        if op.options.table_lock {
            if self.in_transaction {
                let sql = format!(
                    "LOCK TABLE {} IN SHARE ROW EXCLUSIVE MODE",
                    serializer.name(&op.table)
                );
                self.client
                    .batch_execute(&sql)
                    .await
                    .map_err(Error::driver_operation_failed)?;
            } else {
                tracing::debug!("table lock requested outside a transaction; skipping");
            }
        }

        let columns = op
            .columns
            .iter()
            .map(|c| c.name.clone())
            .collect::<Vec<_>>();
        let mut params: Vec<bulkload_core::stmt::Value> = vec![];
        let sql = serializer.serialize(&Statement::copy_in(&op.table, columns), &mut params);

        let mut count = 0;

        for chunk in op.rows.chunks(op.batch_size.max(1)) {
            let sink = self
                .client
                .copy_in::<_, Bytes>(sql.trim_end_matches(';'))
                .await
                .map_err(Error::driver_operation_failed)?;
            pin_mut!(sink);

            let mut buf = String::with_capacity(COPY_BUFFER);
            for row in chunk {
                copy::encode_row(&mut buf, row);

                if buf.len() >= COPY_BUFFER {
                    let data = Bytes::from(std::mem::take(&mut buf));
                    sink.send(data)
                        .await
                        .map_err(Error::driver_operation_failed)?;
                }
            }

            if !buf.is_empty() {
                sink.send(Bytes::from(buf))
                    .await
                    .map_err(Error::driver_operation_failed)?;
            }

            count += sink
                .finish()
                .await
                .map_err(Error::driver_operation_failed)?;

            tracing::trace!(rows = chunk.len(), "flushed");
        }

        Ok(Response::count(count))
    }

    /// Prepares the statement once and pipelines each chunk of rows.
    async fn batch_execute(&mut self, op: BatchExecute) -> Result<Response> {
        let stmt = self
            .client
            .prepare(&op.sql)
            .await
            .map_err(Error::driver_operation_failed)?;

        let mut count = 0;

        for chunk in op.rows.chunks(op.batch_size.max(1)) {
            let params = chunk
                .iter()
                .map(|row| row.iter().cloned().map(Value::from).collect::<Vec<_>>())
                .collect::<Vec<_>>();

            let counts = try_join_all(
                params
                    .iter()
                    .map(|row| self.client.execute_raw(&stmt, row.iter())),
            )
            .await
            .map_err(Error::driver_operation_failed)?;

            count += counts.into_iter().sum::<u64>();
        }

        Ok(Response::count(count))
    }
}
