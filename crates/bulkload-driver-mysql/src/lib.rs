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
use mysql_async::{
    prelude::{Queryable, ToValue},
    Conn, Params, Pool,
};
use std::borrow::Cow;
use url::Url;

#[derive(Debug)]
pub struct MySQL {
    url: String,
    pool: Pool,
}

impl MySQL {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)?;

        if url.scheme() != "mysql" {
            return Err(Error::configuration(format!(
                "connection url does not have a `mysql` scheme; url={url_str}"
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

        let opts =
            mysql_async::Opts::from_url(url.as_ref()).map_err(Error::driver_operation_failed)?;
        let opts = mysql_async::OptsBuilder::from_opts(opts).client_found_rows(true);

        Ok(Self {
            url: url_str,
            pool: Pool::new(opts),
        })
    }
}

#[async_trait]
impl Driver for MySQL {
    fn provider(&self) -> Provider {
        Provider::Mysql
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    async fn connect(&self) -> Result<Box<dyn bulkload_core::Connection>> {
        let conn = self
            .pool
            .get_conn()
            .await
            .map_err(Error::driver_operation_failed)?;
        Ok(Box::new(Connection::new(conn)))
    }
}

#[derive(Debug)]
pub struct Connection {
    conn: Conn,
}

impl Connection {
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }
}

impl From<Conn> for Connection {
    fn from(conn: Conn) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl bulkload_core::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::Execute(Execute { sql }) => {
                self.conn
                    .query_drop(sql.as_str())
                    .await
                    .map_err(Error::driver_operation_failed)?;
                Ok(Response::count(self.conn.affected_rows()))
            }
            Operation::Query(op) => self.query(op).await,
            Operation::BulkInsert(op) => self.bulk_insert(op).await,
            Operation::BatchExecute(op) => self.batch_execute(op).await,
            Operation::Describe(Describe { table }) => describe::table(&mut self.conn, &table)
                .await
                .map(Response::schema),
            Operation::Transaction(op) => {
                let sql = match op {
                    Transaction::Start { .. } => "START TRANSACTION",
                    Transaction::Commit => "COMMIT",
                    Transaction::Rollback => "ROLLBACK",
                };
                self.conn
                    .query_drop(sql)
                    .await
                    .map_err(Error::driver_operation_failed)?;
                Ok(Response::count(0))
            }
        }
    }
}

fn positional(values: impl IntoIterator<Item = bulkload_core::stmt::Value>) -> Params {
    let args = values
        .into_iter()
        .map(|value| Value::from(value).to_value())
        .collect::<Vec<_>>();

    if args.is_empty() {
        Params::Empty
    } else {
        Params::Positional(args)
    }
}

impl Connection {
    async fn query(&mut self, op: Query) -> Result<Response> {
        let rows: Vec<mysql_async::Row> = self
            .conn
            .exec(op.sql.as_str(), positional(op.params))
            .await
            .map_err(Error::driver_operation_failed)?;

        let mut ret = Vec::with_capacity(rows.len());

        for mut row in rows {
            let mut items = Vec::with_capacity(op.ret.len());
            for (index, ty) in op.ret.iter().enumerate() {
                let raw = row
                    .take::<mysql_async::Value, usize>(index)
                    .ok_or_else(|| Error::invalid_result(format!("missing column {index}")))?;
                items.push(Value::from_sql(raw, ty)?.into_inner());
            }
            ret.push(items);
        }

        Ok(Response::values(ret))
    }

    /// Streams rows as multi-row `INSERT` statements, one per flush.
    async fn bulk_insert(&mut self, op: BulkInsert) -> Result<Response> {
        if !op.options.check_constraints {
            self.conn
                .query_drop("SET FOREIGN_KEY_CHECKS = 0")
                .await
                .map_err(Error::driver_operation_failed)?;
        }

        let res = self.insert_rows(&op).await;

        if !op.options.check_constraints {
            if let Err(err) = self.conn.query_drop("SET FOREIGN_KEY_CHECKS = 1").await {
                tracing::warn!(%err, "failed to re-enable foreign key checks");
            }
        }

        res.map(Response::count)
    }

    async fn insert_rows(&mut self, op: &BulkInsert) -> Result<u64> {
        let serializer = Serializer::mysql();
        let columns: Vec<String> = op.columns.iter().map(|c| c.name.clone()).collect();

        let per_stmt = (Capability::MYSQL.max_params / columns.len().max(1)).max(1);
        let chunk_size = op.batch_size.min(per_stmt).max(1);

        let mut count = 0;

        for chunk in op.rows.chunks(chunk_size) {
            let mut params: Vec<bulkload_core::stmt::Value> = vec![];
            let sql = serializer.serialize(
                &Statement::insert(&op.table, columns.clone(), chunk.to_vec()),
                &mut params,
            );

            self.conn
                .exec_drop(sql.as_str(), positional(params))
                .await
                .map_err(Error::driver_operation_failed)?;
            count += self.conn.affected_rows();

            tracing::trace!(rows = chunk.len(), "flushed");
        }

        Ok(count)
    }

    async fn batch_execute(&mut self, op: BatchExecute) -> Result<Response> {
        let stmt = self
            .conn
            .prep(op.sql.as_str())
            .await
            .map_err(Error::driver_operation_failed)?;

        let mut count = 0;

        for chunk in op.rows.chunks(op.batch_size.max(1)) {
            for row in chunk {
                self.conn
                    .exec_drop(&stmt, positional(row.iter().cloned()))
                    .await
                    .map_err(Error::driver_operation_failed)?;
                count += self.conn.affected_rows();
            }
        }

        Ok(Response::count(count))
    }
}
