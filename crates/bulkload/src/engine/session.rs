use crate::Db;

use bulkload_core::{Connection, Result};

/// Where an engine call runs.
#[derive(Debug)]
pub(crate) enum Target<'a> {
    /// A fresh connection from the database handle
    Db(Db),

    /// The connection of a caller-owned transaction
    Transaction(&'a mut (dyn Connection + 'static)),
}

/// The connection an engine call holds for its duration.
#[derive(Debug)]
pub(crate) enum Session<'a> {
    Owned(Box<dyn Connection>),
    External(&'a mut (dyn Connection + 'static)),
}

impl<'a> Session<'a> {
    pub(crate) async fn open(target: Target<'a>) -> Result<Session<'a>> {
        Ok(match target {
            Target::Db(db) => Session::Owned(db.connect().await?),
            Target::Transaction(connection) => Session::External(connection),
        })
    }

    pub(crate) fn connection(&mut self) -> &mut (dyn Connection + 'static) {
        match self {
            Session::Owned(connection) => connection.as_mut(),
            Session::External(connection) => &mut **connection,
        }
    }

    /// Whether the caller owns the surrounding transaction.
    pub(crate) fn is_external(&self) -> bool {
        matches!(self, Session::External(_))
    }

    /// Gives the connection back. Owned connections are closed; borrowed
    /// ones stay with the caller's transaction.
    pub(crate) fn release(self) {
        if let Session::Owned(connection) = self {
            drop(connection);
            tracing::debug!("connection released");
        }
    }
}
