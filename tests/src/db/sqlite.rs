use bulkload::{db, Capability, Db, Provider};

use crate::Setup;

/// Each test connects to its own in-memory database, so no prefix is
/// needed and there is nothing to clean up.
pub struct SetupSqlite;

impl SetupSqlite {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SetupSqlite {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Setup for SetupSqlite {
    async fn connect(&self, mut builder: db::Builder) -> bulkload::Result<Db> {
        builder
            .provider(Provider::Sqlite)
            .connection_url("sqlite::memory:")
            .build()
            .await
    }

    fn capability(&self) -> &Capability {
        &Capability::SQLITE
    }

    fn users_ddl(&self, table: &str) -> String {
        format!(
            "CREATE TABLE \"{table}\" (\
                \"Id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
                \"Name\" TEXT NOT NULL, \
                \"Email\" TEXT NOT NULL UNIQUE\
            );"
        )
    }

    async fn cleanup_my_tables(&self) -> bulkload::Result<()> {
        Ok(())
    }
}
