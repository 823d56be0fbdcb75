use bulkload::{db, Capability, Db, Error, Provider};

use crate::{isolation::TestIsolation, Setup};

fn url() -> String {
    std::env::var("BULKLOAD_TEST_MYSQL_URL")
        .unwrap_or_else(|_| "mysql://localhost:3306/bulkload_test".to_string())
}

pub struct SetupMySQL {
    isolation: TestIsolation,
}

impl SetupMySQL {
    pub fn new() -> Self {
        Self {
            isolation: TestIsolation::new(),
        }
    }
}

impl Default for SetupMySQL {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Setup for SetupMySQL {
    async fn connect(&self, mut builder: db::Builder) -> bulkload::Result<Db> {
        builder
            .provider(Provider::Mysql)
            .connection_url(url())
            .build()
            .await
    }

    fn capability(&self) -> &Capability {
        &Capability::MYSQL
    }

    fn table_prefix(&self) -> String {
        self.isolation.table_prefix()
    }

    fn ident(&self, name: &str) -> String {
        format!("`{name}`")
    }

    fn users_ddl(&self, table: &str) -> String {
        format!(
            "CREATE TABLE `{table}` (\
                `Id` INT AUTO_INCREMENT PRIMARY KEY, \
                `Name` VARCHAR(255) NOT NULL, \
                `Email` VARCHAR(255) NOT NULL UNIQUE\
            ) ENGINE = InnoDB;"
        )
    }

    async fn cleanup_my_tables(&self) -> bulkload::Result<()> {
        cleanup_mysql_tables(&self.isolation)
            .await
            .map_err(|e| Error::configuration(format!("MySQL cleanup failed: {e}")))
    }
}

async fn cleanup_mysql_tables(isolation: &TestIsolation) -> Result<(), Box<dyn std::error::Error>> {
    use mysql_async::prelude::*;

    let opts = mysql_async::Opts::from_url(&url())?;
    let pool = mysql_async::Pool::new(opts);
    let mut conn = pool.get_conn().await?;

    let my_prefix = isolation.table_prefix();

    let rows: Vec<String> = conn
        .query(format!(
            "SELECT table_name FROM information_schema.tables
         WHERE table_schema = DATABASE() AND table_name LIKE '{my_prefix}%'"
        ))
        .await?;

    for table_name in rows {
        let _ = conn
            .query_drop(format!("DROP TABLE IF EXISTS `{table_name}`"))
            .await;
    }

    drop(conn);
    pool.disconnect().await?;
    Ok(())
}
