use bulkload::{db, Capability, Db, Error, Provider};

use crate::{isolation::TestIsolation, Setup};

fn url() -> String {
    std::env::var("BULKLOAD_TEST_POSTGRES_URL")
        .unwrap_or_else(|_| "postgresql://localhost:5432/bulkload_test".to_string())
}

pub struct SetupPostgreSQL {
    isolation: TestIsolation,
}

impl SetupPostgreSQL {
    pub fn new() -> Self {
        Self {
            isolation: TestIsolation::new(),
        }
    }
}

impl Default for SetupPostgreSQL {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Setup for SetupPostgreSQL {
    async fn connect(&self, mut builder: db::Builder) -> bulkload::Result<Db> {
        builder
            .provider(Provider::Postgresql)
            .connection_url(url())
            .build()
            .await
    }

    fn capability(&self) -> &Capability {
        &Capability::POSTGRESQL
    }

    fn table_prefix(&self) -> String {
        self.isolation.table_prefix()
    }

    fn users_ddl(&self, table: &str) -> String {
        format!(
            "CREATE TABLE \"{table}\" (\
                \"Id\" INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY, \
                \"Name\" TEXT NOT NULL, \
                \"Email\" TEXT NOT NULL UNIQUE\
            );"
        )
    }

    async fn cleanup_my_tables(&self) -> bulkload::Result<()> {
        cleanup_postgresql_tables(&self.isolation)
            .await
            .map_err(|e| Error::configuration(format!("PostgreSQL cleanup failed: {e}")))
    }
}

async fn cleanup_postgresql_tables(
    isolation: &TestIsolation,
) -> Result<(), Box<dyn std::error::Error>> {
    use tokio_postgres::NoTls;

    let (client, connection) = tokio_postgres::connect(&url(), NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("PostgreSQL connection error during cleanup: {e}");
        }
    });

    let rows = client
        .query(
            "SELECT table_name FROM information_schema.tables
         WHERE table_schema = current_schema() AND table_name LIKE $1",
            &[&format!("{}%", isolation.table_prefix())],
        )
        .await?;

    for row in rows {
        let table_name: String = row.get(0);
        let query = format!("DROP TABLE IF EXISTS \"{table_name}\" CASCADE");
        let _ = client.execute(&query, &[]).await;
    }

    Ok(())
}
