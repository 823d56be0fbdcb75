#[macro_use]
mod macros;

pub mod db;
mod isolation;
mod runner;
mod users;

// Re-export for use in macros
pub use runner::BulkloadTest;
pub use users::{stored_users, User, UsersResolver};

use bulkload::{driver::operation::Execute, Capability, Db, Name};

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    /// Connects and creates a fresh `users` table.
    async fn setup(&self) -> Db {
        let mut builder = Db::builder();
        builder.batch_size(2);

        let db = self.connect(builder).await.unwrap();
        db.exec(Execute {
            sql: self.users_ddl(&self.table("users")),
        })
        .await
        .unwrap();
        db
    }

    async fn connect(&self, builder: bulkload::db::Builder) -> bulkload::Result<Db>;

    fn capability(&self) -> &Capability;

    /// Prefix that isolates this test's tables from concurrent tests.
    fn table_prefix(&self) -> String {
        String::new()
    }

    fn table(&self, name: &str) -> String {
        format!("{}{name}", self.table_prefix())
    }

    fn users(&self) -> Name {
        Name::parse(&self.table("users"))
    }

    /// Quotes an identifier for this database.
    fn ident(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    /// `CREATE TABLE` for `(Id auto-increment primary key, Name, Email unique)`.
    fn users_ddl(&self, table: &str) -> String;

    /// Resolves the `User` record to this test's table.
    fn resolver(&self) -> UsersResolver {
        UsersResolver::new(self.table_prefix())
    }

    /// Clean up tables created by this specific setup instance.
    async fn cleanup_my_tables(&self) -> bulkload::Result<()>;
}

/// Routes engine diagnostics to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
