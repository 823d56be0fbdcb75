mod batch_execute;
pub use batch_execute::BatchExecute;

mod bulk_insert;
pub use bulk_insert::BulkInsert;

mod describe;
pub use describe::Describe;

mod execute;
pub use execute::Execute;

mod query;
pub use query::Query;

mod transaction;
pub use transaction::Transaction;

#[derive(Debug)]
pub enum Operation {
    /// Apply one parameterized statement to many rows
    BatchExecute(BatchExecute),

    /// Stream rows through the provider's bulk channel
    BulkInsert(BulkInsert),

    /// Describe a live table as an empty batch
    Describe(Describe),

    /// Execute a statement that returns no rows, such as DDL
    Execute(Execute),

    /// Execute a parameterized query returning rows
    Query(Query),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::BatchExecute(_) => "batch_execute",
            Operation::BulkInsert(_) => "bulk_insert",
            Operation::Describe(_) => "describe",
            Operation::Execute(_) => "execute",
            Operation::Query(_) => "query",
            Operation::Transaction(_) => "transaction",
        }
    }
}
