mod add_column;
pub use add_column::AddColumn;

mod column_def;
pub use column_def::ColumnDef;

mod copy_in;
pub use copy_in::CopyIn;

mod create_index;
pub use create_index::CreateIndex;

mod drop_column;
pub use drop_column::DropColumn;

mod drop_index;
pub use drop_index::DropIndex;

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Between, Select};

pub use bulkload_core::stmt::*;

#[derive(Debug, Clone)]
pub enum Statement {
    AddColumn(AddColumn),
    CopyIn(CopyIn),
    CreateIndex(CreateIndex),
    DropColumn(DropColumn),
    DropIndex(DropIndex),
    Insert(Insert),
    Select(Select),
}

impl Statement {
    /// Returns `true` for schema-mutation statements.
    pub fn is_ddl(&self) -> bool {
        matches!(
            self,
            Statement::AddColumn(_)
                | Statement::CreateIndex(_)
                | Statement::DropColumn(_)
                | Statement::DropIndex(_)
        )
    }
}
