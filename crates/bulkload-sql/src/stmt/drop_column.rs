use super::{Name, Statement};

/// A statement to drop a column from a table.
#[derive(Debug, Clone)]
pub struct DropColumn {
    pub table: Name,

    /// Name of the column to drop.
    pub column: String,
}

impl Statement {
    pub fn drop_column(table: &Name, column: impl Into<String>) -> Self {
        DropColumn {
            table: table.clone(),
            column: column.into(),
        }
        .into()
    }
}

impl From<DropColumn> for Statement {
    fn from(value: DropColumn) -> Self {
        Self::DropColumn(value)
    }
}
