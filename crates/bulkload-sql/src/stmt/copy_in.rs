use super::{Name, Statement};

/// PostgreSQL `COPY .. FROM STDIN` in text format.
#[derive(Debug, Clone)]
pub struct CopyIn {
    pub table: Name,
    pub columns: Vec<String>,
}

impl Statement {
    pub fn copy_in(table: &Name, columns: Vec<String>) -> Self {
        CopyIn {
            table: table.clone(),
            columns,
        }
        .into()
    }
}

impl From<CopyIn> for Statement {
    fn from(value: CopyIn) -> Self {
        Self::CopyIn(value)
    }
}
