use super::{Name, Statement, Value};

/// A multi-row `INSERT .. VALUES` with every value bound as a parameter.
#[derive(Debug, Clone)]
pub struct Insert {
    pub table: Name,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Statement {
    pub fn insert(table: &Name, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Insert {
            table: table.clone(),
            columns,
            rows,
        }
        .into()
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
