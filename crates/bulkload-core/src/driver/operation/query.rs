use super::Operation;

use crate::stmt::{Type, Value};

#[derive(Debug, Clone)]
pub struct Query {
    /// The SQL query to execute
    pub sql: String,

    /// Positional parameters
    pub params: Vec<Value>,

    /// The type of each returned column
    pub ret: Vec<Type>,
}

impl From<Query> for Operation {
    fn from(value: Query) -> Self {
        Self::Query(value)
    }
}
