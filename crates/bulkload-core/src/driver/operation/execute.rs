use super::Operation;

#[derive(Debug, Clone)]
pub struct Execute {
    /// The SQL statement to execute
    pub sql: String,
}

impl From<Execute> for Operation {
    fn from(value: Execute) -> Self {
        Self::Execute(value)
    }
}
