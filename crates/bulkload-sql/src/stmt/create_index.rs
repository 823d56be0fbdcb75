use super::{Name, Statement};

#[derive(Debug, Clone)]
pub struct CreateIndex {
    /// Name of the index, unqualified
    pub name: String,

    /// Which table to index
    pub on: Name,

    /// The columns to index
    pub columns: Vec<String>,
}

impl Statement {
    pub fn create_index(name: impl Into<String>, on: &Name, columns: Vec<String>) -> Self {
        CreateIndex {
            name: name.into(),
            on: on.clone(),
            columns,
        }
        .into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
