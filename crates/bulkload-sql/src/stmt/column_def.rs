use super::Type;

#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Name of the column.
    pub name: String,

    /// Storage type, rendered per dialect.
    pub ty: Type,

    pub nullable: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: Type, nullable: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable,
        }
    }
}
