use super::ColumnMapping;
use crate::{
    batch::RowBatch,
    record::Record,
    stmt::{Name, Type},
    Error, Result,
};

/// Destination table plus its ordered column mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMapping {
    schema: Option<String>,
    table: String,
    columns: Vec<ColumnMapping>,
}

impl TableMapping {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            columns: vec![],
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Appends a column mapping, giving it the next free ordinal when it has
    /// none.
    pub fn column(mut self, column: ColumnMapping) -> Self {
        self.push(column);
        self
    }

    pub fn push(&mut self, mut column: ColumnMapping) {
        if column.get_ordinal().is_none() {
            let next = self
                .columns
                .iter()
                .filter_map(ColumnMapping::get_ordinal)
                .max()
                .map_or(0, |max| max + 1);
            column.set_ordinal(next);
        }
        self.columns.push(column);
    }

    /// The schema-qualified table name.
    pub fn name(&self) -> Name {
        let mut parts = vec![];
        parts.extend(self.schema.clone());
        parts.push(self.table.clone());
        Name(parts)
    }

    pub fn columns(&self) -> &[ColumnMapping] {
        &self.columns
    }

    pub fn primary_key_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.is_primary_key())
            .map(ColumnMapping::name)
            .collect()
    }

    /// Checks the table and every column mapping.
    ///
    /// A mapping that names no table or no columns is a configuration
    /// problem; bad individual columns are reported as validation errors.
    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(Error::configuration("table mapping has no table name"));
        }

        if self.columns.is_empty() {
            return Err(Error::configuration(format!(
                "table mapping for `{}` resolves no columns",
                self.name()
            )));
        }

        for (index, column) in self.columns.iter().enumerate() {
            column.validate()?;

            for other in &self.columns[..index] {
                if other.name().eq_ignore_ascii_case(column.name()) {
                    return Err(Error::validation(format!(
                        "duplicate column mapping `{}`",
                        column.name()
                    )));
                }

                if other.get_ordinal() == column.get_ordinal() {
                    return Err(Error::validation(format!(
                        "column mappings `{}` and `{}` share ordinal {}",
                        other.name(),
                        column.name(),
                        column.get_ordinal().unwrap_or_default()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Freezes the mapping into an empty batch, columns ordered by ordinal.
    pub fn to_batch(&self) -> Result<RowBatch> {
        self.validate()?;

        let mut columns = self.columns.iter().collect::<Vec<_>>();
        columns.sort_by_key(|column| column.get_ordinal());

        let mut batch = RowBatch::new(self.name());
        for column in columns {
            batch.add_column(column.to_column()?)?;
        }
        Ok(batch)
    }

    /// Builds the mapping from a record type's descriptor.
    pub fn from_record<T: Record>() -> Result<Self> {
        let descriptor = T::descriptor();

        let mut mapping = Self::new(&descriptor.table);
        mapping.schema = descriptor.schema.clone();

        for property in &descriptor.properties {
            mapping.push(
                ColumnMapping::new(&property.column)?
                    .ty(property.ty)?
                    .nullable(property.nullable)
                    .primary_key(property.primary_key)
                    .auto_increment(property.auto_increment)
                    .property(&property.name),
            );
        }

        Ok(mapping)
    }

    /// Returns the mapping whose column is named `column`, ignoring case.
    pub fn find(&self, column: &str) -> Option<&ColumnMapping> {
        self.columns
            .iter()
            .find(|mapping| mapping.name().eq_ignore_ascii_case(column))
    }

    /// Returns the declared type of `column`, if mapped.
    pub fn column_type(&self, column: &str) -> Option<Type> {
        self.find(column).and_then(ColumnMapping::column_type)
    }
}
