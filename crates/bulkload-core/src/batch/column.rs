use crate::{default_value, stmt, Error, Result};

/// A column of a [`RowBatch`](super::RowBatch).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database.
    pub name: String,

    /// The column type.
    pub ty: stmt::Type,

    /// Whether or not the column accepts null.
    pub nullable: bool,

    /// Value used for non-nullable cells that were never written.
    pub default: Option<stmt::Value>,

    /// Position of the column within the batch.
    pub ordinal: usize,

    /// True if the column is part of the table's primary key.
    pub primary_key: bool,

    /// True if the database generates the column's values.
    pub auto_increment: bool,

    /// Writes are rejected while set. Server-generated key columns start out
    /// read-only and are unlocked when key values are read back.
    pub read_only: bool,
}

impl Column {
    /// Creates a nullable column with no default.
    pub fn new(name: impl Into<String>, ty: stmt::Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            default: None,
            ordinal: 0,
            primary_key: false,
            auto_increment: false,
            read_only: false,
        }
    }

    /// Makes the column non-nullable, defaulting to the type's zero value
    /// unless a default is already set.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        if !matches!(&self.default, Some(v) if !v.is_null()) {
            self.default = Some(default_value(&self.ty));
        }
        self
    }

    pub fn default_value(mut self, value: impl Into<stmt::Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as generated by the database. Generated columns hold
    /// null until their values are read back, and are read-only until then.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self.nullable = true;
        self.read_only = true;
        self
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Checks the column on its own, independent of any batch.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("column name must not be empty"));
        }

        match &self.default {
            Some(default) if !default.is_a(&self.ty) => Err(Error::validation(format!(
                "default value of column `{}` is not a {}",
                self.name,
                self.ty.name()
            ))),
            Some(default) if default.is_null() && !self.nullable => Err(Error::validation(
                format!("non-nullable column `{}` has a null default", self.name),
            )),
            None if !self.nullable => Err(Error::validation(format!(
                "non-nullable column `{}` has no default",
                self.name
            ))),
            _ => Ok(()),
        }
    }

    /// Returns `true` if `value` may be stored in this column.
    pub fn accepts(&self, value: &stmt::Value) -> bool {
        value.is_a(&self.ty) && (self.nullable || !value.is_null())
    }
}
