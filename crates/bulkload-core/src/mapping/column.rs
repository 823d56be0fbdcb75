use crate::{
    batch::Column,
    default_value,
    stmt::{Primitive, Type, Value},
    Error, Result,
};

/// Describes one destination column.
///
/// Setters that can be given bad input validate it on the spot; [`validate`]
/// re-checks the whole mapping once it is complete.
///
/// [`validate`]: ColumnMapping::validate
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    name: String,
    property: Option<String>,
    ty: Option<Type>,
    ordinal: Option<usize>,
    primary_key: bool,
    auto_increment: bool,
    nullable: bool,
    default: Option<Value>,
}

impl ColumnMapping {
    /// Starts a nullable column mapping with no type.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;

        Ok(Self {
            name,
            property: None,
            ty: None,
            ordinal: None,
            primary_key: false,
            auto_increment: false,
            nullable: true,
            default: None,
        })
    }

    /// Starts a column mapping whose type and nullability come from the Rust
    /// type `P`. `Option<T>` maps to a nullable column of `T`'s type.
    pub fn for_primitive<P: Primitive>(name: impl Into<String>) -> Result<Self> {
        Ok(Self::new(name)?.ty(P::TYPE)?.nullable(P::NULLABLE))
    }

    pub fn ty(mut self, ty: Type) -> Result<Self> {
        check_default(&self.name, ty, self.default.as_ref())?;
        self.ty = Some(ty);
        Ok(self)
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        if let Some(ty) = self.ty {
            check_default(&self.name, ty, Some(&value))?;
        }
        self.default = Some(value);
        Ok(self)
    }

    pub fn ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Record property feeding this column. Defaults to the column name.
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_name(&self) -> &str {
        self.property.as_deref().unwrap_or(&self.name)
    }

    pub fn column_type(&self) -> Option<Type> {
        self.ty
    }

    pub fn get_ordinal(&self) -> Option<usize> {
        self.ordinal
    }

    pub(super) fn set_ordinal(&mut self, ordinal: usize) {
        self.ordinal = Some(ordinal);
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The value used for this column when a record leaves it null.
    ///
    /// Nullable columns only have a default when one was set explicitly.
    /// Non-nullable columns fall back to their type's zero value.
    pub fn resolved_default(&self) -> Option<Value> {
        match (&self.default, self.ty) {
            (Some(value), _) if !value.is_null() => Some(value.clone()),
            (_, Some(ty)) if !self.nullable => Some(default_value(&ty)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_name(&self.name)?;

        let Some(ty) = self.ty else {
            return Err(Error::validation(format!(
                "column mapping `{}` has no type",
                self.name
            )));
        };

        check_default(&self.name, ty, self.default.as_ref())?;

        if !self.nullable && self.resolved_default().is_none() {
            return Err(Error::validation(format!(
                "non-nullable column mapping `{}` does not resolve a default",
                self.name
            )));
        }

        Ok(())
    }

    /// Freezes the mapping into a batch column.
    pub fn to_column(&self) -> Result<Column> {
        self.validate()?;

        // `validate` guarantees a type
        let ty = self.ty.unwrap_or(Type::String);
        let mut column = Column::new(&self.name, ty);

        if let Some(default) = self.resolved_default() {
            column = column.default_value(default);
        }
        if !self.nullable {
            column = column.not_null();
        }
        if self.primary_key {
            column = column.primary_key();
        }
        if self.auto_increment {
            column = column.auto_increment();
        }
        column.ordinal = self.ordinal.unwrap_or_default();

        Ok(column)
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("column mapping name must not be empty"));
    }
    Ok(())
}

fn check_default(name: &str, ty: Type, default: Option<&Value>) -> Result<()> {
    match default {
        Some(value) if !value.is_a(&ty) => Err(Error::validation(format!(
            "default value of column mapping `{name}` is not a {}",
            ty.name()
        ))),
        _ => Ok(()),
    }
}
