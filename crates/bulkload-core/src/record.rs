use crate::{
    stmt::{Name, Primitive, Type, Value},
    Result,
};

/// A typed record that can be staged into a batch and projected back out of
/// one.
///
/// Implementations expose their properties by name. `get` returns `None` for
/// a property the record does not have, and `Some(Value::Null)` for a
/// property that is present but unset.
pub trait Record: Default + Send + 'static {
    /// Static description of the record's destination table and properties.
    fn descriptor() -> RecordDescriptor;

    fn get(&self, property: &str) -> Option<Value>;

    fn set(&mut self, property: &str, value: Value) -> Result<()>;
}

/// Where a record type lives in the database and how its properties map to
/// columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDescriptor {
    pub schema: Option<String>,
    pub table: String,
    pub properties: Vec<PropertyDescriptor>,
}

/// A single record property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Property name on the record
    pub name: String,

    /// Column the property is stored in
    pub column: String,

    pub ty: Type,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl RecordDescriptor {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            properties: vec![],
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// The schema-qualified table name.
    pub fn table_name(&self) -> Name {
        let mut parts = vec![];
        parts.extend(self.schema.clone());
        parts.push(self.table.clone());
        Name(parts)
    }

    pub fn find(&self, property: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == property)
    }
}

impl PropertyDescriptor {
    /// Describes a property of Rust type `P`. The column defaults to the
    /// property name and nullability follows `P` (`Option<T>` is nullable).
    pub fn new<P: Primitive>(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            ty: P::TYPE,
            nullable: P::NULLABLE,
            primary_key: false,
            auto_increment: false,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_nullability_follows_rust_type() {
        let id = PropertyDescriptor::new::<Option<i32>>("id").column("Id");
        assert_eq!(id.ty, Type::I32);
        assert!(id.nullable);
        assert_eq!(id.column, "Id");

        let name = PropertyDescriptor::new::<String>("name");
        assert!(!name.nullable);
        assert_eq!(name.column, "name");
    }

    #[test]
    fn table_name_includes_schema() {
        let descriptor = RecordDescriptor::new("users").schema("dbo");
        assert_eq!(descriptor.table_name().to_string(), "dbo.users");
        assert_eq!(RecordDescriptor::new("users").table_name().parts(), ["users"]);
    }
}
