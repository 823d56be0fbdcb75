use crate::{record::Record, stmt::Name};

/// Resolves where a record type is stored.
///
/// Table schemas are not part of this interface; they are described by the
/// live database through [`Operation::Describe`](crate::driver::Operation::Describe).
pub trait Resolver: Send + Sync {
    fn table_name<T: Record>(&self) -> Name;

    /// Ordered `(property, column)` pairs.
    fn mappings<T: Record>(&self) -> Vec<(String, String)>;

    fn primary_key_column_names<T: Record>(&self) -> Vec<String>;
}

/// Resolves records from their own [`RecordDescriptor`](crate::RecordDescriptor).
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordResolver;

impl Resolver for RecordResolver {
    fn table_name<T: Record>(&self) -> Name {
        T::descriptor().table_name()
    }

    fn mappings<T: Record>(&self) -> Vec<(String, String)> {
        T::descriptor()
            .properties
            .into_iter()
            .map(|property| (property.name, property.column))
            .collect()
    }

    fn primary_key_column_names<T: Record>(&self) -> Vec<String> {
        T::descriptor()
            .properties
            .into_iter()
            .filter(|property| property.primary_key)
            .map(|property| property.column)
            .collect()
    }
}
