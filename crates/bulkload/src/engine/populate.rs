//! Staging typed records into a batch and reading them back out.

use bulkload_core::{
    batch::{Column, RowBatch},
    default_value,
    mapping::TableMapping,
    record::Record,
    stmt::{Type, Value},
    Error, Result,
};

/// Builds a batch holding one detached row per record.
///
/// Each mapped property is read from the record and coerced to its column:
/// enum values become their integral code, nulls in non-nullable columns
/// take the column default. An empty slice yields a schema-only batch.
pub fn populate<T: Record>(records: &[T], mapping: &TableMapping) -> Result<RowBatch> {
    let mut batch = schema(mapping)?;

    let properties = batch
        .columns()
        .iter()
        .map(|column| {
            mapping
                .find(&column.name)
                .map(|mapping| mapping.property_name().to_string())
                .ok_or_else(|| Error::validation_unknown_column(column.name.as_str()))
        })
        .collect::<Result<Vec<_>>>()?;

    for record in records {
        let values = batch
            .columns()
            .iter()
            .zip(&properties)
            .map(|(column, property)| coerce(column, record.get(property).unwrap_or_default()))
            .collect::<Result<Vec<_>>>()?;

        batch.push_row(values)?;
    }

    tracing::trace!(table = %batch.table(), rows = batch.len(), "populated batch");
    Ok(batch)
}

/// Builds a batch from positioned values, one tuple per row, in column
/// ordinal order.
pub fn populate_tuples<I>(rows: I, mapping: &TableMapping) -> Result<RowBatch>
where
    I: IntoIterator<Item = Vec<Value>>,
{
    let mut batch = schema(mapping)?;

    for (index, values) in rows.into_iter().enumerate() {
        if values.len() != batch.columns().len() {
            return Err(Error::shape_mismatch(
                index,
                values.len(),
                batch.columns().len(),
            ));
        }

        let values = batch
            .columns()
            .iter()
            .zip(values)
            .map(|(column, value)| coerce(column, value))
            .collect::<Result<Vec<_>>>()?;

        batch.push_row(values)?;
    }

    Ok(batch)
}

/// Reads one record per batch row. Properties whose column is not in the
/// batch keep their default.
pub fn project<T: Record>(batch: &RowBatch) -> Result<Vec<T>> {
    let descriptor = T::descriptor();

    let present = descriptor
        .properties
        .iter()
        .filter_map(|property| {
            batch
                .column_index(&property.column)
                .map(|column| (property.name.as_str(), column))
        })
        .collect::<Vec<_>>();

    (0..batch.len())
        .map(|row| {
            let mut record = T::default();
            for &(property, column) in &present {
                record.set(property, batch.value(row, column))?;
            }
            Ok(record)
        })
        .collect()
}

fn schema(mapping: &TableMapping) -> Result<RowBatch> {
    mapping.to_batch().map_err(|err| {
        if err.is_configuration() {
            err
        } else {
            err.context(Error::configuration(format!(
                "invalid table mapping for `{}`",
                mapping.name()
            )))
        }
    })
}

fn coerce(column: &Column, value: Value) -> Result<Value> {
    if !value.is_null() {
        return column.ty.cast(value);
    }

    if column.nullable {
        return Ok(Value::Null);
    }

    Ok(match column.ty {
        Type::String => Value::String(String::new()),
        ty => match &column.default {
            Some(default) if !default.is_null() => default.clone(),
            _ => default_value(&ty),
        },
    })
}
