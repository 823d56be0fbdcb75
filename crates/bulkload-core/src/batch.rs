mod column;
pub use column::Column;

mod row;
pub use row::{Cell, Row, RowState};

use crate::{
    stmt::{Name, Value},
    Error, Result,
};

/// In-memory staging area mirroring a destination table: an ordered set of
/// columns and the rows to transfer or update.
///
/// The batch keeps every row exactly as wide as the column list. Adding a
/// column appends a [`Cell::Missing`] to each existing row and removing one
/// drops the matching cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBatch {
    table: Name,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl RowBatch {
    /// Creates an empty batch destined for `table`.
    pub fn new(table: impl Into<Name>) -> Self {
        Self {
            table: table.into(),
            columns: vec![],
            rows: vec![],
        }
    }

    /// Creates an empty batch with the given columns.
    pub fn with_columns(
        table: impl Into<Name>,
        columns: impl IntoIterator<Item = Column>,
    ) -> Result<Self> {
        let mut batch = Self::new(table);
        for column in columns {
            batch.add_column(column)?;
        }
        Ok(batch)
    }

    pub fn table(&self) -> &Name {
        &self.table
    }

    pub fn set_table(&mut self, table: impl Into<Name>) {
        self.table = table.into();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Finds a column by name, ignoring ASCII case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|index| &self.columns[index])
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.column_index(name)
            .map(|index| &mut self.columns[index])
    }

    /// Appends a column and returns its position.
    pub fn add_column(&mut self, mut column: Column) -> Result<usize> {
        column.validate()?;

        if self.column_index(&column.name).is_some() {
            return Err(Error::validation(format!(
                "duplicate column `{}` in batch for `{}`",
                column.name, self.table
            )));
        }

        let index = self.columns.len();
        column.ordinal = index;
        self.columns.push(column);

        for row in &mut self.rows {
            row.cells.push(Cell::Missing);
        }

        Ok(index)
    }

    /// Removes a column and its cell from every row.
    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let index = self
            .column_index(name)
            .ok_or_else(|| Error::validation_unknown_column(name))?;

        let column = self.columns.remove(index);

        for row in &mut self.rows {
            row.cells.remove(index);
        }

        for (ordinal, column) in self.columns.iter_mut().enumerate().skip(index) {
            column.ordinal = ordinal;
        }

        Ok(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Appends a row with every cell missing and returns its position.
    pub fn new_row(&mut self) -> usize {
        self.rows.push(Row::with_width(self.columns.len()));
        self.rows.len() - 1
    }

    /// Appends a row of positioned values.
    ///
    /// Initial values may be written to read-only columns; every value must
    /// still be accepted by its column.
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<usize> {
        if values.len() != self.columns.len() {
            return Err(Error::shape_mismatch(
                self.rows.len(),
                values.len(),
                self.columns.len(),
            ));
        }

        for (column, value) in self.columns.iter().zip(&values) {
            check_accepts(column, value)?;
        }

        self.rows.push(Row {
            cells: values.into_iter().map(Cell::Value).collect(),
            state: Default::default(),
        });

        Ok(self.rows.len() - 1)
    }

    /// Writes a value into an existing row.
    pub fn set(&mut self, row: usize, column: usize, value: Value) -> Result<()> {
        let col = &self.columns[column];

        if col.read_only {
            return Err(Error::invalid_operation(format!(
                "column `{}` is read-only",
                col.name
            )));
        }

        check_accepts(col, &value)?;

        self.rows[row].cells[column] = Cell::Value(value);
        Ok(())
    }

    /// Writes a value into an existing row, looking the column up by name.
    pub fn set_by_name(&mut self, row: usize, name: &str, value: Value) -> Result<()> {
        let column = self
            .column_index(name)
            .ok_or_else(|| Error::validation_unknown_column(name))?;
        self.set(row, column, value)
    }

    /// Returns the rendered value of a cell.
    ///
    /// Missing cells render as the column default when the column is not
    /// nullable, and as null otherwise.
    pub fn value(&self, row: usize, column: usize) -> Value {
        let col = &self.columns[column];
        match &self.rows[row].cells[column] {
            Cell::Value(value) => value.clone(),
            Cell::Missing if col.nullable => Value::Null,
            Cell::Missing => col.default.clone().unwrap_or_default(),
        }
    }

    /// Returns the rendered value of a cell, looking the column up by name.
    pub fn get(&self, row: usize, name: &str) -> Option<Value> {
        self.column_index(name)
            .map(|column| self.value(row, column))
    }

    /// Returns the rendered values of a row in column order.
    pub fn row_values(&self, row: usize) -> Vec<Value> {
        (0..self.columns.len())
            .map(|column| self.value(row, column))
            .collect()
    }

    /// Flags rows for insertion. Rows already pending an insert or update keep
    /// their state.
    pub fn mark_added(&mut self) {
        for row in &mut self.rows {
            if matches!(row.state, RowState::Detached | RowState::Unchanged) {
                row.state = RowState::Added;
            }
        }
    }

    /// Flags every row for update.
    pub fn mark_modified(&mut self) {
        for row in &mut self.rows {
            row.state = RowState::Modified;
        }
    }

    /// Marks every row as in sync with the database.
    pub fn accept_changes(&mut self) {
        for row in &mut self.rows {
            row.state = RowState::Unchanged;
        }
    }

    /// Returns an empty batch with the same table and columns.
    pub fn clone_schema(&self) -> RowBatch {
        RowBatch {
            table: self.table.clone(),
            columns: self.columns.clone(),
            rows: vec![],
        }
    }

    /// Checks every batch invariant.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::validation_empty_batch(0, self.rows.len()));
        }

        for (index, column) in self.columns.iter().enumerate() {
            column.validate()?;

            if self.columns[..index]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&column.name))
            {
                return Err(Error::validation(format!(
                    "duplicate column `{}` in batch for `{}`",
                    column.name, self.table
                )));
            }
        }

        for (index, row) in self.rows.iter().enumerate() {
            if row.cells.len() != self.columns.len() {
                return Err(Error::shape_mismatch(
                    index,
                    row.cells.len(),
                    self.columns.len(),
                ));
            }
        }

        Ok(())
    }
}

fn check_accepts(column: &Column, value: &Value) -> Result<()> {
    if !value.is_a(&column.ty) {
        return Err(Error::type_conversion(value.clone(), column.ty.name()));
    }

    if value.is_null() && !column.nullable {
        return Err(Error::validation(format!(
            "column `{}` does not accept null",
            column.name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::Type;

    fn users() -> RowBatch {
        RowBatch::with_columns(
            "dbo.users",
            [
                Column::new("Id", Type::I32).primary_key().auto_increment(),
                Column::new("Name", Type::String).not_null(),
                Column::new("Email", Type::String).not_null(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn missing_cells_render_per_nullability() {
        let mut batch = users();
        let row = batch.new_row();

        assert_eq!(batch.value(row, 0), Value::Null);
        assert_eq!(batch.value(row, 1), Value::String(String::new()));
    }

    #[test]
    fn duplicate_column_names_rejected_ignoring_case() {
        let mut batch = users();
        let err = batch
            .add_column(Column::new("name", Type::String))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn non_nullable_column_requires_default() {
        let mut column = Column::new("Age", Type::I32);
        column.nullable = false;
        assert!(column.validate().is_err());
        assert!(Column::new("Age", Type::I32).not_null().validate().is_ok());
    }

    #[test]
    fn add_and_remove_column_keep_rows_aligned() {
        let mut batch = users();
        batch
            .push_row(vec![Value::Null, "A".into(), "a@x".into()])
            .unwrap();

        let tracker = batch.add_column(Column::new("Tracker", Type::I64)).unwrap();
        assert_eq!(tracker, 3);
        assert_eq!(batch.row(0).len(), 4);
        assert!(batch.row(0).cell(3).is_missing());

        batch.set(0, tracker, Value::I64(1)).unwrap();
        batch.remove_column("Tracker").unwrap();

        assert_eq!(batch.row(0).len(), 3);
        assert_eq!(batch.columns().len(), 3);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn remove_column_renumbers_ordinals() {
        let mut batch = users();
        batch.remove_column("Name").unwrap();
        let ordinals: Vec<_> = batch.columns().iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, [0, 1]);
    }

    #[test]
    fn push_row_checks_shape() {
        let mut batch = users();
        let err = batch.push_row(vec![Value::Null]).unwrap_err();
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn read_only_column_rejects_writes_until_unlocked() {
        let mut batch = users();
        batch
            .push_row(vec![Value::Null, "A".into(), "a@x".into()])
            .unwrap();

        let err = batch.set(0, 0, Value::I32(7)).unwrap_err();
        assert!(err.is_invalid_operation());

        batch.column_mut("id").unwrap().set_read_only(false);
        batch.set(0, 0, Value::I32(7)).unwrap();
        assert_eq!(batch.get(0, "Id"), Some(Value::I32(7)));
    }

    #[test]
    fn set_rejects_wrong_type_and_null() {
        let mut batch = users();
        batch
            .push_row(vec![Value::Null, "A".into(), "a@x".into()])
            .unwrap();

        let err = batch.set(0, 1, Value::I32(1)).unwrap_err();
        assert!(err.is_type_conversion());
        assert!(batch.set(0, 1, Value::Null).unwrap_err().is_validation());
    }

    #[test]
    fn mark_added_leaves_pending_rows_alone() {
        let mut batch = users();
        for name in ["A", "B"] {
            batch
                .push_row(vec![Value::Null, name.into(), "x".into()])
                .unwrap();
        }
        batch.rows[1].state = RowState::Modified;

        batch.mark_added();
        assert_eq!(batch.row(0).state(), RowState::Added);
        assert_eq!(batch.row(1).state(), RowState::Modified);

        batch.accept_changes();
        for row in batch.rows() {
            assert_eq!(row.state(), RowState::Unchanged);
        }
    }

    #[test]
    fn validate_rejects_columnless_batch() {
        let err = RowBatch::new("users").validate().unwrap_err();
        assert!(err.is_validation());
    }
}
