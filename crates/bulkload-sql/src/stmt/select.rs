use super::{Name, Statement, Value};

/// A single-table select with an optional range filter.
#[derive(Debug, Clone)]
pub struct Select {
    pub table: Name,

    /// Columns to return, in order
    pub columns: Vec<String>,

    pub filter: Option<Between>,

    pub order_by: Vec<String>,
}

/// `column BETWEEN low AND high`, inclusive on both ends.
#[derive(Debug, Clone)]
pub struct Between {
    pub column: String,
    pub low: Value,
    pub high: Value,
}

impl Statement {
    /// Selects `columns` for rows whose `range_column` lies in
    /// `[low, high]`, ordered by `range_column`.
    pub fn select_range(
        table: &Name,
        columns: Vec<String>,
        range_column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        let range_column = range_column.into();

        Select {
            table: table.clone(),
            columns,
            filter: Some(Between {
                column: range_column.clone(),
                low: low.into(),
                high: high.into(),
            }),
            order_by: vec![range_column],
        }
        .into()
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
