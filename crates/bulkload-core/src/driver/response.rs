use crate::{batch::RowBatch, stmt::Value, Error, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Query result, one entry per row
    Values(Vec<Vec<Value>>),

    /// Schema-only batch describing a table
    Schema(RowBatch),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(values: Vec<Vec<Value>>) -> Self {
        Self {
            rows: Rows::Values(values),
        }
    }

    pub fn schema(batch: RowBatch) -> Self {
        Self {
            rows: Rows::Schema(batch),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            other => Err(unexpected("a row count", &other)),
        }
    }

    pub fn into_values(self) -> Result<Vec<Vec<Value>>> {
        match self {
            Rows::Values(values) => Ok(values),
            other => Err(unexpected("rows", &other)),
        }
    }

    pub fn into_schema(self) -> Result<RowBatch> {
        match self {
            Rows::Schema(batch) => Ok(batch),
            other => Err(unexpected("a table schema", &other)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Rows::Count(_) => "count",
            Rows::Values(_) => "values",
            Rows::Schema(_) => "schema",
        }
    }
}

fn unexpected(expected: &str, actual: &Rows) -> Error {
    Error::invalid_result(format!(
        "driver returned {} but {expected} was expected",
        actual.kind()
    ))
}
