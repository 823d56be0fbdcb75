//! Reads server-assigned keys back into a freshly loaded batch.
//!
//! Every loaded row carries a tracker value in both the batch and the
//! table. Reading `{keys, tracker}` for the batch's tracker range, ordered by
//! tracker, and walking it alongside the batch rows sorted the same way lines
//! each physical row up with the in-memory row it came from.

use super::TRACKER_COLUMN;

use bulkload_core::{
    batch::RowBatch,
    driver::operation::Query,
    stmt::{Type, Value},
    Connection, Error, Result,
};
use bulkload_sql::{Serializer, Statement};

/// Counts from one correlation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Outcome {
    /// Rows that received their keys
    pub(crate) matched: usize,

    /// Physical rows whose tracker matched no in-memory row
    pub(crate) mismatched: usize,

    /// In-memory rows no physical row was read back for
    pub(crate) missing: usize,
}

pub(crate) async fn correlate(
    connection: &mut dyn Connection,
    serializer: &Serializer,
    batch: &mut RowBatch,
    primary_keys: &[String],
    strict: bool,
) -> Result<Outcome> {
    let tracker = batch
        .column_index(TRACKER_COLUMN)
        .ok_or_else(|| Error::invalid_operation("batch has no tracker column"))?;

    let keys = primary_keys
        .iter()
        .map(|name| {
            batch
                .column_index(name)
                .ok_or_else(|| Error::validation_unknown_column(name.as_str()))
        })
        .collect::<Result<Vec<_>>>()?;

    // (tracker value, row) for every row that has one, in tracker order
    let mut expected = (0..batch.len())
        .filter_map(|row| batch.value(row, tracker).as_i64().map(|seq| (seq, row)))
        .collect::<Vec<_>>();
    expected.sort_unstable();

    let (Some(&(low, _)), Some(&(high, _))) = (expected.first(), expected.last()) else {
        return Ok(Outcome::default());
    };

    let mut columns = keys
        .iter()
        .map(|&key| batch.columns()[key].name.clone())
        .collect::<Vec<_>>();
    columns.push(TRACKER_COLUMN.to_string());

    let mut ret = keys
        .iter()
        .map(|&key| batch.columns()[key].ty)
        .collect::<Vec<_>>();
    ret.push(Type::I64);

    let stmt = Statement::select_range(batch.table(), columns, TRACKER_COLUMN, low, high);
    let mut params: Vec<Value> = vec![];
    let sql = serializer.serialize(&stmt, &mut params);

    tracing::debug!(low, high, "reading back generated keys");

    let physical = connection
        .exec(Query { sql, params, ret }.into())
        .await?
        .rows
        .into_values()?;

    let mut outcome = Outcome::default();
    let mut pending = expected.iter().peekable();

    for record in physical {
        let Some((values, actual)) = split_tracker(record)? else {
            continue;
        };

        // In-memory rows that sort before this physical row were never read
        // back; they keep whatever key they had.
        while let Some(&&(seq, _)) = pending.peek() {
            if seq >= actual {
                break;
            }
            pending.next();
            outcome.missing += 1;

            if strict {
                return Err(Error::correlation_missing(seq));
            }
            tracing::warn!(tracker = seq, "no row read back; keys left unchanged");
        }

        match pending.peek() {
            Some(&&(seq, row)) if seq == actual => {
                for (&column, value) in keys.iter().zip(values) {
                    batch.set(row, column, value)?;
                }
                pending.next();
                outcome.matched += 1;
            }
            next => {
                let expected = next.map(|&&(seq, _)| seq);
                outcome.mismatched += 1;

                if strict {
                    return Err(Error::correlation_mismatch(expected, actual));
                }
                tracing::warn!(?expected, actual, "correlation mismatch; skipping row");
            }
        }
    }

    for &(seq, _) in pending {
        outcome.missing += 1;

        if strict {
            return Err(Error::correlation_missing(seq));
        }
        tracing::warn!(tracker = seq, "no row read back; keys left unchanged");
    }

    Ok(outcome)
}

/// Splits the trailing tracker value off a physical row.
fn split_tracker(mut record: Vec<Value>) -> Result<Option<(Vec<Value>, i64)>> {
    match record.pop() {
        Some(Value::Null) => {
            tracing::warn!("row read back without a tracker value; skipping");
            Ok(None)
        }
        Some(value) => {
            let actual = value
                .as_i64()
                .ok_or_else(|| Error::type_conversion(value.clone(), "I64"))?;
            Ok(Some((record, actual)))
        }
        None => Err(Error::invalid_result("correlation row has no columns")),
    }
}
