use super::Error;

/// Error when a row read back during key correlation does not line up with
/// the in-memory row it is matched against.
#[derive(Debug)]
pub(super) struct CorrelationMismatch {
    expected: Option<i64>,
    actual: Option<i64>,
}

impl std::error::Error for CorrelationMismatch {}

impl core::fmt::Display for CorrelationMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match (self.expected, self.actual) {
            (Some(expected), Some(actual)) => write!(
                f,
                "correlation mismatch: expected tracker {expected}, read {actual}"
            ),
            (None, Some(actual)) => write!(
                f,
                "correlation mismatch: no in-memory row for tracker {actual}"
            ),
            (Some(expected), None) => write!(
                f,
                "correlation mismatch: no row read back for tracker {expected}"
            ),
            (None, None) => f.write_str("correlation mismatch"),
        }
    }
}

impl Error {
    /// Creates a correlation mismatch error.
    ///
    /// `expected` is the tracker value of the in-memory row being matched, or
    /// `None` when every in-memory row was already consumed.
    pub fn correlation_mismatch(expected: Option<i64>, actual: i64) -> Error {
        Error::from(super::ErrorKind::CorrelationMismatch(CorrelationMismatch {
            expected,
            actual: Some(actual),
        }))
    }

    /// Creates a correlation error for an in-memory row that no physical row
    /// was read back for.
    pub fn correlation_missing(expected: i64) -> Error {
        Error::from(super::ErrorKind::CorrelationMismatch(CorrelationMismatch {
            expected: Some(expected),
            actual: None,
        }))
    }

    /// Returns `true` if this error is a correlation mismatch.
    pub fn is_correlation_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::CorrelationMismatch(_))
    }
}
