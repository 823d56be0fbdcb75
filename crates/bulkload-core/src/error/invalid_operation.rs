use super::Error;

/// Error when an operation is not valid in the current state.
///
/// This occurs when:
/// - A second transaction is started while one is already open
/// - A value is written to a read-only column
#[derive(Debug)]
pub(super) struct InvalidOperation {
    message: Box<str>,
}

impl std::error::Error for InvalidOperation {}

impl core::fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid operation: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidOperation(InvalidOperation {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid operation error.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidOperation(_))
    }
}
