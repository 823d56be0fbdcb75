use super::Error;

/// Error when a unit of work was cancelled before it started.
///
/// Cancellation never interrupts a transfer that is already streaming; it only
/// prevents a queued unit of work from starting.
#[derive(Debug)]
pub(super) struct Cancelled {
    operation: &'static str,
}

impl std::error::Error for Cancelled {}

impl core::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} cancelled before it started", self.operation)
    }
}

impl Error {
    /// Creates a cancellation error for the named operation.
    pub fn cancelled(operation: &'static str) -> Error {
        Error::from(super::ErrorKind::Cancelled(Cancelled { operation }))
    }

    /// Returns `true` if this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Cancelled(_))
    }
}
