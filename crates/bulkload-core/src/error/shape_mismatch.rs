use super::Error;

/// Error when a raw value tuple does not have one value per batch column.
#[derive(Debug)]
pub(super) struct ShapeMismatch {
    row: usize,
    values: usize,
    columns: usize,
}

impl std::error::Error for ShapeMismatch {}

impl core::fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "row {} has {} values but the batch has {} columns",
            self.row, self.values, self.columns
        )
    }
}

impl Error {
    /// Creates a shape mismatch error for the tuple at position `row`.
    pub fn shape_mismatch(row: usize, values: usize, columns: usize) -> Error {
        Error::from(super::ErrorKind::ShapeMismatch(ShapeMismatch {
            row,
            values,
            columns,
        }))
    }

    /// Returns `true` if this error is a shape mismatch.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ShapeMismatch(_))
    }
}
