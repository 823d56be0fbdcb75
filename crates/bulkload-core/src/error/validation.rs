use super::Error;

/// Error when an engine's inputs are rejected before any I/O happens.
#[derive(Debug)]
pub(super) struct ValidationError {
    kind: ValidationErrorKind,
}

#[derive(Debug)]
enum ValidationErrorKind {
    /// The batch has no columns or no rows
    EmptyBatch { columns: usize, rows: usize },

    /// The batch has no destination table
    MissingTableName,

    /// The command template is empty or whitespace
    BlankCommandText,

    /// The batch size is zero
    BatchSize,

    /// A column referenced by name does not exist in the batch
    UnknownColumn(Box<str>),

    /// A command placeholder has no column to bind to
    UnboundParameter(Box<str>),

    /// Any other rejected input
    Message(Box<str>),
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.kind {
            ValidationErrorKind::EmptyBatch { columns, rows } => write!(
                f,
                "invalid batch: expected at least one column and one row (columns: {columns}, rows: {rows})"
            ),
            ValidationErrorKind::MissingTableName => {
                f.write_str("invalid batch: missing destination table name")
            }
            ValidationErrorKind::BlankCommandText => f.write_str("command text is blank"),
            ValidationErrorKind::BatchSize => f.write_str("batch size must be greater than zero"),
            ValidationErrorKind::UnknownColumn(name) => {
                write!(f, "column `{name}` does not exist in the batch")
            }
            ValidationErrorKind::UnboundParameter(name) => {
                write!(
                    f,
                    "parameter `@{name}` does not match any column in the batch"
                )
            }
            ValidationErrorKind::Message(message) => f.write_str(message),
        }
    }
}

impl Error {
    fn validation_kind(kind: ValidationErrorKind) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError { kind }))
    }

    /// Creates a validation error with a free-form message.
    pub fn validation(message: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::Message(message.into().into()))
    }

    /// Creates a validation error for a batch without columns or rows.
    pub fn validation_empty_batch(columns: usize, rows: usize) -> Error {
        Error::validation_kind(ValidationErrorKind::EmptyBatch { columns, rows })
    }

    /// Creates a validation error for a batch without a destination table.
    pub fn validation_missing_table_name() -> Error {
        Error::validation_kind(ValidationErrorKind::MissingTableName)
    }

    /// Creates a validation error for blank command text.
    pub fn validation_blank_command() -> Error {
        Error::validation_kind(ValidationErrorKind::BlankCommandText)
    }

    /// Creates a validation error for a zero batch size.
    pub fn validation_batch_size() -> Error {
        Error::validation_kind(ValidationErrorKind::BatchSize)
    }

    /// Creates a validation error for a column name missing from the batch.
    pub fn validation_unknown_column(name: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::UnknownColumn(name.into().into()))
    }

    /// Creates a validation error for a placeholder with no matching column.
    pub fn validation_unbound_parameter(name: impl Into<String>) -> Error {
        Error::validation_kind(ValidationErrorKind::UnboundParameter(name.into().into()))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }

    /// Returns `true` if this error reports a placeholder that could not be bound.
    pub fn is_unbound_parameter(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::Validation(ValidationError {
                kind: ValidationErrorKind::UnboundParameter(_)
            })
        )
    }
}
