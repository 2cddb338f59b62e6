use thiserror::Error;

/// Typed failures of the data layer. Loader entry points wrap these in
/// `anyhow::Error` with file context; callers can downcast to inspect them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Missing column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Row {row}: '{value}' is not a recognised date")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}, column '{column}': '{value}' is not a finite number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: missing value in column '{column}'")]
    MissingValue { row: usize, column: String },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}
