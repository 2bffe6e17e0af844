use thiserror::Error;

/// Validation and contract errors exposed by `bdstock-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("group name '{value}' is invalid, expected one of A, B, G, N, Z")]
    InvalidGroupName { value: String },

    #[error("invalid exchange '{value}', expected one of dse, cse")]
    InvalidExchange { value: String },

    #[error("base url '{value}' must start with http:// or https://")]
    InvalidBaseUrl { value: String },

    #[error("timeout '{value}' must be a positive number of milliseconds")]
    InvalidTimeout { value: String },

    #[error("date '{value}' must be YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("no weekly reports for {year}, available years: {available}")]
    UnavailableYear { year: i32, available: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// A single cell could not be read as the number its column declares.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("'{value}' is not a decimal number")]
    InvalidFloat { value: String },
    #[error("'{value}' is not an integer")]
    InvalidInteger { value: String },
}

/// A source row could not be turned into a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("row {row}: column '{column}' (index {index}) is missing, row has {len} cells")]
    MissingCell {
        row: usize,
        column: &'static str,
        index: usize,
        len: usize,
    },

    #[error("row {row}: column '{column}' (index {index}): {source}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        index: usize,
        #[source]
        source: NormalizeError,
    },
}

impl MappingError {
    /// Attaches the 1-based source row number to the error.
    pub fn at_row(self, row_number: usize) -> Self {
        match self {
            Self::MissingCell {
                column, index, len, ..
            } => Self::MissingCell {
                row: row_number,
                column,
                index,
                len,
            },
            Self::InvalidCell {
                column,
                index,
                source,
                ..
            } => Self::InvalidCell {
                row: row_number,
                column,
                index,
                source,
            },
        }
    }
}

/// Sort requests that cannot be honoured.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("order '{value}' is not valid, use ASC or DESC")]
    InvalidOrder { value: String },

    #[error("sorting {record} by '{field}' is not possible, try another field")]
    UnsupportedField {
        field: String,
        record: &'static str,
    },
}
