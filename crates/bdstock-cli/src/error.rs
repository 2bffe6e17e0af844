use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] bdstock_core::ValidationError),

    #[error(transparent)]
    Sort(#[from] bdstock_core::SortError),

    #[error("{}", .0.message())]
    Request(bdstock_core::ExchangeError),

    #[error("usage error: {0}")]
    Usage(String),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Sort(_) | Self::Request(_) | Self::Usage(_) => 2,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
        }
    }
}
