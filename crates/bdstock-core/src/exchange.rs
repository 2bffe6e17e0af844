//! Exchange adapter contract and its error type.

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use thiserror::Error;

use crate::error::{MappingError, SortError, ValidationError};
use crate::http_client::HttpError;
use crate::schema::FromRow;
use crate::sort::{SortRequest, Sortable};
use crate::table::ExtractError;
use crate::{ExchangeId, MarketStatus};

/// Coarse classification used by callers and the CLI envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeErrorKind {
    Transport,
    Status,
    Structure,
    NoData,
    Selector,
    Mapping,
    Sort,
    Validation,
}

/// Failure of an exchange operation. Nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: HttpError,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { status: u16, url: String },

    #[error("page structure changed: nothing matches '{selector}'")]
    Structure { selector: String },

    #[error("no {what} published for {date}")]
    NoData { what: &'static str, date: String },

    #[error("selector '{selector}' is not valid CSS: {message}")]
    Selector { selector: String, message: String },

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ExchangeError {
    pub const fn kind(&self) -> ExchangeErrorKind {
        match self {
            Self::Transport { .. } => ExchangeErrorKind::Transport,
            Self::Status { .. } => ExchangeErrorKind::Status,
            Self::Structure { .. } => ExchangeErrorKind::Structure,
            Self::NoData { .. } => ExchangeErrorKind::NoData,
            Self::Selector { .. } => ExchangeErrorKind::Selector,
            Self::Mapping(_) => ExchangeErrorKind::Mapping,
            Self::Sort(_) => ExchangeErrorKind::Sort,
            Self::Validation(_) => ExchangeErrorKind::Validation,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ExchangeErrorKind::Transport => "exchange.transport",
            ExchangeErrorKind::Status => "exchange.status",
            ExchangeErrorKind::Structure => "exchange.structure",
            ExchangeErrorKind::NoData => "exchange.no_data",
            ExchangeErrorKind::Selector => "exchange.selector",
            ExchangeErrorKind::Mapping => "exchange.mapping",
            ExchangeErrorKind::Sort => "exchange.sort",
            ExchangeErrorKind::Validation => "exchange.validation",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Errors caused by caller input rather than the exchange.
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self.kind(),
            ExchangeErrorKind::Sort | ExchangeErrorKind::Validation
        )
    }
}

impl From<ExtractError> for ExchangeError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::Selector { selector, message } => Self::Selector { selector, message },
            ExtractError::Structure { selector } => Self::Structure { selector },
        }
    }
}

/// Boxed future returned by exchange operations.
pub type ExchangeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ExchangeError>> + Send + 'a>>;

/// Operations both exchanges offer.
///
/// Exchange-specific pages (DSE groups, CSE listings) live on the concrete
/// adapters.
pub trait Exchange: Send + Sync {
    /// Record shape of the exchange's latest price table.
    type Share: FromRow + Sortable + Serialize + Send;

    fn id(&self) -> ExchangeId;

    /// Latest price of every listed share, ordered by `request`.
    fn latest_prices<'a>(&'a self, request: SortRequest) -> ExchangeFuture<'a, Vec<Self::Share>>;

    fn market_status<'a>(&'a self) -> ExchangeFuture<'a, MarketStatus>;
}
