//! Response envelope shared by every machine-readable output.
//!
//! ```json
//! {
//!   "meta": { "request_id": "…", "schema_version": "v1.0.0",
//!             "generated_at": "2026-10-19T08:30:00Z", "exchange": "dse",
//!             "latency_ms": 412, "warnings": ["…"] },
//!   "data": [ … ],
//!   "errors": [ { "code": "exchange.status", "message": "…", "source": "dse" } ]
//! }
//! ```
//!
//! Empty `warnings` and `errors` are omitted.

use serde::{Deserialize, Serialize};

use crate::exchange::ExchangeError;
use crate::{ExchangeId, UtcDateTime, ValidationError};

/// Version of the envelope layout, `vMAJOR.MINOR.PATCH`.
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Shortest accepted request id.
const MIN_REQUEST_ID_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    /// Builds an envelope after validating the metadata and every error.
    pub fn with_errors(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        errors.iter().try_for_each(EnvelopeError::validate)?;
        Ok(Self { meta, data, errors })
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.meta.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    /// Exchange the data came from; absent for local commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<ExchangeId>,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    /// Metadata stamped with the current time and [`SCHEMA_VERSION`].
    pub fn new(
        request_id: impl Into<String>,
        exchange: Option<ExchangeId>,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            schema_version: SCHEMA_VERSION.to_owned(),
            generated_at: UtcDateTime::now(),
            exchange,
            latency_ms,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < MIN_REQUEST_ID_LEN {
            return Err(ValidationError::InvalidRequestId);
        }

        if parse_schema_version(&self.schema_version).is_none() {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }

        Ok(())
    }
}

/// One failure reported inside an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    /// Stable dotted code such as `exchange.structure`.
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ExchangeId>,
}

impl EnvelopeError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let error = Self {
            code: code.into(),
            message: message.into(),
            source: None,
        };
        error.validate()?;
        Ok(error)
    }

    /// Report for a failed exchange operation. Codes and messages of
    /// [`ExchangeError`] are never blank, so no validation is needed.
    pub fn from_exchange(exchange: ExchangeId, error: &ExchangeError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.message(),
            source: Some(exchange),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            Err(ValidationError::EmptyErrorCode)
        } else if self.message.trim().is_empty() {
            Err(ValidationError::EmptyErrorMessage)
        } else {
            Ok(())
        }
    }
}

/// `(major, minor, patch)` of a `vMAJOR.MINOR.PATCH` string.
fn parse_schema_version(value: &str) -> Option<(u32, u32, u32)> {
    let mut parts = value.strip_prefix('v')?.splitn(3, '.');
    let mut next = || -> Option<u32> {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };

    Some((next()?, next()?, next()?))
}
