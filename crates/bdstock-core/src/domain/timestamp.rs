use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Bangladesh Standard Time, the clock both exchanges publish in.
const DHAKA_OFFSET_HOURS: i8 = 6;

/// Moment a response was generated, always held in UTC.
///
/// Serialized as RFC 3339 with a `Z` suffix. [`UtcDateTime::dhaka`] renders
/// the same instant on the exchanges' local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parses RFC 3339 input. Offsets other than UTC are rejected rather
    /// than converted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let not_utc = || ValidationError::TimestampNotUtc {
            value: input.to_owned(),
        };

        let parsed = OffsetDateTime::parse(input.trim(), &Rfc3339).map_err(|_| not_utc())?;
        if parsed.offset() == UtcOffset::UTC {
            Ok(Self(parsed))
        } else {
            Err(not_utc())
        }
    }

    /// RFC 3339 rendering on Dhaka time (`+06:00`).
    pub fn dhaka(self) -> String {
        UtcOffset::from_hms(DHAKA_OFFSET_HOURS, 0, 0)
            .ok()
            .and_then(|offset| self.0.checked_to_offset(offset))
            .map_or_else(|| self.to_string(), rfc3339)
    }
}

fn rfc3339(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&rfc3339(self.0))
    }
}

impl FromStr for UtcDateTime {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for UtcDateTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UtcDateTime> for String {
    fn from(value: UtcDateTime) -> Self {
        value.to_string()
    }
}
