//! Field-selectable sort over record collections.
//!
//! Every record shape declares which [`SortField`]s it supports through
//! [`Sortable::accessor`]; [`sort_records`] then runs one generic, stable
//! comparator over the extracted key. Unsupported fields are an error and
//! leave the collection untouched.
//!
//! # Trading code caveat
//!
//! Both exchanges publish their price tables already ordered by trading
//! code, so sorting by [`SortField::TradingCode`] in ascending order returns
//! the input as-is. Descending order performs a real reverse-lexicographic
//! sort. Callers holding data from any other origin should not rely on the
//! ascending case producing lexicographic order.
//!
//! # Not-a-number keys
//!
//! Missing values (see [`crate::normalize`]) are `NaN` and compare with
//! [`f64::total_cmp`]: they sort after every number in ascending order and
//! before every number in descending order.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SortError;

/// Record field a collection can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    TradingCode,
    Ltp,
    OpeningPrice,
    High,
    Low,
    Ycp,
    NumberOfTrades,
    Value,
    Volume,
    PercentageChange,
    PriceChange,
}

impl SortField {
    pub const ALL: [Self; 11] = [
        Self::TradingCode,
        Self::Ltp,
        Self::OpeningPrice,
        Self::High,
        Self::Low,
        Self::Ycp,
        Self::NumberOfTrades,
        Self::Value,
        Self::Volume,
        Self::PercentageChange,
        Self::PriceChange,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TradingCode => "trading_code",
            Self::Ltp => "ltp",
            Self::OpeningPrice => "opening_price",
            Self::High => "high",
            Self::Low => "low",
            Self::Ycp => "ycp",
            Self::NumberOfTrades => "number_of_trades",
            Self::Value => "value",
            Self::Volume => "volume",
            Self::PercentageChange => "percentage_change",
            Self::PriceChange => "price_change",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = SortError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| SortError::UnsupportedField {
                field: value.trim().to_owned(),
                record: "record",
            })
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = SortError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(SortError::InvalidOrder {
                value: value.to_owned(),
            }),
        }
    }
}

/// Numeric wire codes: `0` ascending, `1` descending.
impl TryFrom<u8> for SortOrder {
    type Error = SortError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Ascending),
            1 => Ok(Self::Descending),
            other => Err(SortError::InvalidOrder {
                value: other.to_string(),
            }),
        }
    }
}

/// Validated field/order pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortRequest {
    pub const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Parses caller input. The order is checked before the field.
    pub fn parse(field: &str, order: &str) -> Result<Self, SortError> {
        let order = order.parse::<SortOrder>()?;
        let field = field.parse::<SortField>()?;
        Ok(Self { field, order })
    }
}

impl Default for SortRequest {
    fn default() -> Self {
        Self::new(SortField::TradingCode, SortOrder::Ascending)
    }
}

/// Typed key extractor for one record field.
pub enum FieldAccessor<R> {
    Text(fn(&R) -> &str),
    Float(fn(&R) -> f64),
    Integer(fn(&R) -> i64),
}

impl<R> FieldAccessor<R> {
    fn compare(&self, left: &R, right: &R) -> Ordering {
        match self {
            Self::Text(key) => key(left).cmp(key(right)),
            Self::Float(key) => key(left).total_cmp(&key(right)),
            Self::Integer(key) => key(left).cmp(&key(right)),
        }
    }
}

/// Record shapes the comparator engine can order.
pub trait Sortable: Sized {
    /// Record name used in error messages.
    const RECORD_NAME: &'static str;

    /// Key extractor for `field`, or `None` if the shape has no such field.
    fn accessor(field: SortField) -> Option<FieldAccessor<Self>>;
}

/// Sorts `records` in place by `field` in `order`.
///
/// The sort is stable: records with equal keys keep their relative order.
pub fn sort_records<R: Sortable>(
    records: &mut [R],
    field: SortField,
    order: SortOrder,
) -> Result<(), SortError> {
    let accessor = R::accessor(field).ok_or_else(|| SortError::UnsupportedField {
        field: field.as_str().to_owned(),
        record: R::RECORD_NAME,
    })?;

    if field == SortField::TradingCode && order == SortOrder::Ascending {
        return Ok(());
    }

    records.sort_by(|left, right| order.apply(accessor.compare(left, right)));
    Ok(())
}

/// Convenience wrapper over [`sort_records`] for an owned collection.
pub fn sorted<R: Sortable>(mut records: Vec<R>, request: SortRequest) -> Result<Vec<R>, SortError> {
    sort_records(&mut records, request.field, request.order)?;
    Ok(records)
}
