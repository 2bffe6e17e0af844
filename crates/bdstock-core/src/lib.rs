//! # bdstock core
//!
//! Market data from the Dhaka (DSE) and Chittagong (CSE) stock exchanges.
//!
//! Both exchanges publish their data only as HTML pages. This crate downloads
//! a page, pulls out its table rows, turns every row into a typed record and
//! optionally orders the result by a caller-chosen field.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | DSE and CSE adapters |
//! | [`assemble`] | Rows to record collections |
//! | [`config`] | Base URLs, timeout and user agent |
//! | [`domain`] | Record shapes and the category code |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Validation, mapping and sort errors |
//! | [`exchange`] | Adapter contract and [`ExchangeError`] |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`normalize`] | Cell text to numbers |
//! | [`schema`] | Column layouts and the row mapper |
//! | [`sort`] | Field-selectable sort |
//! | [`source`] | Exchange identifiers |
//! | [`table`] | HTML row and cell extraction |
//!
//! ## Pipeline
//!
//! ```text
//! HttpClient ──▶ HtmlDocument::rows ──▶ assemble (FromRow + normalize) ──▶ sort_records
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bdstock_core::{DseAdapter, ExchangeConfig, SortField, SortOrder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = DseAdapter::new(&ExchangeConfig::from_env()?);
//!     let shares = adapter
//!         .get_latest_prices_by_category("A", SortField::Value, SortOrder::Descending)
//!         .await?;
//!
//!     for share in shares.iter().take(5) {
//!         println!("{}: {:.2} mn", share.trading_code, share.value_in_mn);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod assemble;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod exchange;
pub mod http_client;
pub mod normalize;
pub mod schema;
pub mod sort;
pub mod source;
pub mod table;

pub use adapters::{CseAdapter, DseAdapter};
pub use config::ExchangeConfig;
pub use domain::{
    format_trading_date, is_valid_category, parse_trading_date, Category, CseCategoryListing,
    CseCompany, CseHighestRecord, CseHistoricalMarket, CseIndustryListing, CseMarketSummary,
    CsePriceEarning, CsePriceEarningRatios, CseShare, CseWeeklyReport, CseWeeklyReports,
    DseIndex, DseMarketSummary, DseMarketTotals, DsePriceChange, DseShare, LastUpdated,
    MarketStatus, UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{MappingError, NormalizeError, SortError, ValidationError};
pub use exchange::{Exchange, ExchangeError, ExchangeErrorKind, ExchangeFuture};
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use schema::{Column, ColumnKind, FromRow, RowReader};
pub use sort::{sort_records, sorted, FieldAccessor, SortField, SortOrder, SortRequest, Sortable};
pub use source::ExchangeId;
