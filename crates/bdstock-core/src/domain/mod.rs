//! # Domain Models
//!
//! Typed records for the tables published by the Dhaka (DSE) and Chittagong
//! (CSE) stock exchanges.
//!
//! ## Models
//!
//! | Type | Source page |
//! |------|-------------|
//! | [`DseShare`] | DSE latest share price, all or by group |
//! | [`DsePriceChange`] | DSE latest share price ordered by % change |
//! | [`CseShare`] | CSE current price |
//! | [`DseMarketSummary`] | DSE home page indices and totals |
//! | [`CseMarketSummary`] | CSE historical market page |
//! | [`CseCompany`] | CSE listed companies |
//! | [`CseIndustryListing`], [`CseCategoryListing`] | CSE listed companies, grouped |
//! | [`CsePriceEarning`] | CSE price/earnings ratios for a day |
//! | [`CseWeeklyReport`] | CSE weekly report archive |
//! | [`MarketStatus`] | Header of either exchange |
//! | [`Category`] | DSE market segment code |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Each shape is authoritative for its own page. Fields that look alike
//! across shapes (`sl` and `id`, `open` and `close_price`) are deliberately
//! kept apart.

mod category;
mod market;
mod reports;
mod shares;
mod timestamp;

pub use category::{is_valid_category, Category};
pub use market::{
    CseCategoryListing, CseCompany, CseHighestRecord, CseHistoricalMarket, CseIndustryListing,
    CseMarketSummary, DseIndex, DseMarketSummary, DseMarketTotals, LastUpdated, MarketStatus,
};
pub use reports::{
    format_trading_date, parse_trading_date, CsePriceEarning, CsePriceEarningRatios,
    CseWeeklyReport, CseWeeklyReports,
};
pub use shares::{CseShare, DsePriceChange, DseShare};
pub use timestamp::UtcDateTime;
