use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::normalize;
use crate::schema::{Column, FromRow, RowReader};

/// One index line on the DSE home page (DSEX, DSES, DS30).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DseIndex {
    pub name: String,
    pub index: f64,
    pub change: f64,
    pub percentage_change: f64,
}

impl DseIndex {
    pub const NAME: Column = Column::text(0, "name");
    pub const INDEX: Column = Column::float(1, "index");
    pub const CHANGE: Column = Column::float(2, "change");
    pub const PERCENTAGE_CHANGE: Column = Column::percent(3, "percentage_change");
}

impl FromRow for DseIndex {
    const COLUMNS: &'static [Column] = &[
        Self::NAME,
        Self::INDEX,
        Self::CHANGE,
        Self::PERCENTAGE_CHANGE,
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            name: row.text(Self::NAME)?,
            index: row.float(Self::INDEX)?,
            change: row.float(Self::CHANGE)?,
            percentage_change: row.percent(Self::PERCENTAGE_CHANGE)?,
        })
    }
}

/// Day totals printed under the DSE index strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DseMarketTotals {
    pub total_trade: i64,
    pub total_volume: i64,
    pub total_value_in_mn: f64,
}

impl DseMarketTotals {
    pub const TRADE: Column = Column::wide_integer(0, "total_trade");
    pub const VOLUME: Column = Column::wide_integer(1, "total_volume");
    pub const VALUE: Column = Column::float(2, "total_value_in_mn");
}

impl FromRow for DseMarketTotals {
    const COLUMNS: &'static [Column] = &[Self::TRADE, Self::VOLUME, Self::VALUE];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            total_trade: row.wide_integer(Self::TRADE)?,
            total_volume: row.wide_integer(Self::VOLUME)?,
            total_value_in_mn: row.float(Self::VALUE)?,
        })
    }
}

/// Aggregate DSE market snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DseMarketSummary {
    pub indices: Vec<DseIndex>,
    pub total_trade: i64,
    pub total_volume: i64,
    pub total_value_in_mn: f64,
}

impl DseMarketSummary {
    pub fn new(indices: Vec<DseIndex>, totals: DseMarketTotals) -> Self {
        Self {
            indices,
            total_trade: totals.total_trade,
            total_volume: totals.total_volume,
            total_value_in_mn: totals.total_value_in_mn,
        }
    }

    /// Looks up an index by name, ignoring case and a trailing "Index".
    pub fn index(&self, name: &str) -> Option<&DseIndex> {
        let wanted = index_key(name);
        self.indices.iter().find(|entry| index_key(&entry.name) == wanted)
    }
}

fn index_key(name: &str) -> String {
    let upper = name.trim().to_ascii_uppercase();
    upper
        .strip_suffix("INDEX")
        .map(str::trim_end)
        .unwrap_or(&upper)
        .to_owned()
}

/// All-time record published by the CSE (highest turnover, volume, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CseHighestRecord {
    pub title: String,
    pub value: f64,
    pub date: String,
}

impl CseHighestRecord {
    pub const TITLE: Column = Column::text(0, "title");
    pub const VALUE: Column = Column::float(1, "value");
    pub const DATE: Column = Column::text(2, "date");
}

impl FromRow for CseHighestRecord {
    const COLUMNS: &'static [Column] = &[Self::TITLE, Self::VALUE, Self::DATE];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            title: row.text(Self::TITLE)?,
            value: row.float(Self::VALUE)?,
            date: row.text(Self::DATE)?,
        })
    }
}

/// One trading day on the CSE historical market summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CseHistoricalMarket {
    pub sl: i32,
    pub date: String,
    pub trade: i64,
    pub volume: i64,
    pub value_in_tk: f64,
    pub market_cap_in_mn: f64,
    pub cse30: f64,
    pub cscx: f64,
    pub caspi: f64,
    pub cse50: f64,
    pub csi: f64,
}

impl CseHistoricalMarket {
    pub const SL: Column = Column::integer(0, "sl");
    pub const DATE: Column = Column::text(1, "date");
    pub const TRADE: Column = Column::wide_integer(2, "trade");
    pub const VOLUME: Column = Column::wide_integer(3, "volume");
    pub const VALUE: Column = Column::float(4, "value_in_tk");
    pub const MARKET_CAP: Column = Column::float(5, "market_cap_in_mn");
    pub const CSE30: Column = Column::float(6, "cse30");
    pub const CSCX: Column = Column::float(7, "cscx");
    pub const CASPI: Column = Column::float(8, "caspi");
    pub const CSE50: Column = Column::float(9, "cse50");
    pub const CSI: Column = Column::float(10, "csi");
}

impl FromRow for CseHistoricalMarket {
    const COLUMNS: &'static [Column] = &[
        Self::SL,
        Self::DATE,
        Self::TRADE,
        Self::VOLUME,
        Self::VALUE,
        Self::MARKET_CAP,
        Self::CSE30,
        Self::CSCX,
        Self::CASPI,
        Self::CSE50,
        Self::CSI,
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            sl: row.integer(Self::SL)?,
            date: row.text(Self::DATE)?,
            trade: row.wide_integer(Self::TRADE)?,
            volume: row.wide_integer(Self::VOLUME)?,
            value_in_tk: row.float(Self::VALUE)?,
            market_cap_in_mn: row.float(Self::MARKET_CAP)?,
            cse30: row.float(Self::CSE30)?,
            cscx: row.float(Self::CSCX)?,
            caspi: row.float(Self::CASPI)?,
            cse50: row.float(Self::CSE50)?,
            csi: row.float(Self::CSI)?,
        })
    }
}

/// CSE record highs plus the historical daily summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CseMarketSummary {
    pub highest_records: Vec<CseHighestRecord>,
    pub historical_summaries: Vec<CseHistoricalMarket>,
}

/// Listed company as shown on the CSE listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CseCompany {
    pub company_name: String,
    pub trading_code: String,
}

impl CseCompany {
    /// Builds a company from the link text and its details URL; the trading
    /// code is the last path segment of the URL.
    pub fn from_link(text: &str, href: &str) -> Option<Self> {
        let trading_code = href
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .map(str::trim)
            .filter(|code| !code.is_empty())?;

        Some(Self {
            company_name: normalize::clean_text(text),
            trading_code: trading_code.to_owned(),
        })
    }
}

/// Companies of one industry on the CSE listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CseIndustryListing {
    pub industry: String,
    pub companies: Vec<CseCompany>,
}

/// Companies of one market category on the CSE listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CseCategoryListing {
    pub category: String,
    pub companies: Vec<CseCompany>,
}

/// Wall-clock moment the exchange last refreshed its data, as published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUpdated {
    pub date: String,
    pub time: String,
}

impl LastUpdated {
    /// Parses banners such as `Last update on Jul 16, 2020 at 2:30 PM`.
    pub fn parse(banner: &str) -> Option<Self> {
        let cleaned = normalize::clean_text(banner);
        let lowered = cleaned.to_ascii_lowercase();
        let start = lowered.find(" on ").map(|position| position + 4).unwrap_or(0);
        let (date, time) = cleaned[start..].split_once(" at ")?;
        let (date, time) = (date.trim(), time.trim());
        if date.is_empty() || time.is_empty() {
            return None;
        }

        Some(Self {
            date: date.to_owned(),
            time: time.to_owned(),
        })
    }
}

/// Whether the exchange is currently trading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStatus {
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<LastUpdated>,
}

impl MarketStatus {
    /// The exchanges print exactly `Open` while trading.
    pub fn from_status_text(status: &str, last_updated: Option<LastUpdated>) -> Self {
        Self {
            is_open: status.trim() == "Open",
            last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trading_code_from_details_link() {
        let company = CseCompany::from_link(
            " ACI  Limited ",
            "https://www.cse.com.bd/company/companydetails/ACI",
        )
        .expect("company");
        assert_eq!(company.company_name, "ACI Limited");
        assert_eq!(company.trading_code, "ACI");

        assert!(CseCompany::from_link("Broken", "").is_none());
    }

    #[test]
    fn parses_last_update_banner() {
        let parsed = LastUpdated::parse("Last update on Jul 16, 2020 at 2:30 PM").expect("parse");
        assert_eq!(parsed.date, "Jul 16, 2020");
        assert_eq!(parsed.time, "2:30 PM");
        assert!(LastUpdated::parse("Market closed").is_none());
    }

    #[test]
    fn status_text_is_matched_exactly() {
        assert!(MarketStatus::from_status_text(" Open ", None).is_open);
        assert!(!MarketStatus::from_status_text("Closed", None).is_open);
        assert!(!MarketStatus::from_status_text("OPEN", None).is_open);
    }

    #[test]
    fn finds_index_by_short_name() {
        let summary = DseMarketSummary::new(
            vec![DseIndex {
                name: String::from("DSEX Index"),
                index: 5102.5,
                change: -12.4,
                percentage_change: -0.24,
            }],
            DseMarketTotals {
                total_trade: 1,
                total_volume: 2,
                total_value_in_mn: 3.0,
            },
        );
        assert_eq!(summary.index("dsex").map(|entry| entry.index), Some(5102.5));
        assert!(summary.index("DS30").is_none());
    }
}
