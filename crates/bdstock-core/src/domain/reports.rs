use serde::{Deserialize, Serialize};
use time::format_description::well_known::Iso8601;
use time::Date;

use crate::error::MappingError;
use crate::schema::{Column, FromRow, RowReader};
use crate::ValidationError;

/// Parses a `YYYY-MM-DD` trading date.
pub fn parse_trading_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), &Iso8601::DATE).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

/// `YYYY-MM-DD`, the form the CSE archive pages accept.
pub fn format_trading_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// One company on the CSE price/earnings page for a given day.
///
/// The financial year and the unaudited EPS columns are small nested tables
/// on the page; their cells are read in place, so the layout below is flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsePriceEarning {
    pub sl: String,
    pub trading_code: String,
    pub financial_year_from: String,
    pub financial_year_to: String,
    pub eps_first_quarter: f64,
    pub eps_half_year: f64,
    pub eps_third_quarter: f64,
    pub annualized_eps: f64,
    pub eps_last_audited: f64,
    pub close_price: f64,
    pub pe_annualized_eps: f64,
    pub pe_last_audited: f64,
}

impl CsePriceEarning {
    pub const SL: Column = Column::text(0, "sl");
    pub const TRADING_CODE: Column = Column::text(1, "trading_code");
    pub const YEAR_FROM: Column = Column::text(2, "financial_year_from");
    pub const YEAR_TO: Column = Column::text(3, "financial_year_to");
    pub const EPS_Q1: Column = Column::float(4, "eps_first_quarter");
    pub const EPS_HALF_YEAR: Column = Column::float(5, "eps_half_year");
    pub const EPS_Q3: Column = Column::float(6, "eps_third_quarter");
    pub const ANNUALIZED_EPS: Column = Column::float(7, "annualized_eps");
    pub const EPS_AUDITED: Column = Column::float(8, "eps_last_audited");
    pub const CLOSE_PRICE: Column = Column::float(9, "close_price");
    pub const PE_ANNUALIZED: Column = Column::float(10, "pe_annualized_eps");
    pub const PE_AUDITED: Column = Column::float(11, "pe_last_audited");
}

impl FromRow for CsePriceEarning {
    const COLUMNS: &'static [Column] = &[
        Self::SL,
        Self::TRADING_CODE,
        Self::YEAR_FROM,
        Self::YEAR_TO,
        Self::EPS_Q1,
        Self::EPS_HALF_YEAR,
        Self::EPS_Q3,
        Self::ANNUALIZED_EPS,
        Self::EPS_AUDITED,
        Self::CLOSE_PRICE,
        Self::PE_ANNUALIZED,
        Self::PE_AUDITED,
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            // Printed as "12."
            sl: row.text(Self::SL)?.replace('.', ""),
            trading_code: row.text(Self::TRADING_CODE)?,
            financial_year_from: row.text(Self::YEAR_FROM)?,
            financial_year_to: row.text(Self::YEAR_TO)?,
            eps_first_quarter: row.float(Self::EPS_Q1)?,
            eps_half_year: row.float(Self::EPS_HALF_YEAR)?,
            eps_third_quarter: row.float(Self::EPS_Q3)?,
            annualized_eps: row.float(Self::ANNUALIZED_EPS)?,
            eps_last_audited: row.float(Self::EPS_AUDITED)?,
            close_price: row.float(Self::CLOSE_PRICE)?,
            pe_annualized_eps: row.float(Self::PE_ANNUALIZED)?,
            pe_last_audited: row.float(Self::PE_AUDITED)?,
        })
    }
}

/// Price/earnings table for one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsePriceEarningRatios {
    pub date: String,
    pub ratios: Vec<CsePriceEarning>,
}

/// Weekly market report published as a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CseWeeklyReport {
    pub date: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_link: Option<String>,
}

impl CseWeeklyReport {
    pub const DATE: Column = Column::text(0, "date");
    pub const TITLE: Column = Column::text(1, "title");
}

impl FromRow for CseWeeklyReport {
    const COLUMNS: &'static [Column] = &[Self::DATE, Self::TITLE];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            date: row.text(Self::DATE)?,
            title: row.text(Self::TITLE)?,
            pdf_link: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CseWeeklyReports {
    pub year: i32,
    pub reports: Vec<CseWeeklyReport>,
}
