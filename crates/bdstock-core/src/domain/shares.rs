use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::schema::{Column, FromRow, RowReader};
use crate::sort::{FieldAccessor, SortField, Sortable};

/// One company's line on the DSE latest share price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DseShare {
    pub id: i32,
    pub trading_code: String,
    pub ltp: f64,
    pub high: f64,
    pub low: f64,
    pub close_price: f64,
    pub ycp: f64,
    pub change: f64,
    pub trade: i64,
    pub value_in_mn: f64,
    pub volume: i64,
}

impl DseShare {
    pub const ID: Column = Column::integer(0, "id");
    pub const TRADING_CODE: Column = Column::text(1, "trading_code");
    pub const LTP: Column = Column::float(2, "ltp");
    pub const HIGH: Column = Column::float(3, "high");
    pub const LOW: Column = Column::float(4, "low");
    pub const CLOSE_PRICE: Column = Column::float(5, "close_price");
    pub const YCP: Column = Column::float(6, "ycp");
    pub const CHANGE: Column = Column::float(7, "change");
    pub const TRADE: Column = Column::wide_integer(8, "trade");
    pub const VALUE: Column = Column::float(9, "value_in_mn");
    pub const VOLUME: Column = Column::wide_integer(10, "volume");
}

impl FromRow for DseShare {
    const COLUMNS: &'static [Column] = &[
        Self::ID,
        Self::TRADING_CODE,
        Self::LTP,
        Self::HIGH,
        Self::LOW,
        Self::CLOSE_PRICE,
        Self::YCP,
        Self::CHANGE,
        Self::TRADE,
        Self::VALUE,
        Self::VOLUME,
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            id: row.integer(Self::ID)?,
            trading_code: row.text(Self::TRADING_CODE)?,
            ltp: row.float(Self::LTP)?,
            high: row.float(Self::HIGH)?,
            low: row.float(Self::LOW)?,
            close_price: row.float(Self::CLOSE_PRICE)?,
            ycp: row.float(Self::YCP)?,
            change: row.float(Self::CHANGE)?,
            trade: row.wide_integer(Self::TRADE)?,
            value_in_mn: row.float(Self::VALUE)?,
            volume: row.wide_integer(Self::VOLUME)?,
        })
    }
}

impl Sortable for DseShare {
    const RECORD_NAME: &'static str = "DseShare";

    fn accessor(field: SortField) -> Option<FieldAccessor<Self>> {
        let accessor: FieldAccessor<Self> = match field {
            SortField::TradingCode => FieldAccessor::Text(|share| share.trading_code.as_str()),
            SortField::Ltp => FieldAccessor::Float(|share| share.ltp),
            SortField::High => FieldAccessor::Float(|share| share.high),
            SortField::Low => FieldAccessor::Float(|share| share.low),
            SortField::Ycp => FieldAccessor::Float(|share| share.ycp),
            SortField::NumberOfTrades => FieldAccessor::Integer(|share| share.trade),
            SortField::Value => FieldAccessor::Float(|share| share.value_in_mn),
            SortField::Volume => FieldAccessor::Integer(|share| share.volume),
            SortField::PriceChange => FieldAccessor::Float(|share| share.change),
            SortField::OpeningPrice | SortField::PercentageChange => return None,
        };
        Some(accessor)
    }
}

/// DSE latest share price line from the table ordered by percentage change.
///
/// Same layout as [`DseShare`] except column 7, which holds the percentage
/// change instead of the absolute change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsePriceChange {
    pub id: i32,
    pub trading_code: String,
    pub ltp: f64,
    pub high: f64,
    pub low: f64,
    pub close_price: f64,
    pub ycp: f64,
    pub percentage_change: f64,
    pub trade: i64,
    pub value_in_mn: f64,
    pub volume: i64,
}

impl DsePriceChange {
    pub const PERCENTAGE_CHANGE: Column = Column::percent(7, "percentage_change");
}

impl FromRow for DsePriceChange {
    const COLUMNS: &'static [Column] = &[
        DseShare::ID,
        DseShare::TRADING_CODE,
        DseShare::LTP,
        DseShare::HIGH,
        DseShare::LOW,
        DseShare::CLOSE_PRICE,
        DseShare::YCP,
        Self::PERCENTAGE_CHANGE,
        DseShare::TRADE,
        DseShare::VALUE,
        DseShare::VOLUME,
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            id: row.integer(DseShare::ID)?,
            trading_code: row.text(DseShare::TRADING_CODE)?,
            ltp: row.float(DseShare::LTP)?,
            high: row.float(DseShare::HIGH)?,
            low: row.float(DseShare::LOW)?,
            close_price: row.float(DseShare::CLOSE_PRICE)?,
            ycp: row.float(DseShare::YCP)?,
            percentage_change: row.percent(Self::PERCENTAGE_CHANGE)?,
            trade: row.wide_integer(DseShare::TRADE)?,
            value_in_mn: row.float(DseShare::VALUE)?,
            volume: row.wide_integer(DseShare::VOLUME)?,
        })
    }
}

impl Sortable for DsePriceChange {
    const RECORD_NAME: &'static str = "DsePriceChange";

    fn accessor(field: SortField) -> Option<FieldAccessor<Self>> {
        let accessor: FieldAccessor<Self> = match field {
            SortField::TradingCode => FieldAccessor::Text(|share| share.trading_code.as_str()),
            SortField::Ltp => FieldAccessor::Float(|share| share.ltp),
            SortField::High => FieldAccessor::Float(|share| share.high),
            SortField::Low => FieldAccessor::Float(|share| share.low),
            SortField::Ycp => FieldAccessor::Float(|share| share.ycp),
            SortField::NumberOfTrades => FieldAccessor::Integer(|share| share.trade),
            SortField::Value => FieldAccessor::Float(|share| share.value_in_mn),
            SortField::Volume => FieldAccessor::Integer(|share| share.volume),
            SortField::PercentageChange => {
                FieldAccessor::Float(|share| share.percentage_change)
            }
            SortField::OpeningPrice | SortField::PriceChange => return None,
        };
        Some(accessor)
    }
}

/// One company's line on the CSE current price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CseShare {
    pub sl: i32,
    pub trading_code: String,
    pub ltp: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub ycp: f64,
    pub trade: i64,
    pub value_in_mn: f64,
    pub volume: i64,
}

impl CseShare {
    pub const SL: Column = Column::integer(0, "sl");
    pub const TRADING_CODE: Column = Column::text(1, "trading_code");
    pub const LTP: Column = Column::float(2, "ltp");
    pub const OPEN: Column = Column::float(3, "open");
    pub const HIGH: Column = Column::float(4, "high");
    pub const LOW: Column = Column::float(5, "low");
    pub const YCP: Column = Column::float(6, "ycp");
    pub const TRADE: Column = Column::wide_integer(7, "trade");
    pub const VALUE: Column = Column::float(8, "value_in_mn");
    pub const VOLUME: Column = Column::wide_integer(9, "volume");
}

impl FromRow for CseShare {
    const COLUMNS: &'static [Column] = &[
        Self::SL,
        Self::TRADING_CODE,
        Self::LTP,
        Self::OPEN,
        Self::HIGH,
        Self::LOW,
        Self::YCP,
        Self::TRADE,
        Self::VALUE,
        Self::VOLUME,
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, MappingError> {
        Ok(Self {
            sl: row.integer(Self::SL)?,
            trading_code: row.text(Self::TRADING_CODE)?,
            ltp: row.float(Self::LTP)?,
            open: row.float(Self::OPEN)?,
            high: row.float(Self::HIGH)?,
            low: row.float(Self::LOW)?,
            ycp: row.float(Self::YCP)?,
            trade: row.wide_integer(Self::TRADE)?,
            value_in_mn: row.float(Self::VALUE)?,
            volume: row.wide_integer(Self::VOLUME)?,
        })
    }
}

impl Sortable for CseShare {
    const RECORD_NAME: &'static str = "CseShare";

    fn accessor(field: SortField) -> Option<FieldAccessor<Self>> {
        let accessor: FieldAccessor<Self> = match field {
            SortField::TradingCode => FieldAccessor::Text(|share| share.trading_code.as_str()),
            SortField::Ltp => FieldAccessor::Float(|share| share.ltp),
            SortField::OpeningPrice => FieldAccessor::Float(|share| share.open),
            SortField::High => FieldAccessor::Float(|share| share.high),
            SortField::Low => FieldAccessor::Float(|share| share.low),
            SortField::Ycp => FieldAccessor::Float(|share| share.ycp),
            SortField::NumberOfTrades => FieldAccessor::Integer(|share| share.trade),
            SortField::Value => FieldAccessor::Float(|share| share.value_in_mn),
            SortField::Volume => FieldAccessor::Integer(|share| share.volume),
            SortField::PercentageChange | SortField::PriceChange => return None,
        };
        Some(accessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::map_row;
    use crate::sort::{sort_records, SortOrder};

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn maps_dse_row() {
        let row = cells(&[
            "1", " 1JANATAMF ", "5.6", "5.7", "5.5", "5.6", "5.6", "0", "112", "1.215", "216,897",
        ]);
        let share: DseShare = map_row(&row).expect("row should map");

        assert_eq!(share.id, 1);
        assert_eq!(share.trading_code, "1JANATAMF");
        assert_eq!(share.value_in_mn, 1.215);
        assert_eq!(share.volume, 216_897);
    }

    #[test]
    fn dse_row_accepts_missing_price_sentinel() {
        let row = cells(&[
            "7", "AAMRANET", "--", "--", "--", "--", "52.1", "0", "0", "0", "0",
        ]);
        let share: DseShare = map_row(&row).expect("row should map");
        assert!(share.ltp.is_nan());
        assert_eq!(share.ycp, 52.1);
    }

    #[test]
    fn maps_percentage_change_row() {
        let row = cells(&[
            "3", "ACI", "240.1", "241", "236", "240.1", "230", "4.39%", "1,024", "24.6", "102,400",
        ]);
        let share: DsePriceChange = map_row(&row).expect("row should map");
        assert_eq!(share.percentage_change, 4.39);
    }

    #[test]
    fn cse_open_column_fills_open_field() {
        let row = cells(&[
            "1", "ACI", "240.0", "238.5", "242.0", "236.0", "239.0", "88", "3.12", "13,020",
        ]);
        let share: CseShare = map_row(&row).expect("row should map");
        assert_eq!(share.ltp, 240.0);
        assert_eq!(share.open, 238.5);
    }

    #[test]
    fn shapes_declare_their_own_sort_fields() {
        assert!(DseShare::accessor(SortField::PercentageChange).is_none());
        assert!(DsePriceChange::accessor(SortField::PercentageChange).is_some());
        assert!(CseShare::accessor(SortField::OpeningPrice).is_some());
        assert!(CseShare::accessor(SortField::PriceChange).is_none());
    }

    #[test]
    fn trading_code_accessor_orders_every_shape() {
        let dse = [
            "1", "GP", "285", "286", "284", "285", "285", "0", "850", "60.0", "210,400",
        ];
        let cse = ["1", "GP", "285", "284", "286", "283", "285", "85", "6.0", "21,040"];
        let mut dse_shares: Vec<DseShare> = vec![
            map_row(&cells(&dse)).expect("row"),
            map_row(&cells(&{ let mut row = dse; row[1] = "ACI"; row })).expect("row"),
        ];
        let mut change_shares: Vec<DsePriceChange> = vec![
            map_row(&cells(&{ let mut row = dse; row[7] = "1%"; row })).expect("row"),
            map_row(&cells(&{ let mut row = dse; row[1] = "ACI"; row[7] = "2%"; row }))
                .expect("row"),
        ];
        let mut cse_shares: Vec<CseShare> = vec![
            map_row(&cells(&cse)).expect("row"),
            map_row(&cells(&{ let mut row = cse; row[1] = "ACI"; row })).expect("row"),
        ];

        sort_records(&mut dse_shares, SortField::TradingCode, SortOrder::Descending)
            .expect("sort");
        sort_records(&mut change_shares, SortField::TradingCode, SortOrder::Descending)
            .expect("sort");
        sort_records(&mut cse_shares, SortField::TradingCode, SortOrder::Descending)
            .expect("sort");

        assert_eq!(dse_shares[0].trading_code, "GP");
        assert_eq!(change_shares[1].trading_code, "ACI");
        assert_eq!(cse_shares[1].trading_code, "ACI");
    }

    #[test]
    fn column_layouts_are_contiguous() {
        for (position, column) in DseShare::COLUMNS.iter().enumerate() {
            assert_eq!(column.index, position);
        }
        for (position, column) in CseShare::COLUMNS.iter().enumerate() {
            assert_eq!(column.index, position);
        }
    }
}
