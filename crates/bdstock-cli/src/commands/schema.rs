use bdstock_core::{
    Column, CseHighestRecord, CseHistoricalMarket, CsePriceEarning, CseShare, CseWeeklyReport,
    DseIndex, DseMarketTotals, DsePriceChange, DseShare, FromRow, SortField, Sortable,
};
use serde::Serialize;

use crate::cli::SchemaArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ColumnData {
    index: usize,
    name: &'static str,
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct RecordSchema {
    record: &'static str,
    columns: Vec<ColumnData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_fields: Option<Vec<&'static str>>,
}

type Describe = fn() -> RecordSchema;

const RECORDS: [(&str, Describe); 9] = [
    ("dse-share", sortable::<DseShare>),
    ("dse-price-change", sortable::<DsePriceChange>),
    ("cse-share", sortable::<CseShare>),
    ("dse-index", plain::<DseIndex>),
    ("dse-market-totals", plain::<DseMarketTotals>),
    ("cse-highest-record", plain::<CseHighestRecord>),
    ("cse-historical-market", plain::<CseHistoricalMarket>),
    ("cse-price-earning", plain::<CsePriceEarning>),
    ("cse-weekly-report", plain::<CseWeeklyReport>),
];

pub fn run(args: &SchemaArgs) -> Result<CommandResult, CliError> {
    let data = match args.record.as_deref() {
        None => serde_json::to_value(
            RECORDS
                .iter()
                .map(|(name, describe)| named(*name, *describe))
                .collect::<Vec<_>>(),
        )?,
        Some(requested) => {
            let key = requested.trim().to_ascii_lowercase().replace('_', "-");
            let (name, describe) = RECORDS
                .iter()
                .find(|(name, _)| *name == key)
                .ok_or_else(|| {
                    CliError::Usage(format!(
                        "unknown record '{}', expected one of: {}",
                        requested.trim(),
                        RECORDS
                            .iter()
                            .map(|(name, _)| *name)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })?;
            serde_json::to_value(named(*name, *describe))?
        }
    };

    Ok(CommandResult::ok(data, None))
}

fn named(name: &'static str, describe: Describe) -> RecordSchema {
    RecordSchema {
        record: name,
        ..describe()
    }
}

fn columns(layout: &[Column]) -> Vec<ColumnData> {
    layout
        .iter()
        .map(|column| ColumnData {
            index: column.index,
            name: column.name,
            kind: column.kind.as_str(),
        })
        .collect()
}

fn plain<R: FromRow>() -> RecordSchema {
    RecordSchema {
        record: "",
        columns: columns(R::COLUMNS),
        sort_fields: None,
    }
}

fn sortable<R: FromRow + Sortable>() -> RecordSchema {
    let sort_fields = SortField::ALL
        .into_iter()
        .filter(|field| R::accessor(*field).is_some())
        .map(SortField::as_str)
        .collect();

    RecordSchema {
        sort_fields: Some(sort_fields),
        ..plain::<R>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_one_record() {
        let result = run(&SchemaArgs {
            record: Some(String::from("CSE_SHARE")),
        })
        .expect("schema");

        assert_eq!(result.data["record"], "cse-share");
        assert_eq!(result.data["columns"][3]["name"], "open");
        let sort_fields = result.data["sort_fields"].as_array().expect("sort fields");
        assert!(sort_fields.iter().any(|field| field == "opening_price"));
        assert!(!sort_fields.iter().any(|field| field == "price_change"));
    }

    #[test]
    fn lists_every_record() {
        let result = run(&SchemaArgs { record: None }).expect("schema");
        assert_eq!(result.data.as_array().map(Vec::len), Some(RECORDS.len()));
        assert!(result.data[3].get("sort_fields").is_none());
    }

    #[test]
    fn unknown_record_is_usage_error() {
        let err = run(&SchemaArgs {
            record: Some(String::from("bond")),
        })
        .err()
        .expect("must fail");
        assert_eq!(err.exit_code(), 2);
    }
}
