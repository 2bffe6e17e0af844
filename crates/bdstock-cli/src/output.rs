use bdstock_core::Envelope;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            println!("{payload}");
        }
        OutputFormat::Table => render_table(envelope)?,
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<(), CliError> {
    println!("request_id  : {}", envelope.meta.request_id);
    println!("schema      : {}", envelope.meta.schema_version);
    println!(
        "generated_at: {} (Dhaka {})",
        envelope.meta.generated_at,
        envelope.meta.generated_at.dhaka()
    );
    if let Some(exchange) = envelope.meta.exchange {
        println!("exchange    : {exchange}");
    }
    println!("latency_ms  : {}", envelope.meta.latency_ms);

    if !envelope.meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &envelope.meta.warnings {
            println!("  - {warning}");
        }
    }

    match tabulate(&envelope.data) {
        Some(lines) => {
            println!();
            for line in lines {
                println!("{line}");
            }
        }
        None => {
            println!("data:");
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                println!("  {line}");
            }
        }
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }

    Ok(())
}

/// Column-aligned lines for an array of flat objects; `None` for any other shape.
fn tabulate(data: &Value) -> Option<Vec<String>> {
    let rows: Vec<&Map<String, Value>> = data
        .as_array()?
        .iter()
        .map(Value::as_object)
        .collect::<Option<_>>()?;
    let first = rows.first()?;
    let headers: Vec<&String> = first.keys().collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|key| row.get(key.as_str()).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            cells
                .iter()
                .map(|row| row[index].len())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(format_line(headers.iter().map(|h| h.as_str()).collect()));
    for row in &cells {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    Some(lines)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("--"),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tabulates_flat_records() {
        let data = json!([
            { "trading_code": "ACI", "ltp": 240.1 },
            { "trading_code": "GP", "ltp": null },
        ]);

        let lines = tabulate(&data).expect("table");
        assert_eq!(
            lines,
            vec!["ltp    trading_code", "240.1  ACI", "--     GP"]
        );
    }

    #[test]
    fn non_tabular_data_falls_back() {
        assert!(tabulate(&json!({ "is_open": true })).is_none());
        assert!(tabulate(&json!([])).is_none());
        assert!(tabulate(&json!([1, 2])).is_none());
    }
}
