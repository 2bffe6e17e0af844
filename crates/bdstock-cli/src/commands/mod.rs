mod cse;
mod dse;
mod schema;

use std::time::Instant;

use bdstock_core::{
    Envelope, EnvelopeError, EnvelopeMeta, Exchange, ExchangeConfig, ExchangeError, ExchangeId,
    FieldAccessor, SortField, SortRequest, Sortable,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command, SortArgs};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub exchange: Option<ExchangeId>,
}

impl CommandResult {
    pub fn ok(data: Value, exchange: Option<ExchangeId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            exchange,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = load_config(cli)?;
    let started = Instant::now();

    let command_result = match &cli.command {
        Command::Dse(args) => dse::run(args, &config).await?,
        Command::Cse(args) => cse::run(args, &config).await?,
        Command::Schema(args) => schema::run(args)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        exchange,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), exchange, latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

fn load_config(cli: &Cli) -> Result<ExchangeConfig, CliError> {
    let config = ExchangeConfig::from_env()?;
    match cli.timeout_ms {
        Some(timeout_ms) => Ok(config.with_timeout_ms(timeout_ms)?),
        None => Ok(config),
    }
}

fn sort_request(args: &SortArgs) -> Result<SortRequest, CliError> {
    Ok(SortRequest::parse(&args.sort_by, &args.order)?)
}

/// Wraps an exchange outcome into a command result.
///
/// Errors caused by the caller's input abort the command; failures of the
/// exchange itself are reported inside the envelope.
fn respond<T: Serialize>(
    exchange: ExchangeId,
    outcome: Result<T, ExchangeError>,
) -> Result<CommandResult, CliError> {
    match outcome {
        Ok(data) => Ok(CommandResult::ok(serde_json::to_value(data)?, Some(exchange))),
        Err(error) if error.is_caller_error() => Err(CliError::Request(error)),
        Err(error) => {
            tracing::error!(%exchange, code = error.code(), %error, "exchange request failed");
            let envelope_error = EnvelopeError::from_exchange(exchange, &error);
            Ok(CommandResult::ok(Value::Null, Some(exchange)).with_errors(vec![envelope_error]))
        }
    }
}

/// Latest prices from either exchange.
async fn latest<E: Exchange>(exchange: &E, request: SortRequest) -> Result<CommandResult, CliError> {
    priced(exchange.id(), exchange.latest_prices(request).await)
}

/// Like [`respond`], plus warnings for an empty table or untraded shares.
fn priced<R: Sortable + Serialize>(
    exchange: ExchangeId,
    outcome: Result<Vec<R>, ExchangeError>,
) -> Result<CommandResult, CliError> {
    let warnings = outcome
        .as_ref()
        .map(|shares| price_warnings(shares.as_slice()))
        .unwrap_or_default();

    let mut result = respond(exchange, outcome)?;
    for warning in warnings {
        result = result.with_warning(warning);
    }
    Ok(result)
}

async fn status<E: Exchange>(exchange: &E) -> Result<CommandResult, CliError> {
    respond(exchange.id(), exchange.market_status().await)
}

/// Warnings for an empty table or shares whose last price is a placeholder.
fn price_warnings<R: Sortable>(shares: &[R]) -> Vec<String> {
    if shares.is_empty() {
        return vec![String::from("price table has no rows")];
    }

    let Some(FieldAccessor::Float(ltp)) = R::accessor(SortField::Ltp) else {
        return Vec::new();
    };

    let missing = shares.iter().filter(|&share| ltp(share).is_nan()).count();
    if missing == 0 {
        Vec::new()
    } else {
        vec![format!("{missing} share(s) have no last traded price")]
    }
}
