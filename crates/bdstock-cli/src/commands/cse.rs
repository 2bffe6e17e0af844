use bdstock_core::{parse_trading_date, CseAdapter, ExchangeConfig, ExchangeId};

use crate::cli::{CseArgs, CseCommand};
use crate::error::CliError;

use super::{latest, respond, sort_request, status, CommandResult};

pub async fn run(args: &CseArgs, config: &ExchangeConfig) -> Result<CommandResult, CliError> {
    let adapter = CseAdapter::new(config);

    match &args.command {
        CseCommand::Latest(sort_args) => latest(&adapter, sort_request(sort_args)?).await,
        CseCommand::Summary => respond(ExchangeId::Cse, adapter.get_market_summary().await),
        CseCommand::Status => status(&adapter).await,
        CseCommand::Companies => respond(ExchangeId::Cse, adapter.get_listed_companies().await),
        CseCommand::Industries => respond(
            ExchangeId::Cse,
            adapter.get_listed_companies_by_industry().await,
        ),
        CseCommand::Categories => respond(
            ExchangeId::Cse,
            adapter.get_listed_companies_by_category().await,
        ),
        CseCommand::PeRatio(pe_args) => {
            let date = parse_trading_date(&pe_args.date)?;
            respond(ExchangeId::Cse, adapter.get_price_earning_ratio(date).await)
        }
        CseCommand::WeeklyReports(report_args) => respond(
            ExchangeId::Cse,
            adapter.get_weekly_reports(report_args.year).await,
        ),
    }
}
