use bdstock_core::{DseAdapter, ExchangeConfig, ExchangeId};

use crate::cli::{DseArgs, DseCommand};
use crate::error::CliError;

use super::{latest, priced, respond, sort_request, status, CommandResult};

pub async fn run(args: &DseArgs, config: &ExchangeConfig) -> Result<CommandResult, CliError> {
    let adapter = DseAdapter::new(config);

    match &args.command {
        DseCommand::Latest(latest_args) => {
            let request = sort_request(&latest_args.sort)?;
            match latest_args.category.as_deref() {
                Some(category) => priced(
                    ExchangeId::Dse,
                    adapter
                        .get_latest_prices_by_category(category, request.field, request.order)
                        .await,
                ),
                None => latest(&adapter, request).await,
            }
        }
        DseCommand::Change(sort_args) => {
            let request = sort_request(sort_args)?;
            priced(
                ExchangeId::Dse,
                adapter
                    .get_latest_prices_by_change(request.field, request.order)
                    .await,
            )
        }
        DseCommand::Summary => respond(ExchangeId::Dse, adapter.get_market_summary().await),
        DseCommand::Status => status(&adapter).await,
    }
}
