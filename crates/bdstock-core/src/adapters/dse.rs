use std::sync::Arc;

use crate::adapters::{default_http_client, PageFetcher};
use crate::assemble::{assemble, assemble_all};
use crate::config::ExchangeConfig;
use crate::exchange::{Exchange, ExchangeError, ExchangeFuture};
use crate::http_client::HttpClient;
use crate::schema::FromRow;
use crate::sort::{sorted, SortField, SortOrder, SortRequest};
use crate::table::HtmlDocument;
use crate::{
    Category, DseIndex, DseMarketSummary, DseMarketTotals, DsePriceChange, DseShare, ExchangeId,
    LastUpdated, MarketStatus,
};

const LATEST_PATH: &str = "/latest_share_price_all.php";
const GROUP_PATH: &str = "/latest_share_price_all_group.php";
const CHANGE_PATH: &str = "/latest_share_price_all_by_change.php";
const HOME_PATH: &str = "/";

const PRICE_ROWS: &str = "table tr";
const PRICE_CELLS: &str = "th, td";
const INDEX_ROWS: &str = "div.LeftColHome div.midrow";
const TOTAL_ROWS: &str = "div.LeftColHome div.bottomrow";
const STRIP_CELLS: &str = "[class^='m_col']";
const STATUS: &str = "div.HeaderTop span.green b, div.HeaderTop span.red b";
const LAST_UPDATE: &str = "div.HeaderTop span.time";

/// Dhaka Stock Exchange adapter.
#[derive(Clone)]
pub struct DseAdapter {
    fetcher: PageFetcher,
}

impl Default for DseAdapter {
    fn default() -> Self {
        Self::new(&ExchangeConfig::default())
    }
}

impl DseAdapter {
    pub fn new(config: &ExchangeConfig) -> Self {
        Self::with_http_client(default_http_client(), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &ExchangeConfig) -> Self {
        Self {
            fetcher: PageFetcher::new(ExchangeId::Dse, &config.dse_base_url, config, http_client),
        }
    }

    /// Every listed share, sorted by `field` in `order`.
    pub async fn get_latest_prices(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> Result<Vec<DseShare>, ExchangeError> {
        let body = self.fetcher.fetch(LATEST_PATH).await?;
        let shares = parse_price_table::<DseShare>(&body)?;
        Ok(sorted(shares, SortRequest::new(field, order))?)
    }

    /// Shares of one market category (`A`, `B`, `G`, `N`, `Z`).
    ///
    /// The code is validated before any request is made.
    pub async fn get_latest_prices_by_category(
        &self,
        code: &str,
        field: SortField,
        order: SortOrder,
    ) -> Result<Vec<DseShare>, ExchangeError> {
        let category = Category::parse(code)?;
        let path = format!(
            "{GROUP_PATH}?group={}",
            urlencoding::encode(category.as_str())
        );

        let body = self.fetcher.fetch(&path).await?;
        let shares = parse_price_table::<DseShare>(&body)?;
        Ok(sorted(shares, SortRequest::new(field, order))?)
    }

    /// Latest prices with the percentage change column.
    pub async fn get_latest_prices_by_change(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> Result<Vec<DsePriceChange>, ExchangeError> {
        let body = self.fetcher.fetch(CHANGE_PATH).await?;
        let shares = parse_price_table::<DsePriceChange>(&body)?;
        Ok(sorted(shares, SortRequest::new(field, order))?)
    }

    pub async fn get_market_summary(&self) -> Result<DseMarketSummary, ExchangeError> {
        let body = self.fetcher.fetch(HOME_PATH).await?;
        parse_market_summary(&body)
    }

    pub async fn get_market_status(&self) -> Result<MarketStatus, ExchangeError> {
        let body = self.fetcher.fetch(HOME_PATH).await?;
        parse_market_status(&body)
    }
}

impl Exchange for DseAdapter {
    type Share = DseShare;

    fn id(&self) -> ExchangeId {
        ExchangeId::Dse
    }

    fn latest_prices<'a>(&'a self, request: SortRequest) -> ExchangeFuture<'a, Vec<DseShare>> {
        Box::pin(self.get_latest_prices(request.field, request.order))
    }

    fn market_status<'a>(&'a self) -> ExchangeFuture<'a, MarketStatus> {
        Box::pin(self.get_market_status())
    }
}

fn parse_price_table<R: FromRow>(body: &str) -> Result<Vec<R>, ExchangeError> {
    let rows = HtmlDocument::parse(body).rows(PRICE_ROWS, PRICE_CELLS)?;
    let records = assemble::<R, _>(rows)?;
    tracing::info!(records = records.len(), "parsed DSE price table");
    Ok(records)
}

fn parse_market_summary(body: &str) -> Result<DseMarketSummary, ExchangeError> {
    let doc = HtmlDocument::parse(body);
    let indices = assemble_all::<DseIndex, _>(doc.rows(INDEX_ROWS, STRIP_CELLS)?)?;
    let totals = assemble::<DseMarketTotals, _>(doc.rows(TOTAL_ROWS, STRIP_CELLS)?)?
        .into_iter()
        .next()
        .ok_or_else(|| ExchangeError::Structure {
            selector: TOTAL_ROWS.to_owned(),
        })?;

    Ok(DseMarketSummary::new(indices, totals))
}

fn parse_market_status(body: &str) -> Result<MarketStatus, ExchangeError> {
    let doc = HtmlDocument::parse(body);
    let status = doc.text(STATUS)?;
    let last_updated = doc
        .optional_text(LAST_UPDATE)?
        .and_then(|banner| LastUpdated::parse(&banner));

    Ok(MarketStatus::from_status_text(&status, last_updated))
}
