use std::sync::Arc;

use time::Date;

use crate::adapters::{default_http_client, PageFetcher};
use crate::assemble::{assemble, assemble_all};
use crate::config::ExchangeConfig;
use crate::exchange::{Exchange, ExchangeError, ExchangeFuture};
use crate::http_client::HttpClient;
use crate::sort::{sorted, SortField, SortOrder, SortRequest};
use crate::table::{ExtractError, HtmlDocument, Link, LinkGroup};
use crate::{
    format_trading_date, CseCategoryListing, CseCompany, CseHighestRecord, CseHistoricalMarket,
    CseIndustryListing, CseMarketSummary, CsePriceEarning, CsePriceEarningRatios, CseShare,
    CseWeeklyReport, CseWeeklyReports, ExchangeId, MarketStatus, ValidationError,
};

const CURRENT_PRICE_PATH: &str = "/market/current_price";
const HISTORICAL_MARKET_PATH: &str = "/market/historical_market";
const LISTED_COMPANIES_PATH: &str = "/company/listedcompanies";
const PE_RATIO_PATH: &str = "/market/pe_ratio";
const WEEKLY_REPORT_PATH: &str = "/market/weekly_report";

const PRICE_ROWS: &str = "#dataTable tr";
const PRICE_CELLS: &str = "th, td";
const RECORD_ROWS: &str = "div.highscore_tabs_cont";
const RECORD_CELLS: &str = "[id^='highscore_tab_']";
const HISTORY_ROWS: &str = "div.market_tabs_cont";
const HISTORY_CELLS: &str = "[id^='market_tab_']";
const COMPANY_LINKS: &str = "#top_content_1 ul li a";
const INDUSTRY_GROUPS: &str = "#top_content_2 > div > div > div > div > div > div";
const CATEGORY_GROUPS: &str = "#top_content_3 > div > div > div > div > div > div";
const GROUP_HEADING: &str = "div";
const GROUP_LINKS: &str = "ul li a";
const ARCHIVE_ROWS: &str = "div.pe_ratio_tabs_cont";
const PE_CELLS: &str = "#pe_ratiocont_1, #pe_ratiocont_2, #pe_ratiocont_3 td, #pe_ratiocont_4 td, \
                        #pe_ratiocont_5, #pe_ratiocont_6, #pe_ratiocont_7, #pe_ratiocont_8, \
                        #pe_ratiocont_9";
const REPORT_CELLS: &str = "#pe_ratiocont_1, #pe_ratiocont_2";
const REPORT_LINK: &str = "#pe_ratiocont_2 a";
const REPORT_YEARS: &str = "form select option";
const STATUS: &str = "#wrapper header .market-status span";

/// Chittagong Stock Exchange adapter.
#[derive(Clone)]
pub struct CseAdapter {
    fetcher: PageFetcher,
}

impl Default for CseAdapter {
    fn default() -> Self {
        Self::new(&ExchangeConfig::default())
    }
}

impl CseAdapter {
    pub fn new(config: &ExchangeConfig) -> Self {
        Self::with_http_client(default_http_client(), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &ExchangeConfig) -> Self {
        Self {
            fetcher: PageFetcher::new(ExchangeId::Cse, &config.cse_base_url, config, http_client),
        }
    }

    /// Every listed share, sorted by `field` in `order`.
    pub async fn get_latest_prices(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> Result<Vec<CseShare>, ExchangeError> {
        let body = self.fetcher.fetch(CURRENT_PRICE_PATH).await?;
        let shares = parse_current_prices(&body)?;
        Ok(sorted(shares, SortRequest::new(field, order))?)
    }

    /// All-time record highs plus the daily history.
    pub async fn get_market_summary(&self) -> Result<CseMarketSummary, ExchangeError> {
        let body = self.fetcher.fetch(HISTORICAL_MARKET_PATH).await?;
        parse_market_summary(&body)
    }

    /// Open/closed flag. The CSE header publishes no update time.
    pub async fn get_market_status(&self) -> Result<MarketStatus, ExchangeError> {
        let body = self.fetcher.fetch(CURRENT_PRICE_PATH).await?;
        let status = HtmlDocument::parse(&body).text(STATUS)?;
        Ok(MarketStatus::from_status_text(&status, None))
    }

    pub async fn get_listed_companies(&self) -> Result<Vec<CseCompany>, ExchangeError> {
        let body = self.fetcher.fetch(LISTED_COMPANIES_PATH).await?;
        parse_listed_companies(&body)
    }

    /// Listed companies grouped by industry, in page order.
    pub async fn get_listed_companies_by_industry(
        &self,
    ) -> Result<Vec<CseIndustryListing>, ExchangeError> {
        let body = self.fetcher.fetch(LISTED_COMPANIES_PATH).await?;
        parse_industry_listings(&body)
    }

    /// Listed companies grouped by market category, in page order.
    pub async fn get_listed_companies_by_category(
        &self,
    ) -> Result<Vec<CseCategoryListing>, ExchangeError> {
        let body = self.fetcher.fetch(LISTED_COMPANIES_PATH).await?;
        parse_category_listings(&body)
    }

    /// Price/earnings ratios published for `date`.
    pub async fn get_price_earning_ratio(
        &self,
        date: Date,
    ) -> Result<CsePriceEarningRatios, ExchangeError> {
        let date = format_trading_date(date);
        let body = self
            .fetcher
            .submit(PE_RATIO_PATH, &[("pe_date", date.as_str())])
            .await?;
        parse_price_earning(&body, date)
    }

    /// Weekly report PDFs for `year`. Only years offered by the archive page
    /// are accepted.
    pub async fn get_weekly_reports(&self, year: i32) -> Result<CseWeeklyReports, ExchangeError> {
        let year_field = year.to_string();
        let body = self
            .fetcher
            .submit(WEEKLY_REPORT_PATH, &[("Year", year_field.as_str())])
            .await?;
        parse_weekly_reports(&body, year)
    }
}

impl Exchange for CseAdapter {
    type Share = CseShare;

    fn id(&self) -> ExchangeId {
        ExchangeId::Cse
    }

    fn latest_prices<'a>(&'a self, request: SortRequest) -> ExchangeFuture<'a, Vec<CseShare>> {
        Box::pin(self.get_latest_prices(request.field, request.order))
    }

    fn market_status<'a>(&'a self) -> ExchangeFuture<'a, MarketStatus> {
        Box::pin(self.get_market_status())
    }
}

fn parse_current_prices(body: &str) -> Result<Vec<CseShare>, ExchangeError> {
    let rows = HtmlDocument::parse(body).rows(PRICE_ROWS, PRICE_CELLS)?;
    let shares = assemble::<CseShare, _>(rows)?;
    tracing::info!(records = shares.len(), "parsed CSE price table");
    Ok(shares)
}

fn parse_market_summary(body: &str) -> Result<CseMarketSummary, ExchangeError> {
    let doc = HtmlDocument::parse(body);
    let highest_records = assemble::<CseHighestRecord, _>(doc.rows(RECORD_ROWS, RECORD_CELLS)?)?;
    let historical_summaries =
        assemble::<CseHistoricalMarket, _>(doc.rows(HISTORY_ROWS, HISTORY_CELLS)?)?;

    Ok(CseMarketSummary {
        highest_records,
        historical_summaries,
    })
}

fn parse_listed_companies(body: &str) -> Result<Vec<CseCompany>, ExchangeError> {
    let links = HtmlDocument::parse(body).links(COMPANY_LINKS)?;
    Ok(companies_from_links(&links))
}

fn companies_from_links(links: &[Link]) -> Vec<CseCompany> {
    let companies: Vec<CseCompany> = links
        .iter()
        .filter_map(|link| CseCompany::from_link(&link.text, &link.href))
        .collect();

    let skipped = links.len() - companies.len();
    if skipped > 0 {
        tracing::warn!(skipped, "listed company links without a trading code");
    }
    companies
}

/// Industry blocks are named by their `id` attribute.
fn parse_industry_listings(body: &str) -> Result<Vec<CseIndustryListing>, ExchangeError> {
    let groups =
        HtmlDocument::parse(body).link_groups(INDUSTRY_GROUPS, GROUP_HEADING, GROUP_LINKS)?;
    Ok(groups
        .into_iter()
        .map(|group| CseIndustryListing {
            companies: companies_from_links(&group.links),
            industry: group.id.unwrap_or_default(),
        })
        .collect())
}

/// Category blocks are named by their first inner `div`.
fn parse_category_listings(body: &str) -> Result<Vec<CseCategoryListing>, ExchangeError> {
    let groups =
        HtmlDocument::parse(body).link_groups(CATEGORY_GROUPS, GROUP_HEADING, GROUP_LINKS)?;
    Ok(groups
        .into_iter()
        .map(|LinkGroup { heading, links, .. }| CseCategoryListing {
            category: heading.unwrap_or_default(),
            companies: companies_from_links(&links),
        })
        .collect())
}

fn parse_price_earning(body: &str, date: String) -> Result<CsePriceEarningRatios, ExchangeError> {
    let rows = match HtmlDocument::parse(body).rows(ARCHIVE_ROWS, PE_CELLS) {
        Err(ExtractError::Structure { .. }) => {
            tracing::warn!(%date, "no price/earnings rows");
            return Err(ExchangeError::NoData {
                what: "price/earnings ratios",
                date,
            });
        }
        other => other?,
    };

    let ratios = assemble_all::<CsePriceEarning, _>(rows)?;
    tracing::info!(records = ratios.len(), %date, "parsed CSE price/earnings table");
    Ok(CsePriceEarningRatios { date, ratios })
}

fn parse_weekly_reports(body: &str, year: i32) -> Result<CseWeeklyReports, ExchangeError> {
    let doc = HtmlDocument::parse(body);
    let available: Vec<i32> = doc
        .texts(REPORT_YEARS)?
        .iter()
        .filter_map(|text| text.parse().ok())
        .collect();

    if !available.contains(&year) {
        let available = available
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ValidationError::UnavailableYear { year, available }.into());
    }

    let rows = match doc.rows(ARCHIVE_ROWS, REPORT_CELLS) {
        Err(ExtractError::Structure { .. }) => Vec::new(),
        other => other?,
    };
    let links = doc.row_hrefs(ARCHIVE_ROWS, REPORT_LINK)?;
    let reports = assemble_all::<CseWeeklyReport, _>(rows)?
        .into_iter()
        .zip(links)
        .map(|(report, pdf_link)| CseWeeklyReport { pdf_link, ..report })
        .collect();

    Ok(CseWeeklyReports { year, reports })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_skips_tab_headers() {
        let body = r#"
            <div class="highscore_tabs_cont"><div id="highscore_tab_1">Record</div>
              <div id="highscore_tab_2">Value</div><div id="highscore_tab_3">Date</div></div>
            <div class="highscore_tabs_cont"><div id="highscore_tab_1">Highest Turnover</div>
              <div id="highscore_tab_2">6,510.23</div><div id="highscore_tab_3">06-Dec-2010</div></div>
            <div class="market_tabs_cont"><div id="market_tab_1">SL</div><div id="market_tab_2">Date</div>
              <div id="market_tab_3">Trade</div><div id="market_tab_4">Volume</div>
              <div id="market_tab_5">Value</div><div id="market_tab_6">Market Cap</div>
              <div id="market_tab_7">CSE30</div><div id="market_tab_8">CSCX</div>
              <div id="market_tab_9">CASPI</div><div id="market_tab_10">CSE50</div>
              <div id="market_tab_11">CSI</div></div>
            <div class="market_tabs_cont"><div id="market_tab_1">1</div><div id="market_tab_2">2020-07-16</div>
              <div id="market_tab_3">8,120</div><div id="market_tab_4">4,512,300</div>
              <div id="market_tab_5">120,445,000.5</div><div id="market_tab_6">3,100,200.1</div>
              <div id="market_tab_7">11,020.1</div><div id="market_tab_8">8,950.3</div>
              <div id="market_tab_9">14,560.7</div><div id="market_tab_10">1,012.4</div>
              <div id="market_tab_11">960.2</div></div>"#;

        let summary = parse_market_summary(body).expect("summary");
        assert_eq!(summary.highest_records.len(), 1);
        assert_eq!(summary.highest_records[0].value, 6510.23);
        assert_eq!(summary.historical_summaries.len(), 1);
        assert_eq!(summary.historical_summaries[0].volume, 4_512_300);
        assert_eq!(summary.historical_summaries[0].csi, 960.2);
    }

    #[test]
    fn companies_come_from_listing_links() {
        let body = r#"
            <div id="top_content_1"><ul>
              <li><a href="https://www.cse.com.bd/company/companydetails/ACI">ACI Limited</a></li>
              <li><a href="https://www.cse.com.bd/company/companydetails/GP/">Grameenphone Ltd.</a></li>
            </ul></div>"#;

        let companies = parse_listed_companies(body).expect("companies");
        let codes: Vec<&str> = companies.iter().map(|c| c.trading_code.as_str()).collect();
        assert_eq!(codes, ["ACI", "GP"]);
    }

    fn listing_page() -> String {
        let nest = |id: &str, groups: &str| {
            format!(
                r#"<div id="{id}"><div><div><div><div><div>{groups}</div></div></div></div></div></div>"#
            )
        };
        let industries = nest(
            "top_content_2",
            r#"<div id="Bank"><div>Bank</div><ul>
                 <li><a href="https://www.cse.com.bd/company/companydetails/ABBANK">AB Bank Limited</a></li>
                 <li><a href="https://www.cse.com.bd/company/companydetails/BRACBANK">BRAC Bank Ltd.</a></li>
               </ul></div>
               <div id="Cement"><div>Cement</div><ul>
                 <li><a href="https://www.cse.com.bd/company/companydetails/HEIDELBCEM">Heidelberg Cement</a></li>
               </ul></div>"#,
        );
        let categories = nest(
            "top_content_3",
            r#"<div><div> A </div><ul>
                 <li><a href="https://www.cse.com.bd/company/companydetails/ACI">ACI Limited</a></li>
               </ul></div>
               <div><div>Z</div><ul></ul></div>"#,
        );
        format!("<html><body>{industries}{categories}</body></html>")
    }

    #[test]
    fn industries_are_named_by_block_id() {
        let listings = parse_industry_listings(&listing_page()).expect("listings");

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].industry, "Bank");
        let codes: Vec<&str> = listings[0]
            .companies
            .iter()
            .map(|c| c.trading_code.as_str())
            .collect();
        assert_eq!(codes, ["ABBANK", "BRACBANK"]);
        assert_eq!(listings[1].companies[0].company_name, "Heidelberg Cement");
    }

    #[test]
    fn categories_are_named_by_first_inner_block() {
        let listings = parse_category_listings(&listing_page()).expect("listings");

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].category, "A");
        assert_eq!(listings[0].companies[0].trading_code, "ACI");
        assert_eq!(listings[1].category, "Z");
        assert!(listings[1].companies.is_empty());
    }

    fn pe_row(sl: &str, code: &str, close: &str) -> String {
        format!(
            r#"<div class="pe_ratio_tabs_cont">
                 <div id="pe_ratiocont_1">{sl}</div><div id="pe_ratiocont_2">{code}</div>
                 <div id="pe_ratiocont_3"><table><tr><td>Jul-2019</td><td>Jun-2020</td></tr></table></div>
                 <div id="pe_ratiocont_4"><table><tr><td>1.10</td><td>2.05</td><td>N/A</td></tr></table></div>
                 <div id="pe_ratiocont_5">2.73</div><div id="pe_ratiocont_6">3.01</div>
                 <div id="pe_ratiocont_7">{close}</div><div id="pe_ratiocont_8">87.54</div>
                 <div id="pe_ratiocont_9">79.39</div>
               </div>"#
        )
    }

    #[test]
    fn price_earning_flattens_nested_cells() {
        let body = format!(
            "<html><body>{}{}</body></html>",
            pe_row("1.", "ACI", "239.00"),
            pe_row("2.", "GP", "1,302.10")
        );

        let table = parse_price_earning(&body, String::from("2020-07-16")).expect("ratios");
        assert_eq!(table.date, "2020-07-16");
        assert_eq!(table.ratios.len(), 2);

        let first = &table.ratios[0];
        assert_eq!(first.sl, "1");
        assert_eq!(first.financial_year_from, "Jul-2019");
        assert_eq!(first.eps_half_year, 2.05);
        assert!(first.eps_third_quarter.is_nan());
        assert_eq!(first.pe_last_audited, 79.39);
        assert_eq!(table.ratios[1].close_price, 1302.1);
    }

    #[test]
    fn price_earning_without_rows_is_no_data() {
        let err = parse_price_earning("<html><body></body></html>", String::from("2020-07-17"))
            .expect_err("must fail");
        assert_eq!(
            err,
            ExchangeError::NoData {
                what: "price/earnings ratios",
                date: String::from("2020-07-17"),
            }
        );
    }

    const REPORTS_PAGE: &str = r#"
        <form><select name="Year"><option></option><option>2020</option><option>2019</option></select></form>
        <div class="pe_ratio_tabs_cont"><div id="pe_ratiocont_1">09-Jul-2020</div>
          <div id="pe_ratiocont_2"><a href="https://www.cse.com.bd/weekly/2020-07-09.pdf">Weekly Report</a></div></div>
        <div class="pe_ratio_tabs_cont"><div id="pe_ratiocont_1">02-Jul-2020</div>
          <div id="pe_ratiocont_2">Weekly Report</div></div>"#;

    #[test]
    fn weekly_reports_pair_titles_with_pdf_links() {
        let reports = parse_weekly_reports(REPORTS_PAGE, 2020).expect("reports");

        assert_eq!(reports.year, 2020);
        assert_eq!(reports.reports.len(), 2);
        assert_eq!(reports.reports[0].date, "09-Jul-2020");
        assert_eq!(
            reports.reports[0].pdf_link.as_deref(),
            Some("https://www.cse.com.bd/weekly/2020-07-09.pdf")
        );
        assert_eq!(reports.reports[1].title, "Weekly Report");
        assert_eq!(reports.reports[1].pdf_link, None);
    }

    #[test]
    fn weekly_reports_reject_years_the_archive_lacks() {
        let err = parse_weekly_reports(REPORTS_PAGE, 2017).expect_err("must fail");
        assert_eq!(
            err,
            ExchangeError::Validation(ValidationError::UnavailableYear {
                year: 2017,
                available: String::from("2020, 2019"),
            })
        );
        assert!(err.is_caller_error());
    }
}

