//! Row and cell extraction from exchange HTML pages.
//!
//! [`HtmlDocument`] wraps a parsed `scraper` document and hands the rest of
//! the pipeline plain rows of cleaned text. Nothing downstream sees DOM
//! nodes. The parsed document is not `Send`, so adapters parse after their
//! last `.await`.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::normalize;

/// Extraction failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("selector '{selector}' is not valid CSS: {message}")]
    Selector { selector: String, message: String },

    #[error("page structure changed: nothing matches '{selector}'")]
    Structure { selector: String },
}

/// Anchor text plus its `href` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// Anchors sharing one container, such as an industry block on a listing
/// page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    pub id: Option<String>,
    pub heading: Option<String>,
    pub links: Vec<Link>,
}

/// Parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Cleaned cell texts for every element matching `row_selector`.
    ///
    /// Rows keep their document order and position, including rows without
    /// cells, so row numbers in later errors line up with the page.
    pub fn rows(
        &self,
        row_selector: &str,
        cell_selector: &str,
    ) -> Result<Vec<Vec<String>>, ExtractError> {
        let rows = compile(row_selector)?;
        let cells = compile(cell_selector)?;

        let extracted: Vec<Vec<String>> = self
            .html
            .select(&rows)
            .map(|row| row.select(&cells).map(element_text).collect())
            .collect();

        if extracted.is_empty() {
            return Err(structure(row_selector));
        }

        tracing::debug!(selector = row_selector, rows = extracted.len(), "extracted rows");
        Ok(extracted)
    }

    /// Text of the first element matching `selector`.
    pub fn text(&self, selector: &str) -> Result<String, ExtractError> {
        self.optional_text(selector)?
            .ok_or_else(|| structure(selector))
    }

    /// Like [`HtmlDocument::text`], but a missing element is `None`.
    pub fn optional_text(&self, selector: &str) -> Result<Option<String>, ExtractError> {
        let compiled = compile(selector)?;
        Ok(self.html.select(&compiled).next().map(element_text))
    }

    /// Texts of every element matching `selector`.
    pub fn texts(&self, selector: &str) -> Result<Vec<String>, ExtractError> {
        let compiled = compile(selector)?;
        let texts: Vec<String> = self.html.select(&compiled).map(element_text).collect();
        if texts.is_empty() {
            return Err(structure(selector));
        }
        Ok(texts)
    }

    /// Anchors matching `selector` that carry an `href`.
    pub fn links(&self, selector: &str) -> Result<Vec<Link>, ExtractError> {
        let compiled = compile(selector)?;
        let links: Vec<Link> = self.html.select(&compiled).filter_map(to_link).collect();

        if links.is_empty() {
            return Err(structure(selector));
        }
        Ok(links)
    }

    /// Every element matching `group_selector`, with the text of its first
    /// `heading_selector` match and its `link_selector` anchors. Groups
    /// without anchors are kept.
    pub fn link_groups(
        &self,
        group_selector: &str,
        heading_selector: &str,
        link_selector: &str,
    ) -> Result<Vec<LinkGroup>, ExtractError> {
        let groups = compile(group_selector)?;
        let heading = compile(heading_selector)?;
        let links = compile(link_selector)?;

        let extracted: Vec<LinkGroup> = self
            .html
            .select(&groups)
            .map(|group| LinkGroup {
                id: group.value().id().map(str::to_owned),
                heading: group.select(&heading).next().map(element_text),
                links: group.select(&links).filter_map(to_link).collect(),
            })
            .collect();

        if extracted.is_empty() {
            return Err(structure(group_selector));
        }
        Ok(extracted)
    }

    /// First `href` below `link_selector` in each `row_selector` match, in
    /// the same order as [`HtmlDocument::rows`].
    pub fn row_hrefs(
        &self,
        row_selector: &str,
        link_selector: &str,
    ) -> Result<Vec<Option<String>>, ExtractError> {
        let rows = compile(row_selector)?;
        let links = compile(link_selector)?;

        Ok(self
            .html
            .select(&rows)
            .map(|row| row.select(&links).find_map(to_link).map(|link| link.href))
            .collect())
    }
}

fn to_link(anchor: ElementRef<'_>) -> Option<Link> {
    anchor.value().attr("href").map(|href| Link {
        text: element_text(anchor),
        href: href.trim().to_owned(),
    })
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|error| ExtractError::Selector {
        selector: selector.to_owned(),
        message: error.to_string(),
    })
}

fn structure(selector: &str) -> ExtractError {
    ExtractError::Structure {
        selector: selector.to_owned(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize::clean_text(&element.text().collect::<String>())
}
