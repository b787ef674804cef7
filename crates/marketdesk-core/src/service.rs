//! Route an API path to the fetch that answers it.

use crate::catalog::{self, Board, Layout, Page, SECTOR_TABLES};
use crate::chart;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::fetcher::{ListEntry, TableFetcher};
use crate::projection::{self, ProjectionArgs, DEFAULT_GROWTH_RATE};
use crate::shape::{select, Trim};
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;
use url::Url;

const MAX_SYMBOL_LEN: usize = 16;

/// A resolved API call, with its arguments validated.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    Board(&'static Board),
    SectorDetail(&'static str),
    TickerDetail(String),
    Projection(ProjectionArgs),
    CurrentTime,
}

impl Endpoint {
    /// Map an API path and its parameters onto an endpoint.
    ///
    /// Unknown paths and malformed parameters are `InvalidArgument`.
    pub fn resolve(api_path: &str, params: &HashMap<String, String>) -> Result<Self> {
        let param = |name: &str| params.get(name).map(String::as_str);

        match api_path.trim_matches('/') {
            "sector_detail" => Self::sector(param("sector").unwrap_or_default()),
            "ticker_detail" => Self::ticker(param("symbol").unwrap_or_default()),
            "projections" => Self::projection(
                param("account_value"),
                param("years"),
                param("growth_rate"),
            ),
            "current_time" => Ok(Endpoint::CurrentTime),
            other => catalog::board_at(other)
                .map(Endpoint::Board)
                .ok_or_else(|| Error::InvalidArgument(format!("unknown api path: {api_path}"))),
        }
    }

    pub fn sector(name: &str) -> Result<Self> {
        catalog::sector(name)
            .map(Endpoint::SectorDetail)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown sector `{name}`; expected one of: {}",
                    catalog::SECTORS.join(", ")
                ))
            })
    }

    pub fn ticker(symbol: &str) -> Result<Self> {
        let symbol = symbol.trim();
        let valid = !symbol.is_empty()
            && symbol.len() <= MAX_SYMBOL_LEN
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
        if !valid {
            return Err(Error::InvalidArgument(format!(
                "`{symbol}` is not a ticker symbol"
            )));
        }
        Ok(Endpoint::TickerDetail(symbol.to_ascii_uppercase()))
    }

    pub fn projection(
        account_value: Option<&str>,
        years: Option<&str>,
        growth_rate: Option<&str>,
    ) -> Result<Self> {
        let args = ProjectionArgs {
            account_value: required(account_value, "account_value")?,
            years: required(years, "years")?,
            growth_rate: match growth_rate {
                Some(raw) => parse_arg(raw, "growth_rate")?,
                None => DEFAULT_GROWTH_RATE,
            },
        };
        Ok(Endpoint::Projection(args))
    }

    pub fn api_path(&self) -> &'static str {
        match self {
            Endpoint::Board(board) => board.api_path,
            Endpoint::SectorDetail(_) => "/sector_detail",
            Endpoint::TickerDetail(_) => "/ticker_detail",
            Endpoint::Projection(_) => "/projections",
            Endpoint::CurrentTime => "/current_time",
        }
    }
}

fn required<T: FromStr>(raw: Option<&str>, name: &str) -> Result<T> {
    let raw = raw.ok_or_else(|| Error::InvalidArgument(format!("missing parameter `{name}`")))?;
    parse_arg(raw, name)
}

fn parse_arg<T: FromStr>(raw: &str, name: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("`{name}` cannot be parsed from `{raw}`")))
}

/// Answers [`Endpoint`]s with JSON values.
#[derive(Clone, Debug)]
pub struct MarketService {
    fetcher: TableFetcher,
    site_url: Url,
    chart_url: Url,
}

impl MarketService {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            fetcher: TableFetcher::from_settings(settings)?,
            site_url: settings.site_url.clone(),
            chart_url: settings.chart_url.clone(),
        })
    }

    /// Reuse an already configured client.
    pub fn with_client(client: Client, settings: &Settings) -> Self {
        Self {
            fetcher: TableFetcher::new(client, settings.max_rows),
            site_url: settings.site_url.clone(),
            chart_url: settings.chart_url.clone(),
        }
    }

    pub fn fetcher(&self) -> &TableFetcher {
        &self.fetcher
    }

    /// Absolute URL of a catalog page.
    pub fn page_url(&self, path: &str) -> Result<Url> {
        self.site_url
            .join(path)
            .map_err(|e| Error::Config(format!("cannot join `{path}` onto {}: {e}", self.site_url)))
    }

    pub async fn call(&self, endpoint: &Endpoint) -> Result<Value> {
        debug!("calling {}", endpoint.api_path());
        match endpoint {
            Endpoint::Board(board) => self.board(board).await,
            Endpoint::SectorDetail(sector) => self.sector_detail(sector).await,
            Endpoint::TickerDetail(symbol) => self.ticker_detail(symbol).await,
            Endpoint::Projection(args) => Ok(serde_json::to_value(projection::project(*args)?)?),
            Endpoint::CurrentTime => Ok(current_time()),
        }
    }

    async fn board(&self, board: &Board) -> Result<Value> {
        match board.layout {
            Layout::Single(page) => {
                let url = self.page_url(page.path)?;
                let mut records = self
                    .fetcher
                    .fetch_table_with(url.as_str(), page.table_index, page.columns, page.trim)
                    .await?;
                if let Some(fields) = board.select {
                    records = select(records, fields)?;
                }
                Ok(serde_json::to_value(records)?)
            }
            Layout::Grouped(group) => {
                let entries = group
                    .iter()
                    .map(|(label, page)| self.entry(label, page))
                    .collect::<Result<Vec<_>>>()?;
                let lists = self.fetcher.fetch_lists(&entries).await?;
                Ok(serde_json::to_value(lists)?)
            }
        }
    }

    fn entry<'a>(&self, label: &'a str, page: &'a Page) -> Result<ListEntry<'a>> {
        Ok(ListEntry {
            label,
            url: self.page_url(page.path)?.into(),
            table_index: page.table_index,
            columns: page.columns,
            trim: page.trim,
        })
    }

    /// The industry, equity, ETF and fund tables of one sector page.
    pub async fn sector_detail(&self, sector: &str) -> Result<Value> {
        let url = self.page_url(&format!("sectors/{sector}/"))?;
        let tables = self
            .fetcher
            .fetch_tables(url.as_str(), SECTOR_TABLES, None, Trim::FULL)
            .await?;
        Ok(serde_json::to_value(tables)?)
    }

    pub async fn ticker_detail(&self, symbol: &str) -> Result<Value> {
        let detail = chart::fetch_ticker_detail(self.fetcher.client(), &self.chart_url, symbol).await?;
        Ok(serde_json::to_value(detail)?)
    }
}

pub fn current_time() -> Value {
    json!({ "timeInSeconds": chrono::Utc::now().timestamp() })
}
