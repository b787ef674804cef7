//! Quote and one-month daily history for a single ticker, from the chart API.

use crate::error::{Error, ParseError, Result};
use crate::record::Scalar;
use chrono::{DateTime, SecondsFormat, Utc};
use marketdesk_util::Util;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};
use url::Url;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickerDetail {
    pub symbol: String,
    pub currency: String,
    pub exchange: String,
    pub price: Scalar,
    pub previous_close: Scalar,
    pub day_high: Scalar,
    pub day_low: Scalar,
    pub year_high: Scalar,
    pub year_low: Scalar,
    pub volume: Scalar,
    pub history: Vec<PriceCell>,
    pub updated: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PriceCell {
    pub date: String,
    pub open: Scalar,
    pub high: Scalar,
    pub low: Scalar,
    pub close: Scalar,
    pub volume: Scalar,
}

// `chart` schema
#[derive(Deserialize, Debug)]
pub struct PriceHistory {
    pub chart: PriceResponse,
}

#[derive(Deserialize, Debug)]
pub struct PriceResponse {
    pub result: Option<Vec<PriceCategories>>,
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PriceCategories {
    pub meta: Meta,
    #[serde(rename = "timestamp", default, deserialize_with = "de_timestamps")]
    pub dates: Vec<String>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub previous_close: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub regular_market_volume: Option<i64>,
    pub regular_market_time: Option<i64>,
}

pub fn de_timestamps<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let timestamps: Vec<i64> = Deserialize::deserialize(deserializer)?;
    timestamps
        .into_iter()
        .map(|timestamp| {
            DateTime::from_timestamp(timestamp, 0)
                .map(|dt| dt.date_naive().to_string())
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp {timestamp} is out of range")))
        })
        .collect()
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Indicators {
    pub quote: Vec<Quote>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Quote {
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<i64>>,
}

/// `<root>/v8/finance/chart/<symbol>?interval=1d&range=1mo`
pub fn chart_url(root: &Url, symbol: &str) -> Result<Url> {
    let mut url = root.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("{root} cannot be used as a chart root")))?
        .pop_if_empty()
        .extend(["v8", "finance", "chart", symbol]);
    url.query_pairs_mut()
        .append_pair("interval", "1d")
        .append_pair("range", "1mo");
    Ok(url)
}

pub async fn fetch_ticker_detail(
    client: &Client,
    chart_root: &Url,
    symbol: &str,
) -> Result<TickerDetail> {
    let url = chart_url(chart_root, symbol)?;
    debug!("fetching chart for {symbol}");
    let body = client.get_text(url.as_str()).await?;
    let history: PriceHistory = serde_json::from_str(&body).map_err(|e| ParseError::Payload {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    ticker_detail(history, symbol, url.as_str())
}

/// Flatten a decoded chart document into a [`TickerDetail`].
pub fn ticker_detail(history: PriceHistory, symbol: &str, url: &str) -> Result<TickerDetail> {
    let PriceResponse { result, error } = history.chart;
    let Some(base) = result.and_then(|r| r.into_iter().next()) else {
        let reason = error
            .and_then(|e| e.description.or(e.code))
            .unwrap_or_else(|| "chart result is empty".to_string());
        warn!("[{symbol}] no chart data: {reason}");
        return Err(ParseError::Payload {
            url: url.to_string(),
            reason,
        }
        .into());
    };

    let PriceCategories {
        meta,
        dates,
        indicators,
    } = base;

    let history = match indicators.quote.into_iter().next() {
        Some(quote) => price_cells(dates, quote),
        None => Vec::new(),
    };

    let updated = meta
        .regular_market_time
        .and_then(|t| DateTime::from_timestamp(t, 0))
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    Ok(TickerDetail {
        symbol: meta.symbol.unwrap_or_else(|| symbol.to_string()),
        currency: meta.currency.unwrap_or_default(),
        exchange: meta.exchange_name.unwrap_or_default(),
        price: Scalar::from_f64(meta.regular_market_price),
        previous_close: Scalar::from_f64(meta.chart_previous_close.or(meta.previous_close)),
        day_high: Scalar::from_f64(meta.regular_market_day_high),
        day_low: Scalar::from_f64(meta.regular_market_day_low),
        year_high: Scalar::from_f64(meta.fifty_two_week_high),
        year_low: Scalar::from_f64(meta.fifty_two_week_low),
        volume: meta.regular_market_volume.map_or(Scalar::Empty, Scalar::Integer),
        history,
        updated,
    })
}

// points without a close are holidays or the still-open session; skip them
fn price_cells(dates: Vec<String>, quote: Quote) -> Vec<PriceCell> {
    let at = |column: &[Option<f64>], i: usize| Scalar::from_f64(column.get(i).copied().flatten());

    dates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| quote.close.get(*i).copied().flatten().is_some())
        .map(|(i, date)| PriceCell {
            date,
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            volume: quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .map_or(Scalar::Empty, Scalar::Integer),
        })
        .collect()
}
