use actix_web::{get, http::StatusCode, web, HttpResponse};
use marketdesk_core::projection::{ProjectionArgs, DEFAULT_GROWTH_RATE};
use marketdesk_core::{Endpoint, MarketService, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

/// Body of every non-200 answer.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Run `endpoint` and turn the outcome into a response.
async fn answer(service: &MarketService, endpoint: Result<Endpoint>) -> HttpResponse {
    let result = match endpoint {
        Ok(endpoint) => service.call(&endpoint).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            log::error!("{e}");
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status).json(ErrorBody {
                error: e.to_string(),
            })
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// One GET route per catalog board. Paths must match `catalog::BOARDS`.
macro_rules! boards {
    ($($name:ident => $path:tt, $summary:tt;)*) => {
        $(
            #[doc = $summary]
            #[utoipa::path(
                get,
                path = $path,
                tag = "markets",
                responses(
                    (status = 200, description = "Records from the listing"),
                    (status = 500, description = "The page could not be fetched or read", body = ErrorBody),
                ),
            )]
            #[get($path)]
            pub async fn $name(service: web::Data<MarketService>) -> HttpResponse {
                answer(&service, Endpoint::resolve($path, &HashMap::new())).await
            }
        )*
    };
}

boards! {
    day_gainers => "/day_gainers", "Days top gaining tickers";
    day_losers => "/day_losers", "Days top losing tickers";
    most_active => "/most_active", "Days most active tickers";
    futures => "/futures", "Futures market tickers";
    bonds => "/bonds", "Bond market tickers";
    top_crypto => "/top_crypto", "Days top crypto";
    market_indices => "/market_indices", "Market indices status: symbol, name, price and change";
    top_etf_lists => "/top_etf_lists", "Day's top ETF lists: TopGainers and TopPerforming";
    losing_etfs => "/losing_etfs", "Day's losing ETFs";
    trending_etf_lists => "/trending_etf_lists", "MostActive and Trending ETF lists";
    etf_hist => "/etf_hist", "Historical performance and top ETFs";
    mf_days_top_lists => "/mf_days_top_lists", "Mutual funds day's top lists: gainers, top performing and losers";
    mf_best_performing => "/mf_best_performing", "Best historical performing and overall best mutual funds";
    days_forex => "/days_forex", "Day's currencies performance";
    sectors => "/sectors", "List of market sectors";
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SectorQuery {
    /// One of `technology`, `financial-services`, `consumer-cyclical`, `healthcare`,
    /// `communication-services`, `basic-materials`, `consumer-defensive`, `energy`,
    /// `industrials`, `real-estate`, `utilities`.
    pub sector: String,
}

/// Industries, largest companies, ETF and mutual fund opportunities of a sector
#[utoipa::path(
    get,
    path = "/sector_detail",
    tag = "sectors",
    responses(
        (status = 200, description = "Tables keyed by `industries`, `large_equities`, `etf_opportunities`, `fund_opportunities`"),
        (status = 400, description = "Unknown sector", body = ErrorBody),
        (status = 500, description = "The page could not be fetched or read", body = ErrorBody),
    ),
)]
#[get("/sector_detail")]
pub async fn sector_detail(
    service: web::Data<MarketService>,
    query: web::Query<SectorQuery>,
) -> HttpResponse {
    answer(&service, Endpoint::sector(&query.sector)).await
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TickerQuery {
    /// Ticker symbol, e.g. `AAPL`
    pub symbol: String,
}

/// Quote and one month of daily prices for a ticker
#[utoipa::path(
    get,
    path = "/ticker_detail",
    tag = "tickers",
    responses(
        (status = 200, description = "Quote summary with daily `history`"),
        (status = 400, description = "Malformed symbol", body = ErrorBody),
        (status = 500, description = "The chart could not be fetched or read", body = ErrorBody),
    ),
)]
#[get("/ticker_detail")]
pub async fn ticker_detail(
    service: web::Data<MarketService>,
    query: web::Query<TickerQuery>,
) -> HttpResponse {
    answer(&service, Endpoint::ticker(&query.symbol)).await
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectionQuery {
    /// Current account value
    pub account_value: f64,
    /// Number of years to project
    pub years: u32,
    /// Yearly growth rate as a fraction above -1.0; defaults to 0.07
    pub growth_rate: Option<f64>,
}

/// Project an account value forward with compound yearly growth
#[utoipa::path(
    get,
    path = "/projections",
    tag = "tools",
    responses(
        (status = 200, description = "`projected_value` alongside the inputs"),
        (status = 400, description = "Negative account value, a growth rate at or below -1.0, or non-finite input", body = ErrorBody),
    ),
)]
#[get("/projections")]
pub async fn projections(
    service: web::Data<MarketService>,
    query: web::Query<ProjectionQuery>,
) -> HttpResponse {
    let args = ProjectionArgs {
        account_value: query.account_value,
        years: query.years,
        growth_rate: query.growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
    };
    answer(&service, Ok(Endpoint::Projection(args))).await
}

/// Current unix time in seconds
#[utoipa::path(
    get,
    path = "/current_time",
    tag = "tools",
    responses(
        (status = 200, description = "`{\"timeInSeconds\": <unix seconds>}`"),
    ),
)]
#[get("/current_time")]
pub async fn current_time(service: web::Data<MarketService>) -> HttpResponse {
    answer(&service, Ok(Endpoint::CurrentTime)).await
}
