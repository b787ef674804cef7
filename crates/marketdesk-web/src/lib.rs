//! HTTP front for the market endpoints, one GET route per API path.

use actix_web::{error::InternalError, web, HttpResponse};
use marketdesk_core::Error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod api;

use api::*;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "marketdesk",
        description = "Market listings, sector and ticker details scraped from Yahoo Finance"
    ),
    paths(
        day_gainers,
        day_losers,
        most_active,
        futures,
        bonds,
        top_crypto,
        market_indices,
        top_etf_lists,
        losing_etfs,
        trending_etf_lists,
        etf_hist,
        mf_days_top_lists,
        mf_best_performing,
        days_forex,
        sectors,
        sector_detail,
        ticker_detail,
        projections,
        current_time,
    ),
    components(schemas(ErrorBody))
)]
pub struct ApiDoc;

/// Register every route, the OpenAPI document at `/openapi.json`, and the
/// JSON error body for unparsable query strings.
///
/// The caller provides `web::Data<MarketService>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let body = ErrorBody {
            error: err.to_string(),
        };
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });

    cfg.app_data(query_config)
        // api endpoints
        .service(day_gainers)
        .service(day_losers)
        .service(most_active)
        .service(futures)
        .service(bonds)
        .service(top_crypto)
        .service(market_indices)
        .service(top_etf_lists)
        .service(losing_etfs)
        .service(trending_etf_lists)
        .service(etf_hist)
        .service(mf_days_top_lists)
        .service(mf_best_performing)
        .service(days_forex)
        .service(sectors)
        .service(sector_detail)
        .service(ticker_detail)
        .service(projections)
        .service(current_time)
        // api documentation
        .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/openapi.json", ApiDoc::openapi()));
}

/// `BIND_ADDR` and `PORT`, with defaults.
pub fn bind_address<F>(lookup: F) -> Result<(String, u16), Error>
where
    F: Fn(&str) -> Option<String>,
{
    let addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let port = match lookup("PORT") {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("PORT must be a port number, got `{raw}`")))?,
        None => DEFAULT_PORT,
    };
    Ok((addr, port))
}
