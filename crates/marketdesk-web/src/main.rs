use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::{dotenv, var};
use env_logger::Env;
use marketdesk_core::{MarketService, Settings};
use marketdesk_web::{bind_address, configure};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info,actix_web=debug")).init();

    let settings = Settings::from_env()?;
    let (addr, port) = bind_address(|key| var(key).ok())?;
    let service = web::Data::new(MarketService::new(&settings)?);

    log::info!("serving {} on {addr}:{port}", settings.site_url);

    // run server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .configure(configure)
    })
    .bind((addr, port))?
    .run()
    .await?;

    Ok(())
}
