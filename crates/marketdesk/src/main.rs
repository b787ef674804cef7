use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*, TraceLevel};
use dotenv::dotenv;
use marketdesk_core::catalog::{Layout, BOARDS, SECTORS};
use marketdesk_core::{Endpoint, MarketService, Settings};
use std::collections::HashMap;
use tracing::{debug, error, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::TRACE => Level::TRACE,
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level)?;
    trace!("Command line input recorded: {cli:#?}");

    let settings = Settings::from_env()?;
    debug!("settings: {settings:?}");

    // "> marketdesk <COMMAND>"
    match cli.command {
        // "> marketdesk call /day_gainers"
        // "> marketdesk call /ticker_detail symbol=AAPL"
        Call { api_path, params } => {
            let params: HashMap<String, String> = params.into_iter().collect();
            let service = MarketService::new(&settings)?;
            let endpoint = Endpoint::resolve(&api_path, &params)?;
            match service.call(&endpoint).await {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(e) => {
                    error!("{api_path} failed: {e}");
                    return Err(e.into());
                }
            }
        }

        // "> marketdesk table https://finance.yahoo.com/markets/stocks/gainers/ --index 0"
        Table { url, index, raw } => {
            let service = MarketService::new(&settings)?;
            let records = service.fetcher().fetch_table(&url, index, !raw).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        // "> marketdesk boards"
        Boards => {
            for board in BOARDS {
                let shape = match board.layout {
                    Layout::Single(_) => "list",
                    Layout::Grouped(_) => "lists",
                };
                println!("{:<22} {:<6} {}", board.api_path, shape, board.summary);
            }
            println!(
                "{:<22} {:<6} sector=<{}>",
                "/sector_detail",
                "tables",
                SECTORS.join("|")
            );
            println!("{:<22} {:<6} symbol=<ticker>", "/ticker_detail", "quote");
            println!(
                "{:<22} {:<6} account_value=<n> years=<n> [growth_rate=0.07]",
                "/projections", "value"
            );
            println!("{:<22} {:<6}", "/current_time", "value");
        }
    }

    Ok(())
}
