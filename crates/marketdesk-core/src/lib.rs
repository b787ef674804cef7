//! Yahoo Finance table scraping, reshaped into JSON records for an agent.
//!
//! ```rust,no_run
//! # async fn run() -> marketdesk_core::Result<()> {
//! use marketdesk_core::{Endpoint, MarketService, Settings};
//!
//! let service = MarketService::new(&Settings::from_env()?)?;
//! let gainers = service.call(&Endpoint::resolve("/day_gainers", &Default::default())?).await?;
//! # Ok(())
//! # }
//! ```
pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod projection;
pub mod record;
pub mod service;
pub mod shape;
pub mod table;

pub use crate::config::Settings;
pub use crate::error::{Error, FetchError, ParseError, Result};
pub use crate::fetcher::{ListEntry, TableFetcher};
pub use crate::record::{Scalar, TabularRecord};
pub use crate::service::{Endpoint, MarketService};
pub use crate::shape::Trim;
