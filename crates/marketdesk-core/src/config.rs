use crate::error::{Error, Result};
use marketdesk_util::DEFAULT_USER_AGENT;
use url::Url;

pub const DEFAULT_SITE_URL: &str = "https://finance.yahoo.com/";
pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/";
pub const DEFAULT_MAX_ROWS: usize = 20;

/// Everything the scraper needs to know about its surroundings.
///
/// Read once at startup and handed to [`MarketService`](crate::MarketService);
/// nothing is looked up from the environment after that.
#[derive(Clone, Debug)]
pub struct Settings {
    pub user_agent: String,
    /// Root that catalog page paths are joined onto.
    pub site_url: Url,
    /// Root of the chart API used for ticker quotes.
    pub chart_url: Url,
    /// Most records returned per table.
    pub max_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            site_url: Url::parse(DEFAULT_SITE_URL).expect("default site url is valid"),
            chart_url: Url::parse(DEFAULT_CHART_URL).expect("default chart url is valid"),
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl Settings {
    /// Read `USER_AGENT`, `SITE_URL`, `CHART_URL` and `MAX_ROWS`, falling back to
    /// defaults for anything unset. A `.env` file is honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let user_agent = lookup("USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        let site_url = match lookup("SITE_URL") {
            Some(raw) => root_url("SITE_URL", &raw)?,
            None => defaults.site_url,
        };

        let chart_url = match lookup("CHART_URL") {
            Some(raw) => root_url("CHART_URL", &raw)?,
            None => defaults.chart_url,
        };

        let max_rows = match lookup("MAX_ROWS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|rows| *rows > 0)
                .ok_or_else(|| {
                    Error::Config(format!("MAX_ROWS must be a positive integer, got {raw:?}"))
                })?,
            None => defaults.max_rows,
        };

        Ok(Self {
            user_agent,
            site_url,
            chart_url,
            max_rows,
        })
    }
}

/// Parse `raw` as a base url; a trailing slash is added so relative paths join
/// underneath it instead of replacing its last segment.
pub fn root_url(key: &str, raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| Error::Config(format!("{key} is not a valid url ({raw:?}): {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("{key} cannot be used as a base url: {raw:?}")));
    }
    Ok(url)
}
