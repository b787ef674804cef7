pub mod util;

use crate::error::FetchError;
use reqwest::Client;

/// Build the process-wide client; every request it sends carries `user_agent`.
pub fn build_client(user_agent: &str) -> Result<Client, FetchError> {
    reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .build()
        .map_err(FetchError::Client)
}
