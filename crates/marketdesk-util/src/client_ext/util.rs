use crate::error::FetchError;
use reqwest::Client;
use std::future::Future;
use tracing::{error, trace};

pub trait ClientUtilExt {
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

impl ClientUtilExt for Client {
    /// GET `url` once and return the body as text.
    ///
    /// Transport failures and any non-2xx status are returned as [`FetchError`];
    /// the body of an error response is discarded.
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).send().await.map_err(|e| {
            error!("failed fetching response from {url}");
            FetchError::Transport {
                url: url.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("{url} answered with {status}");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            error!("failed reading response body from {url}");
            FetchError::Transport {
                url: url.to_string(),
                source: e,
            }
        })?;
        trace!("received {} bytes from {url}", body.len());

        Ok(body)
    }
}
