pub mod client_ext;
pub mod error;

pub use crate::client_ext::build_client;
pub use crate::client_ext::util::ClientUtilExt as Util;
pub use crate::error::FetchError;

/// User agent sent when none is configured; the scraped pages reject bare clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
