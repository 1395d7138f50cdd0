mod api;
mod legacy;
mod types;

pub use api::ApiEndpoint;
pub use legacy::LegacyEndpoint;
pub use types::*;

use crate::config::{EndpointConfig, EndpointFlavor};
use std::time::Duration;
use url::Url;

/// Anything that can turn a source video URL into [`VideoMetadata`].
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, video_url: &str) -> Result<VideoMetadata, FetchError>;
}

/// Build the metadata client selected in the config.
pub fn source_from_config(config: &EndpointConfig) -> Result<Box<dyn MetadataSource>, FetchError> {
    // 0 would time every request out before it starts
    let timeout = Duration::from_secs(config.timeout_secs.max(1));
    Ok(match config.flavor {
        EndpointFlavor::Api => Box::new(ApiEndpoint::new(&config.base_url, timeout)?),
        EndpointFlavor::Legacy => Box::new(LegacyEndpoint::new(&config.base_url, timeout)?),
    })
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Validated base URL without a trailing slash.
fn endpoint_base(base_url: &str) -> Result<String, FetchError> {
    let parsed = Url::parse(base_url).map_err(|_| FetchError::InvalidUrl(base_url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(base_url.to_string()));
    }
    Ok(base_url.trim_end_matches('/').to_string())
}
