use super::types::*;
use super::{build_client, endpoint_base, MetadataSource};
use serde::Deserialize;
use std::time::Duration;

/// `GET {base}/download?url=<encoded>` endpoint.
pub struct LegacyEndpoint {
    client: reqwest::Client,
    base: String,
}

#[derive(Debug, Deserialize)]
struct LegacyResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    duration: u64,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    links: Vec<LegacyLink>,
}

#[derive(Debug, Deserialize)]
struct LegacyLink {
    #[serde(default, deserialize_with = "quality_label")]
    quality: String,
    link: String,
}

impl LegacyEndpoint {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout)?,
            base: endpoint_base(base_url)?,
        })
    }

    fn request_url(&self, video_url: &str) -> String {
        format!("{}/download?url={}", self.base, urlencoding::encode(video_url))
    }

    fn parse_body(body: &str) -> Result<VideoMetadata, FetchError> {
        let data: LegacyResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(VideoMetadata {
            title: data.title,
            category: non_empty(data.category),
            duration: data.duration,
            thumbnail: non_empty(data.thumbnail),
            variants: data
                .links
                .into_iter()
                .map(|l| MediaVariant::new(l.quality, l.link))
                .collect(),
        })
    }
}

#[async_trait::async_trait]
impl MetadataSource for LegacyEndpoint {
    async fn fetch_metadata(&self, video_url: &str) -> Result<VideoMetadata, FetchError> {
        let resp = self
            .client
            .get(self.request_url(video_url))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let body = resp.text().await?;
        Self::parse_body(&body)
    }
}
