use super::types::*;
use super::{build_client, endpoint_base, MetadataSource};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `POST {base}/api/metadata` endpoint backed by the social download proxy.
pub struct ApiEndpoint {
    client: reqwest::Client,
    base: String,
}

#[derive(Debug, Serialize)]
struct MetadataRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    duration: u64,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    medias: Vec<Media>,
    #[serde(default)]
    error: bool,
}

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(default, deserialize_with = "quality_label")]
    quality: String,
    url: String,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

impl ApiEndpoint {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout)?,
            base: endpoint_base(base_url)?,
        })
    }

    fn parse_body(body: &str) -> Result<VideoMetadata, FetchError> {
        let data: MetadataResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

        if data.error {
            return Err(FetchError::Rejected);
        }

        Ok(VideoMetadata {
            title: data.title,
            category: non_empty(data.source),
            duration: data.duration,
            thumbnail: non_empty(data.thumbnail),
            variants: data
                .medias
                .into_iter()
                .map(|m| MediaVariant {
                    quality: m.quality,
                    url: m.url,
                    ext: non_empty(m.ext),
                    // the proxy reports 0 when it does not know
                    width: m.width.filter(|w| *w > 0),
                    height: m.height.filter(|h| *h > 0),
                })
                .collect(),
        })
    }
}

#[async_trait::async_trait]
impl MetadataSource for ApiEndpoint {
    async fn fetch_metadata(&self, video_url: &str) -> Result<VideoMetadata, FetchError> {
        let resp = self
            .client
            .post(format!("{}/api/metadata", self.base))
            .header(CONTENT_TYPE, "application/json")
            .json(&MetadataRequest { url: video_url })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let body = resp.text().await?;
        Self::parse_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Responder;
    use assert_matches::assert_matches;

    #[test]
    fn maps_source_and_media_fields() {
        let meta = ApiEndpoint::parse_body(
            r#"{
                "url": "https://www.tiktok.com/@a/video/1",
                "source": "tiktok",
                "title": "Dance",
                "duration": 15,
                "thumbnail": "https://cdn.example.com/t.jpg",
                "medias": [
                    {"url": "https://cdn.example.com/hd.mp4", "quality": "hd_no_watermark", "width": 1080, "height": 1920, "ext": "mp4"},
                    {"url": "https://cdn.example.com/a.mp3", "quality": "audio", "width": 0, "height": 0, "ext": "mp3"}
                ],
                "error": false
            }"#,
        )
        .unwrap();

        assert_eq!(meta.category.as_deref(), Some("tiktok"));
        assert_eq!(meta.variants[0].height, Some(1920));
        assert_eq!(meta.variants[1].width, None);
        assert_eq!(meta.variants[1].ext.as_deref(), Some("mp3"));
    }

    #[test]
    fn error_flag_is_rejected() {
        let result = ApiEndpoint::parse_body(r#"{"error": true, "medias": []}"#);
        assert_matches!(result, Err(FetchError::Rejected));
    }

    #[test]
    fn garbage_body_is_parse_error() {
        assert_matches!(ApiEndpoint::parse_body("<html>"), Err(FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn posts_url_as_json() {
        let server = Responder::json(
            200,
            r#"{"title":"T","duration":125,"medias":[{"quality":"720p","url":"u1"},{"quality":"480p","url":"u2"}]}"#,
        )
        .await;
        let endpoint = ApiEndpoint::new(&server.base_url(), Duration::from_secs(5)).unwrap();

        let meta = endpoint
            .fetch_metadata("https://youtube.com/watch?v=abc")
            .await
            .unwrap();
        assert_eq!(meta.title, "T");
        assert_eq!(meta.variants[0].url, "u1");

        let request = server.last_request().unwrap();
        assert!(request.starts_with("POST /api/metadata"));
        assert!(request.ends_with(r#"{"url":"https://youtube.com/watch?v=abc"}"#));
    }

    #[tokio::test]
    async fn not_found_is_status() {
        let server = Responder::json(404, "{}").await;
        let endpoint = ApiEndpoint::new(&server.base_url(), Duration::from_secs(5)).unwrap();

        let result = endpoint.fetch_metadata("https://example.com/v").await;
        assert_matches!(result, Err(FetchError::Status(404)));
    }
}
