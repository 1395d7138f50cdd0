use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Endpoint could not resolve the video")]
    Rejected,
    #[error("Config error: {0}")]
    Config(String),
}

/// One downloadable quality option for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaVariant {
    pub quality: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl MediaVariant {
    pub fn new(quality: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            url: url.into(),
            ext: None,
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Duration in whole seconds
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub variants: Vec<MediaVariant>,
}

/// Endpoints send quality as either `"720p"` or `720`.
pub(crate) fn quality_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Label>::deserialize(deserializer)? {
        Some(Label::Text(text)) => text,
        Some(Label::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// Accepts integer or fractional seconds, or null.
pub(crate) fn lenient_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value
        .and_then(|n| n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)))
        .unwrap_or(0))
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "quality_label")]
        quality: String,
        #[serde(default, deserialize_with = "lenient_seconds")]
        duration: u64,
    }

    #[test]
    fn numeric_quality_becomes_text() {
        let sample: Sample = serde_json::from_str(r#"{"quality": 720, "duration": 10}"#).unwrap();
        assert_eq!(sample.quality, "720");
    }

    #[test]
    fn fractional_and_missing_durations() {
        let sample: Sample = serde_json::from_str(r#"{"quality": "hd", "duration": 61.9}"#).unwrap();
        assert_eq!(sample.duration, 61);

        let sample: Sample = serde_json::from_str(r#"{"quality": null, "duration": null}"#).unwrap();
        assert_eq!(sample.duration, 0);
        assert_eq!(sample.quality, "");

        let sample: Sample = serde_json::from_str("{}").unwrap();
        assert_eq!(sample.duration, 0);
    }

    #[test]
    fn blank_strings_are_dropped() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
    }
}
