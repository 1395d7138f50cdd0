mod proxy;
mod simple;

pub use proxy::proxy_download_url;
pub use simple::{claim_output_path, SimpleDownloader};

use crate::config::{DownloadConfig, DownloadStrategy};
use crate::display::file_name_for;
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to open download: {0}")]
    Open(String),
    #[error("Config error: {0}")]
    Config(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgress {
    pub job_id: String,
    pub downloaded: u64,
    pub total: Option<u64>,
    pub percent: f64,
}

impl DownloadProgress {
    pub fn new(job_id: &str, downloaded: u64, total: Option<u64>) -> Self {
        Self {
            job_id: job_id.to_string(),
            downloaded,
            total,
            percent: total
                .filter(|t| *t > 0)
                .map(|t| (downloaded as f64 / t as f64) * 100.0)
                .unwrap_or(0.0),
        }
    }
}

/// What happened when a download was triggered.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Bytes were streamed into a local file.
    Saved {
        job_id: String,
        path: PathBuf,
        bytes: u64,
    },
    /// The proxy URL must be opened in the system browser.
    Redirect { url: String },
}

/// Persist `media_url` using the configured strategy.
pub async fn trigger<F>(
    config: &DownloadConfig,
    media_url: &str,
    title: Option<&str>,
    on_progress: F,
) -> Result<Trigger, DownloadError>
where
    F: FnMut(&DownloadProgress) + Send,
{
    let file_name = file_name_for(title);

    match config.strategy {
        DownloadStrategy::Proxy => {
            let url = proxy_download_url(&config.proxy_base, media_url, &file_name)?;
            info!("Handing {} to the download proxy", file_name);
            Ok(Trigger::Redirect { url })
        }
        DownloadStrategy::Fetch => {
            let job_id = uuid::Uuid::new_v4().to_string();
            let path = claim_output_path(&config.output_path(), &file_name).await?;
            info!("Downloading {} to {}", media_url, path.display());

            let bytes = match SimpleDownloader::new()
                .download(&job_id, media_url, &path, on_progress)
                .await
            {
                Ok(bytes) => bytes,
                Err(e) => {
                    // release the claimed name
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(e);
                }
            };

            info!("Saved {} ({} bytes)", path.display(), bytes);
            Ok(Trigger::Saved {
                job_id,
                path,
                bytes,
            })
        }
    }
}
