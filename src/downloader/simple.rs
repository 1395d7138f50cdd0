use super::{DownloadError, DownloadProgress};
use futures::StreamExt;
use reqwest::Client;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

pub struct SimpleDownloader {
    client: Client,
}

impl SimpleDownloader {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
                .build()
                .unwrap_or_default(),
        }
    }

    /// Stream `url` into `output_path`, returning the byte count.
    ///
    /// Bytes land in a per-job `.part` sibling first; it is renamed over
    /// `output_path` on success and removed on any failure.
    pub async fn download<F>(
        &self,
        job_id: &str,
        url: &str,
        output_path: &Path,
        mut on_progress: F,
    ) -> Result<u64, DownloadError>
    where
        F: FnMut(&DownloadProgress) + Send,
    {
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let part_path = part_path(output_path, job_id);
        let result = match self
            .stream_to(job_id, url, &part_path, &mut on_progress)
            .await
        {
            Ok(downloaded) => tokio::fs::rename(&part_path, output_path)
                .await
                .map(|_| downloaded)
                .map_err(DownloadError::from),
            Err(e) => Err(e),
        };

        if result.is_err() {
            let _ = tokio::fs::remove_file(&part_path).await;
        }
        result
    }

    async fn stream_to<F>(
        &self,
        job_id: &str,
        url: &str,
        part_path: &Path,
        on_progress: &mut F,
    ) -> Result<u64, DownloadError>
    where
        F: FnMut(&DownloadProgress) + Send,
    {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status().as_u16()));
        }

        let total = response.content_length();
        let mut downloaded: u64 = 0;
        let mut last_emit = Instant::now();

        let mut file = File::create(part_path).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            downloaded += chunk.len() as u64;
            file.write_all(&chunk).await?;

            if last_emit.elapsed() >= PROGRESS_INTERVAL {
                on_progress(&DownloadProgress::new(job_id, downloaded, total));
                last_emit = Instant::now();
            }
        }

        file.flush().await?;

        on_progress(&DownloadProgress {
            job_id: job_id.to_string(),
            downloaded,
            total,
            percent: 100.0,
        });

        Ok(downloaded)
    }
}

impl Default for SimpleDownloader {
    fn default() -> Self {
        Self::new()
    }
}

fn part_path(output_path: &Path, job_id: &str) -> PathBuf {
    output_path.with_file_name(format!("{}.part", job_id))
}

/// Claim `dir/name.mp4`, or `dir/name (1).mp4`, `dir/name (2).mp4`... when
/// taken, by creating it empty. Concurrent callers never get the same path.
pub async fn claim_output_path(dir: &Path, file_name: &str) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    };

    let mut n = 0u32;
    loop {
        let candidate = match (n, ext) {
            (0, _) => dir.join(file_name),
            (n, Some(ext)) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            (n, None) => dir.join(format!("{} ({})", stem, n)),
        };

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}
