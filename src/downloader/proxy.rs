use super::DownloadError;
use url::Url;

/// `{base}/api/download?url=<encoded>&filename=<encoded>`; the proxy streams
/// the media back with a content-disposition of `filename`.
pub fn proxy_download_url(
    proxy_base: &str,
    media_url: &str,
    file_name: &str,
) -> Result<String, DownloadError> {
    let base = Url::parse(proxy_base).map_err(|_| DownloadError::InvalidUrl(proxy_base.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(DownloadError::InvalidUrl(proxy_base.to_string()));
    }

    Ok(format!(
        "{}/api/download?url={}&filename={}",
        proxy_base.trim_end_matches('/'),
        urlencoding::encode(media_url),
        urlencoding::encode(file_name)
    ))
}
