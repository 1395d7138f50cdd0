use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config format error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Which metadata endpoint shape the remote service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EndpointFlavor {
    /// `POST /api/metadata` with a JSON body
    #[default]
    Api,
    /// `GET /download?url=...`
    Legacy,
}

/// How a selected variant ends up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStrategy {
    /// Stream the bytes ourselves into the output directory
    #[default]
    Fetch,
    /// Hand a proxy download URL to the system browser
    Proxy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default)]
    pub flavor: EndpointFlavor,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            flavor: EndpointFlavor::default(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default)]
    pub strategy: DownloadStrategy,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_base_url")]
    pub proxy_base: String,
}

impl DownloadConfig {
    /// Output directory with a leading `~/` expanded.
    pub fn output_path(&self) -> PathBuf {
        match self.output_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(rest),
            None => PathBuf::from(&self.output_dir),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            strategy: DownloadStrategy::default(),
            output_dir: default_output_dir(),
            proxy_base: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> String {
    dirs::download_dir()
        .map(|p| p.join("snapvid").to_string_lossy().to_string())
        .unwrap_or_else(|| "~/Downloads/snapvid".to_string())
}

fn config_dir() -> PathBuf {
    // ~/.config/snapvid on every platform, not the OS-specific app support dir
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("snapvid")
}

fn config_path() -> PathBuf {
    config_dir().join("config.yml")
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    } else {
        Ok(Config::default())
    }
}

pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_yaml::to_string(config)?)?;
    Ok(())
}

pub fn get_config() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    save_to(&config_path(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_from(&dir.path().join("config.yml")).unwrap();

        assert_eq!(config.endpoint.flavor, EndpointFlavor::Api);
        assert_eq!(config.endpoint.base_url, "http://localhost:8080");
        assert_eq!(config.endpoint.timeout_secs, 30);
        assert_eq!(config.download.strategy, DownloadStrategy::Fetch);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "endpoint:\n  flavor: legacy\n  base_url: https://imagemorph.onrender.com\ndownload:\n  strategy: proxy\n",
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.endpoint.flavor, EndpointFlavor::Legacy);
        assert_eq!(config.endpoint.base_url, "https://imagemorph.onrender.com");
        assert_eq!(config.endpoint.timeout_secs, 30);
        assert_eq!(config.download.strategy, DownloadStrategy::Proxy);
        assert_eq!(config.download.proxy_base, "http://localhost:8080");
    }

    #[test]
    fn save_then_load_keeps_choices() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yml");

        let mut config = Config::default();
        config.download.strategy = DownloadStrategy::Proxy;
        config.download.output_dir = "/tmp/videos".into();
        save_to(&path, &config).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.download.strategy, DownloadStrategy::Proxy);
        assert_eq!(loaded.download.output_path(), PathBuf::from("/tmp/videos"));
    }

    #[test]
    fn malformed_file_is_a_yaml_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "endpoint: [unterminated").unwrap();

        assert_matches!(load_from(&path), Err(ConfigError::Yaml(_)));
    }

    #[test]
    fn tilde_output_dir_expands_to_home() {
        let download = DownloadConfig {
            output_dir: "~/Videos/snapvid".into(),
            ..DownloadConfig::default()
        };
        let path = download.output_path();
        assert!(path.ends_with("Videos/snapvid"));
        assert!(!path.starts_with("~"));
    }
}
