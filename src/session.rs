//! View-model behind the downloader window.
//!
//! A fetch cycle runs `idle -> loading -> success | error`. Each call to
//! [`Session::begin_fetch`] bumps a generation counter and hands out a
//! [`FetchTicket`]; only the ticket of the latest generation may apply its
//! result, so a reset or a newer request makes older responses inert.

use crate::display::{format_duration, quality_label};
use crate::metadata::{FetchError, MediaVariant, MetadataSource, VideoMetadata};
use log::{debug, error, info};
use serde::Serialize;
use thiserror::Error;

pub const FETCH_ERROR_MESSAGE: &str = "Something went wrong. Please check the URL or try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("No video has been fetched")]
    NoMetadata,
    #[error("Unknown variant: {0}")]
    UnknownVariant(String),
}

/// Proof that a fetch was started; carries the trimmed URL to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    url: String,
}

impl FetchTicket {
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityOption {
    pub label: String,
    pub url: String,
}

/// Snapshot of everything the window renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub query: String,
    pub phase: Phase,
    pub loading: bool,
    pub error: Option<String>,
    pub metadata: Option<VideoMetadata>,
    pub duration_label: Option<String>,
    pub options: Vec<QualityOption>,
    pub selected_url: Option<String>,
    pub can_submit: bool,
    pub can_download: bool,
}

#[derive(Debug)]
pub struct Session {
    query: String,
    phase: Phase,
    error: Option<String>,
    metadata: Option<VideoMetadata>,
    selected_url: Option<String>,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            phase: Phase::Idle,
            error: None,
            metadata: None,
            selected_url: None,
            generation: 0,
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    pub fn selected_url(&self) -> Option<&str> {
        self.selected_url.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.query.trim().is_empty() && !self.is_loading()
    }

    pub fn can_download(&self) -> bool {
        self.selected_url.is_some()
    }

    /// Enter `loading`, clearing the previous result. `None` means no request
    /// should be made.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if !self.can_submit() {
            return None;
        }

        self.generation += 1;
        self.phase = Phase::Loading;
        self.error = None;
        self.metadata = None;
        self.selected_url = None;

        let url = self.query.trim().to_string();
        info!("Fetching video info for {} (request {})", url, self.generation);
        Some(FetchTicket {
            generation: self.generation,
            url,
        })
    }

    /// Apply a fetch outcome. Returns `false` when the ticket is stale and
    /// the result was dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<VideoMetadata, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale result for request {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }

        match result {
            Ok(metadata) => {
                info!(
                    "Fetched \"{}\" with {} variant(s)",
                    metadata.title,
                    metadata.variants.len()
                );
                self.selected_url = metadata.variants.first().map(|v| v.url.clone());
                self.metadata = Some(metadata);
                self.error = None;
                self.phase = Phase::Success;
            }
            Err(e) => {
                error!("Failed to fetch video info for {}: {}", ticket.url, e);
                self.metadata = None;
                self.selected_url = None;
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                self.phase = Phase::Error;
            }
        }
        true
    }

    /// Run a whole fetch cycle against `source`.
    pub async fn submit(&mut self, source: &dyn MetadataSource) -> bool {
        let Some(ticket) = self.begin_fetch() else {
            return false;
        };
        let result = source.fetch_metadata(ticket.url()).await;
        self.complete_fetch(ticket, result)
    }

    pub fn select_variant(&mut self, url: &str) -> Result<(), SelectError> {
        let metadata = self.metadata.as_ref().ok_or(SelectError::NoMetadata)?;
        if !metadata.variants.iter().any(|v| v.url == url) {
            return Err(SelectError::UnknownVariant(url.to_string()));
        }
        self.selected_url = Some(url.to_string());
        Ok(())
    }

    pub fn selected_variant(&self) -> Option<&MediaVariant> {
        let url = self.selected_url.as_deref()?;
        self.metadata
            .as_ref()?
            .variants
            .iter()
            .find(|v| v.url == url)
    }

    /// Back to `idle`; any in-flight request becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.error = None;
        self.metadata = None;
        self.selected_url = None;
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            query: self.query.clone(),
            phase: self.phase,
            loading: self.is_loading(),
            error: self.error.clone(),
            metadata: self.metadata.clone(),
            duration_label: self.metadata.as_ref().map(|m| format_duration(m.duration)),
            options: self
                .metadata
                .as_ref()
                .map(|m| {
                    m.variants
                        .iter()
                        .map(|v| QualityOption {
                            label: quality_label(v),
                            url: v.url.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            selected_url: self.selected_url.clone(),
            can_submit: self.can_submit(),
            can_download: self.can_download(),
        }
    }
}
