//! Bodies of the fetch and download commands, free of Tauri types.
//!
//! The session lock is only held to read or mutate state, never across a
//! network await.

use crate::config::Config;
use crate::downloader::{self, DownloadError, DownloadProgress, Trigger};
use crate::metadata::{source_from_config, FetchError};
use crate::session::{Session, ViewState};
use log::error;
use tokio::sync::Mutex;

/// Run one fetch cycle. `on_view` sees the state after entering `loading`
/// and again after the result is applied. A config that could not be read
/// counts as a failed fetch.
pub async fn fetch_video<V>(
    session: &Mutex<Session>,
    config: Result<Config, String>,
    mut on_view: V,
) -> ViewState
where
    V: FnMut(&ViewState) + Send,
{
    let (ticket, view) = {
        let mut s = session.lock().await;
        let ticket = s.begin_fetch();
        (ticket, s.view())
    };
    on_view(&view);

    let Some(ticket) = ticket else {
        return view;
    };

    let result = match config.map_err(FetchError::Config) {
        Ok(config) => match source_from_config(&config.endpoint) {
            Ok(source) => source.fetch_metadata(ticket.url()).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    let view = {
        let mut s = session.lock().await;
        s.complete_fetch(ticket, result);
        s.view()
    };
    on_view(&view);
    view
}

/// Download the selected variant. `None` when nothing is selected or the
/// download failed; failures are logged, not surfaced.
pub async fn download_selected<F, O>(
    session: &Mutex<Session>,
    config: Result<Config, String>,
    on_progress: F,
    open_url: O,
) -> Option<Trigger>
where
    F: FnMut(&DownloadProgress) + Send,
    O: FnOnce(&str) -> Result<(), String> + Send,
{
    let (media_url, title) = {
        let s = session.lock().await;
        s.selected_variant()
            .map(|v| (v.url.clone(), s.metadata().map(|m| m.title.clone())))
    }?;

    let outcome = match config {
        Ok(config) => {
            downloader::trigger(&config.download, &media_url, title.as_deref(), on_progress).await
        }
        Err(e) => Err(DownloadError::Config(e)),
    };

    let outcome = outcome.and_then(|outcome| {
        if let Trigger::Redirect { url } = &outcome {
            open_url(url).map_err(DownloadError::Open)?;
        }
        Ok(outcome)
    });

    match outcome {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            error!("Error downloading video: {}", e);
            None
        }
    }
}
