use crate::actions;
use crate::config::{get_config as load_config, save_config as store_config, Config};
use crate::downloader::{DownloadProgress, Trigger};
use crate::platforms::{Platform, SUPPORTED_PLATFORMS};
use crate::session::{Session, ViewState};
use std::sync::Arc;
use tauri::{AppHandle, Emitter, State, Window};
use tauri_plugin_opener::OpenerExt;
use tokio::sync::Mutex;

type SharedSession = Arc<Mutex<Session>>;

fn emit_view(window: &Window, view: &ViewState) {
    let _ = window.emit("view-state", view);
}

async fn read_config() -> Result<Config, String> {
    tauri::async_runtime::spawn_blocking(|| load_config().map_err(|e| e.to_string()))
        .await
        .map_err(|e| e.to_string())?
}

// ============ CONFIG COMMANDS ============

#[tauri::command]
async fn get_config() -> Result<Config, String> {
    read_config().await
}

#[tauri::command]
async fn save_config(config: Config) -> Result<(), String> {
    tauri::async_runtime::spawn_blocking(move || store_config(&config).map_err(|e| e.to_string()))
        .await
        .map_err(|e| e.to_string())?
}

#[tauri::command]
fn supported_platforms() -> Vec<Platform> {
    SUPPORTED_PLATFORMS.to_vec()
}

// ============ SESSION COMMANDS ============

#[tauri::command]
async fn get_view_state(session: State<'_, SharedSession>) -> Result<ViewState, String> {
    Ok(session.lock().await.view())
}

#[tauri::command]
async fn set_query(
    query: String,
    window: Window,
    session: State<'_, SharedSession>,
) -> Result<ViewState, String> {
    let view = {
        let mut s = session.lock().await;
        s.set_query(query);
        s.view()
    };
    emit_view(&window, &view);
    Ok(view)
}

#[tauri::command]
async fn fetch_video(window: Window, session: State<'_, SharedSession>) -> Result<ViewState, String> {
    let config = read_config().await;
    Ok(actions::fetch_video(session.inner().as_ref(), config, |view| emit_view(&window, view)).await)
}

#[tauri::command]
async fn select_variant(
    url: String,
    window: Window,
    session: State<'_, SharedSession>,
) -> Result<ViewState, String> {
    let view = {
        let mut s = session.lock().await;
        s.select_variant(&url).map_err(|e| e.to_string())?;
        s.view()
    };
    emit_view(&window, &view);
    Ok(view)
}

#[tauri::command]
async fn reset_session(window: Window, session: State<'_, SharedSession>) -> Result<ViewState, String> {
    let view = {
        let mut s = session.lock().await;
        s.reset();
        s.view()
    };
    emit_view(&window, &view);
    Ok(view)
}

// ============ DOWNLOAD COMMANDS ============

/// Returns the saved path or the opened proxy URL. Download failures are
/// logged only; the window gets `None`.
#[tauri::command]
async fn download_video(
    app: AppHandle,
    window: Window,
    session: State<'_, SharedSession>,
) -> Result<Option<String>, String> {
    let config = read_config().await;
    let progress_window = window.clone();
    let on_progress = move |p: &DownloadProgress| {
        let _ = progress_window.emit("download-progress", p);
    };
    let open_url = move |url: &str| {
        app.opener()
            .open_url(url, None::<&str>)
            .map_err(|e| e.to_string())
    };

    let outcome =
        actions::download_selected(session.inner().as_ref(), config, on_progress, open_url).await;

    Ok(outcome.map(|outcome| match outcome {
        Trigger::Redirect { url } => url,
        Trigger::Saved { job_id, path, .. } => {
            let output_path = path.to_string_lossy().to_string();
            let _ = window.emit(
                "download-complete",
                serde_json::json!({
                    "jobId": job_id,
                    "outputPath": output_path,
                }),
            );
            output_path
        }
    }))
}

// ============ TAURI SETUP ============

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(log::LevelFilter::Info)
                .targets([
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Stdout),
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::LogDir {
                        file_name: None,
                    }),
                ])
                .build(),
        )
        .plugin(tauri_plugin_opener::init())
        .manage(Arc::new(Mutex::new(Session::new())))
        .invoke_handler(tauri::generate_handler![
            // Config
            get_config,
            save_config,
            supported_platforms,
            // Session
            get_view_state,
            set_query,
            fetch_video,
            select_variant,
            reset_session,
            // Download
            download_video,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
