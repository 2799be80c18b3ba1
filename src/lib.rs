pub mod client;
pub mod commands;
pub mod config;
pub mod types;

use tauri::Manager;
use tokio::sync::Mutex;

use crate::client::SearchClient;
use crate::config::ServiceConfig;
use crate::types::{AnswerFormat, Citation, SelectedFile};

/// All interaction state shared across Tauri commands. Ephemeral — nothing
/// here survives the window closing.
#[derive(Debug, Default)]
pub struct AppState {
    /// The PDF awaiting (or last sent for) indexing. Invariant: only ever
    /// set to a file whose name passed the `.pdf` filter.
    pub selected: Option<SelectedFile>,
    /// One human-readable line describing the last index attempt,
    /// overwritten on every attempt.
    pub index_status: String,
    /// Question text as the user typed it; trimmed only when sent.
    pub question: String,
    pub answer_format: AnswerFormat,
    /// Summary and citations of the last ask. Always replaced together:
    /// cleared when an ask starts, filled (or summary ← error text) when
    /// it completes.
    pub summary: String,
    pub citations: Vec<Citation>,
    /// True while an upload request is in flight. Advisory guard against
    /// re-invocation; there is no cancellation, so a slow response still
    /// lands (last writer wins).
    pub is_uploading: bool,
    /// Same, for the ask workflow. The two flags are independent.
    pub is_asking: bool,
    /// Result of the startup health probe; None until it finishes.
    pub service_ok: Option<bool>,
}

/// Type alias used in Tauri command signatures and background tasks.
pub type AppMutex = Mutex<AppState>;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    #[cfg(debug_assertions)]
    tracing_subscriber::fmt::init();
    #[cfg(not(debug_assertions))]
    tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(AppMutex::new(AppState::default()))
        .manage(SearchClient::new(ServiceConfig::default()))
        .invoke_handler(tauri::generate_handler![
            commands::select_document,
            commands::set_question,
            commands::set_answer_format,
            commands::upload_and_index,
            commands::ask,
            commands::get_snapshot,
        ])
        .setup(|app| {
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let state = handle.state::<AppMutex>();
                let client = handle.state::<SearchClient>();
                commands::startup_probe(state.inner(), client.inner()).await;
            });
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
