use std::path::PathBuf;

use crate::client::{self, SearchClient};
use crate::types::{
    format_excerpt, AnswerFormat, CitationView, SelectedFile, UiSnapshot, EXCERPT_BUDGET,
};
use crate::{AppMutex, AppState};

/// Status line when a dropped or picked file fails the PDF filter.
pub const REJECT_STATUS: &str = "Only PDF files are allowed in this UI.";
/// Status line when the index workflow is invoked with nothing selected.
pub const NO_FILE_STATUS: &str = "Select a PDF first.";
/// Status line while the upload request is in flight.
pub const UPLOADING_STATUS: &str = "Uploading and building index...";
/// Drop-target prompt shown before any file is selected.
pub const PLACEHOLDER_LABEL: &str = "Drop a PDF here";
/// Shown in place of an empty summary.
pub const NO_ANSWER_PLACEHOLDER: &str = "No answer yet.";

// ─── Tauri commands ────────────────────────────────────────────────────────────

/// Validate and store a candidate document (drag-drop or file picker both
/// hand the frontend a path). Rejection is a status message, never an error.
#[tauri::command]
pub async fn select_document(
    path: String,
    state: tauri::State<'_, AppMutex>,
) -> Result<UiSnapshot, String> {
    apply_selection(&state, PathBuf::from(path)).await;
    Ok(snapshot(&state).await)
}

/// Record an edit to the question text.
#[tauri::command]
pub async fn set_question(
    text: String,
    state: tauri::State<'_, AppMutex>,
) -> Result<(), String> {
    state.lock().await.question = text;
    Ok(())
}

/// Record the chosen answer format.
#[tauri::command]
pub async fn set_answer_format(
    format: AnswerFormat,
    state: tauri::State<'_, AppMutex>,
) -> Result<(), String> {
    state.lock().await.answer_format = format;
    Ok(())
}

/// Upload the selected PDF and build the service-side index.
/// All failure modes end up in the status line; the command itself only
/// errs if Tauri plumbing breaks.
#[tauri::command]
pub async fn upload_and_index(
    state: tauri::State<'_, AppMutex>,
    client: tauri::State<'_, SearchClient>,
) -> Result<UiSnapshot, String> {
    run_upload(&state, &client).await;
    Ok(snapshot(&state).await)
}

/// Ask the current question over the indexed document.
#[tauri::command]
pub async fn ask(
    state: tauri::State<'_, AppMutex>,
    client: tauri::State<'_, SearchClient>,
) -> Result<UiSnapshot, String> {
    run_ask(&state, &client).await;
    Ok(snapshot(&state).await)
}

/// Current render state — polled by the frontend after events and while a
/// workflow is in flight.
#[tauri::command]
pub async fn get_snapshot(
    state: tauri::State<'_, AppMutex>,
) -> Result<UiSnapshot, String> {
    Ok(snapshot(&state).await)
}

// ─── Internal helpers ──────────────────────────────────────────────────────────

/// Case-insensitive extension check on the file name component.
fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Selected name, or the drop prompt when nothing is selected.
pub fn file_label(selected: Option<&SelectedFile>) -> String {
    selected
        .map(|f| f.name.clone())
        .unwrap_or_else(|| PLACEHOLDER_LABEL.to_string())
}

/// Input Controller: accept a candidate file iff its name ends in `.pdf`
/// (case-insensitive). On acceptance the previous status line is cleared —
/// a fresh selection invalidates whatever the last attempt reported. On
/// rejection the current selection is left untouched.
pub async fn apply_selection(state: &AppMutex, path: PathBuf) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string());

    let mut s = state.lock().await;
    match name {
        Some(name) if is_pdf_name(&name) => {
            tracing::debug!("selected document: {name}");
            s.selected = Some(SelectedFile { name, path });
            s.index_status.clear();
        }
        _ => s.index_status = REJECT_STATUS.to_string(),
    }
}

/// First phase of the index workflow, synchronous under the state lock:
/// checks the precondition, flips the in-flight guard, and sets the
/// uploading status. Returns the file to send, or None when the attempt
/// ends here (nothing selected, or an upload already running).
fn begin_upload(s: &mut AppState) -> Option<SelectedFile> {
    if s.is_uploading {
        return None;
    }
    match s.selected.clone() {
        None => {
            s.index_status = NO_FILE_STATUS.to_string();
            None
        }
        Some(file) => {
            s.is_uploading = true;
            s.index_status = UPLOADING_STATUS.to_string();
            Some(file)
        }
    }
}

/// Index workflow: Idle → Uploading → {Success, Failure}. Each attempt is
/// independent; failure leaves the selection in place so the user can
/// simply try again.
pub async fn run_upload(state: &AppMutex, client: &SearchClient) {
    let file = {
        let mut s = state.lock().await;
        match begin_upload(&mut s) {
            Some(file) => file,
            None => return,
        }
    }; // lock released before the network call

    let status = match tokio::fs::read(&file.path).await {
        Err(e) => {
            tracing::warn!("could not read {}: {e}", file.path.display());
            client::UPLOAD_FALLBACK.to_string()
        }
        Ok(bytes) => match client.upload_and_index(&file.name, bytes).await {
            Ok(outcome) => format!(
                "Indexed {} chunks from {}.",
                outcome.metadata.count, outcome.file_name
            ),
            Err(e) => {
                tracing::warn!("upload-and-index failed: {e}");
                e.user_message(client::UPLOAD_FALLBACK)
            }
        },
    };

    let mut s = state.lock().await;
    s.index_status = status;
    s.is_uploading = false;
}

/// First phase of the ask workflow, synchronous under the state lock: a
/// blank question is a strict no-op; otherwise the guard is flipped and
/// the previous answer is cleared so stale results never show while the
/// new search runs. Returns the trimmed question and format to send.
fn begin_ask(s: &mut AppState) -> Option<(String, AnswerFormat)> {
    if s.is_asking {
        return None;
    }
    let trimmed = s.question.trim();
    if trimmed.is_empty() {
        return None;
    }
    let question = trimmed.to_string();
    s.is_asking = true;
    s.summary.clear();
    s.citations.clear();
    Some((question, s.answer_format))
}

/// Ask workflow: Idle → Asking → {Answered, Failed}. On failure the error
/// text takes the summary's place so the user sees something explaining
/// what happened; citations stay empty.
pub async fn run_ask(state: &AppMutex, client: &SearchClient) {
    let (question, format) = {
        let mut s = state.lock().await;
        match begin_ask(&mut s) {
            Some(q) => q,
            None => return,
        }
    };

    let result = client.ask(&question, format).await;

    let mut s = state.lock().await;
    match result {
        Ok(answer) => {
            s.summary = answer.summary;
            s.citations = answer.results;
        }
        Err(e) => {
            tracing::warn!("ask failed: {e}");
            s.summary = e.user_message(client::ASK_FALLBACK);
        }
    }
    s.is_asking = false;
}

/// Project the current state into what the frontend renders. Citation
/// excerpts are formatted here, per render, leaving the stored records
/// untouched.
pub async fn snapshot(state: &AppMutex) -> UiSnapshot {
    let s = state.lock().await;
    UiSnapshot {
        file_label: file_label(s.selected.as_ref()),
        has_selection: s.selected.is_some(),
        index_status: s.index_status.clone(),
        is_uploading: s.is_uploading,
        question: s.question.clone(),
        answer_format: s.answer_format,
        is_asking: s.is_asking,
        summary: if s.summary.is_empty() {
            NO_ANSWER_PLACEHOLDER.to_string()
        } else {
            s.summary.clone()
        },
        citations: s
            .citations
            .iter()
            .map(|c| CitationView {
                chunk_id: c.chunk_id.clone(),
                file_name: c.file_name.clone(),
                excerpt: format_excerpt(&c.text, EXCERPT_BUDGET),
            })
            .collect(),
        service_ok: s.service_ok,
    }
}

/// Called once on startup: record whether the search service answers at
/// all, so the frontend can hint at a missing backend before the first
/// upload fails.
pub async fn startup_probe(state: &AppMutex, client: &SearchClient) {
    let ok = client.health().await;
    if !ok {
        tracing::warn!("search service did not answer the startup health probe");
    }
    state.lock().await.service_ok = Some(ok);
}
