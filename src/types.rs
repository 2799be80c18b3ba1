use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The candidate document accepted by the PDF filter.
/// Only the name and path are held here; bytes are read from `path`
/// at upload time so a large PDF never sits in memory while idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

/// Requested shape of the generated answer.
/// Serialized lowercase to match the service's wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerFormat {
    #[default]
    Paragraph,
    Bullets,
}

/// One retrieved chunk substantiating part of the answer.
/// `text` is stored exactly as the service returned it; display trimming
/// happens in [`format_excerpt`] at snapshot time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub chunk_id: String,
    pub file_name: String,
    pub text: String,
}

/// Display-ready citation: same identity, excerpt compacted and capped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationView {
    pub chunk_id: String,
    pub file_name: String,
    pub excerpt: String,
}

/// Everything the frontend needs to render — recomputed on every request,
/// never cached on the Rust side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub file_label: String,
    pub has_selection: bool,
    pub index_status: String,
    pub is_uploading: bool,
    pub question: String,
    pub answer_format: AnswerFormat,
    pub is_asking: bool,
    pub summary: String,
    pub citations: Vec<CitationView>,
    /// Outcome of the startup health probe; None until the probe finishes.
    pub service_ok: Option<bool>,
}

/// Character budget for a citation excerpt shown in the UI.
pub const EXCERPT_BUDGET: usize = 700;

/// Collapse whitespace runs to single spaces, trim both ends, and cap the
/// result at `max_chars` with a trailing ellipsis. Presentation transform
/// only — the stored citation text is never modified, so re-rendering with
/// a different budget loses nothing.
pub fn format_excerpt(text: &str, max_chars: usize) -> String {
    let compact = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() <= max_chars {
        return compact;
    }
    let capped: String = compact.chars().take(max_chars).collect();
    format!("{capped}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_collapses_whitespace_runs() {
        assert_eq!(format_excerpt("a\n\n  b\t c ", 700), "a b c");
    }

    #[test]
    fn excerpt_is_idempotent_on_compact_text() {
        let compact = "already compact text under the budget";
        assert_eq!(format_excerpt(compact, 700), compact);
        assert_eq!(format_excerpt(&format_excerpt(compact, 700), 700), compact);
    }

    #[test]
    fn excerpt_truncates_to_budget_plus_ellipsis() {
        let long: String = "x".repeat(900);
        let out = format_excerpt(&long, 700);
        assert_eq!(out.chars().count(), 703);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..700], &long[..700]);
    }

    #[test]
    fn excerpt_at_exact_budget_is_untouched() {
        let exact: String = "y".repeat(700);
        assert_eq!(format_excerpt(&exact, 700), exact);
    }

    #[test]
    fn answer_format_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AnswerFormat::Paragraph).unwrap(),
            "\"paragraph\""
        );
        assert_eq!(
            serde_json::to_string(&AnswerFormat::Bullets).unwrap(),
            "\"bullets\""
        );
        let parsed: AnswerFormat = serde_json::from_str("\"bullets\"").unwrap();
        assert_eq!(parsed, AnswerFormat::Bullets);
    }
}
