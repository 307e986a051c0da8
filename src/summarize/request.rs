use serde::{Deserialize, Serialize};

use crate::context::page_context::{FieldHints, InteractiveCounts, PageContext};
use crate::summarize::client::ChatMessage;

/// Overview content is shipped as at most this many labeled segments.
pub const MAX_CONTENT_CHUNKS: usize = 4;
/// Each content segment carries at most this many characters.
pub const CHUNK_CHAR_LIMIT: usize = 6_000;
/// Fillables requests list at most this many field labels.
pub const MAX_FILLABLE_LABELS: usize = 100;
/// And at most this many per-field hint bundles.
pub const MAX_FIELD_HINTS: usize = 50;

const OVERVIEW_INSTRUCTION: &str = "You describe web pages for a visually impaired user. \
Write a neutral overview of the page in 3 to 6 plain sentences. Mention what the page is for \
and what a visitor can do on it. Do not speculate beyond the provided content.";

const FILLABLES_INSTRUCTION: &str = "You help a visually impaired user fill in a web form by \
voice. Rewrite the provided field labels as a short numbered list of natural spoken names, \
using the page context to disambiguate short or generic labels. Produce between 3 and 12 \
items; merge or drop near-duplicates if there are more. Do not mention input types or \
whether fields are required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    Overview,
    Fillables,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMode::Overview => "overview",
            SummaryMode::Fillables => "fillables",
        }
    }
}

/// Everything a summarization request needs, collected page-side. This is
/// also the payload shape of the `summarizePage` boundary message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizePayload {
    pub url: String,
    pub title: String,
    pub headings: Vec<String>,
    pub interactive_counts: InteractiveCounts,
    pub landmarks: Vec<String>,
    pub text: String,
    #[serde(default)]
    pub url_hints: String,
    #[serde(default)]
    pub fillable_labels: Vec<String>,
    #[serde(default)]
    pub field_hints: Vec<FieldHints>,
}

impl SummarizePayload {
    pub fn from_context(ctx: &PageContext) -> Self {
        Self {
            url: ctx.url.clone(),
            title: ctx.title.clone(),
            headings: ctx.headings.clone(),
            interactive_counts: ctx.interactive.clone(),
            landmarks: ctx.landmarks.clone(),
            text: ctx.text.clone(),
            url_hints: ctx.url_hints.clone(),
            fillable_labels: Vec::new(),
            field_hints: Vec::new(),
        }
    }

    pub fn with_fields(mut self, labels: Vec<String>, hints: Vec<FieldHints>) -> Self {
        self.fillable_labels = labels;
        self.field_hints = hints;
        self
    }
}

/// Build the ordered message list for one request: the per-mode system
/// instruction, a metadata block, then mode-specific content segments.
pub fn build_messages(payload: &SummarizePayload, mode: SummaryMode) -> Vec<ChatMessage> {
    let mut messages = Vec::new();

    let instruction = match mode {
        SummaryMode::Overview => OVERVIEW_INSTRUCTION,
        SummaryMode::Fillables => FILLABLES_INSTRUCTION,
    };
    messages.push(ChatMessage::system(instruction));
    messages.push(ChatMessage::user(metadata_block(payload)));

    match mode {
        SummaryMode::Overview => {
            let chunks = chunk_text(&payload.text, CHUNK_CHAR_LIMIT, MAX_CONTENT_CHUNKS);
            let total = chunks.len();
            for (i, chunk) in chunks.into_iter().enumerate() {
                messages.push(ChatMessage::user(format!(
                    "Content part {} of {}:\n{}",
                    i + 1,
                    total,
                    chunk
                )));
            }
        }
        SummaryMode::Fillables => {
            messages.push(ChatMessage::user(labels_segment(payload)));
            if !payload.field_hints.is_empty() {
                messages.push(ChatMessage::user(hints_segment(payload)));
            }
        }
    }

    messages
}

fn metadata_block(payload: &SummarizePayload) -> String {
    format!(
        "URL: {}\nTitle: {}\nHeadings: {}\nInteractive elements: {} inputs, {} buttons, {} links\nLandmarks: {}",
        payload.url,
        payload.title,
        payload.headings.join("; "),
        payload.interactive_counts.inputs,
        payload.interactive_counts.buttons,
        payload.interactive_counts.links,
        payload.landmarks.join(", "),
    )
}

fn labels_segment(payload: &SummarizePayload) -> String {
    let mut out = String::from("Form fields found on the page:\n");
    for (i, label) in payload
        .fillable_labels
        .iter()
        .take(MAX_FILLABLE_LABELS)
        .enumerate()
    {
        out.push_str(&format!("{}. {}\n", i + 1, label));
    }
    out
}

fn hints_segment(payload: &SummarizePayload) -> String {
    let mut out = String::from("Per-field context:\n");
    for (i, hints) in payload.field_hints.iter().take(MAX_FIELD_HINTS).enumerate() {
        out.push_str(&format!(
            "{}. label={}; placeholder={}; name={}; group={}; nearby={}\n",
            i + 1,
            hints.label,
            hints.placeholder,
            hints.name,
            hints.group,
            hints.nearby
        ));
    }
    out
}

/// Split text into at most `max_chunks` pieces of at most `limit` characters
/// each, cutting only at character boundaries. Text beyond the last chunk is
/// dropped.
pub fn chunk_text(text: &str, limit: usize, max_chunks: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if current.len() + c.len_utf8() > limit {
            chunks.push(current);
            if chunks.len() == max_chunks {
                return chunks;
            }
            current = String::new();
        }
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
