use std::time::Instant;

use crate::context::keywords::naturalize_label;
use crate::discover::field_model::FillableField;
use crate::summarize::cache::{CacheKey, SummaryCache, content_signature};
use crate::summarize::client::{ChatCompletion, SecretStore, SummarizeError};
use crate::summarize::request::{SummarizePayload, SummaryMode, build_messages};

/// Local fallback lists at most this many fields before trailing off.
pub const LOCAL_LIST_CAP: usize = 20;

/// The summarization pipeline: cache check, request construction, remote
/// call. Any failure is returned as an error for the caller to replace with
/// a local heuristic; nothing here reaches the speech channel directly.
pub struct Summarizer {
    client: Box<dyn ChatCompletion>,
    secrets: Box<dyn SecretStore>,
    secret_name: String,
    cache: SummaryCache,
}

impl Summarizer {
    pub fn new(
        client: Box<dyn ChatCompletion>,
        secrets: Box<dyn SecretStore>,
        secret_name: &str,
    ) -> Self {
        Self {
            client,
            secrets,
            secret_name: secret_name.to_string(),
            cache: SummaryCache::new(),
        }
    }

    pub fn summarize(
        &mut self,
        payload: &SummarizePayload,
        mode: SummaryMode,
    ) -> Result<String, SummarizeError> {
        self.summarize_at(payload, mode, Instant::now())
    }

    /// Cache-aware summarization with an explicit clock, for tests.
    pub fn summarize_at(
        &mut self,
        payload: &SummarizePayload,
        mode: SummaryMode,
        now: Instant,
    ) -> Result<String, SummarizeError> {
        let key = cache_key(payload, mode);
        if let Some(hit) = self.cache.get_at(&key, now) {
            return Ok(hit);
        }

        let api_key = self
            .secrets
            .get(&self.secret_name)
            .ok_or_else(|| SummarizeError::MissingCredential(self.secret_name.clone()))?;

        let messages = build_messages(payload, mode);
        let summary = self.client.complete(&api_key, &messages)?;
        if summary.trim().is_empty() {
            return Err(SummarizeError::EmptyCompletion);
        }

        self.cache.insert_at(key, summary.clone(), now);
        Ok(summary)
    }
}

fn cache_key(payload: &SummarizePayload, mode: SummaryMode) -> CacheKey {
    let signature = match mode {
        SummaryMode::Overview => String::new(),
        SummaryMode::Fillables => content_signature(&payload.fillable_labels),
    };
    CacheKey {
        url: payload.url.clone(),
        title: payload.title.clone(),
        mode,
        signature,
    }
}

// ============================================================================
// Local heuristics (pipeline-failure substitutes)
// ============================================================================

/// Word-count overview used when the remote pipeline fails.
pub fn heuristic_overview(payload: &SummarizePayload) -> String {
    let title = if payload.title.is_empty() {
        "Untitled"
    } else {
        &payload.title
    };
    let words = payload.text.split_whitespace().count();
    format!(
        "This page is titled {}. It contains approximately {} words of content.",
        title, words
    )
}

/// Locally rendered numbered field list: naturalized labels, capped, with an
/// overflow tail.
pub fn local_field_list(fields: &[FillableField], keyword: &str) -> String {
    let items: Vec<String> = fields
        .iter()
        .take(LOCAL_LIST_CAP)
        .enumerate()
        .map(|(i, field)| {
            let raw = if field.label.trim().is_empty() {
                "Field"
            } else {
                field.label.trim()
            };
            format!("{}. {}", i + 1, naturalize_label(raw, keyword))
        })
        .collect();

    let mut out = items.join(". ");
    if fields.len() > LOCAL_LIST_CAP {
        out.push_str(&format!(
            ". ...and {} more.",
            fields.len() - LOCAL_LIST_CAP
        ));
    } else if !out.is_empty() {
        out.push('.');
    }
    out
}
