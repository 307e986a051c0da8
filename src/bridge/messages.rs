use serde::{Deserialize, Serialize};

use crate::summarize::request::{SummarizePayload, SummaryMode};

/// Requests the assistant consumes over its message channel. One JSON
/// object per message, discriminated on `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssistantRequest {
    /// Liveness check; answered unconditionally.
    Ping,
    StartAssistant,
    StopAssistant,
    SummarizePage {
        payload: SummarizePayload,
        mode: SummaryMode,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssistantResponse {
    Pong {
        pong: bool,
    },
    Started {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Stopped {
        success: bool,
    },
    Summary {
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

/// Fire-and-forget notifications emitted toward any listening observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssistantEvent {
    StatusUpdate { text: String },
}
