use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::session::session_model::SessionStatus;

/// One diagnostic record. Summarization failures and session decisions land
/// here; the speech channel never sees raw errors.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub state: String,

    pub transcript: Option<String>,
    pub command: Option<String>,
    pub outcome: Option<String>,
    pub error: Option<String>,
}

impl TraceEvent {
    pub fn now(state: &SessionStatus) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            state: format!("{:?}", state),
            transcript: None,
            command: None,
            outcome: None,
            error: None,
        }
    }

    pub fn with_transcript(mut self, transcript: impl ToString) -> Self {
        self.transcript = Some(transcript.to_string());
        self
    }

    pub fn with_command(mut self, command: impl ToString) -> Self {
        self.command = Some(command.to_string());
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
