use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

const ERROR_BODY_CAP: usize = 300;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug)]
pub enum SummarizeError {
    /// No credential stored under the configured secret name.
    MissingCredential(String),

    /// Request never completed (connection, TLS, malformed response body).
    Transport(reqwest::Error),

    /// The endpoint answered with a non-success status.
    BadStatus { status: u16, body: String },

    /// 2xx response carrying no usable completion text.
    EmptyCompletion,
}

impl fmt::Display for SummarizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarizeError::MissingCredential(name) => {
                write!(f, "No credential stored under '{}'", name)
            }
            SummarizeError::Transport(e) => write!(f, "Summarization transport error: {}", e),
            SummarizeError::BadStatus { status, body } => {
                write!(f, "Summarization endpoint returned {}: {}", status, body)
            }
            SummarizeError::EmptyCompletion => {
                write!(f, "Summarization endpoint returned an empty completion")
            }
        }
    }
}

impl std::error::Error for SummarizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SummarizeError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

/// Chat-completion capability: one best completion string for an ordered
/// list of role-tagged messages.
pub trait ChatCompletion {
    fn complete(&self, api_key: &str, messages: &[ChatMessage])
    -> Result<String, SummarizeError>;
}

/// Generic chat-completion endpoint: POST, bearer credential, JSON body with
/// model id, temperature, token bound and messages.
pub struct HttpChatClient {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for HttpChatClient {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 220,
        }
    }
}

impl HttpChatClient {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            ..Self::default()
        }
    }
}

impl ChatCompletion for HttpChatClient {
    fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<String, SummarizeError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages,
        };

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(SummarizeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            if body.len() > ERROR_BODY_CAP {
                let mut cut = ERROR_BODY_CAP;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(SummarizeError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().map_err(SummarizeError::Transport)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(SummarizeError::EmptyCompletion);
        }
        Ok(text)
    }
}

// ============================================================================
// Credential lookup
// ============================================================================

/// External key/value store holding the API credential under a single
/// secret name. Absence is a pipeline failure, not a crash.
pub trait SecretStore {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads secrets from process environment variables.
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

/// In-memory secrets for tests and scripted runs.
#[derive(Default)]
pub struct MemorySecrets {
    entries: HashMap<String, String>,
}

impl MemorySecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.entries.insert(name.to_string(), value.to_string());
        self
    }
}

impl SecretStore for MemorySecrets {
    fn get(&self, name: &str) -> Option<String> {
        self.entries.get(name).cloned()
    }
}

// ============================================================================
// Mock completion (tests and offline runs)
// ============================================================================

/// Canned chat completion for tests; counts calls through a shared handle
/// so callers can assert on cache short-circuits.
pub struct MockCompletion {
    pub response: Result<String, u16>,
    pub calls: std::rc::Rc<std::cell::Cell<usize>>,
}

impl MockCompletion {
    pub fn ok(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            calls: std::rc::Rc::new(std::cell::Cell::new(0)),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            calls: std::rc::Rc::new(std::cell::Cell::new(0)),
        }
    }
}

impl ChatCompletion for MockCompletion {
    fn complete(
        &self,
        _api_key: &str,
        _messages: &[ChatMessage],
    ) -> Result<String, SummarizeError> {
        self.calls.set(self.calls.get() + 1);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(SummarizeError::BadStatus {
                status: *status,
                body: "mock failure".to_string(),
            }),
        }
    }
}
