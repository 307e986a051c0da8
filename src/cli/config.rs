use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "voice-assist",
    version,
    about = "Voice-driven form assistant for captured web pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Chat-completion API endpoint
    #[arg(long, global = true)]
    pub api_endpoint: Option<String>,

    /// Chat-completion model id
    #[arg(long, global = true)]
    pub api_model: Option<String>,

    /// Path to config file (default: voice-assist.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the fillable fields discovered on a captured page
    Scan {
        /// Path to a captured page snapshot (JSON)
        #[arg(long)]
        page: String,
    },

    /// Summarize a captured page through the pipeline
    Summarize {
        /// Path to a captured page snapshot (JSON)
        #[arg(long)]
        page: String,

        /// Summary mode: overview or fillables
        #[arg(long, default_value = "overview")]
        mode: String,
    },

    /// Drive a voice session against a captured page, transcripts from stdin
    Run {
        /// Path to a captured page snapshot (JSON)
        #[arg(long)]
        page: String,

        /// Diagnostic trace output path (JSONL)
        #[arg(long)]
        trace: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `voice-assist.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Name of the secret holding the API credential.
    #[serde(default = "default_secret_name")]
    pub secret_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            secret_name: default_secret_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_rate")]
    pub rate: f32,

    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            volume: default_volume(),
        }
    }
}

// Serde default helpers
fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    220
}
fn default_secret_name() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_rate() -> f32 {
    1.0
}
fn default_volume() -> f32 {
    0.8
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or
/// malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("voice-assist.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// Pages the assistant refuses to start on: internal browser surfaces and
/// documents without a scriptable DOM.
pub fn is_restricted_url(url: &str) -> bool {
    url.is_empty()
        || url.starts_with("chrome://")
        || url.starts_with("edge://")
        || url.starts_with("about:")
        || url.contains("chrome.google.com/webstore")
        || url.ends_with(".pdf")
}
