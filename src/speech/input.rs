use std::fmt;

/// Delay before re-arming a recognition session after the engine reports
/// `end` while the assistant is still active. The restart loop is
/// deliberate: recognition runs as single-shot sessions.
pub const RECOGNITION_RESTART_DELAY_MS: u64 = 250;

/// Recognition engine capability. One session at a time; `start` arms a
/// single-shot session, `stop` tears it down. Results, errors and session
/// end arrive through the host, which forwards them to the assistant.
pub trait SpeechInput {
    fn start(&mut self) -> Result<(), SpeechError>;
    fn stop(&mut self);
}

#[derive(Debug)]
pub enum SpeechError {
    /// No recognition engine is available in this environment.
    EngineUnavailable(String),

    /// The engine refused to arm a session.
    StartFailed(String),
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechError::EngineUnavailable(msg) => {
                write!(f, "Speech recognition unavailable: {}", msg)
            }
            SpeechError::StartFailed(msg) => {
                write!(f, "Could not start speech recognition: {}", msg)
            }
        }
    }
}

impl std::error::Error for SpeechError {}
