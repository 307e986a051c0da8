use std::cell::RefCell;
use std::rc::Rc;

use voice_assist::speech::input::{SpeechError, SpeechInput};
use voice_assist::speech::output::{Speaker, SpeechSynth, VoiceSettings};

/// Shared view onto everything a scripted synth was asked to do.
#[derive(Clone, Default)]
pub struct SynthLog {
    entries: Rc<RefCell<Vec<String>>>,
}

pub const CANCEL_MARK: &str = "<cancel>";

impl SynthLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything, cancel markers included, in call order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Only spoken texts, in call order.
    pub fn spoken(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.as_str() != CANCEL_MARK)
            .cloned()
            .collect()
    }

    pub fn push(&self, entry: String) {
        self.entries.borrow_mut().push(entry);
    }
}

/// Deterministic synthesis fake: records calls, never completes on its own.
/// Tests drive completion through `Speaker::utterance_finished`.
pub struct ScriptedSynth {
    log: SynthLog,
}

impl ScriptedSynth {
    pub fn new(log: &SynthLog) -> Self {
        Self { log: log.clone() }
    }
}

impl SpeechSynth for ScriptedSynth {
    fn speak(&mut self, text: &str, _settings: &VoiceSettings) {
        self.log.push(text.to_string());
    }

    fn cancel(&mut self) {
        self.log.push(CANCEL_MARK.to_string());
    }
}

/// Recognition fake that always arms successfully.
pub struct NoopInput;

impl SpeechInput for NoopInput {
    fn start(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

/// Recognition fake for environments without an engine.
pub struct UnavailableInput;

impl SpeechInput for UnavailableInput {
    fn start(&mut self) -> Result<(), SpeechError> {
        Err(SpeechError::EngineUnavailable("no engine".to_string()))
    }

    fn stop(&mut self) {}
}

pub fn scripted_speaker() -> (Speaker, SynthLog) {
    let log = SynthLog::new();
    let speaker = Speaker::new(Box::new(ScriptedSynth::new(&log)));
    (speaker, log)
}

/// Report completions until the queue drains, as a host synth would.
pub fn drain(speaker: &mut Speaker) {
    while speaker.is_busy() {
        speaker.utterance_finished();
    }
}
