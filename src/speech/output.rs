use std::collections::VecDeque;

/// Per-utterance delivery settings, forwarded to the synthesis engine.
#[derive(Debug, Clone, Copy)]
pub struct VoiceSettings {
    pub rate: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 1.0,
            volume: 0.8,
        }
    }
}

/// Synthesis engine capability. `speak` begins playback and returns; the
/// host reports completion (or failure) back through
/// `Speaker::utterance_finished`.
pub trait SpeechSynth {
    fn speak(&mut self, text: &str, settings: &VoiceSettings);
    fn cancel(&mut self);
}

/// Ordered speech serializer: at most one utterance plays at a time, queued
/// strings play strictly FIFO, and the next item starts only once the host
/// reports the previous one done. Stopping the session discards everything
/// unspoken.
pub struct Speaker {
    synth: Box<dyn SpeechSynth>,
    queue: VecDeque<String>,
    busy: bool,
    pub settings: VoiceSettings,
}

impl Speaker {
    pub fn new(synth: Box<dyn SpeechSynth>) -> Self {
        Self {
            synth,
            queue: VecDeque::new(),
            busy: false,
            settings: VoiceSettings::default(),
        }
    }

    pub fn with_settings(synth: Box<dyn SpeechSynth>, settings: VoiceSettings) -> Self {
        Self {
            synth,
            queue: VecDeque::new(),
            busy: false,
            settings,
        }
    }

    /// Append to the tail of the queue; starts playback when idle.
    /// Empty strings are dropped.
    pub fn enqueue(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.queue.push_back(text.to_string());
        if !self.busy {
            self.dequeue_next();
        }
    }

    /// Immediate-priority announcement: interrupts current playback and
    /// speaks without entering the ordered queue. Queued items resume once
    /// this one completes.
    pub fn interrupt(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.synth.cancel();
        self.busy = true;
        self.synth.speak(text, &self.settings);
    }

    /// Host callback: the in-flight utterance ended or failed; either way
    /// the next queued item starts.
    pub fn utterance_finished(&mut self) {
        self.busy = false;
        self.dequeue_next();
    }

    /// Empty the queue and halt playback immediately.
    pub fn flush_and_stop(&mut self) {
        self.queue.clear();
        self.busy = false;
        self.synth.cancel();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn dequeue_next(&mut self) {
        match self.queue.pop_front() {
            Some(next) => {
                self.busy = true;
                self.synth.speak(&next, &self.settings);
            }
            None => self.busy = false,
        }
    }
}
