use crate::context::page_context::{
    collect_field_hints, collect_page_context, fillable_keyword,
};
use crate::discover::discovery::discover_fields;
use crate::discover::field_model::FillableField;
use crate::dom::page_model::PageDocument;
use crate::session::filler::fill_field;
use crate::session::session_model::{
    CANCELED, COMPLETED, DECLINE_ACK, GREETING, HELP, NAV_OPTIONS, NO_CATCH, NO_FIELDS,
    OUT_OF_RANGE, RECOGNITION_UNAVAILABLE, SessionStatus,
};
use crate::session::transcript::{Command, classify_transcript};
use crate::speech::input::SpeechInput;
use crate::speech::output::Speaker;
use crate::summarize::client::SummarizeError;
use crate::summarize::request::{SummarizePayload, SummaryMode};
use crate::summarize::summarizer::{Summarizer, heuristic_overview, local_field_list};
use crate::trace::event::TraceEvent;
use crate::trace::logger::TraceLogger;

/// Fire-and-forget progress notifications to whoever is observing the
/// session; delivery failures are the sink's problem, never the session's.
pub trait StatusSink {
    fn status(&mut self, text: &str);
}

pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn status(&mut self, _text: &str) {}
}

/// One assistant activation: owns the discovered field list, the current
/// selection, and the speech queue; interprets transcripts and writes values
/// back into the host document. All user-facing output goes through the
/// speaker; diagnostics go to the trace log only.
pub struct Assistant {
    pub status: SessionStatus,
    pub fields: Vec<FillableField>,
    selection: Vec<usize>,
    cursor: usize,
    pub speaker: Speaker,
    recognizer: Box<dyn SpeechInput>,
    summarizer: Summarizer,
    status_sink: Box<dyn StatusSink>,
    tracer: TraceLogger,
}

impl Assistant {
    pub fn new(
        speaker: Speaker,
        recognizer: Box<dyn SpeechInput>,
        summarizer: Summarizer,
    ) -> Self {
        Self {
            status: SessionStatus::Inactive,
            fields: Vec::new(),
            selection: Vec::new(),
            cursor: 0,
            speaker,
            recognizer,
            summarizer,
            status_sink: Box::new(NullStatusSink),
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_status_sink(mut self, sink: Box<dyn StatusSink>) -> Self {
        self.status_sink = sink;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status != SessionStatus::Inactive
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    // ---- Lifecycle ----

    /// Activate: discover fields, greet, arm recognition.
    pub fn start(&mut self, doc: &PageDocument) {
        self.status_sink.status("Assistant started. Analyzing page...");
        self.status = SessionStatus::Listening;

        self.status_sink.status("Scanning for interactive elements...");
        self.fields = discover_fields(doc);
        self.clear_selection();

        self.speaker.enqueue(GREETING);

        if let Err(e) = self.recognizer.start() {
            self.tracer
                .log(&TraceEvent::now(&self.status).with_error(e.to_string()));
            self.speaker.enqueue(RECOGNITION_UNAVAILABLE);
        }
    }

    /// Deactivate: halt recognition, drop all pending speech, forget fields
    /// and selection.
    pub fn stop(&mut self) {
        self.status = SessionStatus::Inactive;
        self.recognizer.stop();
        self.speaker.flush_and_stop();
        self.fields.clear();
        self.clear_selection();
        self.status_sink.status("Assistant stopped");
    }

    // ---- Recognition callbacks ----

    /// Engine error: recoverable, re-prompt and keep listening.
    pub fn recognition_error(&mut self) {
        if self.is_active() {
            self.speaker.enqueue(NO_CATCH);
        }
    }

    /// Single-shot session ended. While active this re-arms recognition
    /// (the host applies `RECOGNITION_RESTART_DELAY_MS` before delivering
    /// this); returns whether a new session was armed.
    pub fn recognition_ended(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        if let Err(e) = self.recognizer.start() {
            self.tracer
                .log(&TraceEvent::now(&self.status).with_error(e.to_string()));
            return false;
        }
        true
    }

    // ---- Transcript handling ----

    pub fn handle_transcript(&mut self, doc: &mut PageDocument, raw: &str) {
        if !self.is_active() {
            return;
        }
        if raw.trim().is_empty() {
            self.speaker.enqueue(NO_CATCH);
            return;
        }

        let command = classify_transcript(raw, self.awaiting_value(), &self.fields);
        self.tracer.log(
            &TraceEvent::now(&self.status)
                .with_transcript(raw)
                .with_command(format!("{:?}", command)),
        );

        match command {
            Command::Overview => self.provide_overview(doc),
            Command::FillForm => self.run_fill_flow(doc),
            Command::Decline => self.speaker.enqueue(DECLINE_ACK),
            Command::Repeat => self.read_current_field(),
            Command::Skip => self.advance(),
            Command::Back => {
                self.cursor = self.cursor.saturating_sub(1);
                self.read_current_field();
            }
            Command::Cancel => {
                self.clear_selection();
                self.status = SessionStatus::Listening;
                self.speaker.enqueue(CANCELED);
            }
            Command::Value(value) => self.fill_current(doc, &value),
            Command::SelectIndex(index) | Command::SelectLabeled(index) => {
                self.select_single(index);
            }
            Command::IndexOutOfRange(_) => self.speaker.enqueue(OUT_OF_RANGE),
            Command::Help => self.speaker.enqueue(HELP),
        }
    }

    /// Direct pipeline access for the message boundary.
    pub fn summarize(
        &mut self,
        payload: &SummarizePayload,
        mode: SummaryMode,
    ) -> Result<String, SummarizeError> {
        let result = self.summarizer.summarize(payload, mode);
        if let Err(e) = &result {
            self.tracer
                .log(&TraceEvent::now(&self.status).with_error(e.to_string()));
        }
        result
    }

    // ---- Intents ----

    fn provide_overview(&mut self, doc: &PageDocument) {
        self.status_sink.status("Preparing page overview...");
        let ctx = collect_page_context(doc);
        let payload = SummarizePayload::from_context(&ctx);

        match self.summarizer.summarize(&payload, SummaryMode::Overview) {
            Ok(summary) => self.speaker.enqueue(&summary),
            Err(e) => {
                self.tracer
                    .log(&TraceEvent::now(&self.status).with_error(e.to_string()));
                let fallback = heuristic_overview(&payload);
                self.speaker.enqueue(&fallback);
            }
        }
    }

    /// Fresh discovery pass, announce the count, read the list (remote
    /// rewrite or local fallback), then the navigation options. The new
    /// pass invalidates any in-progress selection.
    fn run_fill_flow(&mut self, doc: &PageDocument) {
        self.clear_selection();
        self.status = SessionStatus::Listening;
        self.fields = discover_fields(doc);

        if self.fields.is_empty() {
            self.speaker.enqueue(NO_FIELDS);
            return;
        }

        let count = self.fields.len();
        let noun = if count == 1 { "item" } else { "items" };
        let announcement = format!("I found {} fillable {}.", count, noun);
        self.speaker.enqueue(&announcement);

        let ctx = collect_page_context(doc);
        let hints = collect_field_hints(doc, &self.fields);
        let labels: Vec<String> = self.fields.iter().map(|f| f.label.clone()).collect();
        let payload = SummarizePayload::from_context(&ctx).with_fields(labels, hints.clone());

        match self.summarizer.summarize(&payload, SummaryMode::Fillables) {
            Ok(summary) => self.speaker.enqueue(&summary),
            Err(e) => {
                self.tracer
                    .log(&TraceEvent::now(&self.status).with_error(e.to_string()));
                let keyword = fillable_keyword(&ctx, &hints);
                let listing = local_field_list(&self.fields, &keyword);
                self.speaker.enqueue(&listing);
            }
        }

        self.speaker.enqueue(NAV_OPTIONS);
    }

    // ---- Selection and filling ----

    fn awaiting_value(&self) -> bool {
        self.status == SessionStatus::AwaitingFieldValue && self.cursor < self.selection.len()
    }

    fn select_single(&mut self, index: usize) {
        if index >= self.fields.len() {
            self.speaker.enqueue(OUT_OF_RANGE);
            return;
        }
        self.selection = vec![index];
        self.cursor = 0;
        self.status = SessionStatus::AwaitingFieldValue;
        self.read_current_field();
    }

    fn read_current_field(&mut self) {
        let Some(&field_index) = self.selection.get(self.cursor) else {
            return;
        };
        let Some(field) = self.fields.get(field_index) else {
            return;
        };

        let requirement = if field.required { "required" } else { "optional" };
        let announcement = format!(
            "Selected {}. This is a {} field, {}. What should I enter? \
You can say repeat, skip, back, or cancel.",
            field.label,
            field.kind.as_str(),
            requirement
        );
        self.speaker.enqueue(&announcement);
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor < self.selection.len() {
            self.read_current_field();
        } else {
            self.speaker.enqueue(COMPLETED);
            self.clear_selection();
            self.status = SessionStatus::Listening;
        }
    }

    fn fill_current(&mut self, doc: &mut PageDocument, value: &str) {
        let Some(&field_index) = self.selection.get(self.cursor) else {
            return;
        };
        let Some(field) = self.fields.get(field_index).cloned() else {
            return;
        };

        match fill_field(doc, &field, value) {
            Ok(confirmation) => {
                self.speaker.enqueue(&confirmation);
                self.advance();
            }
            Err(e) => {
                self.tracer.log(
                    &TraceEvent::now(&self.status)
                        .with_outcome("fill_failed")
                        .with_error(e.to_string()),
                );
                let apology = format!(
                    "I could not fill {}. You can try rephrasing or choose another field.",
                    field.label
                );
                self.speaker.enqueue(&apology);
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
        self.cursor = 0;
    }
}
