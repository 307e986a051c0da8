use std::io::{self, BufRead, Write};

use crate::cli::config::{ApiConfig, AppConfig, is_restricted_url};
use crate::context::page_context::{
    collect_field_hints, collect_page_context, fillable_keyword,
};
use crate::discover::discovery::discover_fields;
use crate::dom::page_model::PageDocument;
use crate::session::assistant::{Assistant, StatusSink};
use crate::speech::input::{SpeechError, SpeechInput};
use crate::speech::output::{Speaker, SpeechSynth, VoiceSettings};
use crate::summarize::client::{EnvSecretStore, HttpChatClient};
use crate::summarize::request::{SummarizePayload, SummaryMode};
use crate::summarize::summarizer::{
    Summarizer, heuristic_overview, local_field_list,
};
use crate::trace::logger::TraceLogger;

// ============================================================================
// Console speech engines
// ============================================================================

/// Synthesis engine that prints utterances; the run loop reports completion
/// back immediately, so queued speech drains in order.
struct ConsoleSynth;

impl SpeechSynth for ConsoleSynth {
    fn speak(&mut self, text: &str, _settings: &VoiceSettings) {
        println!("[speaks] {}", text);
    }

    fn cancel(&mut self) {}
}

/// Recognition engine stand-in: the run loop itself reads transcripts from
/// stdin, so arming a session is a no-op that always succeeds.
struct ConsoleInput;

impl SpeechInput for ConsoleInput {
    fn start(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

struct PrintStatus;

impl StatusSink for PrintStatus {
    fn status(&mut self, text: &str) {
        println!("[status] {}", text);
    }
}

// ============================================================================
// Commands
// ============================================================================

fn load_page(path: &str) -> Result<PageDocument, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(PageDocument::from_json(&json)?)
}

fn build_summarizer(api: &ApiConfig) -> Summarizer {
    let client = HttpChatClient {
        endpoint: api.endpoint.clone(),
        model: api.model.clone(),
        temperature: api.temperature,
        max_tokens: api.max_tokens,
    };
    Summarizer::new(
        Box::new(client),
        Box::new(EnvSecretStore),
        &api.secret_name,
    )
}

pub fn cmd_scan(page_path: &str, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_page(page_path)?;
    let fields = discover_fields(&doc);

    println!("{} — {} fillable field(s)", doc.url, fields.len());
    for (i, field) in fields.iter().enumerate() {
        let requirement = if field.required { "required" } else { "optional" };
        print!("{:>3}. {} ({}, {})", i + 1, field.label, field.kind.as_str(), requirement);
        if verbose > 0 && !field.placeholder.is_empty() {
            print!("  placeholder={:?}", field.placeholder);
        }
        if verbose > 0 && !field.name.is_empty() {
            print!("  name={:?}", field.name);
        }
        println!();
    }
    Ok(())
}

pub fn cmd_summarize(
    page_path: &str,
    mode: &str,
    config: &AppConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_page(page_path)?;
    let ctx = collect_page_context(&doc);

    let (payload, mode) = match mode {
        "fillables" => {
            let fields = discover_fields(&doc);
            let hints = collect_field_hints(&doc, &fields);
            let labels: Vec<String> = fields.iter().map(|f| f.label.clone()).collect();
            (
                SummarizePayload::from_context(&ctx).with_fields(labels, hints),
                SummaryMode::Fillables,
            )
        }
        _ => (SummarizePayload::from_context(&ctx), SummaryMode::Overview),
    };

    let mut summarizer = build_summarizer(&config.api);
    match summarizer.summarize(&payload, mode) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            if verbose > 0 {
                eprintln!("Pipeline failed ({}), using local fallback", e);
            }
            let fallback = match mode {
                SummaryMode::Overview => heuristic_overview(&payload),
                SummaryMode::Fillables => {
                    let fields = discover_fields(&doc);
                    let hints = collect_field_hints(&doc, &fields);
                    let keyword = fillable_keyword(&ctx, &hints);
                    local_field_list(&fields, &keyword)
                }
            };
            println!("{}", fallback);
        }
    }
    Ok(())
}

/// Interactive session: each stdin line is one transcript; `quit` (or EOF)
/// stops the assistant and exits.
pub fn cmd_run(
    page_path: &str,
    trace_path: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = load_page(page_path)?;

    if is_restricted_url(&doc.url) {
        return Err(format!("Refusing to start on restricted page: {}", doc.url).into());
    }

    let settings = VoiceSettings {
        rate: config.speech.rate,
        volume: config.speech.volume,
    };
    let speaker = Speaker::with_settings(Box::new(ConsoleSynth), settings);
    let tracer = match trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let mut assistant = Assistant::new(
        speaker,
        Box::new(ConsoleInput),
        build_summarizer(&config.api),
    )
    .with_status_sink(Box::new(PrintStatus))
    .with_tracer(tracer);

    assistant.start(&doc);
    drain_speech(&mut assistant);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let transcript = line.trim();
        if transcript == "quit" {
            break;
        }

        assistant.handle_transcript(&mut doc, transcript);
        drain_speech(&mut assistant);
        assistant.recognition_ended();
    }

    assistant.stop();
    Ok(())
}

/// The console synth finishes each utterance instantly; report completions
/// until the queue is dry.
fn drain_speech(assistant: &mut Assistant) {
    while assistant.speaker.is_busy() {
        assistant.speaker.utterance_finished();
    }
}
