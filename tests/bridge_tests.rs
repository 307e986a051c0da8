use voice_assist::bridge::messages::{AssistantRequest, AssistantResponse};
use voice_assist::bridge::router::{BufferedStatus, handle_request};
use voice_assist::context::page_context::collect_page_context;
use voice_assist::session::assistant::Assistant;
use voice_assist::speech::output::Speaker;
use voice_assist::summarize::client::{MemorySecrets, MockCompletion};
use voice_assist::summarize::request::{SummarizePayload, SummaryMode};
use voice_assist::summarize::summarizer::Summarizer;

use crate::common::pages::{SECRET_NAME, contact_page};
use crate::common::speech::{NoopInput, ScriptedSynth, SynthLog};

mod common;

fn bridge_assistant(completion: MockCompletion, with_credential: bool) -> (Assistant, BufferedStatus) {
    let log = SynthLog::new();
    let speaker = Speaker::new(Box::new(ScriptedSynth::new(&log)));
    let secrets = if with_credential {
        MemorySecrets::new().with(SECRET_NAME, "k")
    } else {
        MemorySecrets::new()
    };
    let summarizer = Summarizer::new(Box::new(completion), Box::new(secrets), SECRET_NAME);

    let status = BufferedStatus::new();
    let assistant = Assistant::new(speaker, Box::new(NoopInput), summarizer)
        .with_status_sink(Box::new(status.clone()));
    (assistant, status)
}

#[test]
fn ping_answers_unconditionally() {
    let (mut assistant, _) = bridge_assistant(MockCompletion::ok("S"), true);
    let mut doc = contact_page();

    let response = handle_request(&mut assistant, &mut doc, true, AssistantRequest::Ping);
    assert!(matches!(response, AssistantResponse::Pong { pong: true }));

    // Still answered while inactive and outside the primary context.
    let response = handle_request(&mut assistant, &mut doc, false, AssistantRequest::Ping);
    assert!(matches!(response, AssistantResponse::Pong { pong: true }));
}

#[test]
fn start_refused_outside_primary_context() {
    let (mut assistant, _) = bridge_assistant(MockCompletion::ok("S"), true);
    let mut doc = contact_page();

    let response = handle_request(
        &mut assistant,
        &mut doc,
        false,
        AssistantRequest::StartAssistant,
    );
    match response {
        AssistantResponse::Started { success, reason } => {
            assert!(!success);
            assert!(reason.unwrap().contains("primary"));
        }
        other => panic!("Expected Started, got {:?}", other),
    }
    assert!(!assistant.is_active());
}

#[test]
fn start_and_stop_drive_the_session() {
    let (mut assistant, status) = bridge_assistant(MockCompletion::ok("S"), true);
    let mut doc = contact_page();

    let response = handle_request(
        &mut assistant,
        &mut doc,
        true,
        AssistantRequest::StartAssistant,
    );
    assert!(matches!(
        response,
        AssistantResponse::Started { success: true, .. }
    ));
    assert!(assistant.is_active());
    assert!(!assistant.fields.is_empty());

    // A second start while active is idempotent.
    let response = handle_request(
        &mut assistant,
        &mut doc,
        true,
        AssistantRequest::StartAssistant,
    );
    assert!(matches!(
        response,
        AssistantResponse::Started { success: true, .. }
    ));

    let response = handle_request(
        &mut assistant,
        &mut doc,
        true,
        AssistantRequest::StopAssistant,
    );
    assert!(matches!(response, AssistantResponse::Stopped { success: true }));
    assert!(!assistant.is_active());
    assert_eq!(assistant.speaker.pending(), 0);

    let texts = status.texts();
    assert!(texts.iter().any(|t| t.contains("Analyzing page")));
    assert!(texts.iter().any(|t| t == "Assistant stopped"));
}

#[test]
fn summarize_page_returns_ok_or_error_payload() {
    let (mut assistant, _) = bridge_assistant(MockCompletion::ok("A tidy summary."), true);
    let mut doc = contact_page();
    let payload = SummarizePayload::from_context(&collect_page_context(&doc));

    let response = handle_request(
        &mut assistant,
        &mut doc,
        true,
        AssistantRequest::SummarizePage {
            payload: payload.clone(),
            mode: SummaryMode::Overview,
        },
    );
    match response {
        AssistantResponse::Summary { ok, summary, error } => {
            assert!(ok);
            assert_eq!(summary.as_deref(), Some("A tidy summary."));
            assert!(error.is_none());
        }
        other => panic!("Expected Summary, got {:?}", other),
    }

    // Missing credential surfaces as ok:false with an error string.
    let (mut assistant, _) = bridge_assistant(MockCompletion::ok("never"), false);
    let response = handle_request(
        &mut assistant,
        &mut doc,
        true,
        AssistantRequest::SummarizePage {
            payload,
            mode: SummaryMode::Overview,
        },
    );
    match response {
        AssistantResponse::Summary { ok, summary, error } => {
            assert!(!ok);
            assert!(summary.is_none());
            assert!(error.unwrap().contains("credential"));
        }
        other => panic!("Expected Summary, got {:?}", other),
    }
}

#[test]
fn request_wire_format_is_type_tagged() {
    let parsed: AssistantRequest = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
    assert!(matches!(parsed, AssistantRequest::Ping));

    let parsed: AssistantRequest = serde_json::from_str(r#"{"type":"startAssistant"}"#).unwrap();
    assert!(matches!(parsed, AssistantRequest::StartAssistant));

    let response = AssistantResponse::Pong { pong: true };
    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains(r#""pong":true"#));
}
