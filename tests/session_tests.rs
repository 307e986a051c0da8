use voice_assist::dom::page_model::{DomNode, PageDocument, SyntheticEvent};
use voice_assist::session::session_model::SessionStatus;
use voice_assist::summarize::client::MockCompletion;

use crate::common::pages::{contact_page, test_assistant};
use crate::common::speech::drain;

mod common;

// Field order in contact_page:
// 0 Full Name, 1 Email address, 2 Subscribe to newsletter,
// 3 Small, 4 Large, 5 Country, 6 Message

#[test]
fn start_discovers_fields_and_greets() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let doc = contact_page();

    assistant.start(&doc);

    assert!(assistant.is_active());
    assert_eq!(assistant.fields.len(), 7);
    assert!(
        log.spoken()[0].contains("Welcome"),
        "Greeting must be the first utterance"
    );
}

#[test]
fn field_number_selects_zero_based_and_announces() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "field 3");
    drain(&mut assistant.speaker);

    assert_eq!(assistant.selection(), &[2], "field 3 is zero-based index 2");
    assert_eq!(assistant.cursor(), 0);
    assert_eq!(assistant.status, SessionStatus::AwaitingFieldValue);

    let last = log.spoken().last().cloned().unwrap();
    assert!(
        last.contains("Subscribe to newsletter"),
        "Selection announces the field label, got: {}",
        last
    );
    assert!(last.contains("optional"));
}

#[test]
fn out_of_range_field_number_leaves_selection_empty() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "field 9");
    drain(&mut assistant.speaker);

    assert!(assistant.selection().is_empty());
    assert_eq!(assistant.status, SessionStatus::Listening);
    let last = log.spoken().last().cloned().unwrap();
    assert!(last.contains("out of range"), "got: {}", last);
}

#[test]
fn label_word_selects_matching_field() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "email please");
    drain(&mut assistant.speaker);

    assert_eq!(assistant.selection(), &[1]);
    assert!(log.spoken().last().unwrap().contains("Email address"));
}

#[test]
fn repeat_skip_back_cursor_semantics() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "field 1");
    drain(&mut assistant.speaker);
    let announcements_before = count_selected(&log.spoken());

    // repeat re-announces without advancing
    assistant.handle_transcript(&mut doc, "repeat");
    drain(&mut assistant.speaker);
    assert_eq!(assistant.cursor(), 0);
    assert_eq!(count_selected(&log.spoken()), announcements_before + 1);

    // back at cursor 0 stays at 0
    assistant.handle_transcript(&mut doc, "back");
    drain(&mut assistant.speaker);
    assert_eq!(assistant.cursor(), 0);

    // skip past the only selected item completes the selection
    assistant.handle_transcript(&mut doc, "skip");
    drain(&mut assistant.speaker);
    assert!(assistant.selection().is_empty());
    assert_eq!(assistant.status, SessionStatus::Listening);
    assert!(
        log.spoken().iter().any(|s| s.contains("All selected fields")),
        "Completion must be announced"
    );
}

#[test]
fn cancel_clears_selection_and_returns_to_listening() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "field 2");
    drain(&mut assistant.speaker);
    assistant.handle_transcript(&mut doc, "cancel");
    drain(&mut assistant.speaker);

    assert!(assistant.selection().is_empty());
    assert_eq!(assistant.status, SessionStatus::Listening);
    assert!(log.spoken().last().unwrap().contains("Canceled filling"));
}

#[test]
fn spoken_value_fills_text_field_and_fires_events() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    let handle = assistant.fields[0].node.clone();

    assistant.handle_transcript(&mut doc, "field 1");
    drain(&mut assistant.speaker);
    assistant.handle_transcript(&mut doc, "Jane Doe");
    drain(&mut assistant.speaker);

    assert_eq!(doc.resolve(&handle).unwrap().value, "Jane Doe");
    let fired: Vec<_> = doc
        .events
        .iter()
        .filter(|e| e.node == handle.node)
        .map(|e| e.event)
        .collect();
    assert_eq!(fired, vec![SyntheticEvent::Input, SyntheticEvent::Change]);
    assert_eq!(doc.focused, None, "Focus is cleared after the attempt");

    assert!(log.spoken().iter().any(|s| s.contains("Entered Jane Doe")));
    assert!(
        assistant.selection().is_empty(),
        "Completing the only selected field clears the selection"
    );
}

#[test]
fn checkbox_only_affirmative_vocabulary_checks() {
    let (mut assistant, _log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    let checkbox = assistant.fields[2].node.clone();

    assistant.handle_transcript(&mut doc, "field 3");
    assistant.handle_transcript(&mut doc, "enable");
    assert!(doc.resolve(&checkbox).unwrap().checked, "'enable' checks");

    assistant.handle_transcript(&mut doc, "field 3");
    assistant.handle_transcript(&mut doc, "off");
    assert!(
        !doc.resolve(&checkbox).unwrap().checked,
        "Unrecognized text falls outside the affirmative vocabulary and unchecks"
    );
}

#[test]
fn select_matches_exact_then_substring() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    let select = assistant.fields[5].node.clone();

    assistant.handle_transcript(&mut doc, "field 6");
    assistant.handle_transcript(&mut doc, "germany");
    assert_eq!(doc.resolve(&select).unwrap().value, "de");
    drain(&mut assistant.speaker);
    assert!(log.spoken().iter().any(|s| s.contains("Set Country to germany")));

    assistant.handle_transcript(&mut doc, "field 6");
    assistant.handle_transcript(&mut doc, "zeal");
    assert_eq!(
        doc.resolve(&select).unwrap().value,
        "nz",
        "Substring match picks New Zealand"
    );
}

#[test]
fn radio_group_scan_selects_by_label() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    let small = assistant.fields[3].node.clone();
    let large = assistant.fields[4].node.clone();

    // The selected field is the Small radio, but the spoken value matches
    // the Large sibling in the same group.
    assistant.handle_transcript(&mut doc, "field 4");
    assistant.handle_transcript(&mut doc, "large");
    drain(&mut assistant.speaker);

    assert!(doc.resolve(&large).unwrap().checked);
    assert!(!doc.resolve(&small).unwrap().checked);
    assert!(log.spoken().iter().any(|s| s.contains("Selected Large")));
}

#[test]
fn unmatched_fill_keeps_field_selected_for_retry() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    let select = assistant.fields[5].node.clone();

    assistant.handle_transcript(&mut doc, "field 6");
    assistant.handle_transcript(&mut doc, "atlantis");
    drain(&mut assistant.speaker);

    assert_eq!(doc.resolve(&select).unwrap().value, "", "Nothing was committed");
    assert_eq!(assistant.selection(), &[5], "Field stays selected");
    assert_eq!(assistant.cursor(), 0, "Cursor does not advance on failure");
    assert_eq!(assistant.status, SessionStatus::AwaitingFieldValue);
    assert!(
        log.spoken().iter().any(|s| s.contains("could not fill")),
        "Soft failure is announced"
    );
}

#[test]
fn removed_element_is_a_soft_failure() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    let handle = assistant.fields[0].node.clone();
    assistant.handle_transcript(&mut doc, "field 1");
    doc.detach(handle.node);

    assistant.handle_transcript(&mut doc, "Jane");
    drain(&mut assistant.speaker);

    assert_eq!(doc.resolve(&handle).unwrap().value, "");
    assert_eq!(assistant.selection(), &[0]);
    assert!(log.spoken().iter().any(|s| s.contains("could not fill")));
}

#[test]
fn stop_silences_everything_queued() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);

    // Greeting is in flight, more is queued; none of it may play after stop.
    assistant.handle_transcript(&mut doc, "field 1");
    let spoken_before = log.spoken().len();

    assistant.stop();

    assert!(!assistant.is_active());
    assert_eq!(assistant.speaker.pending(), 0);
    assistant.speaker.utterance_finished();
    assert_eq!(
        log.spoken().len(),
        spoken_before,
        "Stop must produce zero further speech"
    );

    // Transcripts after stop are ignored.
    assistant.handle_transcript(&mut doc, "field 2");
    assert_eq!(log.spoken().len(), spoken_before);
    assert!(assistant.fields.is_empty(), "Stop forgets the field list");
}

#[test]
fn yes_runs_fill_flow_with_remote_listing() {
    let (mut assistant, log, calls) = test_assistant(MockCompletion::ok("LLM LIST"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "yes");
    drain(&mut assistant.speaker);

    let spoken = log.spoken();
    assert!(spoken.iter().any(|s| s == "I found 7 fillable items."));
    assert!(spoken.iter().any(|s| s == "LLM LIST"));
    assert!(
        spoken.iter().any(|s| s.contains("repeat, skip, back, or cancel")),
        "Navigation options follow the listing"
    );
    assert_eq!(calls.get(), 1, "One remote call for the fillables listing");
}

#[test]
fn fill_flow_falls_back_to_local_listing_on_pipeline_failure() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::failing(503), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "fill the form");
    drain(&mut assistant.speaker);

    let spoken = log.spoken();
    assert!(spoken.iter().any(|s| s == "I found 7 fillable items."));
    let listing = spoken
        .iter()
        .find(|s| s.starts_with("1. "))
        .expect("Local numbered listing must be spoken instead of an error");
    assert!(
        listing.contains("2. "),
        "Listing enumerates the fields: {}",
        listing
    );
    assert!(
        !spoken.iter().any(|s| s.contains("503")),
        "Raw errors never reach the speech channel"
    );
}

#[test]
fn fresh_discovery_invalidates_active_selection() {
    let (mut assistant, _log, _) = test_assistant(MockCompletion::ok("LLM LIST"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "field 1");
    assert_eq!(assistant.selection(), &[0]);

    // Fill keywords outrank value entry, so this rescans mid-selection.
    assistant.handle_transcript(&mut doc, "fill the form");
    drain(&mut assistant.speaker);

    assert!(
        assistant.selection().is_empty(),
        "A fresh discovery pass drops the stale selection"
    );
    assert_eq!(assistant.status, SessionStatus::Listening);
}

#[test]
fn overview_speaks_summary_or_heuristic_fallback() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("A fine page."), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);
    assistant.handle_transcript(&mut doc, "summary");
    drain(&mut assistant.speaker);
    assert!(log.spoken().iter().any(|s| s == "A fine page."));

    // Pipeline failure swaps in the word-count heuristic.
    let (mut assistant, log, _) = test_assistant(MockCompletion::failing(500), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);
    assistant.handle_transcript(&mut doc, "summary");
    drain(&mut assistant.speaker);
    let fallback = log
        .spoken()
        .iter()
        .find(|s| s.contains("words of content"))
        .cloned()
        .expect("Heuristic overview must be spoken");
    assert!(fallback.contains("Contact Us"));
}

#[test]
fn decline_and_unknown_transcripts_reprompt() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assistant.handle_transcript(&mut doc, "no");
    drain(&mut assistant.speaker);
    assert!(log.spoken().last().unwrap().starts_with("Okay."));

    assistant.handle_transcript(&mut doc, "xyzzy plugh");
    drain(&mut assistant.speaker);
    assert!(log.spoken().last().unwrap().contains("field 1 or a field name"));

    assistant.handle_transcript(&mut doc, "");
    drain(&mut assistant.speaker);
    assert!(log.spoken().last().unwrap().contains("did not catch"));
}

#[test]
fn recognition_restart_loop_respects_activity() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let doc = contact_page();
    assistant.start(&doc);
    drain(&mut assistant.speaker);

    assert!(assistant.recognition_ended(), "Active session re-arms recognition");

    assistant.recognition_error();
    drain(&mut assistant.speaker);
    assert!(log.spoken().last().unwrap().contains("did not catch"));

    assistant.stop();
    assert!(!assistant.recognition_ended(), "Stopped session must not re-arm");
}

#[test]
fn page_without_fillables_says_so() {
    let (mut assistant, log, _) = test_assistant(MockCompletion::ok("SUMMARY"), true);
    let mut doc = PageDocument::new("https://empty.example/", "Empty");
    let root = doc.root();
    doc.append(root, DomNode::new("p").with_text("Just text."));

    assistant.start(&doc);
    drain(&mut assistant.speaker);
    assistant.handle_transcript(&mut doc, "fill the form");
    drain(&mut assistant.speaker);

    assert!(
        log.spoken()
            .iter()
            .any(|s| s.contains("don't see any fillable fields")),
        "Empty discovery is announced, not an error"
    );
}

fn count_selected(spoken: &[String]) -> usize {
    spoken.iter().filter(|s| s.starts_with("Selected ")).count()
}
