use voice_assist::dom::page_model::{DomNode, PageDocument};
use voice_assist::session::assistant::Assistant;
use voice_assist::speech::output::Speaker;
use voice_assist::summarize::client::{MemorySecrets, MockCompletion};
use voice_assist::summarize::summarizer::Summarizer;

use crate::common::speech::{NoopInput, ScriptedSynth, SynthLog};

pub const SECRET_NAME: &str = "OPENAI_API_KEY";

/// A contact form with the usual suspects. Discovery order:
/// 0 Full Name (text, required), 1 Email (text w/ placeholder),
/// 2 Subscribe (checkbox), 3+4 Small/Large (radio group "size"),
/// 5 Country (select), 6 Message (textarea).
/// Also carries one hidden and one disabled input that must never surface.
pub fn contact_page() -> PageDocument {
    let mut doc = PageDocument::new("https://forms.example/contact", "Contact Us");
    let root = doc.root();

    doc.append(root, DomNode::new("h1").with_text("Contact Us"));

    let form = doc.append(root, DomNode::new("form").with_name("contact"));

    doc.append(
        form,
        DomNode::new("label").with_for("full-name").with_text("Full Name"),
    );
    doc.append(
        form,
        DomNode::new("input")
            .with_type("text")
            .with_id("full-name")
            .with_name("full_name")
            .required_field(),
    );

    doc.append(
        form,
        DomNode::new("input")
            .with_type("email")
            .with_placeholder("Email address")
            .with_name("email"),
    );

    doc.append(
        form,
        DomNode::new("input")
            .with_type("text")
            .with_name("tracking")
            .display_none(),
    );
    doc.append(
        form,
        DomNode::new("input")
            .with_type("text")
            .with_name("legacy")
            .disabled_field(),
    );

    doc.append(
        form,
        DomNode::new("input")
            .with_type("checkbox")
            .with_aria_label("Subscribe to newsletter")
            .with_name("subscribe"),
    );

    let sizes = doc.append(form, DomNode::new("fieldset"));
    doc.append(sizes, DomNode::new("legend").with_text("Shirt size"));
    doc.append(
        sizes,
        DomNode::new("input")
            .with_type("radio")
            .with_name("size")
            .with_id("size-small")
            .with_value("s"),
    );
    doc.append(
        sizes,
        DomNode::new("label").with_for("size-small").with_text("Small"),
    );
    doc.append(
        sizes,
        DomNode::new("input")
            .with_type("radio")
            .with_name("size")
            .with_id("size-large")
            .with_value("l"),
    );
    doc.append(
        sizes,
        DomNode::new("label").with_for("size-large").with_text("Large"),
    );

    let country_wrap = doc.append(form, DomNode::new("div").with_class("field"));
    doc.append(country_wrap, DomNode::new("label").with_text("Country"));
    let select = doc.append(country_wrap, DomNode::new("select").with_name("country"));
    doc.append(select, DomNode::new("option").with_text("Canada").with_value("ca"));
    doc.append(select, DomNode::new("option").with_text("Germany").with_value("de"));
    doc.append(
        select,
        DomNode::new("option").with_text("New Zealand").with_value("nz"),
    );

    let message_wrap = doc.append(form, DomNode::new("div").with_class("form-group"));
    doc.append(message_wrap, DomNode::new("label").with_text("Message"));
    doc.append(message_wrap, DomNode::new("textarea").with_name("message"));

    doc
}

/// Page exercising the traversal surface: shadow content, one same-origin
/// iframe, one cross-origin iframe, and a custom picker button.
pub fn layered_page() -> PageDocument {
    let mut doc = PageDocument::new("https://app.example/booking", "Book a Room");
    let root = doc.root();

    doc.append(
        root,
        DomNode::new("input")
            .with_type("text")
            .with_aria_label("Guest name"),
    );

    doc.append(
        root,
        DomNode::new("button")
            .with_text("Choose dates")
            .with_aria_label("Choose dates")
            .with_haspopup("dialog")
            .with_controls("date-popup"),
    );

    let host = doc.append(root, DomNode::new("div").with_id("widget-host"));
    let shadow = doc.attach_shadow(host);
    doc.append(
        shadow,
        DomNode::new("input")
            .with_type("search")
            .with_aria_label("Search rooms"),
    );

    let mut inner = PageDocument::new("https://app.example/payments", "Payment");
    let inner_root = inner.root();
    inner.append(
        inner_root,
        DomNode::new("input")
            .with_type("text")
            .with_aria_label("Card number"),
    );
    doc.append_frame(root, Some(inner));

    doc.append_frame(root, None); // cross-origin, must be skipped

    doc
}

/// Assistant wired with scripted speech and a mock completion backend.
/// Returns the synth log and the shared remote-call counter.
pub fn test_assistant(
    completion: MockCompletion,
    with_credential: bool,
) -> (Assistant, SynthLog, std::rc::Rc<std::cell::Cell<usize>>) {
    let log = SynthLog::new();
    let speaker = Speaker::new(Box::new(ScriptedSynth::new(&log)));

    let secrets = if with_credential {
        MemorySecrets::new().with(SECRET_NAME, "test-key")
    } else {
        MemorySecrets::new()
    };

    let calls = completion.calls.clone();
    let summarizer = Summarizer::new(Box::new(completion), Box::new(secrets), SECRET_NAME);
    let assistant = Assistant::new(speaker, Box::new(NoopInput), summarizer);

    (assistant, log, calls)
}
