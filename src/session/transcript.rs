use crate::discover::field_model::FillableField;

/// What one transcript asks the session to do. Produced by
/// `classify_transcript`, consumed by the assistant; pure data so the
/// classifier can be tested without a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Page overview via the summarization pipeline.
    Overview,
    /// Discover fields and walk into the fill flow.
    FillForm,
    /// Bare "no": acknowledge and keep listening.
    Decline,
    Repeat,
    Skip,
    Back,
    Cancel,
    /// Raw value for the currently selected field, original casing kept.
    Value(String),
    /// "field N" with N in range, zero-based.
    SelectIndex(usize),
    /// "field N" with N outside the current field list.
    IndexOutOfRange(usize),
    /// Transcript matched a field's leading label word; zero-based index.
    SelectLabeled(usize),
    Help,
}

/// Classify a transcript against the session state. Priority order:
/// overview keywords, fill keywords or a bare affirmative, a bare negative,
/// entry-control words or a raw value while awaiting one, an explicit
/// "field N", a field-name match, then generic help.
pub fn classify_transcript(
    raw: &str,
    awaiting_value: bool,
    fields: &[FillableField],
) -> Command {
    let t = raw.trim().to_lowercase();

    if t.contains("summary") || t.contains("overview") || t.contains("describe page") {
        return Command::Overview;
    }

    if t.contains("fill") || t.contains("blank") || t.contains("form") || t.contains("complete")
    {
        return Command::FillForm;
    }
    if t == "yes" || t.starts_with("yes ") {
        return Command::FillForm;
    }
    if t == "no" || t.starts_with("no ") {
        return Command::Decline;
    }

    if awaiting_value {
        return match t.as_str() {
            "repeat" => Command::Repeat,
            "skip" => Command::Skip,
            "back" => Command::Back,
            "cancel" => Command::Cancel,
            _ => Command::Value(raw.trim().to_string()),
        };
    }

    if let Some(spoken) = parse_field_index(&t) {
        if spoken >= 1 && spoken <= fields.len() {
            return Command::SelectIndex(spoken - 1);
        }
        return Command::IndexOutOfRange(spoken);
    }

    if let Some(index) = match_field_by_label(&t, fields) {
        return Command::SelectLabeled(index);
    }

    Command::Help
}

/// Find a "field N" pattern: the word "field", optional spaces, digits, with
/// word boundaries on both sides. Returns the spoken (one-based) number.
fn parse_field_index(t: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(pos) = t[search_from..].find("field") {
        let at = search_from + pos;
        search_from = at + "field".len();

        let boundary_before =
            at == 0 || !t.as_bytes()[at - 1].is_ascii_alphanumeric();
        if !boundary_before {
            continue;
        }

        let rest = t[at + "field".len()..].trim_start_matches(' ');
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }
        let after = rest[digits.len()..].chars().next();
        if after.map(|c| c.is_ascii_alphanumeric()).unwrap_or(false) {
            continue;
        }
        if let Ok(n) = digits.parse() {
            return Some(n);
        }
    }
    None
}

/// First field whose label's leading word occurs in the transcript.
fn match_field_by_label(t: &str, fields: &[FillableField]) -> Option<usize> {
    fields.iter().position(|field| {
        field
            .label
            .to_lowercase()
            .split_whitespace()
            .next()
            .map(|word| t.contains(word))
            .unwrap_or(false)
    })
}
