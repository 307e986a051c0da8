use std::fmt;

use crate::discover::field_model::{FieldKind, FillableField};
use crate::discover::labels::radio_option_label;
use crate::dom::page_model::{NodeId, PageDocument, SyntheticEvent};

/// Spoken values that flip a checkbox on; anything else unchecks it.
const CHECKBOX_AFFIRMATIVES: [&str; 5] = ["yes", "check", "true", "on", "enable"];

/// Soft failures: the field stays selected for a retry and the cursor does
/// not advance.
#[derive(Debug)]
pub enum FillError {
    /// The element disappeared or became disabled since discovery.
    TargetGone { label: String },

    /// No select option matched the spoken value.
    NoMatchingOption { label: String, value: String },

    /// No radio in the group matched the spoken value.
    NoMatchingRadio { label: String, value: String },

    /// Radio control without a group name cannot be resolved.
    MissingGroupName { label: String },
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillError::TargetGone { label } => {
                write!(f, "Field '{}' is no longer present on the page", label)
            }
            FillError::NoMatchingOption { label, value } => {
                write!(f, "No option of '{}' matches '{}'", label, value)
            }
            FillError::NoMatchingRadio { label, value } => {
                write!(f, "No choice of '{}' matches '{}'", label, value)
            }
            FillError::MissingGroupName { label } => {
                write!(f, "Radio field '{}' has no group name", label)
            }
        }
    }
}

impl std::error::Error for FillError {}

/// Write a spoken value into a discovered field, dispatching on its kind.
/// Returns the spoken confirmation on success. Keyboard focus is cleared
/// best-effort after every attempt, success or not.
pub fn fill_field(
    root: &mut PageDocument,
    field: &FillableField,
    value: &str,
) -> Result<String, FillError> {
    let Some(doc) = root.document_mut(&field.node.doc) else {
        return Err(FillError::TargetGone {
            label: field.label.clone(),
        });
    };
    let id = field.node.node;

    let usable = doc
        .node(id)
        .map(|n| n.connected && !n.disabled)
        .unwrap_or(false);
    if !usable {
        return Err(FillError::TargetGone {
            label: field.label.clone(),
        });
    }

    doc.focus(id);
    let outcome = apply(doc, field, id, value);
    doc.blur();
    outcome
}

fn apply(
    doc: &mut PageDocument,
    field: &FillableField,
    id: NodeId,
    value: &str,
) -> Result<String, FillError> {
    match field.kind {
        FieldKind::Select => fill_select(doc, field, id, value),
        FieldKind::Checkbox => fill_checkbox(doc, field, id, value),
        FieldKind::Radio => fill_radio(doc, field, id, value),
        FieldKind::PickerButton => {
            doc.fire(id, SyntheticEvent::Click);
            Ok(format!(
                "Opened {}. Use the page's own picker, or say another field.",
                field.label
            ))
        }
        FieldKind::Date | FieldKind::Time | FieldKind::Datetime => {
            commit_value(doc, id, value);
            Ok(format!("Set {} to {}.", field.label, value))
        }
        FieldKind::Contenteditable => {
            doc.set_text(id, value);
            doc.fire(id, SyntheticEvent::Input);
            doc.fire(id, SyntheticEvent::Change);
            Ok(format!("Entered {} for {}.", value, field.label))
        }
        // Combobox and every text-like kind take the raw transcript.
        _ => {
            commit_value(doc, id, value);
            Ok(format!("Entered {} for {}.", value, field.label))
        }
    }
}

fn commit_value(doc: &mut PageDocument, id: NodeId, value: &str) {
    doc.set_value(id, value);
    doc.fire(id, SyntheticEvent::Input);
    doc.fire(id, SyntheticEvent::Change);
}

/// Case-insensitive exact match against option text first, then the first
/// substring match.
fn fill_select(
    doc: &mut PageDocument,
    field: &FillableField,
    id: NodeId,
    value: &str,
) -> Result<String, FillError> {
    let spoken = value.trim().to_lowercase();

    let options: Vec<(NodeId, String, String)> = doc
        .node(id)
        .map(|n| n.children.clone())
        .unwrap_or_default()
        .into_iter()
        .filter_map(|child| {
            let node = doc.node(child)?;
            if node.tag != "option" {
                return None;
            }
            let text = node
                .text
                .clone()
                .unwrap_or_else(|| doc.subtree_text(child))
                .trim()
                .to_string();
            Some((child, text, node.value.clone()))
        })
        .collect();

    let exact = options
        .iter()
        .find(|(_, text, _)| text.to_lowercase() == spoken);
    let chosen = exact.or_else(|| {
        options
            .iter()
            .find(|(_, text, _)| text.to_lowercase().contains(&spoken))
    });

    let Some((_, text, option_value)) = chosen else {
        return Err(FillError::NoMatchingOption {
            label: field.label.clone(),
            value: value.to_string(),
        });
    };

    let committed = if option_value.is_empty() {
        text.clone()
    } else {
        option_value.clone()
    };
    commit_value(doc, id, &committed);
    Ok(format!("Set {} to {}.", field.label, value))
}

fn fill_checkbox(
    doc: &mut PageDocument,
    field: &FillableField,
    id: NodeId,
    value: &str,
) -> Result<String, FillError> {
    let spoken = value.trim().to_lowercase();
    let on = CHECKBOX_AFFIRMATIVES.contains(&spoken.as_str());

    doc.set_checked(id, on);
    doc.fire(id, SyntheticEvent::Input);
    doc.fire(id, SyntheticEvent::Change);

    let verb = if on { "Checked" } else { "Unchecked" };
    Ok(format!("{} {}.", verb, field.label))
}

/// Scan sibling radios sharing the group name; the first whose combined
/// value and label contains the spoken text wins.
fn fill_radio(
    doc: &mut PageDocument,
    field: &FillableField,
    id: NodeId,
    value: &str,
) -> Result<String, FillError> {
    let group = doc
        .node(id)
        .and_then(|n| n.name.clone())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| FillError::MissingGroupName {
            label: field.label.clone(),
        })?;

    let spoken = value.trim().to_lowercase();

    let radios: Vec<NodeId> = doc
        .all_nodes()
        .filter(|&n| {
            doc.node(n)
                .map(|node| {
                    node.tag == "input"
                        && node.input_type.as_deref() == Some("radio")
                        && node.name.as_deref() == Some(group.as_str())
                })
                .unwrap_or(false)
        })
        .collect();

    for candidate in &radios {
        let radio_value = doc
            .node(*candidate)
            .map(|n| n.value.clone())
            .unwrap_or_default();
        let label = radio_option_label(doc, *candidate);
        let haystack = format!("{} {}", radio_value, label).to_lowercase();
        if !haystack.contains(&spoken) {
            continue;
        }

        for other in &radios {
            doc.set_checked(*other, false);
        }
        doc.set_checked(*candidate, true);
        doc.fire(*candidate, SyntheticEvent::Input);
        doc.fire(*candidate, SyntheticEvent::Change);

        let chosen = if label.is_empty() { radio_value } else { label };
        return Ok(format!("Selected {} for {}.", chosen, field.label));
    }

    Err(FillError::NoMatchingRadio {
        label: field.label.clone(),
        value: value.to_string(),
    })
}
