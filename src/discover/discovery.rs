use crate::discover::field_model::{FieldKind, FieldMeta, FillableField};
use crate::discover::labels::resolve_label;
use crate::dom::page_model::{DomNode, PageDocument};
use crate::dom::traverse::walk_elements;

/// Native input types treated as text-like fillables.
const TEXTUAL_INPUT_TYPES: [(&str, FieldKind); 12] = [
    ("text", FieldKind::Text),
    ("email", FieldKind::Email),
    ("password", FieldKind::Password),
    ("tel", FieldKind::Tel),
    ("url", FieldKind::Url),
    ("search", FieldKind::Search),
    ("number", FieldKind::Number),
    ("date", FieldKind::Date),
    ("time", FieldKind::Time),
    ("datetime-local", FieldKind::Datetime),
    ("month", FieldKind::Month),
    ("week", FieldKind::Week),
];

/// One discovery pass: every eligible fillable control reachable from the
/// root document, in traversal order (root document first, then embedded
/// documents in the order found). Each element is classified once, by the
/// first matching rule, so the element itself is the de-dupe key. Repeating
/// the pass over an unchanged document yields an identical sequence.
pub fn discover_fields(root: &PageDocument) -> Vec<FillableField> {
    let mut fields = Vec::new();

    for handle in walk_elements(root) {
        let Some(doc) = root.document(&handle.doc) else {
            continue;
        };
        if !doc.is_eligible(handle.node) {
            continue;
        }
        let Some(node) = doc.node(handle.node) else {
            continue;
        };

        let Some((kind, role_kind, meta)) = classify(node) else {
            continue;
        };

        fields.push(FillableField {
            label: resolve_label(doc, handle.node),
            required: node.required || node.aria_required,
            placeholder: node.placeholder.clone().unwrap_or_default(),
            name: node
                .name
                .clone()
                .or_else(|| node.id.clone())
                .unwrap_or_default(),
            node: handle,
            kind,
            role_kind: role_kind.map(str::to_string),
            meta,
        });
    }

    fields
}

/// Classify one element; rules are checked native-first, role widgets next,
/// picker buttons last, and the first match wins.
fn classify(node: &DomNode) -> Option<(FieldKind, Option<&'static str>, FieldMeta)> {
    if node.tag == "input" {
        let input_type = node.input_type.as_deref().unwrap_or("text");
        for (name, kind) in TEXTUAL_INPUT_TYPES {
            if input_type.eq_ignore_ascii_case(name) {
                return Some((kind, None, FieldMeta::default()));
            }
        }
        if input_type.eq_ignore_ascii_case("checkbox") {
            return Some((FieldKind::Checkbox, None, FieldMeta::default()));
        }
        if input_type.eq_ignore_ascii_case("radio") {
            return Some((FieldKind::Radio, None, FieldMeta::default()));
        }
        // Unsupported native types (submit, hidden, file...) fall through to
        // the widget and picker rules.
    }

    if node.tag == "textarea" {
        return Some((FieldKind::Textarea, None, FieldMeta::default()));
    }
    if node.tag == "select" {
        return Some((FieldKind::Select, None, FieldMeta::default()));
    }
    if node.contenteditable {
        return Some((FieldKind::Contenteditable, None, FieldMeta::default()));
    }

    match node.role.as_deref() {
        Some("textbox") => return Some((FieldKind::Text, Some("textbox"), FieldMeta::default())),
        Some("combobox") => {
            return Some((FieldKind::Combobox, Some("combobox"), FieldMeta::default()));
        }
        Some("spinbutton") => {
            return Some((FieldKind::Spinbutton, Some("spinbutton"), FieldMeta::default()));
        }
        Some("slider") => return Some((FieldKind::Slider, Some("slider"), FieldMeta::default())),
        Some("searchbox") => {
            return Some((FieldKind::Text, Some("searchbox"), FieldMeta::default()));
        }
        Some("listbox") if node.aria_labelledby.is_some() => {
            return Some((FieldKind::PickerButton, Some("listbox"), FieldMeta::default()));
        }
        _ => {}
    }

    if let Some(meta) = picker_button_meta(node) {
        return Some((FieldKind::PickerButton, Some("button"), meta));
    }

    None
}

/// A control counts as a picker button when it is button-like (real button,
/// role="button", or otherwise focusable) and exposes a popup, expanded, or
/// controls relationship. This catches custom date and autocomplete pickers
/// that are not native form controls.
fn picker_button_meta(node: &DomNode) -> Option<FieldMeta> {
    let buttony = node.tag == "button"
        || node.role.as_deref() == Some("button")
        || node.tabindex.is_some();
    if !buttony {
        return None;
    }

    let has_popup = node.aria_haspopup.is_some();
    let expanded = node.aria_expanded.is_some();
    let controls = node.aria_controls.clone();
    if !has_popup && !expanded && controls.is_none() {
        return None;
    }

    Some(FieldMeta {
        has_popup,
        expanded: node.aria_expanded.as_deref() == Some("true"),
        controls,
    })
}
