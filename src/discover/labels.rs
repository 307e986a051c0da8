use crate::dom::page_model::{DomNode, NodeId, PageDocument};

pub const UNLABELED: &str = "Unlabeled";

/// Containers whose class marks them as a field wrapper for label lookup.
const WRAPPER_CLASSES: [&str; 4] = ["field", "form-group", "input", "form-item"];

/// Resolve the best human-readable name for an element, strict priority
/// order, first non-empty wins:
/// associated label[for] > aria-labelledby > aria-label > placeholder >
/// enclosing fieldset legend > labeled sibling in a recognized wrapper >
/// humanized name attribute > "Unlabeled".
pub fn resolve_label(doc: &PageDocument, id: NodeId) -> String {
    let Some(node) = doc.node(id) else {
        return UNLABELED.to_string();
    };

    if let Some(text) = associated_label_text(doc, node) {
        return text;
    }
    if let Some(text) = labelledby_text(doc, node) {
        return text;
    }
    if let Some(aria) = non_empty(node.aria_label.as_deref()) {
        return aria;
    }
    if let Some(placeholder) = non_empty(node.placeholder.as_deref()) {
        return placeholder;
    }
    if let Some(text) = enclosing_legend_text(doc, id) {
        return text;
    }
    if let Some(text) = wrapper_label_text(doc, id) {
        return text;
    }
    if let Some(name) = node.name.as_deref() {
        let humanized = humanize_name(name);
        if !humanized.is_empty() {
            return humanized;
        }
    }
    UNLABELED.to_string()
}

/// Replace attribute-name separators with spaces: "billing_zip-code" reads
/// as "billing zip code".
pub fn humanize_name(name: &str) -> String {
    name.replace(['-', '_'], " ").trim().to_string()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn associated_label_text(doc: &PageDocument, node: &DomNode) -> Option<String> {
    let dom_id = node.id.as_deref()?;
    let label = doc.all_nodes().find(|&n| {
        doc.node(n)
            .map(|l| l.tag == "label" && l.for_id.as_deref() == Some(dom_id))
            .unwrap_or(false)
    })?;
    non_empty(Some(&doc.subtree_text(label)))
}

fn labelledby_text(doc: &PageDocument, node: &DomNode) -> Option<String> {
    let ids = node.aria_labelledby.as_deref()?;
    let text = ids
        .split_whitespace()
        .filter_map(|id| doc.element_by_id(id))
        .map(|n| doc.subtree_text(n))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    non_empty(Some(&text))
}

fn enclosing_legend_text(doc: &PageDocument, id: NodeId) -> Option<String> {
    let fieldset = doc.closest(id, |n| n.tag == "fieldset")?;
    let legend = doc.find_descendant(fieldset, |n| n.tag == "legend")?;
    non_empty(Some(&doc.subtree_text(legend)))
}

fn is_wrapper(node: &DomNode) -> bool {
    node.role.as_deref() == Some("group")
        || WRAPPER_CLASSES.iter().any(|c| node.has_class(c))
}

fn wrapper_label_text(doc: &PageDocument, id: NodeId) -> Option<String> {
    let container = doc
        .ancestors(id)
        .into_iter()
        .find(|&a| doc.node(a).map(is_wrapper).unwrap_or(false))
        .or_else(|| doc.node(id).and_then(|n| n.parent));

    let container = container?;
    let candidate = doc.find_descendant(container, |n| {
        n.tag == "label" || n.aria_label.is_some()
    })?;
    let node = doc.node(candidate)?;
    non_empty(node.aria_label.as_deref())
        .or_else(|| non_empty(Some(&doc.subtree_text(candidate))))
}

// ============================================================================
// Radio option labels
// ============================================================================

/// Label for one radio option, used when matching a spoken value against a
/// group: label[for] > aria-labelledby > enclosing option container text.
pub fn radio_option_label(doc: &PageDocument, id: NodeId) -> String {
    let Some(node) = doc.node(id) else {
        return String::new();
    };

    if let Some(text) = associated_label_text(doc, node) {
        return text;
    }
    if let Some(text) = labelledby_text(doc, node) {
        return text;
    }

    let container = doc.closest(id, |n| {
        n.tag == "label"
            || n.has_class("option")
            || n.has_class("radio")
            || n.has_class("form-check")
    });
    if let Some(container) = container {
        let text = doc.subtree_text(container);
        if !text.is_empty() {
            return text;
        }
    }
    String::new()
}
