use serde::{Deserialize, Serialize};

use crate::context::keywords::dominant_keyword;
use crate::discover::field_model::FillableField;
use crate::dom::page_model::{DomNode, PageDocument};

const MAX_HEADINGS: usize = 12;
const MAX_LANDMARKS: usize = 6;
const MAX_VISIBLE_TEXT: usize = 200_000;
const NEARBY_TEXT_CAP: usize = 140;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractiveCounts {
    pub inputs: usize,
    pub buttons: usize,
    pub links: usize,
}

/// Page-level context shipped with every summarization request.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub url: String,
    pub title: String,
    pub headings: Vec<String>,
    pub url_hints: String,
    pub interactive: InteractiveCounts,
    pub landmarks: Vec<String>,
    pub text: String,
}

/// Per-field hint bundle for fillables-mode requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldHints {
    pub label: String,
    pub placeholder: String,
    pub name: String,
    pub aria_label: String,
    pub group: String,
    pub nearby: String,
}

pub fn collect_page_context(doc: &PageDocument) -> PageContext {
    PageContext {
        url: doc.url.clone(),
        title: doc.title.clone(),
        headings: collect_headings(doc),
        url_hints: url_hints(&doc.url),
        interactive: interactive_counts(doc),
        landmarks: collect_landmarks(doc),
        text: visible_text(doc),
    }
}

fn collect_headings(doc: &PageDocument) -> Vec<String> {
    let mut headings = Vec::new();
    for id in doc.descendants(doc.root()) {
        let Some(node) = doc.node(id) else { continue };
        if matches!(node.tag.as_str(), "h1" | "h2" | "h3") {
            let text = doc.subtree_text(id);
            if !text.is_empty() {
                headings.push(text);
                if headings.len() == MAX_HEADINGS {
                    break;
                }
            }
        }
    }
    headings
}

/// Hostname and path of the page URL with separators spaced out, as hint
/// tokens for the keyword heuristic. No URL crate needed for this much.
pub fn url_hints(url: &str) -> String {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    let without_query = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);
    let mut parts = without_query.splitn(2, '/');
    let host = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    let mut hints = String::new();
    hints.push_str(host);
    hints.push(' ');
    hints.push_str(path);
    let collapsed: String = hints
        .chars()
        .map(|c| if matches!(c, '/' | '-' | '_' | '.') { ' ' } else { c })
        .collect();
    collapsed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn interactive_counts(doc: &PageDocument) -> InteractiveCounts {
    let mut counts = InteractiveCounts::default();
    for id in doc.all_nodes() {
        let Some(node) = doc.node(id) else { continue };
        let role = node.role.as_deref();
        if matches!(node.tag.as_str(), "input" | "textarea" | "select")
            || matches!(role, Some("textbox") | Some("combobox"))
        {
            counts.inputs += 1;
        }
        if node.tag == "button" || role == Some("button") {
            counts.buttons += 1;
        }
        if node.tag == "a" && node.href.is_some() {
            counts.links += 1;
        }
    }
    counts
}

fn collect_landmarks(doc: &PageDocument) -> Vec<String> {
    let mut landmarks = Vec::new();
    for id in doc.descendants(doc.root()) {
        let Some(node) = doc.node(id) else { continue };
        let is_landmark = matches!(node.tag.as_str(), "nav" | "form")
            || matches!(
                node.role.as_deref(),
                Some("navigation") | Some("search") | Some("form")
            );
        if !is_landmark {
            continue;
        }
        let label = node
            .aria_label
            .clone()
            .or_else(|| node.name.clone())
            .unwrap_or_else(|| node.tag.clone());
        landmarks.push(label.to_lowercase());
        if landmarks.len() == MAX_LANDMARKS {
            break;
        }
    }
    landmarks
}

/// Visible text of the page's main content region (main, [role=main] or
/// article, falling back to the whole document), script/style text and
/// invisible nodes skipped, capped at a fixed length.
pub fn visible_text(doc: &PageDocument) -> String {
    let root = doc
        .find_descendant(doc.root(), |n| {
            n.tag == "main" || n.role.as_deref() == Some("main") || n.tag == "article"
        })
        .unwrap_or_else(|| doc.root());

    let mut parts = Vec::new();
    let mut total = 0usize;
    for id in doc.descendants(root) {
        let Some(node) = doc.node(id) else { continue };
        if matches!(node.tag.as_str(), "script" | "style" | "noscript") {
            continue;
        }
        if !node.style.visible() {
            continue;
        }
        let Some(text) = &node.text else { continue };
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            continue;
        }
        total += collapsed.len() + 1;
        parts.push(collapsed);
        if total >= MAX_VISIBLE_TEXT {
            break;
        }
    }

    let mut joined = parts.join("\n");
    if joined.len() > MAX_VISIBLE_TEXT {
        let mut cut = MAX_VISIBLE_TEXT;
        while !joined.is_char_boundary(cut) {
            cut -= 1;
        }
        joined.truncate(cut);
    }
    joined
}

/// Hint bundles for the discovered fields, in field order.
pub fn collect_field_hints(root: &PageDocument, fields: &[FillableField]) -> Vec<FieldHints> {
    fields
        .iter()
        .map(|field| {
            let Some(doc) = root.document(&field.node.doc) else {
                return FieldHints {
                    label: field.label.clone(),
                    ..FieldHints::default()
                };
            };
            field_hints(doc, field)
        })
        .collect()
}

fn field_hints(doc: &PageDocument, field: &FillableField) -> FieldHints {
    let id = field.node.node;
    let node = doc.node(id);

    let aria_label = node
        .and_then(|n| n.aria_label.clone())
        .unwrap_or_default();

    let group = doc
        .closest(id, is_group_container)
        .and_then(|g| {
            doc.find_descendant(g, |n| {
                matches!(n.tag.as_str(), "legend" | "h1" | "h2" | "h3") || n.aria_label.is_some()
            })
        })
        .map(|caption| doc.subtree_text(caption))
        .unwrap_or_default();

    let nearby = doc
        .closest(id, is_nearby_container)
        .map(|c| {
            let mut text = doc.subtree_text(c);
            if text.len() > NEARBY_TEXT_CAP {
                let mut cut = NEARBY_TEXT_CAP;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            text
        })
        .unwrap_or_default();

    FieldHints {
        label: field.label.clone(),
        placeholder: field.placeholder.clone(),
        name: field.name.clone(),
        aria_label,
        group,
        nearby,
    }
}

fn is_group_container(node: &DomNode) -> bool {
    node.tag == "fieldset"
        || node.tag == "form"
        || node.role.as_deref() == Some("group")
        || node.has_class("form-group")
        || node.has_class("field")
}

fn is_nearby_container(node: &DomNode) -> bool {
    node.tag == "label"
        || node.has_class("form-group")
        || node.has_class("field")
        || node.has_class("row")
        || node.has_class("input")
        || node.has_class("form-item")
}

/// Keyword sourced from the full fillable context, field hints included.
pub fn fillable_keyword(ctx: &PageContext, hints: &[FieldHints]) -> String {
    let extra = hints
        .iter()
        .map(|h| h.group.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    dominant_keyword(&ctx.title, &ctx.headings, &ctx.url_hints, &extra)
}
