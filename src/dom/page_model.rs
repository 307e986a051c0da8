use std::collections::HashMap;

use serde::Deserialize;

pub type NodeId = usize;

/// Computed-style visibility flags captured at snapshot time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleFlags {
    #[serde(default)]
    pub display_none: bool,
    #[serde(default)]
    pub visibility_hidden: bool,
    #[serde(default)]
    pub zero_opacity: bool,
}

impl StyleFlags {
    pub fn visible(&self) -> bool {
        !self.display_none && !self.visibility_hidden && !self.zero_opacity
    }
}

/// One element of a captured page. Fields mirror what the host-side
/// extraction reports; absent attributes stay `None`.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub text: Option<String>,

    pub id: Option<String>,
    pub name: Option<String>,
    pub input_type: Option<String>,
    pub role: Option<String>,
    pub placeholder: Option<String>,
    pub href: Option<String>,
    pub for_id: Option<String>,
    pub classes: Vec<String>,

    pub aria_label: Option<String>,
    pub aria_labelledby: Option<String>,
    pub aria_haspopup: Option<String>,
    pub aria_expanded: Option<String>,
    pub aria_controls: Option<String>,
    pub aria_required: bool,

    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub disabled: bool,
    pub contenteditable: bool,
    pub tabindex: Option<i32>,

    /// False once the host removed the element from its document.
    pub connected: bool,
    pub style: StyleFlags,

    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Root of an attached shadow sub-tree, if any.
    pub shadow_root: Option<NodeId>,
    /// Index into `PageDocument::frames` for iframe elements.
    pub frame: Option<usize>,
}

impl DomNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: None,
            id: None,
            name: None,
            input_type: None,
            role: None,
            placeholder: None,
            href: None,
            for_id: None,
            classes: Vec::new(),
            aria_label: None,
            aria_labelledby: None,
            aria_haspopup: None,
            aria_expanded: None,
            aria_controls: None,
            aria_required: false,
            value: String::new(),
            checked: false,
            required: false,
            disabled: false,
            contenteditable: false,
            tabindex: None,
            connected: true,
            style: StyleFlags::default(),
            parent: None,
            children: Vec::new(),
            shadow_root: None,
            frame: None,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_type(mut self, input_type: &str) -> Self {
        self.input_type = Some(input_type.to_string());
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn with_for(mut self, target: &str) -> Self {
        self.for_id = Some(target.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_aria_label(mut self, label: &str) -> Self {
        self.aria_label = Some(label.to_string());
        self
    }

    pub fn with_labelledby(mut self, ids: &str) -> Self {
        self.aria_labelledby = Some(ids.to_string());
        self
    }

    pub fn with_haspopup(mut self, value: &str) -> Self {
        self.aria_haspopup = Some(value.to_string());
        self
    }

    pub fn with_expanded(mut self, value: &str) -> Self {
        self.aria_expanded = Some(value.to_string());
        self
    }

    pub fn with_controls(mut self, value: &str) -> Self {
        self.aria_controls = Some(value.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_tabindex(mut self, index: i32) -> Self {
        self.tabindex = Some(index);
        self
    }

    pub fn editable(mut self) -> Self {
        self.contenteditable = true;
        self
    }

    pub fn required_field(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn aria_required_field(mut self) -> Self {
        self.aria_required = true;
        self
    }

    pub fn disabled_field(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn checked_field(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn display_none(mut self) -> Self {
        self.style.display_none = true;
        self
    }

    pub fn visibility_hidden(mut self) -> Self {
        self.style.visibility_hidden = true;
        self
    }

    pub fn zero_opacity(mut self) -> Self {
        self.style.zero_opacity = true;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Synthetic notifications the filler dispatches back into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticEvent {
    Input,
    Change,
    Click,
}

#[derive(Debug, Clone)]
pub struct FiredEvent {
    pub node: NodeId,
    pub event: SyntheticEvent,
}

/// An embedded document. Cross-origin content is inaccessible: the frame
/// exists but carries no document.
#[derive(Debug, Clone)]
pub struct Frame {
    pub cross_origin: bool,
    pub content: Option<PageDocument>,
}

/// Frame path from the root document; empty for the root itself.
pub type DocPath = Vec<usize>;

/// Non-owning handle to one element, assigned at discovery time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub doc: DocPath,
    pub node: NodeId,
}

/// Arena-backed snapshot of one document. Shadow sub-trees live in the same
/// arena, linked through `shadow_root`; embedded documents are separate
/// `PageDocument`s reached through `frames`.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub url: String,
    pub title: String,
    nodes: Vec<DomNode>,
    frames: Vec<Frame>,
    root: NodeId,
    pub focused: Option<NodeId>,
    pub events: Vec<FiredEvent>,
}

impl PageDocument {
    pub fn new(url: &str, title: &str) -> Self {
        let mut body = DomNode::new("body");
        body.connected = true;
        Self {
            url: url.to_string(),
            title: title.to_string(),
            nodes: vec![body],
            frames: Vec::new(),
            root: 0,
            focused: None,
            events: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        self.nodes.get_mut(id)
    }

    /// Append a child element under `parent`. Returns the new node's id.
    pub fn append(&mut self, parent: NodeId, mut node: DomNode) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent);
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Attach a shadow sub-tree to `host`; children added under the returned
    /// id form the shadow content.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        let id = self.nodes.len();
        let mut container = DomNode::new("#shadow-root");
        container.parent = Some(host);
        self.nodes.push(container);
        if let Some(h) = self.nodes.get_mut(host) {
            h.shadow_root = Some(id);
        }
        id
    }

    /// Append an iframe under `parent`. `content` of `None` marks the frame
    /// cross-origin (its document cannot be reached).
    pub fn append_frame(&mut self, parent: NodeId, content: Option<PageDocument>) -> NodeId {
        let frame_index = self.frames.len();
        self.frames.push(Frame {
            cross_origin: content.is_none(),
            content,
        });
        let node = DomNode {
            frame: Some(frame_index),
            ..DomNode::new("iframe")
        };
        self.append(parent, node)
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Resolve a frame path to the document it designates.
    pub fn document(&self, path: &[usize]) -> Option<&PageDocument> {
        let mut doc = self;
        for &index in path {
            doc = doc.frames.get(index)?.content.as_ref()?;
        }
        Some(doc)
    }

    pub fn document_mut(&mut self, path: &[usize]) -> Option<&mut PageDocument> {
        let mut doc = self;
        for &index in path {
            doc = doc.frames.get_mut(index)?.content.as_mut()?;
        }
        Some(doc)
    }

    /// Resolve a discovery-time handle, starting from the root document.
    pub fn resolve(&self, handle: &NodeRef) -> Option<&DomNode> {
        self.document(&handle.doc)?.node(handle.node)
    }

    /// Element currently attached, enabled and visible.
    pub fn is_eligible(&self, id: NodeId) -> bool {
        match self.node(id) {
            Some(n) => n.connected && !n.disabled && n.style.visible(),
            None => false,
        }
    }

    pub fn element_by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(dom_id))
    }

    /// Ids of every node in this document's arena, in insertion order.
    /// Shadow content is included; embedded documents are not.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        0..self.nodes.len()
    }

    /// Depth-first ids of the sub-tree under `id` (inclusive), ordinary
    /// children only.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            out.push(current);
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Ancestor chain of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.node(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            out.push(parent);
            current = self.node(parent).and_then(|n| n.parent);
        }
        out
    }

    /// Nearest ancestor (including `id`) matching the predicate.
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        if self.node(id).map(|n| pred(n)).unwrap_or(false) {
            return Some(id);
        }
        self.ancestors(id)
            .into_iter()
            .find(|&a| self.node(a).map(|n| pred(n)).unwrap_or(false))
    }

    /// First descendant of `id` (excluding `id`) matching the predicate,
    /// in document order.
    pub fn find_descendant<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.descendants(id)
            .into_iter()
            .skip(1)
            .find(|&d| self.node(d).map(|n| pred(n)).unwrap_or(false))
    }

    /// Concatenated text of the sub-tree under `id`, visible nodes only.
    pub fn subtree_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        for d in self.descendants(id) {
            let Some(node) = self.node(d) else { continue };
            if !node.style.visible() {
                continue;
            }
            if let Some(text) = &node.text {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
        }
        parts.join(" ")
    }

    // ---- Write-side operations used by the field filler ----

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        if let Some(node) = self.node_mut(id) {
            node.checked = checked;
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.node_mut(id) {
            node.text = Some(text.to_string());
        }
    }

    pub fn fire(&mut self, id: NodeId, event: SyntheticEvent) {
        self.events.push(FiredEvent { node: id, event });
    }

    pub fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Mark an element as removed from the document, as the host would after
    /// a DOM mutation. Discovery handles pointing at it become stale.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.connected = false;
        }
    }
}

// ============================================================================
// Snapshot loading (captured page JSON)
// ============================================================================

/// Nested capture format produced by the host-side extraction: one tree per
/// document, shadow content under `shadow`, embedded documents under `frame`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    tree: RawNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    tag: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    input_type: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default, rename = "for")]
    for_id: Option<String>,
    #[serde(default)]
    classes: Vec<String>,
    #[serde(default)]
    aria: HashMap<String, String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    contenteditable: bool,
    #[serde(default)]
    tabindex: Option<i32>,
    #[serde(default)]
    style: StyleFlags,
    #[serde(default)]
    children: Vec<RawNode>,
    #[serde(default)]
    shadow: Vec<RawNode>,
    #[serde(default)]
    frame: Option<Box<RawDocument>>,
    #[serde(default)]
    cross_origin: bool,
}

#[derive(Debug)]
pub enum PageLoadError {
    Parse(serde_json::Error),
}

impl std::fmt::Display for PageLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageLoadError::Parse(e) => write!(f, "Failed to parse page snapshot: {}", e),
        }
    }
}

impl std::error::Error for PageLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PageLoadError::Parse(e) => Some(e),
        }
    }
}

impl PageDocument {
    /// Load a captured page snapshot from its JSON form.
    pub fn from_json(json: &str) -> Result<PageDocument, PageLoadError> {
        let raw: RawDocument = serde_json::from_str(json).map_err(PageLoadError::Parse)?;
        Ok(build_document(raw))
    }
}

fn build_document(raw: RawDocument) -> PageDocument {
    let mut doc = PageDocument::new(&raw.url, &raw.title);
    let root = doc.root();
    for child in raw.tree.children {
        build_node(&mut doc, root, child);
    }
    doc
}

fn build_node(doc: &mut PageDocument, parent: NodeId, raw: RawNode) {
    if raw.tag == "iframe" {
        if raw.cross_origin {
            doc.append_frame(parent, None);
        } else {
            let content = raw.frame.map(|d| build_document(*d));
            doc.append_frame(parent, content);
        }
        return;
    }

    let mut node = DomNode::new(&raw.tag);
    node.text = raw.text;
    node.id = raw.id;
    node.name = raw.name;
    node.input_type = raw.input_type;
    node.role = raw.role;
    node.placeholder = raw.placeholder;
    node.href = raw.href;
    node.for_id = raw.for_id;
    node.classes = raw.classes;
    node.aria_label = raw.aria.get("label").cloned();
    node.aria_labelledby = raw.aria.get("labelledby").cloned();
    node.aria_haspopup = raw.aria.get("haspopup").cloned();
    node.aria_expanded = raw.aria.get("expanded").cloned();
    node.aria_controls = raw.aria.get("controls").cloned();
    node.aria_required = raw.aria.get("required").map(|v| v == "true").unwrap_or(false);
    node.value = raw.value.unwrap_or_default();
    node.checked = raw.checked;
    node.required = raw.required;
    node.disabled = raw.disabled;
    node.contenteditable = raw.contenteditable;
    node.tabindex = raw.tabindex;
    node.style = raw.style;

    let id = doc.append(parent, node);

    for child in raw.children {
        build_node(doc, id, child);
    }

    if !raw.shadow.is_empty() {
        let shadow = doc.attach_shadow(id);
        for child in raw.shadow {
            build_node(doc, shadow, child);
        }
    }
}
