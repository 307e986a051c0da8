use std::collections::VecDeque;

use crate::dom::page_model::{DocPath, NodeRef, PageDocument};

/// Lazy walk over every element reachable from a root document: the ordinary
/// tree in document order, shadow sub-trees attached to visited elements,
/// then each same-origin embedded document in the order discovered.
/// Cross-origin frames are skipped silently; stale ids are skipped, never
/// surfaced as errors. Restartable: call `walk_elements` again for a fresh
/// pass.
pub fn walk_elements(root: &PageDocument) -> ElementWalk<'_> {
    let mut pending = VecDeque::new();
    pending.push_back(Vec::new());
    ElementWalk {
        root,
        pending_docs: pending,
        current: None,
    }
}

pub struct ElementWalk<'a> {
    root: &'a PageDocument,
    /// Same-origin documents awaiting their own walk, FIFO in discovery order.
    pending_docs: VecDeque<DocPath>,
    current: Option<DocWalk<'a>>,
}

/// Worklist walk of one document: a stack of sub-tree roots, each processed
/// with a plain depth-first element walk.
struct DocWalk<'a> {
    doc: &'a PageDocument,
    path: DocPath,
    roots: Vec<usize>,
    stack: Vec<usize>,
}

impl<'a> Iterator for ElementWalk<'a> {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        loop {
            if let Some(walk) = self.current.as_mut() {
                match walk.next_element(&mut self.pending_docs) {
                    Some(handle) => return Some(handle),
                    None => self.current = None,
                }
                continue;
            }

            let path = self.pending_docs.pop_front()?;
            let Some(doc) = self.root.document(&path) else {
                continue;
            };
            self.current = Some(DocWalk {
                doc,
                path,
                roots: Vec::new(),
                stack: vec![doc.root()],
            });
        }
    }
}

impl<'a> DocWalk<'a> {
    fn next_element(&mut self, pending_docs: &mut VecDeque<DocPath>) -> Option<NodeRef> {
        loop {
            let id = match self.stack.pop() {
                Some(id) => id,
                None => {
                    let next_root = self.roots.pop()?;
                    self.stack.push(next_root);
                    continue;
                }
            };

            let Some(node) = self.doc.node(id) else {
                continue;
            };

            for &child in node.children.iter().rev() {
                self.stack.push(child);
            }

            if let Some(shadow) = node.shadow_root {
                self.roots.push(shadow);
            }

            if let Some(frame_index) = node.frame {
                if let Some(frame) = self.doc.frame(frame_index) {
                    if !frame.cross_origin && frame.content.is_some() {
                        let mut path = self.path.clone();
                        path.push(frame_index);
                        pending_docs.push_back(path);
                    }
                }
            }

            // Container markers (document body, shadow roots) are walked
            // through but not reported as elements.
            if node.tag.starts_with('#') || node.tag == "body" {
                continue;
            }

            return Some(NodeRef {
                doc: self.path.clone(),
                node: id,
            });
        }
    }
}
