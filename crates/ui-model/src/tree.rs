//! Tree traversal capability and the in-memory arena tree.
//!
//! The picker never mutates the UI. Everything it needs is expressed as
//! read-only queries on [`UiTree`], so a browser DOM adapter and the
//! in-memory [`MemoryTree`] are interchangeable.

use std::path::Path;

use uipick_common::error::{UiPickError, UiPickResult};

use crate::event::PointerEvent;
use crate::node::{NodeId, NodeSpec, UiNode};

/// Read-only view of a rendered UI tree.
pub trait UiTree {
    /// The document root.
    fn root(&self) -> NodeId;

    /// Look up a node. `None` means the handle is stale.
    fn node(&self, id: NodeId) -> Option<&UiNode>;

    /// Parent of a node, `None` at the root or for stale handles.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Children in document order.
    fn children(&self, id: NodeId) -> &[NodeId];

    /// Hit-test path of an event, innermost node first.
    ///
    /// Returns `None` when the platform exposes no path; callers then walk
    /// the ancestor chain from [`UiTree::event_target`].
    fn hit_test_path_of(&self, event: &PointerEvent) -> Option<Vec<NodeId>> {
        event.path.clone().filter(|path| !path.is_empty())
    }

    /// The immediate hit target of an event.
    fn event_target(&self, event: &PointerEvent) -> Option<NodeId> {
        event
            .target
            .filter(|id| self.node(*id).is_some())
            .or_else(|| {
                self.hit_test_path_of(event)?
                    .into_iter()
                    .find(|id| self.node(*id).is_some())
            })
    }

    /// Ancestors of a node, nearest first, excluding the node itself.
    fn ancestors_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if out.contains(&parent) {
                tracing::warn!(node = parent.0, "Cycle in ancestor chain");
                break;
            }
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// Descendants of a node in document order that satisfy `pred`,
    /// excluding the node itself.
    fn descendants_matching(&self, id: NodeId, pred: &dyn Fn(&UiNode) -> bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if let Some(node) = self.node(next) {
                if pred(node) {
                    out.push(next);
                }
            }
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Every node in the tree, root included, that satisfies `pred`.
    fn nodes_matching(&self, pred: &dyn Fn(&UiNode) -> bool) -> Vec<NodeId> {
        let root = self.root();
        let mut out = Vec::new();
        if self.node(root).is_some_and(|n| pred(n)) {
            out.push(root);
        }
        out.extend(self.descendants_matching(root, pred));
        out
    }

    /// Whether `node` is `ancestor` or lies inside it.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors_of(node).contains(&ancestor)
    }

    /// 1-based position among siblings with the same tag.
    fn nth_of_type(&self, id: NodeId) -> usize {
        let Some(node) = self.node(id) else {
            return 1;
        };
        let Some(parent) = self.parent(id) else {
            return 1;
        };
        let mut index = 0;
        for sibling in self.children(parent) {
            if self.node(*sibling).is_some_and(|s| s.tag == node.tag) {
                index += 1;
            }
            if *sibling == id {
                return index.max(1);
            }
        }
        1
    }
}

/// Arena-backed tree for tests, fixtures, and offline audits.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    nodes: Vec<UiNode>,
}

impl MemoryTree {
    /// Build a tree from a nested spec. The spec's top node becomes the root.
    pub fn from_spec(spec: NodeSpec) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.insert(None, spec);
        tree
    }

    /// Parse a tree fixture from JSON.
    pub fn from_json(json: &str) -> UiPickResult<Self> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(spec))
    }

    /// Load a tree fixture from disk.
    pub fn load(path: &Path) -> UiPickResult<Self> {
        if !path.exists() {
            return Err(UiPickError::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        let tree = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), nodes = tree.len(), "Loaded UI tree");
        Ok(tree)
    }

    /// Append a subtree under `parent`, returning the new subtree root.
    pub fn append(&mut self, parent: NodeId, spec: NodeSpec) -> UiPickResult<NodeId> {
        if self.node(parent).is_none() {
            return Err(UiPickError::tree(format!("unknown parent node {}", parent.0)));
        }
        Ok(self.insert(Some(parent), spec))
    }

    fn insert(&mut self, parent: Option<NodeId>, spec: NodeSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(UiNode {
            tag: spec.tag.to_ascii_lowercase(),
            classes: spec.classes,
            key: spec.key,
            bounds: spec.bounds,
            attrs: spec.attrs,
            host_panel: spec.host_panel,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        for child in spec.children {
            self.insert(Some(id), child);
        }
        id
    }

    /// Find the first node (document order) carrying the given fixture key.
    pub fn find_by_key(&self, key: &str) -> Option<NodeId> {
        self.nodes_matching(&|n| n.key.as_deref() == Some(key))
            .into_iter()
            .next()
    }

    /// Find a node by key, failing with a tree error when absent.
    pub fn require_key(&self, key: &str) -> UiPickResult<NodeId> {
        self.find_by_key(key)
            .ok_or_else(|| UiPickError::tree(format!("no node with key '{key}'")))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Geometric hit test: deepest node whose bounds contain the point,
    /// later siblings painted on top. Innermost first; empty on a miss.
    ///
    /// Nodes without bounds are transparent wrappers: they are part of the
    /// path when a descendant is hit but are never hit themselves, except
    /// for the root.
    pub fn hit_test(&self, x: f64, y: f64) -> Vec<NodeId> {
        if self.nodes.is_empty() {
            return Vec::new();
        }
        self.hit(self.root(), x, y).unwrap_or_default()
    }

    fn hit(&self, id: NodeId, x: f64, y: f64) -> Option<Vec<NodeId>> {
        let node = &self.nodes[id.0];
        if let Some(bounds) = node.bounds {
            if !bounds.contains(x, y) {
                return None;
            }
        }
        for child in node.children.iter().rev() {
            if let Some(mut path) = self.hit(*child, x, y) {
                path.push(id);
                return Some(path);
            }
        }
        if node.bounds.is_some() || node.parent.is_none() {
            Some(vec![id])
        } else {
            None
        }
    }

    /// Fill in the target and path of an event from geometry when the event
    /// does not carry them already.
    pub fn locate(&self, mut event: PointerEvent) -> PointerEvent {
        if event.path.as_ref().map_or(true, |p| p.is_empty()) {
            let path = self.hit_test(event.x, event.y);
            if !path.is_empty() {
                event.path = Some(path);
            }
        }
        if event.target.is_none() {
            event.target = event.path.as_ref().and_then(|p| p.first().copied());
        }
        event
    }
}

impl UiTree for MemoryTree {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> Option<&UiNode> {
        self.nodes.get(id.0)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn hit_test_path_of(&self, event: &PointerEvent) -> Option<Vec<NodeId>> {
        if let Some(path) = event.path.as_ref().filter(|p| !p.is_empty()) {
            return Some(path.clone());
        }
        let path = self.hit_test(event.x, event.y);
        (!path.is_empty()).then_some(path)
    }
}
