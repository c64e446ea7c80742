//! Node types for the UI tree.

use serde::{Deserialize, Serialize};

/// Arena handle for a node inside a [`crate::tree::UiTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Axis-aligned box in viewport CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Whether the point lies inside the box (edges inclusive).
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Target-contract attributes a view declares on a node.
///
/// Values are kept raw (`scope` as a string) so that malformed markup can
/// be reported by the validator instead of being rejected at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetAttrs {
    /// Declares the node pickable.
    pub target: bool,

    /// Stable identifier of the target.
    pub id: Option<String>,

    /// `role` or `instance`.
    pub scope: Option<String>,

    /// Semantic group for `role` targets.
    pub role_group: Option<String>,

    /// Marks the node that receives tuning effects.
    pub surface: bool,
}

impl TargetAttrs {
    /// The declared id if present and not blank.
    pub fn non_empty_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// A single node of the rendered UI.
#[derive(Debug, Clone, PartialEq)]
pub struct UiNode {
    /// Element tag, lowercase (`div`, `button`).
    pub tag: String,

    /// Class tokens in document order.
    pub classes: Vec<String>,

    /// Fixture handle for looking nodes up by name.
    pub key: Option<String>,

    /// Layout box, if the node is hit-testable.
    pub bounds: Option<Bounds>,

    /// Target contract attributes.
    pub attrs: TargetAttrs,

    /// Root of the host orchestration panel.
    pub host_panel: bool,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl UiNode {
    /// Whether the node declares itself a target.
    pub fn is_target(&self) -> bool {
        self.attrs.target
    }

    /// Whether the node is flagged as an FX surface.
    pub fn is_surface(&self) -> bool {
        self.attrs.surface
    }
}

/// Nested, serializable description of a subtree.
///
/// This is the fixture format for trees and doubles as a builder:
///
/// ```
/// use uipick_ui_model::NodeSpec;
///
/// let spec = NodeSpec::element("main").child(
///     NodeSpec::element("button")
///         .class("hub-nav")
///         .target("homeHub:nav")
///         .scope("role")
///         .role_group("homeHub")
///         .surface(),
/// );
/// assert_eq!(spec.children.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub bounds: Option<Bounds>,
    #[serde(flatten)]
    pub attrs: TargetAttrs,
    #[serde(default)]
    pub host_panel: bool,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_tag() -> String {
    "div".to_string()
}

impl NodeSpec {
    /// A plain element with no attributes.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            key: None,
            bounds: None,
            attrs: TargetAttrs::default(),
            host_panel: false,
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn bounds(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.bounds = Some(Bounds::new(x, y, w, h));
        self
    }

    /// Flag the node as a target with the given id.
    pub fn target(mut self, id: impl Into<String>) -> Self {
        self.attrs.target = true;
        self.attrs.id = Some(id.into());
        self
    }

    /// Flag the node as a target without an id.
    pub fn target_flag(mut self) -> Self {
        self.attrs.target = true;
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.attrs.scope = Some(scope.into());
        self
    }

    pub fn role_group(mut self, group: impl Into<String>) -> Self {
        self.attrs.role_group = Some(group.into());
        self
    }

    pub fn surface(mut self) -> Self {
        self.attrs.surface = true;
        self
    }

    pub fn host_panel(mut self) -> Self {
        self.host_panel = true;
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_edges() {
        let b = Bounds::new(10.0, 10.0, 20.0, 5.0);
        assert!(b.contains(10.0, 10.0));
        assert!(b.contains(30.0, 15.0));
        assert!(!b.contains(30.1, 15.0));
        assert!(!b.contains(9.9, 12.0));
    }

    #[test]
    fn test_non_empty_id() {
        let mut attrs = TargetAttrs::default();
        assert_eq!(attrs.non_empty_id(), None);
        attrs.id = Some("   ".into());
        assert_eq!(attrs.non_empty_id(), None);
        attrs.id = Some("homeHub:nav".into());
        assert_eq!(attrs.non_empty_id(), Some("homeHub:nav"));
    }

    #[test]
    fn test_spec_json_flattens_attrs() {
        let raw = r#"{
            "tag": "button",
            "classes": ["hub-nav", "primary"],
            "key": "nav",
            "target": true,
            "id": "homeHub:nav",
            "scope": "role",
            "role_group": "homeHub",
            "surface": true
        }"#;
        let spec: NodeSpec = serde_json::from_str(raw).unwrap();
        assert_eq!(spec.tag, "button");
        assert!(spec.attrs.target);
        assert!(spec.attrs.surface);
        assert_eq!(spec.attrs.role_group.as_deref(), Some("homeHub"));
        assert!(spec.children.is_empty());
    }

    #[test]
    fn test_spec_defaults_tag_to_div() {
        let spec: NodeSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec.tag, "div");
        assert!(!spec.attrs.target);
    }
}
