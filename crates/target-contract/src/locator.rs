//! Human-readable node locators and violation keys.
//!
//! A violation key identifies one broken target for logging and dedup:
//! `INVALID_TARGET@homeHub/button.hub-nav.primary:nth-of-type(2)`.

use uipick_ui_model::{NodeId, UiTree};

/// Key code used when the id itself is missing.
pub const CODE_MISSING_ID: &str = "MISSING_ID";
/// Key code for every other contract failure.
pub const CODE_INVALID_TARGET: &str = "INVALID_TARGET";
/// Key code for a stale node handle.
pub const CODE_NO_ROOT: &str = "NO_ROOT";

/// Describe a node as `tag.class1.class2:nth-of-type(n)`.
///
/// At most `class_tokens` classes are included.
pub fn node_locator(tree: &dyn UiTree, id: NodeId, class_tokens: usize) -> String {
    let Some(node) = tree.node(id) else {
        return "unknown".to_string();
    };
    let tag = if node.tag.is_empty() {
        "element"
    } else {
        node.tag.as_str()
    };
    let classes: Vec<&str> = node
        .classes
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .take(class_tokens)
        .collect();
    let class_part = if classes.is_empty() {
        String::new()
    } else {
        format!(".{}", classes.join("."))
    };
    format!("{tag}{class_part}:nth-of-type({})", tree.nth_of_type(id))
}

/// Build `CODE@group/locator`, with `unknown` standing in for a missing group.
pub fn violation_key(
    tree: &dyn UiTree,
    code: &str,
    id: NodeId,
    role_group: Option<&str>,
    class_tokens: usize,
) -> String {
    let group = role_group
        .filter(|g| !g.trim().is_empty())
        .unwrap_or("unknown");
    format!("{code}@{group}/{}", node_locator(tree, id, class_tokens))
}
