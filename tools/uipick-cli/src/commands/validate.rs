//! Validate one node of a tree fixture.

use std::path::PathBuf;

use uipick_common::config::AppConfig;
use uipick_target_contract::{find_target_root, TargetContract};
use uipick_ui_model::{MemoryTree, UiTree};

pub fn run(tree_path: PathBuf, key: String, config: &AppConfig) -> anyhow::Result<()> {
    let tree = MemoryTree::load(&tree_path)
        .map_err(|e| anyhow::anyhow!("Failed to load tree: {e}"))?;
    let node = tree.require_key(&key)?;

    // A key on an inner element validates the target that owns it.
    let root = match find_target_root(&tree, node) {
        Some(root) => root,
        None if tree.node(node).is_some_and(|n| n.is_target()) => node,
        None => anyhow::bail!("'{key}' is not inside a target"),
    };
    if root != node {
        println!("'{key}' resolves to enclosing target node {}", root.0);
    }

    let validation = TargetContract::new(config.contract.clone()).validate(&tree, root);

    println!("Target: {}", validation.root_id.as_deref().unwrap_or("<no id>"));
    println!(
        "  Scope: {}",
        validation.scope.map(|s| s.as_str()).unwrap_or("<invalid>")
    );
    if let Some(group) = &validation.role_group {
        println!("  Role group: {group}");
    }

    if validation.ok {
        let surface = match validation.surface {
            Some(_) if validation.surface_is_root => "root".to_string(),
            Some(id) => format!("descendant node {}", id.0),
            None => "none".to_string(),
        };
        println!("  Surface: {surface}");
        println!("\nTarget is valid.");
        Ok(())
    } else {
        println!("  Key: {}", validation.violation_key.as_deref().unwrap_or(""));
        println!("\nViolations:");
        for reason in &validation.reasons {
            println!("  - {reason}");
        }
        anyhow::bail!("{} violation(s) found", validation.reasons.len())
    }
}
