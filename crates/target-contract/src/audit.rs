//! Static audit of every target in a tree.

use std::collections::BTreeMap;

use serde::Serialize;
use uipick_ui_model::{NodeId, UiTree};

use crate::validate::{TargetContract, TargetValidation};
use crate::violation::Violation;

/// One distinct violation, grouped by violation key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub violation_key: String,
    pub root_id: Option<String>,
    pub reasons: Vec<Violation>,
    /// Every node that produced this key.
    pub nodes: Vec<NodeId>,
}

/// Result of auditing a whole tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    /// Target-flagged nodes inspected.
    pub targets: usize,
    /// How many of them passed.
    pub valid: usize,
    /// Failures, deduplicated by violation key, in key order.
    pub violations: Vec<AuditEntry>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn invalid(&self) -> usize {
        self.targets - self.valid
    }

    /// Count of each reason across all failing nodes.
    pub fn reason_counts(&self) -> BTreeMap<Violation, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.violations {
            for reason in &entry.reasons {
                *counts.entry(*reason).or_insert(0) += entry.nodes.len();
            }
        }
        counts
    }
}

impl TargetContract {
    /// Validate every target-flagged node in the tree.
    pub fn audit(&self, tree: &dyn UiTree) -> AuditReport {
        let targets = tree.nodes_matching(&|n| n.is_target());
        let mut report = AuditReport {
            targets: targets.len(),
            ..AuditReport::default()
        };
        let mut grouped: BTreeMap<String, AuditEntry> = BTreeMap::new();

        for id in targets {
            let validation: TargetValidation = self.validate(tree, id);
            if validation.ok {
                report.valid += 1;
                continue;
            }
            let key = validation.violation_key.clone().unwrap_or_default();
            tracing::debug!(
                key = %key,
                reasons = ?validation.reasons,
                "Target failed contract"
            );
            grouped
                .entry(key.clone())
                .and_modify(|entry| entry.nodes.push(id))
                .or_insert_with(|| AuditEntry {
                    violation_key: key,
                    root_id: validation.root_id,
                    reasons: validation.reasons,
                    nodes: vec![id],
                });
        }

        report.violations = grouped.into_values().collect();
        report
    }
}

/// Audit with the default contract rules.
pub fn audit_tree(tree: &dyn UiTree) -> AuditReport {
    TargetContract::default().audit(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uipick_ui_model::{MemoryTree, NodeSpec};

    #[test]
    fn test_clean_tree() {
        let tree = MemoryTree::from_spec(
            NodeSpec::element("body").child(
                NodeSpec::element("button")
                    .target("homeHub:nav")
                    .scope("role")
                    .role_group("homeHub")
                    .surface(),
            ),
        );
        let report = audit_tree(&tree);
        assert_eq!(report.targets, 1);
        assert_eq!(report.valid, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_groups_by_violation_key() {
        // Two identical unnamed buttons under separate parents share a locator.
        let tree = MemoryTree::from_spec(
            NodeSpec::element("body")
                .child(NodeSpec::element("li").child(NodeSpec::element("button").target_flag()))
                .child(NodeSpec::element("li").child(NodeSpec::element("button").target_flag()))
                .child(
                    NodeSpec::element("div")
                        .target("card-1")
                        .scope("instance")
                        .surface(),
                ),
        );
        let report = audit_tree(&tree);
        assert_eq!(report.targets, 3);
        assert_eq!(report.valid, 1);
        assert_eq!(report.invalid(), 2);
        assert_eq!(report.violations.len(), 1);
        let entry = &report.violations[0];
        assert_eq!(entry.violation_key, "MISSING_ID@unknown/button:nth-of-type(1)");
        assert_eq!(entry.nodes.len(), 2);
        assert_eq!(report.reason_counts().get(&Violation::MissingId), Some(&2));
    }
}
