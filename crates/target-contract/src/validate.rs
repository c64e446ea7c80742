//! Target contract validation.

use std::fmt;

use serde::Serialize;
use uipick_common::config::ContractConfig;
use uipick_ui_model::{NodeId, UiTree};

use crate::locator::{violation_key, CODE_INVALID_TARGET, CODE_MISSING_ID, CODE_NO_ROOT};
use crate::surface::resolve_fx_surface;
use crate::violation::Violation;

/// Whether an id names a reusable slot or one concrete occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetScope {
    Role,
    Instance,
}

impl TargetScope {
    /// Parse a declared scope. Only the exact strings are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "role" => Some(TargetScope::Role),
            "instance" => Some(TargetScope::Instance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetScope::Role => "role",
            TargetScope::Instance => "instance",
        }
    }
}

impl fmt::Display for TargetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one target root.
///
/// `ok` is true exactly when `reasons` is empty. On failure the surface
/// fields are cleared and `violation_key` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetValidation {
    pub ok: bool,
    pub root: NodeId,
    pub root_id: Option<String>,
    pub role_group: Option<String>,
    pub scope: Option<TargetScope>,
    pub surface: Option<NodeId>,
    pub surface_is_root: bool,
    pub violation_key: Option<String>,
    pub reasons: Vec<Violation>,
}

impl TargetValidation {
    /// Whether a specific violation was reported.
    pub fn has(&self, violation: Violation) -> bool {
        self.reasons.contains(&violation)
    }
}

/// Validator bound to a set of contract rules.
#[derive(Debug, Clone, Default)]
pub struct TargetContract {
    config: ContractConfig,
}

impl TargetContract {
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Validate a candidate target root.
    ///
    /// The caller is expected to have found `root` through its target flag;
    /// the flag itself is not re-checked. All checks run, none short-circuit.
    pub fn validate(&self, tree: &dyn UiTree, root: NodeId) -> TargetValidation {
        let Some(node) = tree.node(root) else {
            return TargetValidation {
                ok: false,
                root,
                root_id: None,
                role_group: None,
                scope: None,
                surface: None,
                surface_is_root: false,
                violation_key: Some(violation_key(
                    tree,
                    CODE_NO_ROOT,
                    root,
                    None,
                    self.config.locator_class_tokens,
                )),
                reasons: vec![Violation::NoRoot],
            };
        };

        let attrs = &node.attrs;
        let root_id = attrs.non_empty_id();
        let scope = attrs.scope.as_deref().and_then(TargetScope::parse);
        let role_group = attrs.role_group.as_deref().filter(|g| !g.trim().is_empty());

        let mut reasons = Vec::new();

        if root_id.is_none() {
            reasons.push(Violation::MissingId);
        }
        if scope.is_none() {
            reasons.push(Violation::InvalidScope);
        }

        if scope == Some(TargetScope::Role) {
            match role_group {
                None => reasons.push(Violation::MissingRoleGroup),
                Some(group) => {
                    if !self.config.allows_role_group(group) {
                        reasons.push(Violation::RoleGroupNotAllowlisted);
                    }
                    if let Some(id) = root_id {
                        if !self.is_namespaced(id, group) {
                            reasons.push(Violation::RoleIdNotNamespaced);
                        }
                    }
                }
            }
        }

        if tree
            .ancestors_of(root)
            .into_iter()
            .any(|a| tree.node(a).is_some_and(|n| n.is_target()))
        {
            reasons.push(Violation::NestedInAncestorTarget);
        }
        if !tree.descendants_matching(root, &|n| n.is_target()).is_empty() {
            reasons.push(Violation::ContainsDescendantTarget);
        }

        let surface = resolve_fx_surface(tree, root);
        if let Err(failure) = surface {
            reasons.push(Violation::Surface(failure));
        }

        if scope == Some(TargetScope::Instance) {
            if let Some(id) = root_id {
                let same_id = tree.nodes_matching(&|n| n.attrs.id.as_deref() == Some(id));
                if same_id.len() > 1 {
                    reasons.push(Violation::DuplicateInstanceId);
                }
            }
        }

        let root_id = root_id.map(str::to_string);
        let role_group = role_group.map(str::to_string);

        if reasons.is_empty() {
            let (surface, surface_is_root) = match surface {
                Ok(s) => (Some(s.node), s.is_root),
                Err(_) => (None, false),
            };
            return TargetValidation {
                ok: true,
                root,
                root_id,
                role_group,
                scope,
                surface,
                surface_is_root,
                violation_key: None,
                reasons,
            };
        }

        let code = if reasons.contains(&Violation::MissingId) {
            CODE_MISSING_ID
        } else {
            CODE_INVALID_TARGET
        };
        let key = violation_key(
            tree,
            code,
            root,
            role_group.as_deref(),
            self.config.locator_class_tokens,
        );
        TargetValidation {
            ok: false,
            root,
            root_id,
            role_group,
            scope,
            surface: None,
            surface_is_root: false,
            violation_key: Some(key),
            reasons,
        }
    }

    /// Whether `id` is namespaced under `group`, allowing one leading
    /// picker qualifier (`controls:homeHub:nav`).
    pub fn is_namespaced(&self, id: &str, group: &str) -> bool {
        let prefixed = |s: &str| {
            s.strip_prefix(group)
                .is_some_and(|rest| rest.starts_with(':'))
        };
        if prefixed(id) {
            return true;
        }
        self.config.id_qualifiers.iter().any(|q| {
            id.strip_prefix(q.as_str())
                .and_then(|rest| rest.strip_prefix(':'))
                .is_some_and(prefixed)
        })
    }
}

/// Validate with the default contract rules.
pub fn validate(tree: &dyn UiTree, root: NodeId) -> TargetValidation {
    TargetContract::default().validate(tree, root)
}

/// Nearest node at or above `from` that is target-flagged and has a
/// non-empty id.
pub fn find_target_root(tree: &dyn UiTree, from: NodeId) -> Option<NodeId> {
    std::iter::once(from)
        .chain(tree.ancestors_of(from))
        .find(|id| {
            tree.node(*id)
                .is_some_and(|n| n.is_target() && n.attrs.non_empty_id().is_some())
        })
}
