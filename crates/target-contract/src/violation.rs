//! Named contract violations.

use std::fmt;

use serde::{Serialize, Serializer};

/// Why no single FX surface could be resolved for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SurfaceFailure {
    /// Neither the root nor any descendant is a surface.
    Missing,
    /// The root is not a surface and several descendants are.
    Multiple,
    /// The root is a surface and so is at least one descendant.
    RootAndDescendant,
}

impl SurfaceFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceFailure::Missing => "missing-surface",
            SurfaceFailure::Multiple => "multiple-surfaces",
            SurfaceFailure::RootAndDescendant => "root-and-desc-surface",
        }
    }
}

/// One failed contract check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Violation {
    /// The node handle no longer resolves in the tree.
    NoRoot,
    MissingId,
    InvalidScope,
    MissingRoleGroup,
    RoleGroupNotAllowlisted,
    RoleIdNotNamespaced,
    NestedInAncestorTarget,
    ContainsDescendantTarget,
    Surface(SurfaceFailure),
    DuplicateInstanceId,
}

impl Violation {
    /// Stable reason code. Surface failures carry a `surface:` prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::NoRoot => "no-root",
            Violation::MissingId => "missing-id",
            Violation::InvalidScope => "invalid-scope",
            Violation::MissingRoleGroup => "missing-role-group",
            Violation::RoleGroupNotAllowlisted => "role-group-not-allowlisted",
            Violation::RoleIdNotNamespaced => "role-id-not-namespaced",
            Violation::NestedInAncestorTarget => "nested-in-ancestor-target",
            Violation::ContainsDescendantTarget => "contains-descendant-target",
            Violation::Surface(SurfaceFailure::Missing) => "surface:missing-surface",
            Violation::Surface(SurfaceFailure::Multiple) => "surface:multiple-surfaces",
            Violation::Surface(SurfaceFailure::RootAndDescendant) => {
                "surface:root-and-desc-surface"
            }
            Violation::DuplicateInstanceId => "duplicate-instance-id",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for SurfaceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_codes_are_prefixed() {
        assert_eq!(
            Violation::Surface(SurfaceFailure::Missing).to_string(),
            "surface:missing-surface"
        );
        assert_eq!(SurfaceFailure::RootAndDescendant.to_string(), "root-and-desc-surface");
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&vec![
            Violation::MissingId,
            Violation::DuplicateInstanceId,
        ])
        .unwrap();
        assert_eq!(json, r#"["missing-id","duplicate-instance-id"]"#);
    }
}
