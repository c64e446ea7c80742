//! FX surface resolution.

use uipick_ui_model::{NodeId, UiTree};

use crate::violation::SurfaceFailure;

/// The single node that receives live-tuned effects for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FxSurface {
    pub node: NodeId,
    pub is_root: bool,
}

/// Resolve the FX surface of a target root.
///
/// Valid shapes are "root is the surface, no surface below it" and "root is
/// not a surface, exactly one surface below it".
pub fn resolve_fx_surface(tree: &dyn UiTree, root: NodeId) -> Result<FxSurface, SurfaceFailure> {
    let root_is_surface = tree.node(root).is_some_and(|n| n.is_surface());
    let below = tree.descendants_matching(root, &|n| n.is_surface());

    match (root_is_surface, below.as_slice()) {
        (true, []) => Ok(FxSurface {
            node: root,
            is_root: true,
        }),
        (false, [only]) => Ok(FxSurface {
            node: *only,
            is_root: false,
        }),
        (true, _) => Err(SurfaceFailure::RootAndDescendant),
        (false, []) => Err(SurfaceFailure::Missing),
        (false, _) => Err(SurfaceFailure::Multiple),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uipick_ui_model::{MemoryTree, NodeSpec};

    fn resolve(spec: NodeSpec) -> (MemoryTree, Result<FxSurface, SurfaceFailure>) {
        let tree = MemoryTree::from_spec(NodeSpec::element("body").child(spec));
        let root = tree.find_by_key("root").unwrap();
        let result = resolve_fx_surface(&tree, root);
        (tree, result)
    }

    #[test]
    fn test_root_surface() {
        let (tree, result) = resolve(NodeSpec::element("button").key("root").surface());
        let surface = result.unwrap();
        assert!(surface.is_root);
        assert_eq!(Some(surface.node), tree.find_by_key("root"));
    }

    #[test]
    fn test_single_descendant_surface() {
        let (tree, result) = resolve(
            NodeSpec::element("div")
                .key("root")
                .child(
                    NodeSpec::element("div").child(NodeSpec::element("span").key("fx").surface()),
                ),
        );
        let surface = result.unwrap();
        assert!(!surface.is_root);
        assert_eq!(Some(surface.node), tree.find_by_key("fx"));
    }

    #[test]
    fn test_missing_surface() {
        let (_, result) = resolve(NodeSpec::element("div").key("root"));
        assert_eq!(result, Err(SurfaceFailure::Missing));
    }

    #[test]
    fn test_multiple_surfaces() {
        let (_, result) = resolve(
            NodeSpec::element("div")
                .key("root")
                .child(NodeSpec::element("span").surface())
                .child(NodeSpec::element("span").surface()),
        );
        assert_eq!(result, Err(SurfaceFailure::Multiple));
    }

    #[test]
    fn test_root_and_descendant_surface() {
        let (_, result) = resolve(
            NodeSpec::element("div")
                .key("root")
                .surface()
                .child(NodeSpec::element("span").surface()),
        );
        assert_eq!(result, Err(SurfaceFailure::RootAndDescendant));
    }
}
