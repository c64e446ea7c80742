use proptest::prelude::*;
use uipick_ui_model::{MemoryTree, NodeSpec, UiTree};

/// A 4x4 grid of 50px cells inside a 200px board, each cell holding a
/// 20px chip in its top-left corner.
fn grid() -> MemoryTree {
    let mut board = NodeSpec::element("main").bounds(0.0, 0.0, 200.0, 200.0);
    for row in 0..4 {
        for col in 0..4 {
            let (x, y) = (col as f64 * 50.0, row as f64 * 50.0);
            board = board.child(
                NodeSpec::element("div")
                    .key(format!("cell-{row}-{col}"))
                    .bounds(x, y, 50.0, 50.0)
                    .child(
                        NodeSpec::element("span")
                            .key(format!("chip-{row}-{col}"))
                            .bounds(x, y, 20.0, 20.0),
                    ),
            );
        }
    }
    MemoryTree::from_spec(NodeSpec::element("body").child(board))
}

proptest! {
    #[test]
    fn hit_path_is_an_ancestor_chain_of_containing_nodes(
        x in -20.0f64..220.0,
        y in -20.0f64..220.0,
    ) {
        let tree = grid();
        let path = tree.hit_test(x, y);
        prop_assert!(!path.is_empty());
        prop_assert_eq!(*path.last().unwrap(), tree.root());

        for pair in path.windows(2) {
            prop_assert_eq!(tree.parent(pair[0]), Some(pair[1]));
        }
        for id in &path {
            if let Some(bounds) = tree.node(*id).unwrap().bounds {
                prop_assert!(bounds.contains(x, y));
            }
        }
    }

    #[test]
    fn hit_lands_on_deepest_box(x in 0.0f64..200.0, y in 0.0f64..200.0) {
        let tree = grid();
        let innermost = tree.hit_test(x, y)[0];
        let node = tree.node(innermost).unwrap();
        let key = node.key.as_deref().unwrap_or("");
        let in_chip = (x % 50.0) <= 20.0 && (y % 50.0) <= 20.0;
        if in_chip {
            prop_assert!(key.starts_with("chip-"), "{key} at ({x},{y})");
        } else {
            prop_assert!(key.starts_with("cell-"), "{key} at ({x},{y})");
        }
    }
}

#[test]
fn stale_handles_are_inert() {
    let tree = grid();
    let stale = uipick_ui_model::NodeId(10_000);
    assert!(tree.node(stale).is_none());
    assert!(tree.ancestors_of(stale).is_empty());
    assert!(tree.children(stale).is_empty());
    assert!(!tree.contains(tree.root(), stale));
}
