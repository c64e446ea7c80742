//! uipick UI Model
//!
//! Defines the read-only view of a rendered UI that the picker inspects:
//! - **Nodes:** tag, classes, geometry, and the target contract attributes
//! - **Tree:** the `UiTree` traversal capability and an in-memory arena
//!   implementation (`MemoryTree`) used by tests, fixtures, and the CLI
//! - **Events:** timestamped pointer events in two phases (press, release)
//!   plus cancel, serializable as JSONL gesture streams
//!
//! Coordinates are CSS pixels in the viewport, matching what a browser
//! reports for `clientX`/`clientY`.

pub mod event;
pub mod node;
pub mod tree;

pub use event::*;
pub use node::*;
pub use tree::*;
