//! UiPick Capture Engine
//!
//! Turns developer pick gestures into validated UI targets. A host arms one
//! picker kind at a time; the capture manager sees every pointer event
//! before the application does, resolves the press to a target root,
//! validates it against the target contract, and suppresses the matching
//! release so the application never sees the pick.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                    PickerHost                      │
//! │  arm(kind) ─────────┐        PickSelections ◀──┐   │
//! │                     ▼                          │   │
//! │  ┌──────────────────────────────────────────┐  │   │
//! │  │             CaptureManager               │  │   │
//! │  │  press ──▶ resolve root ──▶ kind filter  │  │   │
//! │  │              │                  │        │  │   │
//! │  │              ▼                  ▼        │  │   │
//! │  │      SuppressionToken    TargetContract ─┼──┘   │
//! │  │              │                           │      │
//! │  │  release ────┴──▶ paired? suppress       │      │
//! │  └──────────────────┬───────────────────────┘      │
//! │                     ▼                              │
//! │         CaptureHooks (listeners, flags)            │
//! └───────────────────────────────────────────────────┘
//! ```

pub mod hooks;
pub mod host;
pub mod journal;
pub mod manager;
pub mod outcome;
pub mod picker;
pub mod suppression;

pub use hooks::*;
pub use host::*;
pub use journal::*;
pub use manager::*;
pub use outcome::*;
pub use picker::*;
pub use suppression::*;
