//! Platform seam for listener registration and presentation flags.
//!
//! A browser adapter installs capture-phase `pointerdown`/`click`/
//! `pointercancel` listeners and toggles root classes; the manager only
//! tells it when.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde::Serialize;

/// Cosmetic, process-wide indicators other UI can style against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationFlag {
    /// Capture listeners are installed.
    CaptureAttached,
    /// A picker kind is armed.
    PickingActive,
}

impl PresentationFlag {
    /// Root class name a DOM adapter applies for the flag.
    pub fn class_name(&self) -> &'static str {
        match self {
            PresentationFlag::CaptureAttached => "uipick-capture-attached",
            PresentationFlag::PickingActive => "uipick-picking-active",
        }
    }
}

/// Operations the capture manager needs from the host platform.
pub trait CaptureHooks {
    /// Install the capture-phase listeners. Called once per attach.
    fn install_listeners(&mut self);

    /// Remove the capture-phase listeners. Called once per detach.
    fn remove_listeners(&mut self);

    /// Turn a presentation flag on or off.
    fn set_flag(&mut self, flag: PresentationFlag, on: bool);
}

/// Hooks for hosts that drive the manager directly (tests, replays).
#[derive(Debug, Default)]
pub struct NoopHooks;

impl CaptureHooks for NoopHooks {
    fn install_listeners(&mut self) {}

    fn remove_listeners(&mut self) {}

    fn set_flag(&mut self, _flag: PresentationFlag, _on: bool) {}
}

/// Observable platform state shared between a [`FlagRecorder`] and its owner.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlatformState {
    pub listeners_installed: bool,
    pub installs: usize,
    pub removals: usize,
    pub flags: BTreeSet<PresentationFlag>,
}

/// Hooks that record what the manager asked for.
///
/// Clones share state, so a host can keep one handle and hand the other to
/// the manager.
#[derive(Debug, Default, Clone)]
pub struct FlagRecorder {
    state: Rc<RefCell<PlatformState>>,
}

impl FlagRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded state.
    pub fn snapshot(&self) -> PlatformState {
        self.state.borrow().clone()
    }

    pub fn is_set(&self, flag: PresentationFlag) -> bool {
        self.state.borrow().flags.contains(&flag)
    }
}

impl CaptureHooks for FlagRecorder {
    fn install_listeners(&mut self) {
        let mut state = self.state.borrow_mut();
        state.listeners_installed = true;
        state.installs += 1;
    }

    fn remove_listeners(&mut self) {
        let mut state = self.state.borrow_mut();
        state.listeners_installed = false;
        state.removals += 1;
    }

    fn set_flag(&mut self, flag: PresentationFlag, on: bool) {
        let mut state = self.state.borrow_mut();
        if on {
            state.flags.insert(flag);
        } else {
            state.flags.remove(&flag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_clones_share_state() {
        let recorder = FlagRecorder::new();
        let mut handle = recorder.clone();
        handle.install_listeners();
        handle.set_flag(PresentationFlag::PickingActive, true);
        assert!(recorder.snapshot().listeners_installed);
        assert!(recorder.is_set(PresentationFlag::PickingActive));
        handle.set_flag(PresentationFlag::PickingActive, false);
        handle.remove_listeners();
        let state = recorder.snapshot();
        assert!(!state.listeners_installed);
        assert_eq!((state.installs, state.removals), (1, 1));
        assert!(state.flags.is_empty());
    }
}
