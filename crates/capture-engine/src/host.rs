//! Picker host: arms kinds on a capture manager and keeps the last pick per
//! kind, the way a tuning panel shows "currently selected target".

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uipick_target_contract::TargetScope;
use uipick_ui_model::{PointerEvent, UiTree};

use crate::manager::{CaptureManager, ResolvedPick};
use crate::outcome::Dispatch;
use crate::picker::PickerKind;

/// A selection recorded from a resolved pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickedTarget {
    pub kind: PickerKind,
    pub id: String,
    pub role_group: Option<String>,
    pub scope: Option<TargetScope>,
    pub surface_is_root: bool,
    pub picked_at: DateTime<Utc>,
}

impl PickedTarget {
    /// `None` when the pick carries no root id, which a valid pick always has.
    pub fn from_pick(pick: &ResolvedPick) -> Option<Self> {
        Some(Self {
            kind: pick.kind,
            id: pick.validation.root_id.clone()?,
            role_group: pick.validation.role_group.clone(),
            scope: pick.validation.scope,
            surface_is_root: pick.validation.surface_is_root,
            picked_at: Utc::now(),
        })
    }
}

/// Shared view of the current selection per kind.
#[derive(Debug, Default, Clone)]
pub struct PickSelections {
    inner: Rc<RefCell<BTreeMap<PickerKind, PickedTarget>>>,
}

impl PickSelections {
    pub fn get(&self, kind: PickerKind) -> Option<PickedTarget> {
        self.inner.borrow().get(&kind).cloned()
    }

    pub fn all(&self) -> BTreeMap<PickerKind, PickedTarget> {
        self.inner.borrow().clone()
    }

    pub fn clear(&self, kind: PickerKind) -> Option<PickedTarget> {
        self.inner.borrow_mut().remove(&kind)
    }

    fn record(&self, target: PickedTarget) {
        self.inner.borrow_mut().insert(target.kind, target);
    }
}

/// Owns a capture manager on behalf of one or more tuning tools.
pub struct PickerHost {
    manager: CaptureManager,
    selections: PickSelections,
    disarm_after_pick: bool,
    disarm_pending: bool,
}

impl PickerHost {
    /// Wrap a manager and attach it.
    pub fn new(mut manager: CaptureManager) -> Self {
        manager.attach();
        Self {
            manager,
            selections: PickSelections::default(),
            disarm_after_pick: false,
            disarm_pending: false,
        }
    }

    /// Return to idle after each successful pick instead of staying armed.
    pub fn disarm_after_pick(mut self, on: bool) -> Self {
        self.disarm_after_pick = on;
        self
    }

    pub fn manager(&self) -> &CaptureManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut CaptureManager {
        &mut self.manager
    }

    /// Handle onto the selections that outlives borrows of the host.
    pub fn selections(&self) -> PickSelections {
        self.selections.clone()
    }

    /// Arm `kind`, replacing any other armed kind.
    pub fn arm(&mut self, kind: PickerKind) -> bool {
        self.disarm_pending = false;
        let selections = self.selections.clone();
        self.manager.start_picking(kind, move |pick| {
            match PickedTarget::from_pick(pick) {
                Some(target) => {
                    tracing::info!(kind = %target.kind, id = %target.id, "Target picked");
                    selections.record(target);
                }
                None => tracing::warn!(kind = %pick.kind, "Resolved pick without a root id"),
            }
        })
    }

    pub fn disarm(&mut self) {
        self.disarm_pending = false;
        self.manager.stop_picking();
    }

    /// Forward an event to the manager.
    pub fn dispatch(&mut self, tree: &dyn UiTree, event: &PointerEvent) -> Dispatch {
        let dispatch = self.manager.handle_event(tree, event);
        if self.disarm_after_pick && (dispatch.is_resolved() || self.disarm_pending) {
            // Stay armed until the paired release is consumed, otherwise it
            // would reach the application unsuppressed.
            if self.manager.has_pending_suppression() {
                self.disarm_pending = true;
            } else {
                self.disarm_pending = false;
                self.manager.stop_picking();
            }
        }
        dispatch
    }

    pub fn selection(&self, kind: PickerKind) -> Option<PickedTarget> {
        self.selections.get(kind)
    }

    pub fn clear(&mut self, kind: PickerKind) -> Option<PickedTarget> {
        self.selections.clear(kind)
    }
}
