//! Capture manager: turns press/release pairs into exactly one resolved pick.
//!
//! States:
//!
//! ```text
//!   detached ──attach()──▶ attached-idle ──start_picking(kind)──▶ armed(kind)
//!      ▲                      │      ▲                               │
//!      └──────detach()────────┘      └────────stop_picking()─────────┘
//! ```
//!
//! `detach()` from `armed` also disarms. Arming while armed replaces the
//! kind and callback in one step. Nothing here returns an error: misuse and
//! misses are no-ops reported through [`ResolutionOutcome`].

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use uipick_common::config::CaptureConfig;
use uipick_target_contract::{find_target_root, TargetContract, TargetValidation};
use uipick_ui_model::{NodeId, PointerEvent, PointerPhase, UiTree};

use crate::hooks::{CaptureHooks, NoopHooks, PresentationFlag};
use crate::outcome::{Dispatch, Disposition, ResolutionOutcome};
use crate::picker::PickerKind;
use crate::suppression::{SuppressionToken, TokenCheck};

/// What an armed callback receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPick {
    pub kind: PickerKind,
    pub validation: TargetValidation,
    /// The event the pick resolved on.
    pub event: PointerEvent,
}

/// Callback invoked once per resolved gesture.
pub type PickCallback = Box<dyn FnMut(&ResolvedPick)>;

/// Coarse lifecycle state of a capture manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "kind")]
pub enum CaptureState {
    Detached,
    AttachedIdle,
    Armed(PickerKind),
}

struct ArmedPicker {
    kind: PickerKind,
    on_pick: PickCallback,
}

/// Owns the capture listeners, the armed picker, and the pending
/// suppression token.
pub struct CaptureManager {
    config: CaptureConfig,
    contract: TargetContract,
    hooks: Box<dyn CaptureHooks>,
    attached: bool,
    armed: Option<ArmedPicker>,
    token: Option<SuppressionToken>,
}

impl CaptureManager {
    /// Create a detached manager.
    pub fn new(
        config: CaptureConfig,
        contract: TargetContract,
        hooks: Box<dyn CaptureHooks>,
    ) -> Self {
        Self {
            config,
            contract,
            hooks,
            attached: false,
            armed: None,
            token: None,
        }
    }

    /// Default thresholds and contract, no platform hooks.
    pub fn with_defaults() -> Self {
        Self::new(
            CaptureConfig::default(),
            TargetContract::default(),
            Box::new(NoopHooks),
        )
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Toggle verbose decision logging. Observational only.
    pub fn set_debug_decisions(&mut self, on: bool) {
        self.config.debug_decisions = on;
    }

    pub fn state(&self) -> CaptureState {
        match (&self.armed, self.attached) {
            (Some(armed), true) => CaptureState::Armed(armed.kind),
            (_, true) => CaptureState::AttachedIdle,
            (_, false) => CaptureState::Detached,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a picker kind is armed.
    pub fn is_picking_active(&self) -> bool {
        self.armed.is_some()
    }

    pub fn armed_kind(&self) -> Option<PickerKind> {
        self.armed.as_ref().map(|a| a.kind)
    }

    pub fn has_pending_suppression(&self) -> bool {
        self.token.is_some()
    }

    pub fn pending_suppression(&self) -> Option<&SuppressionToken> {
        self.token.as_ref()
    }

    /// Install the capture listeners. Idempotent.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.hooks.install_listeners();
        self.hooks.set_flag(PresentationFlag::CaptureAttached, true);
        self.attached = true;
        tracing::debug!("Capture listeners attached");
    }

    /// Remove the capture listeners, disarming and dropping any token.
    /// Idempotent.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.disarm();
        self.hooks.remove_listeners();
        self.hooks.set_flag(PresentationFlag::CaptureAttached, false);
        self.attached = false;
        tracing::debug!("Capture listeners detached");
    }

    /// Arm `kind` with a callback, replacing whatever was armed.
    ///
    /// Returns `false` without arming when the manager is detached.
    pub fn start_picking<F>(&mut self, kind: PickerKind, on_pick: F) -> bool
    where
        F: FnMut(&ResolvedPick) + 'static,
    {
        if !self.attached {
            tracing::warn!(kind = %kind, "start_picking while detached, ignoring");
            return false;
        }
        if let Some(previous) = self.armed_kind() {
            tracing::debug!(from = %previous, to = %kind, "Replacing armed picker");
        }
        // The old callback and its token must be gone before the new
        // callback exists.
        self.disarm();
        self.armed = Some(ArmedPicker {
            kind,
            on_pick: Box::new(on_pick),
        });
        self.hooks.set_flag(PresentationFlag::PickingActive, true);
        tracing::debug!(kind = %kind, "Picker armed");
        true
    }

    /// Disarm. In-flight gestures become no-ops.
    pub fn stop_picking(&mut self) {
        if self.armed.is_some() {
            tracing::debug!("Picker disarmed");
        }
        self.disarm();
    }

    fn disarm(&mut self) {
        let was_armed = self.armed.take().is_some();
        self.token = None;
        if was_armed {
            self.hooks.set_flag(PresentationFlag::PickingActive, false);
        }
    }

    /// Dispatch an event by phase.
    pub fn handle_event(&mut self, tree: &dyn UiTree, event: &PointerEvent) -> Dispatch {
        match event.phase {
            PointerPhase::Down => self.handle_press(tree, event),
            PointerPhase::Up => self.handle_release(tree, event),
            PointerPhase::Cancel => self.handle_cancel(event),
        }
    }

    /// First-phase handler (press).
    pub fn handle_press(&mut self, tree: &dyn UiTree, event: &PointerEvent) -> Dispatch {
        let dispatch = self.press(tree, event);
        self.log_decision(event, &dispatch);
        dispatch
    }

    /// Second-phase handler (release or click).
    pub fn handle_release(&mut self, tree: &dyn UiTree, event: &PointerEvent) -> Dispatch {
        let dispatch = self.release(tree, event);
        self.log_decision(event, &dispatch);
        dispatch
    }

    /// Gesture aborted by the platform; the pending token is dropped.
    pub fn handle_cancel(&mut self, event: &PointerEvent) -> Dispatch {
        let dispatch = if !self.attached {
            Dispatch::pass(ResolutionOutcome::NotAttached)
        } else if self.token.take().is_some() {
            Dispatch::pass(ResolutionOutcome::TokenCleared)
        } else {
            Dispatch::pass(ResolutionOutcome::Ignored)
        };
        self.log_decision(event, &dispatch);
        dispatch
    }

    fn press(&mut self, tree: &dyn UiTree, event: &PointerEvent) -> Dispatch {
        let kind = match self.precheck() {
            Ok(kind) => kind,
            Err(outcome) => return Dispatch::pass(outcome),
        };
        if self.config.primary_button_only && !event.is_primary() {
            return Dispatch::pass(ResolutionOutcome::NotPrimaryButton);
        }
        if touches_host_panel(tree, event) {
            return Dispatch::pass(ResolutionOutcome::TargetInHostPanel);
        }

        match self.resolve(tree, event, kind) {
            Ok(validation) => {
                self.token = Some(SuppressionToken::new(
                    validation.root,
                    event,
                    self.config.suppression_budget_ms,
                ));
                self.deliver(kind, validation, event, None)
            }
            Err(dispatch) => dispatch,
        }
    }

    fn release(&mut self, tree: &dyn UiTree, event: &PointerEvent) -> Dispatch {
        let kind = match self.precheck() {
            Ok(kind) => kind,
            Err(outcome) => return Dispatch::pass(outcome),
        };

        let mut token_check = None;
        if let Some(token) = self.token.take() {
            let check = token.check(tree, event, &self.config);
            if check == TokenCheck::Paired {
                return Dispatch {
                    disposition: Disposition::Suppress,
                    outcome: ResolutionOutcome::SuppressedPaired,
                    root_id: tree
                        .node(token.anchor)
                        .and_then(|n| n.attrs.non_empty_id())
                        .map(str::to_string),
                    token: Some(check),
                };
            }
            tracing::debug!(
                check = ?check,
                "Release not paired with press, resolving on its own"
            );
            token_check = Some(check);
        }

        if self.config.primary_button_only && !event.is_primary() {
            return Dispatch {
                token: token_check,
                ..Dispatch::pass(ResolutionOutcome::NotPrimaryButton)
            };
        }
        if touches_host_panel(tree, event) {
            return Dispatch {
                token: token_check,
                ..Dispatch::pass(ResolutionOutcome::TargetInHostPanel)
            };
        }
        match self.resolve(tree, event, kind) {
            Ok(validation) => self.deliver(kind, validation, event, token_check),
            Err(mut dispatch) => {
                dispatch.token = token_check;
                dispatch
            }
        }
    }

    fn precheck(&self) -> Result<PickerKind, ResolutionOutcome> {
        if !self.attached {
            return Err(ResolutionOutcome::NotAttached);
        }
        self.armed_kind().ok_or(ResolutionOutcome::NotArmed)
    }

    /// Find, filter, and validate the target root under an event.
    fn resolve(
        &self,
        tree: &dyn UiTree,
        event: &PointerEvent,
        kind: PickerKind,
    ) -> Result<TargetValidation, Dispatch> {
        let Some(root) = locate_root(tree, event) else {
            return Err(Dispatch::pass(ResolutionOutcome::NoRootFound));
        };
        let root_id = tree
            .node(root)
            .and_then(|n| n.attrs.non_empty_id())
            .map(str::to_string);
        let Some(id) = root_id.clone() else {
            return Err(Dispatch::pass(ResolutionOutcome::NoRootFound));
        };

        if !kind.accepts(&id) {
            return Err(Dispatch {
                root_id,
                ..Dispatch::pass(ResolutionOutcome::FilterRejected)
            });
        }

        let validation = self.contract.validate(tree, root);
        if !validation.ok {
            tracing::debug!(
                root_id = %id,
                key = ?validation.violation_key,
                reasons = ?validation.reasons,
                "Target failed contract"
            );
            return Err(Dispatch {
                root_id,
                ..Dispatch::pass(ResolutionOutcome::ValidationFailed)
            });
        }
        Ok(validation)
    }

    fn deliver(
        &mut self,
        kind: PickerKind,
        validation: TargetValidation,
        event: &PointerEvent,
        token: Option<TokenCheck>,
    ) -> Dispatch {
        let root_id = validation.root_id.clone();
        let pick = ResolvedPick {
            kind,
            validation,
            event: event.clone(),
        };
        if let Some(armed) = self.armed.as_mut() {
            let on_pick = &mut armed.on_pick;
            if panic::catch_unwind(AssertUnwindSafe(|| on_pick(&pick))).is_err() {
                tracing::warn!(kind = %kind, root_id = ?root_id, "Pick callback panicked");
            }
        }
        Dispatch {
            disposition: Disposition::Suppress,
            outcome: ResolutionOutcome::Resolved,
            root_id,
            token,
        }
    }

    fn log_decision(&self, event: &PointerEvent, dispatch: &Dispatch) {
        if self.config.debug_decisions {
            tracing::debug!(
                phase = ?event.phase,
                t = event.timestamp_ms,
                x = event.x,
                y = event.y,
                outcome = %dispatch.outcome,
                root_id = ?dispatch.root_id,
                token = ?dispatch.token,
                suppressed = dispatch.is_suppressed(),
                "Pick decision"
            );
        } else {
            tracing::trace!(
                phase = ?event.phase,
                outcome = %dispatch.outcome,
                "Pick decision"
            );
        }
    }
}

impl Default for CaptureManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Whether the event's path, or the target's ancestor chain when there is
/// no path, runs through the host panel.
fn touches_host_panel(tree: &dyn UiTree, event: &PointerEvent) -> bool {
    let chain = match tree.hit_test_path_of(event) {
        Some(path) => path,
        None => match tree.event_target(event) {
            Some(target) => std::iter::once(target)
                .chain(tree.ancestors_of(target))
                .collect(),
            None => Vec::new(),
        },
    };
    chain
        .into_iter()
        .any(|id| tree.node(id).is_some_and(|n| n.host_panel))
}

/// Nearest target root along the hit-test path, falling back to the
/// ancestor chain of the immediate target.
fn locate_root(tree: &dyn UiTree, event: &PointerEvent) -> Option<NodeId> {
    if let Some(path) = tree.hit_test_path_of(event) {
        if let Some(root) = path.into_iter().find_map(|id| find_target_root(tree, id)) {
            return Some(root);
        }
    }
    tree.event_target(event)
        .and_then(|target| find_target_root(tree, target))
}
