//! Suppression tokens pairing a release with the press that already
//! resolved a pick.

use serde::Serialize;
use uipick_common::config::CaptureConfig;
use uipick_ui_model::{NodeId, PointerEvent, PointerKind, TimestampMs, UiTree};

/// One in-flight gesture whose press resolved a pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuppressionToken {
    /// Target root the press resolved to.
    pub anchor: NodeId,
    pub down_at_ms: TimestampMs,
    /// Last timestamp at which a release is still paired.
    pub expires_at_ms: TimestampMs,
    pub down_x: f64,
    pub down_y: f64,
    pub pointer: PointerKind,
}

/// How a release compares to a pending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCheck {
    /// Same gesture; suppress the release.
    Paired,
    /// The release has no resolvable target.
    NoTarget,
    /// The release landed outside the anchor.
    OutsideAnchor,
    /// The release came after the budget.
    Expired,
    /// The pointer moved further than the threshold.
    TooFar,
}

impl SuppressionToken {
    /// Anchor a token on `anchor` at the press position and time.
    pub fn new(anchor: NodeId, press: &PointerEvent, budget_ms: u64) -> Self {
        Self {
            anchor,
            down_at_ms: press.timestamp_ms,
            expires_at_ms: press.timestamp_ms.saturating_add(budget_ms),
            down_x: press.x,
            down_y: press.y,
            pointer: press.pointer,
        }
    }

    /// Maximum press/release distance for this token's pointer kind.
    pub fn threshold_px(&self, config: &CaptureConfig) -> f64 {
        if self.pointer.is_coarse() {
            config.coarse_threshold_px
        } else {
            config.precise_threshold_px
        }
    }

    pub fn is_expired_at(&self, t: TimestampMs) -> bool {
        t > self.expires_at_ms
    }

    /// Decide whether `release` is the second half of this token's gesture.
    ///
    /// The distance bound is inclusive, as is the expiry instant.
    pub fn check(
        &self,
        tree: &dyn UiTree,
        release: &PointerEvent,
        config: &CaptureConfig,
    ) -> TokenCheck {
        let Some(target) = tree.event_target(release) else {
            return TokenCheck::NoTarget;
        };
        if tree.node(self.anchor).is_none() || !tree.contains(self.anchor, target) {
            return TokenCheck::OutsideAnchor;
        }
        if self.is_expired_at(release.timestamp_ms) {
            return TokenCheck::Expired;
        }
        let threshold = self.threshold_px(config);
        if release.distance_sq(self.down_x, self.down_y) > threshold * threshold {
            return TokenCheck::TooFar;
        }
        TokenCheck::Paired
    }
}
