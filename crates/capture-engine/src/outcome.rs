//! Per-event decisions reported by the capture manager.

use std::fmt;

use serde::Serialize;

use crate::suppression::TokenCheck;

/// What the platform adapter should do with the event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Let the event continue to the application.
    Propagate,
    /// Stop propagation and prevent the default action.
    Suppress,
}

/// Why the manager handled an event the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionOutcome {
    NotAttached,
    NotArmed,
    NotPrimaryButton,
    TargetInHostPanel,
    NoRootFound,
    FilterRejected,
    ValidationFailed,
    Resolved,
    /// The release belonged to a gesture whose press already resolved.
    SuppressedPaired,
    /// A cancel discarded the pending token.
    TokenCleared,
    /// Nothing to do for this event.
    Ignored,
}

impl ResolutionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::NotAttached => "NOT_ATTACHED",
            ResolutionOutcome::NotArmed => "NOT_ARMED",
            ResolutionOutcome::NotPrimaryButton => "NOT_PRIMARY_BUTTON",
            ResolutionOutcome::TargetInHostPanel => "TARGET_IN_HOST_PANEL",
            ResolutionOutcome::NoRootFound => "NO_ROOT_FOUND",
            ResolutionOutcome::FilterRejected => "FILTER_REJECTED",
            ResolutionOutcome::ValidationFailed => "VALIDATION_FAILED",
            ResolutionOutcome::Resolved => "RESOLVED",
            ResolutionOutcome::SuppressedPaired => "SUPPRESSED_PAIRED",
            ResolutionOutcome::TokenCleared => "TOKEN_CLEARED",
            ResolutionOutcome::Ignored => "IGNORED",
        }
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatch {
    pub disposition: Disposition,
    pub outcome: ResolutionOutcome,
    /// Id of the target root the event was resolved against, if any.
    pub root_id: Option<String>,
    /// How a release compared to the pending token, when one existed.
    pub token: Option<TokenCheck>,
}

impl Dispatch {
    pub(crate) fn pass(outcome: ResolutionOutcome) -> Self {
        Self {
            disposition: Disposition::Propagate,
            outcome,
            root_id: None,
            token: None,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.disposition == Disposition::Suppress
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome == ResolutionOutcome::Resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_codes_match_serde() {
        for outcome in [
            ResolutionOutcome::NotAttached,
            ResolutionOutcome::TargetInHostPanel,
            ResolutionOutcome::SuppressedPaired,
            ResolutionOutcome::Ignored,
        ] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.as_str()));
        }
    }
}
