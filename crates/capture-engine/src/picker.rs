//! Picker kinds and their id namespace filters.
//!
//! Exactly one kind can be armed at a time. Each kind only accepts target
//! ids in its own namespace, so the same gesture never resolves for two
//! tuning tools.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uipick_common::error::UiPickError;
use uipick_ui_model::UiTree;

/// Marker segment carried by plate target ids (`homeHub:plate:mode:practice`).
pub const PLATE_MARKER: &str = ":plate:";

/// Marker segment carried by card target ids (`practice:card:session`).
pub const CARD_MARKER: &str = ":card:";

/// Plate targets the plate tuner ships presets for.
pub const CANONICAL_PLATE_IDS: &[&str] = &[
    "homeHub:plate:mode:practice",
    "homeHub:plate:mode:wisdom",
    "homeHub:plate:mode:application",
    "homeHub:plate:mode:navigation",
    "practice:plate:submode:cognitive",
    "practice:plate:submode:somatic",
    "practice:plate:submode:emotion",
];

/// A picking mode a host can arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    /// Generic UI controls: ids without a plate or card marker.
    Controls,
    /// Accent plates: ids containing the plate marker.
    Plates,
    /// Content cards: ids containing the card marker.
    Card,
}

impl PickerKind {
    pub const ALL: [PickerKind; 3] = [PickerKind::Controls, PickerKind::Plates, PickerKind::Card];

    pub fn as_str(&self) -> &'static str {
        match self {
            PickerKind::Controls => "controls",
            PickerKind::Plates => "plates",
            PickerKind::Card => "card",
        }
    }

    /// Namespace filter over resolved target ids.
    pub fn accepts(&self, id: &str) -> bool {
        let plate = id.contains(PLATE_MARKER);
        let card = id.contains(CARD_MARKER);
        match self {
            PickerKind::Controls => !plate && !card,
            PickerKind::Plates => plate,
            PickerKind::Card => card,
        }
    }

    /// The kind whose filter accepts `id`. Filters are disjoint except for
    /// ids carrying both markers, which the plate filter claims first.
    pub fn for_id(id: &str) -> PickerKind {
        PickerKind::ALL
            .into_iter()
            .find(|kind| kind.accepts(id))
            .unwrap_or(PickerKind::Plates)
    }
}

/// Which picker kind claims each declared target id in a tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PickerCoverage {
    /// Target nodes with a usable id, counted per claiming kind.
    pub per_kind: BTreeMap<PickerKind, usize>,
    /// Plate ids the plate tuner has no preset for, deduplicated.
    pub plates_without_preset: Vec<String>,
}

impl PickerCoverage {
    pub fn of_tree(tree: &dyn UiTree) -> Self {
        let mut coverage = Self::default();
        for node_id in tree.nodes_matching(&|n| n.is_target()) {
            let Some(id) = tree.node(node_id).and_then(|n| n.attrs.non_empty_id()) else {
                continue;
            };
            let kind = PickerKind::for_id(id);
            *coverage.per_kind.entry(kind).or_insert(0) += 1;

            if kind == PickerKind::Plates
                && !CANONICAL_PLATE_IDS.contains(&id)
                && !coverage.plates_without_preset.iter().any(|p| p == id)
            {
                tracing::debug!(id, "Plate target has no preset");
                coverage.plates_without_preset.push(id.to_string());
            }
        }
        coverage
    }

    pub fn count(&self, kind: PickerKind) -> usize {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for PickerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PickerKind {
    type Err = UiPickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "controls" | "control" => Ok(PickerKind::Controls),
            "plates" | "plate" => Ok(PickerKind::Plates),
            "card" | "cards" => Ok(PickerKind::Card),
            other => Err(UiPickError::config(format!(
                "unknown picker kind '{other}' (expected controls, plates, or card)"
            ))),
        }
    }
}
