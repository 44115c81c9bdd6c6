//! User interaction events routed into the view controller.

use serde::{Deserialize, Serialize};

use story_data::{Flag, NodeId, TimePeriodId};

/// An interaction coming from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// A tab button was clicked.
    SelectTimePeriod { period: TimePeriodId },
    /// A node in the active tab was clicked.
    ToggleNode { node: NodeId },
}

impl InteractionEvent {
    pub fn select(period: impl Into<TimePeriodId>) -> Self {
        InteractionEvent::SelectTimePeriod {
            period: period.into(),
        }
    }

    pub fn toggle(node: impl Into<NodeId>) -> Self {
        InteractionEvent::ToggleNode { node: node.into() }
    }
}

/// Why a toggle was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Locked nodes are inert.
    Locked,
    /// The node is not part of the active time period.
    UnknownNode,
}

/// Result of a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleOutcome {
    /// Node opened; carries the flag if this opening emitted a new one.
    Opened { flag_added: Option<Flag> },
    Closed,
    /// No state changed and no redraw was scheduled.
    Rejected(RejectReason),
}

impl ToggleOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ToggleOutcome::Rejected(_))
    }
}

/// Result of handling an [`InteractionEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOutcome {
    TimePeriodSelected(TimePeriodId),
    Toggled(ToggleOutcome),
}
