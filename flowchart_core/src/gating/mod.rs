//! Gating Evaluator - which nodes are locked and which connections are drawn.
//!
//! Rules:
//! 1. A connection is **satisfied** if it has no condition or every required
//!    flag is present.
//! 2. A node is **locked** iff it has at least one conditional incoming
//!    connection and none of them is satisfied (OR across inbound gates).
//! 3. Only satisfied connections are **visible**.
//!
//! Results are never cached; callers evaluate again on every redraw.

use serde::Serialize;
use std::collections::BTreeSet;

use story_data::{Connection, FlagSet, NodeId, TimePeriod};

/// Outcome of one gating pass over a time period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateReport<'a> {
    /// Locked node ids, sorted.
    pub locked: BTreeSet<NodeId>,
    /// Satisfied connections in document order.
    pub visible: Vec<&'a Connection>,
}

impl<'a> GateReport<'a> {
    pub fn is_locked(&self, id: &NodeId) -> bool {
        self.locked.contains(id)
    }
}

/// Evaluate gating for every node and connection in `period`.
pub fn evaluate<'a>(period: &'a TimePeriod, flags: &FlagSet) -> GateReport<'a> {
    let locked = period
        .nodes()
        .iter()
        .filter(|node| node_locked(period, &node.id, flags))
        .map(|node| node.id.clone())
        .collect();

    let visible = period
        .connections()
        .iter()
        .filter(|conn| conn.is_satisfied(flags))
        .collect();

    GateReport { locked, visible }
}

/// Decide whether a single node is locked under `flags`.
pub fn node_locked(period: &TimePeriod, id: &NodeId, flags: &FlagSet) -> bool {
    let mut gated = period.incoming(id).filter(|conn| conn.is_conditional()).peekable();
    if gated.peek().is_none() {
        return false;
    }
    !gated.any(|conn| conn.is_satisfied(flags))
}
