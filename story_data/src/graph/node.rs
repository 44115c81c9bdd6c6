//! Story nodes - the beats of a time period.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::NodeId;
use crate::flags::Flag;

/// A single story beat.
///
/// Display state (open/locked) is not stored here: open state belongs to the
/// view, locked state is derived on every gating pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Flag emitted the first time the node is opened.
    #[serde(default, alias = "setsFlag", skip_serializing_if = "Option::is_none")]
    pub sets_flag: Option<Flag>,

    /// Presentation fields (title, text, ...) the engine passes through untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Node {
    /// Create a node with no flag side effect.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            sets_flag: None,
            extra: HashMap::new(),
        }
    }

    /// Builder: set the flag emitted when this node is opened.
    pub fn with_flag(mut self, flag: impl Into<Flag>) -> Self {
        self.sets_flag = Some(flag.into());
        self
    }
}
