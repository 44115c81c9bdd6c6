//! Directed connections between nodes, optionally gated by flags.

use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::flags::{Flag, FlagSet};

/// Flags that must all be present for a connection to be traversable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub requires: Vec<Flag>,
}

impl Condition {
    pub fn requires<I, F>(flags: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Flag>,
    {
        Self {
            requires: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// An empty requirement list is trivially met.
    pub fn is_met(&self, flags: &FlagSet) -> bool {
        flags.contains_all(self.requires.iter())
    }
}

/// A directed edge `from -> to` inside one time period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Connection {
    /// Create an unconditional connection.
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            condition: None,
        }
    }

    /// Builder: gate this connection on a set of required flags.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// A connection is satisfied if it has no condition or its condition is met.
    pub fn is_satisfied(&self, flags: &FlagSet) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.is_met(flags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconditional_always_satisfied() {
        let conn = Connection::new("a", "b");
        assert!(conn.is_satisfied(&FlagSet::new()));
        assert!(!conn.is_conditional());
    }

    #[test]
    fn test_condition_requires_all_flags() {
        let conn = Connection::new("a", "b").with_condition(Condition::requires(["x", "y"]));

        let mut flags = FlagSet::new();
        flags.insert(Flag::new("x"));
        assert!(!conn.is_satisfied(&flags));

        flags.insert(Flag::new("y"));
        assert!(conn.is_satisfied(&flags));
    }

    #[test]
    fn test_empty_condition_is_met() {
        let conn = Connection::new("a", "b").with_condition(Condition::default());
        assert!(conn.is_conditional());
        assert!(conn.is_satisfied(&FlagSet::new()));
    }
}
