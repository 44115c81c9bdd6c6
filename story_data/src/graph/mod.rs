//! Story graph - time periods and the nodes and connections inside them.

mod connection;
mod node;

pub use connection::*;
pub use node::*;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::StoryResult;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a time period ("tab"), e.g. `"morning"`.
    TimePeriodId
);

string_id!(
    /// Identifier of a node, unique within its time period.
    NodeId
);

/// One tab of the diagram: an ordered list of nodes plus their connections.
#[derive(Debug, Clone)]
pub struct TimePeriod {
    pub id: TimePeriodId,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    node_positions: HashMap<NodeId, usize>,
}

impl TimePeriod {
    /// Build a time period. When ids repeat, lookups resolve to the first node.
    pub fn new(id: impl Into<TimePeriodId>, nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        let mut node_positions = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            node_positions.entry(node.id.clone()).or_insert(position);
        }

        Self {
            id: id.into(),
            nodes,
            connections,
            node_positions,
        }
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_positions.get(id).map(|&position| &self.nodes[position])
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_positions.contains_key(id)
    }

    /// All connections pointing at `id`.
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |conn| &conn.to == id)
    }
}

#[derive(Deserialize)]
struct TimePeriodRecord {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    connections: Option<Vec<Connection>>,
}

/// The whole story of one day: time periods in tab order.
///
/// Loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct StoryGraph {
    periods: Vec<TimePeriod>,
}

impl StoryGraph {
    /// Create a graph from periods given in tab order.
    pub fn new(periods: Vec<TimePeriod>) -> Self {
        Self { periods }
    }

    /// Parse the `{"times": {...}}` story document.
    pub fn from_json_str(json: &str) -> StoryResult<Self> {
        let graph: StoryGraph = serde_json::from_str(json)?;
        tracing::debug!(periods = graph.periods.len(), "parsed story graph");
        Ok(graph)
    }

    pub fn period(&self, id: &TimePeriodId) -> Option<&TimePeriod> {
        self.periods.iter().find(|period| &period.id == id)
    }

    /// Periods in tab order.
    pub fn periods(&self) -> impl Iterator<Item = &TimePeriod> {
        self.periods.iter()
    }

    /// The first tab, active when a page opens.
    pub fn first_period(&self) -> Option<&TimePeriod> {
        self.periods.first()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Visits the `times` object, keeping keys in document order.
struct OrderedPeriods(Vec<TimePeriod>);

impl<'de> Deserialize<'de> for OrderedPeriods {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PeriodsVisitor;

        impl<'de> Visitor<'de> for PeriodsVisitor {
            type Value = OrderedPeriods;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of time period id to period data")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut periods = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, record)) = map.next_entry::<String, TimePeriodRecord>()? {
                    periods.push(TimePeriod::new(
                        id,
                        record.nodes,
                        record.connections.unwrap_or_default(),
                    ));
                }
                Ok(OrderedPeriods(periods))
            }
        }

        deserializer.deserialize_map(PeriodsVisitor)
    }
}

impl<'de> Deserialize<'de> for StoryGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Document {
            #[serde(default)]
            times: Option<OrderedPeriods>,
        }

        let document = Document::deserialize(deserializer)?;
        Ok(StoryGraph::new(
            document.times.map(|times| times.0).unwrap_or_default(),
        ))
    }
}
