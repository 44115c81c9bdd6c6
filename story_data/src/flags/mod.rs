//! Narrative flags - facts the viewer has triggered, never revoked.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named narrative event, e.g. `"metGuide"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(pub String);

impl Flag {
    /// Create a flag from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Flag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Flag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically growing set of flags for one browsing session.
///
/// There is no removal operation: once a flag is set it stays set, which is
/// what makes gating monotone (flags only ever unlock).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FlagSet {
    flags: BTreeSet<Flag>,
}

impl FlagSet {
    /// Create an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a flag. Returns `true` if it was not present before.
    pub fn insert(&mut self, flag: Flag) -> bool {
        self.flags.insert(flag)
    }

    pub fn contains(&self, flag: &Flag) -> bool {
        self.flags.contains(flag)
    }

    /// Check that every flag yielded by `required` is present.
    pub fn contains_all<'a>(&self, mut required: impl Iterator<Item = &'a Flag>) -> bool {
        required.all(|flag| self.flags.contains(flag))
    }

    /// Check whether every flag here is also in `other`.
    pub fn is_subset(&self, other: &FlagSet) -> bool {
        self.flags.is_subset(&other.flags)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Iterate flags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

impl Extend<Flag> for FlagSet {
    fn extend<I: IntoIterator<Item = Flag>>(&mut self, iter: I) {
        self.flags.extend(iter);
    }
}
