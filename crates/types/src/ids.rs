//! Newtype wrappers for node and session identifiers
//!
//! These types provide compile-time type safety so that arena indices and
//! session counters cannot be mixed up with plain integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a box node inside a layout arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new NodeId from an arena index
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the arena slot this id addresses
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of one traversal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    /// Creates a new SessionId from a counter value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw counter value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}
