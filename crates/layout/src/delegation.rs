//! Spacing-slot delegation as a disjoint-set forest.
//!
//! A node can hand one of its margin or padding slots to a partner node. The partner
//! becomes the owner of that slot from then on, and may itself delegate further. Each
//! chain ends at a terminal owner; `find` returns it and compresses the path on the way.

use crate::LayoutError;
use boxflow_types::NodeId;
use std::collections::HashMap;

/// One spacing slot of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub node: NodeId,
    pub slot: u8,
}

impl SlotKey {
    pub fn new(node: NodeId, slot: u8) -> Self {
        Self { node, slot }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Delegation {
    next: HashMap<SlotKey, SlotKey>,
}

impl Delegation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct partner of `key`, if it delegates.
    pub fn partner(&self, key: SlotKey) -> Option<SlotKey> {
        self.next.get(&key).copied()
    }

    pub fn is_delegated(&self, key: SlotKey) -> bool {
        self.next.contains_key(&key)
    }

    /// Terminal owner of `key` without touching the forest.
    pub fn owner(&self, key: SlotKey) -> SlotKey {
        let mut current = key;
        // Bounded by the edge count; `link` keeps the forest acyclic.
        for _ in 0..=self.next.len() {
            match self.next.get(&current) {
                Some(next) => current = *next,
                None => break,
            }
        }
        current
    }

    /// Terminal owner of `key`, pointing every slot on the walked path straight at it.
    pub fn find(&mut self, key: SlotKey) -> SlotKey {
        let root = self.owner(key);
        let mut current = key;
        while current != root {
            match self.next.insert(current, root) {
                Some(next) => current = next,
                None => break,
            }
        }
        root
    }

    /// Full chain starting at `key`, including `key` and its terminal owner.
    pub fn chain(&self, key: SlotKey) -> Vec<SlotKey> {
        let mut chain = vec![key];
        let mut current = key;
        while let Some(next) = self.next.get(&current) {
            if chain.contains(next) {
                break;
            }
            chain.push(*next);
            current = *next;
        }
        chain
    }

    /// Points `from` at `to`. Fails when `to` already resolves through `from`.
    pub fn link(&mut self, from: SlotKey, to: SlotKey) -> Result<(), LayoutError> {
        if from.node == to.node {
            return Err(LayoutError::SelfDelegation(from.node));
        }
        if self.chain(to).contains(&from) {
            return Err(LayoutError::DelegationCycle {
                node: from.node,
                partner: to.node,
            });
        }
        self.next.insert(from, to);
        Ok(())
    }

    /// Drops every edge leaving or entering `node`.
    pub fn forget(&mut self, node: NodeId) {
        self.next.retain(|from, to| from.node != node && to.node != node);
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(node: u32) -> SlotKey {
        SlotKey::new(NodeId::new(node), 0)
    }

    #[test]
    fn test_find_follows_chain_and_compresses() {
        let mut forest = Delegation::new();
        forest.link(key(1), key(2)).unwrap();
        forest.link(key(2), key(3)).unwrap();
        forest.link(key(3), key(4)).unwrap();

        assert_eq!(forest.owner(key(1)), key(4));
        assert_eq!(forest.find(key(1)), key(4));
        assert_eq!(forest.partner(key(1)), Some(key(4)));
        assert_eq!(forest.partner(key(2)), Some(key(4)));
        assert_eq!(forest.owner(key(4)), key(4));
    }

    #[test]
    fn test_link_rejects_cycles() {
        let mut forest = Delegation::new();
        forest.link(key(1), key(2)).unwrap();
        forest.link(key(2), key(3)).unwrap();

        let err = forest.link(key(3), key(1)).unwrap_err();
        assert!(matches!(err, LayoutError::DelegationCycle { .. }));
        assert_eq!(forest.owner(key(1)), key(3));
    }

    #[test]
    fn test_link_rejects_self() {
        let mut forest = Delegation::new();
        assert!(matches!(
            forest.link(key(5), key(5)),
            Err(LayoutError::SelfDelegation(_))
        ));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut forest = Delegation::new();
        forest.link(SlotKey::new(NodeId::new(1), 0), SlotKey::new(NodeId::new(2), 0)).unwrap();
        assert!(!forest.is_delegated(SlotKey::new(NodeId::new(1), 1)));
        forest.forget(NodeId::new(2));
        assert!(forest.is_empty());
    }

    #[test]
    fn test_chain_never_revisits() {
        let mut forest = Delegation::new();
        for i in 0..10 {
            let _ = forest.link(key(i), key((i + 1) % 10));
        }
        let chain = forest.chain(key(0));
        let mut seen = chain.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), chain.len());
    }
}
