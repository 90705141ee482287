//! Per-resolve session state: side tables keyed by node id, torn down at `finish`.

use boxflow_style::Clear;
use boxflow_types::{NodeId, SessionId};
use serde::Serialize;
use std::any::Any;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Counters reported at the end of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub parents: usize,
    pub runs: usize,
    pub descriptors: usize,
    pub groups: usize,
    pub wrappers: usize,
    pub float_reflows: usize,
    pub hooks_run: usize,
    pub collapsed_margins: usize,
    pub hidden_elements: usize,
}

pub struct LayoutSession {
    id: SessionId,
    active: bool,
    pub(crate) cleared: BTreeMap<NodeId, Clear>,
    /// Node -> indexes of the extensions that asked to see its descendants.
    pub(crate) descendants: BTreeMap<NodeId, Vec<usize>>,
    pub(crate) extension_data: HashMap<(usize, NodeId), Box<dyn Any + Send>>,
    pub(crate) subscribed: Vec<Vec<NodeId>>,
    pub(crate) hooked: HashSet<NodeId>,
    pub stats: SessionStats,
}

impl LayoutSession {
    pub fn begin(id: SessionId, extension_count: usize) -> Self {
        log::debug!("Layout session {} started with {} extensions.", id, extension_count);
        Self {
            id,
            active: true,
            cleared: BTreeMap::new(),
            descendants: BTreeMap::new(),
            extension_data: HashMap::new(),
            subscribed: vec![Vec::new(); extension_count],
            hooked: HashSet::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Clear side recorded for `node` when it crossed an active float.
    pub fn cleared(&self, node: NodeId) -> Option<Clear> {
        self.cleared.get(&node).copied()
    }

    pub fn clear_markers(&self) -> &BTreeMap<NodeId, Clear> {
        &self.cleared
    }

    pub fn subscribed(&self, extension: usize) -> &[NodeId] {
        self.subscribed.get(extension).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drops every side table. Idempotent.
    pub fn finish(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.cleared.clear();
        self.descendants.clear();
        self.extension_data.clear();
        self.hooked.clear();
        log::info!(
            "Layout session {}: {} parents, {} runs, {} descriptors, {} groups, {} wrappers, {} float reflows, {} hooks, {} margins collapsed, {} elements hidden.",
            self.id,
            self.stats.parents,
            self.stats.runs,
            self.stats.descriptors,
            self.stats.groups,
            self.stats.wrappers,
            self.stats.float_reflows,
            self.stats.hooks_run,
            self.stats.collapsed_margins,
            self.stats.hidden_elements
        );
    }
}

impl std::fmt::Debug for LayoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutSession")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("cleared", &self.cleared)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_tears_down_side_tables() {
        let mut session = LayoutSession::begin(SessionId::new(3), 2);
        let node = NodeId::new(4);
        session.cleared.insert(node, Clear::Left);
        session.extension_data.insert((0, node), Box::new(7_u32));
        session.hooked.insert(node);
        session.subscribed[1].push(node);
        assert_eq!(session.cleared(node), Some(Clear::Left));

        session.finish();
        assert!(!session.is_active());
        assert_eq!(session.cleared(node), None);
        assert!(session.extension_data.is_empty());
        assert!(session.hooked.is_empty());
        // Subscriptions survive for the caller to read after teardown.
        assert_eq!(session.subscribed(1), &[node]);
        session.finish();
    }
}
