//! Commit pass of the traversal.
//!
//! Parents are visited by ascending depth. For each one the scanner partitions the
//! children into runs, this module turns the runs into descriptors and synthesized nodes,
//! then dispatches extension hooks for every output child and applies what they proposed.

use crate::config::LayoutConfig;
use crate::descriptor::{Alignment, ContainerType, LayoutDescriptor};
use crate::extension::{ExtensionHost, PendingGroup, ProcessResult};
use crate::float::FloatReflow;
use crate::node_kind::NodeKind;
use crate::scan::{scan_runs, Run};
use crate::session::LayoutSession;
use crate::tree::NodeTree;
use crate::LayoutError;
use boxflow_types::NodeId;
use std::collections::{BTreeMap, HashSet, VecDeque};

pub(crate) struct Traversal<'a> {
    tree: &'a mut NodeTree,
    session: &'a mut LayoutSession,
    host: &'a mut ExtensionHost,
    config: &'a LayoutConfig,
    queue: BTreeMap<usize, VecDeque<NodeId>>,
    visited: HashSet<NodeId>,
    descriptors: Vec<LayoutDescriptor>,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(
        tree: &'a mut NodeTree,
        session: &'a mut LayoutSession,
        host: &'a mut ExtensionHost,
        config: &'a LayoutConfig,
    ) -> Self {
        Self {
            tree,
            session,
            host,
            config,
            queue: BTreeMap::new(),
            visited: HashSet::new(),
            descriptors: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Vec<LayoutDescriptor>, LayoutError> {
        let root = self
            .tree
            .root()
            .ok_or_else(|| LayoutError::Generic("Cannot resolve an empty tree.".to_string()))?;
        self.tree.node_mut(root).rendered = true;
        self.enqueue(root);
        while let Some(parent) = self.pop() {
            self.process_parent(parent)?;
        }
        self.session.stats.descriptors = self.descriptors.len();
        Ok(self.descriptors)
    }

    fn enqueue(&mut self, node: NodeId) {
        if self.visited.insert(node) {
            let depth = self.tree[node].depth;
            self.queue.entry(depth).or_default().push_back(node);
        }
    }

    fn pop(&mut self) -> Option<NodeId> {
        let mut entry = self.queue.first_entry()?;
        let node = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        node
    }

    fn process_parent(&mut self, parent: NodeId) -> Result<(), LayoutError> {
        self.session.stats.parents += 1;
        let (children, descriptor) = if self.tree[parent].is_synthesized() {
            (self.tree[parent].children().to_vec(), None)
        } else {
            let (children, descriptor) = self.group_children(parent)?;
            (children, Some(descriptor))
        };

        self.refine_container(parent, &children);
        if let Some(mut descriptor) = descriptor {
            descriptor.container_type = self.tree[parent].container_type;
            if matches!(
                descriptor.container_type,
                ContainerType::Horizontal | ContainerType::Vertical
            ) {
                descriptor.alignment |= Alignment::AUTO_LAYOUT;
            }
            self.descriptors.push(descriptor);
        }

        self.dispatch_hooks(parent, &children)?;

        for child in self.tree[parent].children().to_vec() {
            let node = &self.tree[child];
            if node.visible && !node.excluded && !node.children().is_empty() {
                self.enqueue(child);
            }
        }
        Ok(())
    }

    /// Scans and commits the runs below `parent`, returning the new render children and
    /// the parent's own descriptor (container still to be refined).
    fn group_children(
        &mut self,
        parent: NodeId,
    ) -> Result<(Vec<NodeId>, LayoutDescriptor), LayoutError> {
        let tol = self.config.tolerance;
        let all = self.tree[parent].children().to_vec();
        let candidates: Vec<NodeId> = all
            .iter()
            .copied()
            .filter(|c| self.tree[*c].is_rendered_candidate())
            .collect();
        let already_rendered: Vec<NodeId> = all
            .iter()
            .copied()
            .filter(|c| self.tree[*c].rendered && self.tree[*c].visible)
            .collect();

        let linear = self.tree.linear_data(&candidates, tol);
        self.session
            .cleared
            .extend(linear.cleared.iter().map(|(node, clear)| (*node, *clear)));
        let runs = scan_runs(self.tree, parent, &candidates, &linear, self.config, true);
        self.session.stats.runs += runs.len();
        log::debug!(
            "{} children of {} form {} runs.",
            candidates.len(),
            parent,
            runs.len()
        );

        let flat = runs.iter().all(|run| !run.alignment.contains(Alignment::FLOAT))
            && (runs.len() == 1 || runs.iter().all(Run::is_singleton));
        let mut children_out: Vec<NodeId> = Vec::with_capacity(candidates.len());
        let mut parent_alignment = self.tree[parent].alignment;

        if flat {
            if let [run] = runs.as_slice() {
                parent_alignment |= run.alignment & !Alignment::SINGLE;
            }
            for run in &runs {
                for member in &run.members {
                    let node = self.tree.node_mut(*member);
                    node.rendered = true;
                    if run.is_singleton() {
                        node.alignment |= run.alignment;
                    }
                    children_out.push(*member);
                }
            }
        } else {
            // Position of each run's output node in `children_out`.
            let mut positions: Vec<usize> = Vec::with_capacity(runs.len());
            for run in &runs {
                for member in &run.members {
                    self.tree.node_mut(*member).rendered = true;
                }
                if run.is_float_layout() {
                    let anchor = run.extends.and_then(|index| positions.get(index).copied());
                    let original = anchor.map(|position| children_out[position]);
                    let node = self.reflow(parent, original, &run.members)?;
                    match anchor {
                        Some(position) => {
                            children_out[position] = node;
                            positions.push(position);
                        }
                        None => {
                            positions.push(children_out.len());
                            children_out.push(node);
                        }
                    }
                } else {
                    let node = match run.members.as_slice() {
                        [single] => {
                            self.tree.node_mut(*single).alignment |= run.alignment;
                            *single
                        }
                        _ => self.group_run(parent, run),
                    };
                    positions.push(children_out.len());
                    children_out.push(node);
                }
            }
        }

        for node in already_rendered {
            let index = self.tree[node].child_index;
            let at = children_out
                .iter()
                .position(|c| self.tree[*c].child_index > index)
                .unwrap_or(children_out.len());
            children_out.insert(at, node);
        }
        self.tree.set_children(parent, children_out.clone());
        self.tree.node_mut(parent).alignment = parent_alignment;

        let linear_out = self.tree.linear_data(&children_out, tol);
        let mut descriptor =
            LayoutDescriptor::new(self.tree[parent].parent(), parent, children_out.clone())
                .with_linear(&linear_out);
        descriptor.alignment = parent_alignment;
        Ok((children_out, descriptor))
    }

    fn reflow(
        &mut self,
        parent: NodeId,
        original: Option<NodeId>,
        members: &[NodeId],
    ) -> Result<NodeId, LayoutError> {
        let mut reflow = FloatReflow::new(self.tree, parent, self.config);
        let outcome = reflow.reflow(original, members)?;
        let descriptors = reflow.into_descriptors();

        self.session.stats.float_reflows += 1;
        for descriptor in &descriptors {
            if self.tree[descriptor.node].kind == NodeKind::Wrapper {
                self.session.stats.wrappers += 1;
            } else {
                self.session.stats.groups += 1;
            }
        }
        self.descriptors.extend(descriptors);
        Ok(outcome.node)
    }

    fn group_run(&mut self, parent: NodeId, run: &Run) -> NodeId {
        let linear = self.tree.linear_data(&run.members, self.config.tolerance);
        let container = linear.container_type();
        let group = self
            .tree
            .create_group(NodeKind::Group, run.members[0], run.members.clone());
        {
            let node = self.tree.node_mut(group);
            node.container_type = container;
            node.alignment = run.alignment;
            node.rendered = true;
        }
        let mut descriptor =
            LayoutDescriptor::new(Some(parent), group, run.members.clone()).with_linear(&linear);
        descriptor.container_type = container;
        descriptor.alignment = run.alignment;
        self.descriptors.push(descriptor);
        self.session.stats.groups += 1;
        group
    }

    /// Replaces a provisional container with the one implied by the final children.
    fn refine_container(&mut self, parent: NodeId, children: &[NodeId]) {
        let node = &self.tree[parent];
        if node.container_locked || !node.container_type.is_provisional() {
            return;
        }
        let container = if children.is_empty() {
            ContainerType::Plain
        } else {
            self.tree
                .linear_data(children, self.config.tolerance)
                .container_type()
        };
        self.tree.node_mut(parent).container_type = container;
    }

    fn dispatch_hooks(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), LayoutError> {
        if !self.host.is_empty() {
            let mut pending: Vec<PendingGroup> = Vec::new();
            let mut proposals: Vec<(NodeId, Vec<(usize, ProcessResult)>)> = Vec::new();
            for child in children {
                if !self.session.hooked.insert(*child) {
                    continue;
                }
                let results =
                    self.host
                        .dispatch(self.tree, self.session, &mut pending, *child, parent)?;
                self.session.stats.hooks_run += results.len();
                if !results.is_empty() {
                    proposals.push((*child, results));
                }
            }

            self.commit_pending(pending)?;
            for (child, results) in proposals {
                for (extension, result) in results {
                    self.apply(parent, child, extension, result)?;
                }
            }
        }

        for child in self.tree[parent].children().to_vec() {
            let node = self.tree.node_mut(child);
            if node.container_type == ContainerType::Unresolved {
                node.container_type = if node.children().is_empty() {
                    ContainerType::Leaf
                } else {
                    ContainerType::Group
                };
            }
        }
        Ok(())
    }

    /// Allocates the groups hooks reserved, in reservation order. Each group takes the slot
    /// of its first member in that member's render parent.
    fn commit_pending(&mut self, pending: Vec<PendingGroup>) -> Result<(), LayoutError> {
        for group in pending {
            let expected = self.tree.next_id();
            if group.id != expected {
                return Err(LayoutError::Generic(format!(
                    "Reserved group {} does not match allocation {}.",
                    group.id, expected
                )));
            }
            let previous = group
                .children
                .first()
                .and_then(|first| self.tree[*first].parent());
            let members: HashSet<NodeId> = group.children.iter().copied().collect();
            let id = self
                .tree
                .create_group(NodeKind::Group, group.template, group.children);
            self.tree.node_mut(id).rendered = true;
            self.session.hooked.insert(id);
            self.session.stats.groups += 1;

            if let Some(previous) = previous {
                let mut placed = false;
                let siblings: Vec<NodeId> = self.tree[previous]
                    .children()
                    .iter()
                    .filter_map(|c| {
                        if !members.contains(c) {
                            Some(*c)
                        } else if !placed {
                            placed = true;
                            Some(id)
                        } else {
                            None
                        }
                    })
                    .collect();
                self.tree.set_children(previous, siblings);
            }
            log::debug!("Extension group {} allocated.", id);
        }
        Ok(())
    }

    fn apply(
        &mut self,
        parent: NodeId,
        child: NodeId,
        extension: usize,
        result: ProcessResult,
    ) -> Result<(), LayoutError> {
        if let Some(container) = result.container {
            let node = self.tree.node_mut(child);
            node.container_type = container;
            node.container_locked = true;
        }
        if let Some(replacement) = result.replacement {
            self.tree.try_get(replacement)?;
            if replacement != child {
                self.tree.replace_child(parent, child, replacement);
                self.tree.node_mut(replacement).rendered = true;
                self.session.hooked.insert(replacement);
            }
        }
        if let Some(new_parent) = result.parent {
            self.tree.try_get(new_parent)?;
            if self.tree.is_render_ancestor(child, new_parent) {
                return Err(LayoutError::Generic(format!(
                    "Extension {} moved {} under its own subtree at {}.",
                    extension, child, new_parent
                )));
            }
            self.tree.reparent(child, new_parent);
            self.tree.node_mut(child).rendered = true;
            if !self.tree[child].children().is_empty() {
                self.enqueue(child);
            }
        }
        if let Some(include) = result.include {
            self.tree.node_mut(child).excluded = !include;
        }
        if result.subscribe {
            if let Some(list) = self.session.subscribed.get_mut(extension) {
                list.push(child);
            }
        }
        Ok(())
    }
}
