//! The call contract between the traversal and registered extensions.
//!
//! Extensions observe each output child once its run has been finalized and may propose a
//! container, a replacement node, a different parent, exclusion or a subscription. The
//! proposals are applied by the traversal after every sibling has been dispatched, so an
//! extension never observes a tree that is being restructured under it.

use crate::descriptor::ContainerType;
use crate::session::LayoutSession;
use crate::tree::NodeTree;
use crate::LayoutError;
use boxflow_types::{NodeId, SessionId};
use std::any::Any;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtensionError {
    #[error("{0}")]
    Failed(String),
    #[error("Node {0} is not valid here.")]
    InvalidNode(NodeId),
}

/// What an extension wants done with a node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessResult {
    pub container: Option<ContainerType>,
    pub replacement: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub include: Option<bool>,
    /// Let later extensions process the node as well.
    pub next: bool,
    /// Stop dispatching for this node entirely.
    pub complete: bool,
    pub subscribe: bool,
}

impl ProcessResult {
    pub fn next() -> Self {
        Self {
            next: true,
            ..Default::default()
        }
    }

    pub fn complete() -> Self {
        Self {
            complete: true,
            ..Default::default()
        }
    }

    pub fn with_container(mut self, container: ContainerType) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_replacement(mut self, node: NodeId) -> Self {
        self.replacement = Some(node);
        self
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn excluded(mut self) -> Self {
        self.include = Some(false);
        self
    }

    pub fn subscribed(mut self) -> Self {
        self.subscribe = true;
        self
    }
}

pub trait Extension: Send {
    fn name(&self) -> &str;

    fn is_applicable(&self, _tree: &NodeTree, _node: NodeId) -> bool {
        true
    }

    fn matches(&self, tree: &NodeTree, node: NodeId, parent: NodeId) -> bool;

    fn process(
        &mut self,
        ctx: &mut HookContext<'_>,
        node: NodeId,
        parent: NodeId,
    ) -> Result<ProcessResult, ExtensionError>;

    /// Called for nodes below one this extension registered with
    /// [`HookContext::register_descendant`].
    fn process_descendant(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _node: NodeId,
        _parent: NodeId,
    ) -> Result<ProcessResult, ExtensionError> {
        Ok(ProcessResult::next())
    }

    fn before_traversal(&mut self, _session: &mut LayoutSession) {}

    fn after_traversal(
        &mut self,
        _session: &LayoutSession,
        _tree: &NodeTree,
        _subscribed: &[NodeId],
    ) -> Result<(), ExtensionError> {
        Ok(())
    }
}

/// A group requested by a hook. It is allocated in the commit pass under `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGroup {
    pub id: NodeId,
    pub template: NodeId,
    pub children: Vec<NodeId>,
}

/// Read access to the tree plus the session services a hook may use.
pub struct HookContext<'a> {
    tree: &'a NodeTree,
    session: &'a mut LayoutSession,
    extension: usize,
    pending: &'a mut Vec<PendingGroup>,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(
        tree: &'a NodeTree,
        session: &'a mut LayoutSession,
        extension: usize,
        pending: &'a mut Vec<PendingGroup>,
    ) -> Self {
        Self {
            tree,
            session,
            extension,
            pending,
        }
    }

    pub fn tree(&self) -> &NodeTree {
        self.tree
    }

    pub fn session_id(&self) -> SessionId {
        self.session.id()
    }

    /// Routes every node below `node` through this extension's `process_descendant`.
    pub fn register_descendant(&mut self, node: NodeId) {
        let entry = self.session.descendants.entry(node).or_default();
        if !entry.contains(&self.extension) {
            entry.push(self.extension);
        }
    }

    /// Reserves a group modelled on `template`. Linking happens after dispatch.
    pub fn create_group(
        &mut self,
        template: NodeId,
        children: Vec<NodeId>,
    ) -> Result<NodeId, ExtensionError> {
        self.tree
            .get(template)
            .ok_or(ExtensionError::InvalidNode(template))?;
        if let Some(unknown) = children.iter().find(|c| self.tree.get(**c).is_none()) {
            return Err(ExtensionError::InvalidNode(*unknown));
        }
        let id = NodeId::new((self.tree.len() + self.pending.len()) as u32);
        self.pending.push(PendingGroup {
            id,
            template,
            children,
        });
        Ok(id)
    }

    pub fn data<T: Any>(&self, node: NodeId) -> Option<&T> {
        self.session
            .extension_data
            .get(&(self.extension, node))
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn set_data<T: Any + Send>(&mut self, node: NodeId, value: T) {
        self.session
            .extension_data
            .insert((self.extension, node), Box::new(value));
    }

    pub fn take_data<T: Any>(&mut self, node: NodeId) -> Option<T> {
        let value = self.session.extension_data.remove(&(self.extension, node))?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }
}

/// Ordered extension registry. Dispatch order is registration order.
#[derive(Default)]
pub struct ExtensionHost {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, extension: Box<dyn Extension>) {
        log::debug!("Registered extension '{}'.", extension.name());
        self.extensions.push(extension);
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    pub(crate) fn before_traversal(&mut self, session: &mut LayoutSession) {
        for extension in &mut self.extensions {
            extension.before_traversal(session);
        }
    }

    pub(crate) fn after_traversal(
        &mut self,
        session: &LayoutSession,
        tree: &NodeTree,
    ) -> Result<(), LayoutError> {
        for (index, extension) in self.extensions.iter_mut().enumerate() {
            extension
                .after_traversal(session, tree, session.subscribed(index))
                .map_err(|e| extension_error(extension.name(), e))?;
        }
        Ok(())
    }

    /// Runs the descendant hooks and then the matching hooks for `node`.
    pub(crate) fn dispatch(
        &mut self,
        tree: &NodeTree,
        session: &mut LayoutSession,
        pending: &mut Vec<PendingGroup>,
        node: NodeId,
        parent: NodeId,
    ) -> Result<Vec<(usize, ProcessResult)>, LayoutError> {
        let mut results = Vec::new();

        for index in registered_ancestors(tree, session, parent) {
            let Some(extension) = self.extensions.get_mut(index) else {
                continue;
            };
            let mut ctx = HookContext::new(tree, session, index, pending);
            let result = extension
                .process_descendant(&mut ctx, node, parent)
                .map_err(|e| extension_error(extension.name(), e))?;
            results.push((index, result));
            if result.complete {
                return Ok(results);
            }
        }

        for (index, extension) in self.extensions.iter_mut().enumerate() {
            if !extension.is_applicable(tree, node) || !extension.matches(tree, node, parent) {
                continue;
            }
            let mut ctx = HookContext::new(tree, session, index, pending);
            let result = extension
                .process(&mut ctx, node, parent)
                .map_err(|e| extension_error(extension.name(), e))?;
            results.push((index, result));
            if result.complete || !result.next {
                break;
            }
        }
        Ok(results)
    }
}

/// Extensions registered on `parent` or any of its render ancestors, deduplicated.
fn registered_ancestors(tree: &NodeTree, session: &LayoutSession, parent: NodeId) -> Vec<usize> {
    if session.descendants.is_empty() {
        return Vec::new();
    }
    let mut found = Vec::new();
    let mut cursor = Some(parent);
    while let Some(current) = cursor {
        if let Some(indexes) = session.descendants.get(&current) {
            for index in indexes {
                if !found.contains(index) {
                    found.push(*index);
                }
            }
        }
        cursor = tree[current].parent();
    }
    found.sort_unstable();
    found
}

fn extension_error(name: &str, error: ExtensionError) -> LayoutError {
    LayoutError::Extension {
        name: name.to_string(),
        message: error.to_string(),
    }
}
