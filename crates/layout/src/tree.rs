//! Arena of box nodes addressed by `NodeId`.
//!
//! Relationships are index fields into the arena. Geometry is computed lazily and cached
//! per node; spacing mutations clear the caches through [`NodeTree::invalidate_layout`].

use crate::LayoutError;
use crate::delegation::Delegation;
use crate::node::{BoxNode, NodeFlags};
use crate::node_kind::NodeKind;
use crate::spacing::BoxSlot;
use boxflow_types::{NodeId, Rect};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SiblingKey {
    node: NodeId,
    trailing: bool,
    floats: bool,
}

#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: Vec<BoxNode>,
    root: Option<NodeId>,
    pub(crate) delegation: Delegation,
    siblings: RefCell<HashMap<SiblingKey, Vec<NodeId>>>,
}

impl Index<NodeId> for NodeTree {
    type Output = BoxNode;

    fn index(&self, id: NodeId) -> &BoxNode {
        &self.nodes[id.index()]
    }
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn next_id(&self) -> NodeId {
        NodeId::new(self.nodes.len() as u32)
    }

    /// Adds a node to the arena. The first node added becomes the root.
    pub fn push(&mut self, mut node: BoxNode) -> NodeId {
        let id = self.next_id();
        node.id = id;
        self.nodes.push(node);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&BoxNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut BoxNode> {
        self.nodes.get_mut(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut BoxNode {
        &mut self.nodes[id.index()]
    }

    pub fn try_get(&self, id: NodeId) -> Result<&BoxNode, LayoutError> {
        self.get(id).ok_or(LayoutError::UnknownNode(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoxNode> {
        self.nodes.iter()
    }

    // --- Structure ---

    /// Links `child` under `parent` in both the render and the source structure.
    pub fn append_dom_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self[parent].dom_children.len();
        let depth = self[parent].depth + 1;
        {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.actual_parent = Some(parent);
            node.child_index = index;
            node.depth = depth;
        }
        let parent_node = self.node_mut(parent);
        parent_node.dom_children.push(child);
        parent_node.children.push(child);
        self.structure_changed();
    }

    /// Replaces the render children of `parent`, re-pointing each child's `parent`.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for child in &children {
            self.node_mut(*child).parent = Some(parent);
        }
        self.node_mut(parent).children = children;
        self.invalidate_geometry(parent);
        self.structure_changed();
    }

    /// Swaps `old` for `new` in the render children of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if let Some(slot) = self
            .node_mut(parent)
            .children
            .iter_mut()
            .find(|c| **c == old)
        {
            *slot = new;
        }
        self.node_mut(new).parent = Some(parent);
        self.invalidate_geometry(parent);
        self.structure_changed();
    }

    /// Moves `child` from its render parent to the end of `new_parent`'s children.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) {
        if let Some(old) = self[child].parent {
            self.node_mut(old).children.retain(|c| *c != child);
            self.invalidate_geometry(old);
        }
        self.node_mut(new_parent).children.push(child);
        self.node_mut(child).parent = Some(new_parent);
        self.invalidate_geometry(new_parent);
        self.structure_changed();
    }

    /// Whether `ancestor` is `id` or lies on its render-parent chain.
    pub fn is_render_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self[node].parent;
        }
        false
    }

    /// Allocates a synthesized group or wrapper modelled on `template` and adopts `children`.
    pub fn create_group(&mut self, kind: NodeKind, template: NodeId, children: Vec<NodeId>) -> NodeId {
        let id = self.next_id();
        let node = BoxNode::synthesized(id, kind, &self[template]);
        let id = self.push(node);
        self.set_children(id, children);
        id
    }

    /// Takes `id` out of layout. Its spacing registers are left untouched.
    pub fn hide(&mut self, id: NodeId) {
        self.node_mut(id).visible = false;
        self.structure_changed();
        if let Some(parent) = self[id].parent {
            self.invalidate_layout(parent);
        }
    }

    fn structure_changed(&self) {
        self.siblings.borrow_mut().clear();
    }

    /// Siblings before `id` in its parent's render children, nearest first.
    pub fn siblings_leading(&self, id: NodeId, include_floats: bool) -> Vec<NodeId> {
        self.siblings(id, false, include_floats)
    }

    /// Siblings after `id` in its parent's render children, nearest first.
    pub fn siblings_trailing(&self, id: NodeId, include_floats: bool) -> Vec<NodeId> {
        self.siblings(id, true, include_floats)
    }

    fn siblings(&self, id: NodeId, trailing: bool, floats: bool) -> Vec<NodeId> {
        let key = SiblingKey {
            node: id,
            trailing,
            floats,
        };
        if let Some(cached) = self.siblings.borrow().get(&key) {
            return cached.clone();
        }
        let list: Vec<NodeId> = match self[id].parent {
            Some(parent) => {
                let children = &self[parent].children;
                let position = children.iter().position(|c| *c == id).unwrap_or(0);
                let side: Box<dyn Iterator<Item = &NodeId>> = if trailing {
                    Box::new(children.iter().skip(position + 1))
                } else {
                    Box::new(children[..position].iter().rev())
                };
                side.copied()
                    .filter(|s| {
                        let node = &self[*s];
                        node.visible && node.page_flow() && (floats || !node.floating())
                    })
                    .collect()
            }
            None => Vec::new(),
        };
        self.siblings.borrow_mut().insert(key, list.clone());
        list
    }

    /// Source-order children that take part in layout.
    pub fn visible_dom_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self[id]
            .dom_children
            .iter()
            .copied()
            .filter(|c| self[*c].visible && !self[*c].style.display.is_hidden())
    }

    // --- Geometry ---

    /// Raw visual rect. Synthesized nodes cover the outer rects of their children.
    pub fn bounds(&self, id: NodeId) -> Rect {
        let node = &self[id];
        if let Some(rect) = node.cache.bounds.get() {
            return rect;
        }
        let rect = if node.is_synthesized() {
            node.children
                .iter()
                .filter(|c| self[**c].visible && !self[**c].excluded)
                .map(|c| self.linear(*c))
                .reduce(|a, b| a.union(&b))
                .unwrap_or_default()
        } else {
            node.raw_bounds
        };
        node.cache.bounds.set(Some(rect));
        rect
    }

    /// Content rect: bounds minus border and resolved padding.
    pub fn content_box(&self, id: NodeId) -> Rect {
        let node = &self[id];
        if let Some(rect) = node.cache.content.get() {
            return rect;
        }
        let border = node.style.border.sanitized();
        let rect = self.bounds(id).shrink(
            border.top + self.resolved(id, BoxSlot::PADDING_TOP),
            border.right + self.resolved(id, BoxSlot::PADDING_RIGHT),
            border.bottom + self.resolved(id, BoxSlot::PADDING_BOTTOM),
            border.left + self.resolved(id, BoxSlot::PADDING_LEFT),
        );
        node.cache.content.set(Some(rect));
        rect
    }

    /// Outer rect: bounds expanded by positive resolved margins.
    pub fn linear(&self, id: NodeId) -> Rect {
        let node = &self[id];
        if let Some(rect) = node.cache.linear.get() {
            return rect;
        }
        let rect = self.bounds(id).grow(
            self.resolved(id, BoxSlot::MARGIN_TOP),
            self.resolved(id, BoxSlot::MARGIN_RIGHT),
            self.resolved(id, BoxSlot::MARGIN_BOTTOM),
            self.resolved(id, BoxSlot::MARGIN_LEFT),
        );
        node.cache.linear.set(Some(rect));
        rect
    }

    pub fn invalidate_geometry(&self, id: NodeId) {
        self[id].cache.clear();
    }

    /// Clears cached geometry of `id` and its ancestors up to the nearest one with an
    /// explicit size (or the root), then of every descendant of that ancestor.
    pub fn invalidate_layout(&self, id: NodeId) {
        let mut anchor = id;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            self.invalidate_geometry(current);
            anchor = current;
            if current != id && self[current].flags().contains(NodeFlags::FIXED_SIZE) {
                break;
            }
            cursor = self[current].parent;
        }
        let mut stack = vec![anchor];
        while let Some(current) = stack.pop() {
            self.invalidate_geometry(current);
            stack.extend(self[current].children.iter().copied());
        }
    }

    /// Resolves a structurally valid tree: every referenced id exists.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for node in &self.nodes {
            for id in node
                .children
                .iter()
                .chain(node.dom_children.iter())
                .chain(node.parent.iter())
            {
                self.try_get(*id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{block, inline, TreeFixture};

    #[test]
    fn test_group_bounds_cover_children() {
        let mut fx = TreeFixture::new(Rect::new(0.0, 0.0, 200.0, 200.0));
        let a = fx.child(fx.root, inline("span", Rect::new(0.0, 0.0, 40.0, 20.0)));
        let b = fx.child(fx.root, inline("span", Rect::new(50.0, 0.0, 40.0, 20.0)));
        let mut tree = fx.finish();

        let group = tree.create_group(NodeKind::Group, a, vec![a, b]);
        assert_eq!(tree.bounds(group), Rect::new(0.0, 0.0, 90.0, 20.0));
        assert_eq!(tree[a].parent(), Some(group));
        assert_eq!(tree[a].actual_parent(), tree.root());
    }

    #[test]
    fn test_siblings_skip_floats_on_request() {
        let mut fx = TreeFixture::new(Rect::new(0.0, 0.0, 200.0, 200.0));
        let a = fx.child(fx.root, block("p", Rect::new(0.0, 0.0, 200.0, 20.0)));
        let f = fx.child(fx.root, block("div", Rect::new(0.0, 20.0, 50.0, 50.0)).float_left());
        let c = fx.child(fx.root, inline("span", Rect::new(50.0, 20.0, 40.0, 20.0)));
        let tree = fx.finish();

        assert_eq!(tree.siblings_leading(c, true), vec![f, a]);
        assert_eq!(tree.siblings_leading(c, false), vec![a]);
        assert_eq!(tree.siblings_trailing(a, true), vec![f, c]);
    }

    #[test]
    fn test_invalidate_layout_reaches_descendants() {
        let mut fx = TreeFixture::new(Rect::new(0.0, 0.0, 200.0, 200.0));
        let outer = fx.child(fx.root, block("div", Rect::new(0.0, 0.0, 200.0, 100.0)));
        let inner = fx.child(outer, block("p", Rect::new(0.0, 0.0, 200.0, 20.0)));
        let tree = fx.finish();

        let _ = tree.linear(inner);
        assert!(tree[inner].cache.linear.get().is_some());
        tree.invalidate_layout(outer);
        assert!(tree[inner].cache.linear.get().is_none());
    }
}
