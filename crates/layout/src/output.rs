//! Serializable view of the resolved render tree, handed to output serializers.

use crate::descriptor::{Alignment, ContainerType};
use crate::tree::NodeTree;
use boxflow_types::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: NodeId,
    pub tag: String,
    pub container: ContainerType,
    pub alignment: Alignment,
    /// Resolved margins, `[top, right, bottom, left]`.
    pub box_spacing: [f32; 4],
    pub padding_spacing: [f32; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_limit: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    /// Depth-first search for `id` in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&RenderNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    pub fn count(&self) -> usize {
        let mut stack = vec![self];
        let mut count = 0;
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub root: Option<RenderNode>,
}

impl RenderOutput {
    /// Walks the render children from the root, omitting hidden and excluded nodes.
    pub fn from_tree(tree: &NodeTree) -> Self {
        Self {
            root: tree.root().and_then(|root| render(tree, root)),
        }
    }

    pub fn find(&self, id: NodeId) -> Option<&RenderNode> {
        self.root.as_ref()?.find(id)
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, RenderNode::count)
    }
}

fn shown(tree: &NodeTree, id: NodeId) -> bool {
    let node = &tree[id];
    node.visible && !node.excluded
}

/// Builds the subtree bottom-up with an explicit stack. A node is expanded once to queue its
/// children, then assembled from the finished children on top of `built`.
fn render(tree: &NodeTree, root: NodeId) -> Option<RenderNode> {
    if !shown(tree, root) {
        return None;
    }
    let mut stack: Vec<(NodeId, bool)> = vec![(root, false)];
    let mut built: Vec<RenderNode> = Vec::new();
    while let Some((id, expanded)) = stack.pop() {
        let node = &tree[id];
        if !expanded {
            stack.push((id, true));
            stack.extend(
                node.children()
                    .iter()
                    .rev()
                    .filter(|child| shown(tree, **child))
                    .map(|child| (*child, false)),
            );
            continue;
        }
        let count = node.children().iter().filter(|child| shown(tree, **child)).count();
        let children = built.split_off(built.len().saturating_sub(count));
        built.push(RenderNode {
            id,
            tag: node.tag.clone(),
            container: node.container_type,
            alignment: node.alignment,
            box_spacing: tree.box_spacing(id),
            padding_spacing: tree.padding_spacing(id),
            width_limit: node.width_limit,
            text: node.text.clone(),
            children,
        });
    }
    built.pop()
}
