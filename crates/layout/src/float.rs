//! Float reflow: rebuilds a float-mixed run into nested segment and wrapper groups.
//!
//! A run that mixes floats with in-flow content cannot be expressed as a single linear
//! container. The transformer partitions it into left, right and inline buckets split at
//! the point where content flows below the floats, stacks the side segments into one
//! layer, and wraps that layer together with the content below it.

use crate::config::LayoutConfig;
use crate::descriptor::{Alignment, ContainerType, LayoutDescriptor};
use crate::node::NodeFlags;
use crate::node_kind::NodeKind;
use crate::scan::{run_alignment, scan_runs, RunAxis};
use crate::spacing::BoxSlot;
use crate::tree::NodeTree;
use crate::LayoutError;
use boxflow_style::{Clear, Float};
use boxflow_types::NodeId;
use std::collections::BTreeMap;

/// The six buckets of a float-mixed run, each in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatBuckets {
    pub left_above: Vec<NodeId>,
    pub right_above: Vec<NodeId>,
    pub inline_above: Vec<NodeId>,
    pub left_below: Vec<NodeId>,
    pub right_below: Vec<NodeId>,
    pub inline_below: Vec<NodeId>,
}

impl FloatBuckets {
    pub fn left(&self) -> Vec<NodeId> {
        self.left_above.iter().chain(&self.left_below).copied().collect()
    }

    pub fn right(&self) -> Vec<NodeId> {
        self.right_above.iter().chain(&self.right_below).copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.left_above
            .iter()
            .chain(&self.right_above)
            .chain(&self.inline_above)
            .chain(&self.left_below)
            .chain(&self.right_below)
            .chain(&self.inline_below)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn has_floats(&self) -> bool {
        !(self.left_above.is_empty()
            && self.right_above.is_empty()
            && self.left_below.is_empty()
            && self.right_below.is_empty())
    }
}

/// Splits `members` into the six buckets in a single pass.
///
/// Everything before the boundary is "above". The boundary is the first cleared member, or
/// the first in-flow member starting at or below the bottom of every float seen so far.
pub fn partition(
    tree: &NodeTree,
    members: &[NodeId],
    cleared: &BTreeMap<NodeId, Clear>,
    tolerance: f32,
) -> FloatBuckets {
    let mut buckets = FloatBuckets::default();
    let mut below = false;
    let mut any_float = false;
    let mut float_bottom = f32::MIN;

    for id in members {
        let node = &tree[*id];
        if !below {
            let crosses = cleared.contains_key(id)
                || (!node.floating()
                    && any_float
                    && tree.bounds(*id).top() >= float_bottom - tolerance);
            if crosses {
                below = true;
            }
        }
        let bucket = match (node.float(), below) {
            (Float::Left, false) => &mut buckets.left_above,
            (Float::Right, false) => &mut buckets.right_above,
            (Float::None, false) => &mut buckets.inline_above,
            (Float::Left, true) => &mut buckets.left_below,
            (Float::Right, true) => &mut buckets.right_below,
            (Float::None, true) => &mut buckets.inline_below,
        };
        bucket.push(*id);
        if node.floating() {
            any_float = true;
            float_bottom = float_bottom.max(tree.bounds(*id).bottom());
        }
    }
    buckets
}

/// Horizontal inset applied to the inline segment beside each float side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatPadding {
    pub left: Option<f32>,
    pub right: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatOutcome {
    /// Node that replaces the run in its parent's children.
    pub node: NodeId,
    /// Set when the result is a wrapper taking over a node's spacing.
    pub wrapper: Option<NodeId>,
    pub buckets: FloatBuckets,
    /// Row nodes, populated by the vertical variant only.
    pub rows: Vec<NodeId>,
    pub padding: FloatPadding,
}

/// Reflows float-mixed runs below one parent, recording a descriptor per synthesized node.
pub struct FloatReflow<'a> {
    tree: &'a mut NodeTree,
    parent: NodeId,
    config: &'a LayoutConfig,
    descriptors: Vec<LayoutDescriptor>,
}

impl<'a> FloatReflow<'a> {
    pub fn new(tree: &'a mut NodeTree, parent: NodeId, config: &'a LayoutConfig) -> Self {
        Self {
            tree,
            parent,
            config,
            descriptors: Vec::new(),
        }
    }

    pub fn into_descriptors(self) -> Vec<LayoutDescriptor> {
        self.descriptors
    }

    /// Picks the vertical variant when the members contain a block row boundary.
    pub fn reflow(
        &mut self,
        original: Option<NodeId>,
        members: &[NodeId],
    ) -> Result<FloatOutcome, LayoutError> {
        if self.row_boundaries(members).is_empty() {
            self.process_float_horizontal(original, members)
        } else {
            self.process_float_vertical(original, members)
        }
    }

    /// Positions of in-flow blocks starting at or below every float before them.
    fn row_boundaries(&self, members: &[NodeId]) -> Vec<usize> {
        let tol = self.config.tolerance;
        let mut boundaries = Vec::new();
        let mut float_bottom: Option<f32> = None;
        for (position, id) in members.iter().enumerate() {
            let node = &self.tree[*id];
            if node.block_static() {
                if let Some(bottom) = float_bottom {
                    if self.tree.bounds(*id).top() >= bottom - tol {
                        boundaries.push(position);
                        float_bottom = None;
                        continue;
                    }
                }
            }
            if node.floating() {
                let bottom = self.tree.bounds(*id).bottom();
                float_bottom = Some(float_bottom.map_or(bottom, |b| b.max(bottom)));
            }
        }
        boundaries
    }

    pub fn process_float_horizontal(
        &mut self,
        original: Option<NodeId>,
        members: &[NodeId],
    ) -> Result<FloatOutcome, LayoutError> {
        let tol = self.config.tolerance;
        let cleared = self.tree.linear_data(members, tol).cleared;
        let buckets = partition(self.tree, members, &cleared, tol);
        log::debug!(
            "Float reflow below {}: {} left, {} right, {} inline above, {} inline below.",
            self.parent,
            buckets.left_above.len() + buckets.left_below.len(),
            buckets.right_above.len() + buckets.right_below.len(),
            buckets.inline_above.len(),
            buckets.inline_below.len()
        );

        let left = buckets.left();
        let right = buckets.right();
        let left_seg = self.segment_if_any(&left, Alignment::FLOAT)?;
        let right_seg = self.segment_if_any(&right, Alignment::FLOAT | Alignment::RIGHT)?;
        let inline_seg = self.segment_if_any(&buckets.inline_above, Alignment::INLINE)?;

        let padding = match inline_seg {
            Some(seg) if left_seg.is_some() || right_seg.is_some() => self.set_float_padding(
                seg,
                &buckets.inline_above,
                &buckets.left_above,
                &buckets.right_above,
            ),
            _ => FloatPadding::default(),
        };

        let mut segments: Vec<NodeId> = [left_seg, inline_seg, right_seg].into_iter().flatten().collect();
        segments.sort_by_key(|seg| self.tree[*seg].child_index);
        let above = match segments.len() {
            0 => None,
            1 => {
                if inline_seg.is_none() {
                    log::debug!("Single-side float run below {} passes through.", self.parent);
                }
                Some(segments[0])
            }
            _ => {
                let container = if inline_seg.is_some() {
                    ContainerType::Frame
                } else {
                    ContainerType::Horizontal
                };
                let mut alignment = Alignment::FLOAT_LAYOUT;
                if inline_seg.is_none() {
                    alignment |= Alignment::FLOAT | Alignment::HORIZONTAL;
                }
                Some(self.group(NodeKind::Group, &segments, container, alignment))
            }
        };

        let needs_wrapper = original.is_some() || !buckets.inline_below.is_empty();
        if !needs_wrapper {
            let node = above.ok_or_else(|| {
                LayoutError::Generic(format!("Float run below {} produced no nodes.", self.parent))
            })?;
            return Ok(FloatOutcome {
                node,
                wrapper: None,
                buckets,
                rows: Vec::new(),
                padding,
            });
        }

        let mut children: Vec<NodeId> = original.into_iter().collect();
        children.extend(above);
        children.extend(buckets.inline_below.iter().copied());
        let wrapper = self.wrap(original, children)?;
        Ok(FloatOutcome {
            node: wrapper,
            wrapper: Some(wrapper),
            buckets,
            rows: Vec::new(),
            padding,
        })
    }

    /// Splits `members` into rows at block boundaries and reflows each row on its own.
    pub fn process_float_vertical(
        &mut self,
        original: Option<NodeId>,
        members: &[NodeId],
    ) -> Result<FloatOutcome, LayoutError> {
        let tol = self.config.tolerance;
        let boundaries = self.row_boundaries(members);
        let mut rows: Vec<&[NodeId]> = Vec::new();
        let mut start = 0;
        for boundary in boundaries {
            rows.push(&members[start..boundary]);
            start = boundary;
        }
        rows.push(&members[start..]);
        log::debug!("Vertical float reflow below {} over {} rows.", self.parent, rows.len());

        let mut row_nodes = Vec::with_capacity(rows.len());
        let mut buckets = FloatBuckets::default();
        for row in rows.into_iter().filter(|row| !row.is_empty()) {
            let has_float = row.iter().any(|m| self.tree[*m].floating());
            let node = if has_float && self.tree.is_float_mixed(row, tol) {
                let outcome = self.process_float_horizontal(None, row)?;
                buckets.left_above.extend(outcome.buckets.left());
                buckets.right_above.extend(outcome.buckets.right());
                buckets.inline_above.extend(outcome.buckets.inline_above);
                buckets.inline_below.extend(outcome.buckets.inline_below);
                outcome.node
            } else {
                for member in row {
                    match self.tree[*member].float() {
                        Float::Left => buckets.left_above.push(*member),
                        Float::Right => buckets.right_above.push(*member),
                        Float::None => buckets.inline_above.push(*member),
                    }
                }
                self.linear_group(row)
            };
            row_nodes.push(node);
        }

        let (node, wrapper) = if original.is_some() {
            let mut children: Vec<NodeId> = original.into_iter().collect();
            children.extend(row_nodes.iter().copied());
            let wrapper = self.wrap(original, children)?;
            (wrapper, Some(wrapper))
        } else if row_nodes.len() == 1 {
            (row_nodes[0], None)
        } else {
            let group = self.group(
                NodeKind::Group,
                &row_nodes,
                ContainerType::Vertical,
                Alignment::FLOAT_LAYOUT | Alignment::VERTICAL | Alignment::COLUMN,
            );
            (group, None)
        };
        Ok(FloatOutcome {
            node,
            wrapper,
            buckets,
            rows: row_nodes,
            padding: FloatPadding::default(),
        })
    }

    /// Insets `inline_seg` past the floats beside it and caps the floats' widths.
    pub fn set_float_padding(
        &mut self,
        inline_seg: NodeId,
        inline_members: &[NodeId],
        left_floats: &[NodeId],
        right_floats: &[NodeId],
    ) -> FloatPadding {
        let mut padding = FloatPadding::default();
        let Some(deepest) = self.deepest_content_bottom(inline_members) else {
            return padding;
        };
        let content = self.tree.content_box(self.parent);
        let usable = content.width;
        let margin_left = inline_members
            .iter()
            .map(|m| self.tree.resolved(*m, BoxSlot::MARGIN_LEFT))
            .fold(0.0_f32, f32::max);
        let margin_right = inline_members
            .iter()
            .map(|m| self.tree.resolved(*m, BoxSlot::MARGIN_RIGHT))
            .fold(0.0_f32, f32::max);

        let beside = |tree: &NodeTree, floats: &[NodeId]| -> Vec<NodeId> {
            floats
                .iter()
                .copied()
                .filter(|f| tree.bounds(*f).top() < deepest)
                .collect()
        };

        let left: Vec<NodeId> = beside(self.tree, left_floats);
        if let Some(edge) = left
            .iter()
            .map(|f| self.tree.bounds(*f).right() + self.tree.resolved(*f, BoxSlot::MARGIN_RIGHT))
            .reduce(f32::max)
        {
            let offset = edge - (content.left() + margin_left);
            if offset > 0.0 && offset < usable {
                self.tree.modify_box(inline_seg, BoxSlot::PADDING_LEFT, offset, false);
                for float in &left {
                    self.tree.node_mut(*float).width_limit = Some(offset);
                }
                padding.left = Some(offset);
            }
        }

        let right: Vec<NodeId> = beside(self.tree, right_floats);
        if let Some(edge) = right
            .iter()
            .map(|f| self.tree.bounds(*f).left() - self.tree.resolved(*f, BoxSlot::MARGIN_LEFT))
            .reduce(f32::min)
        {
            let offset = (content.right() - margin_right) - edge;
            if offset > 0.0 && offset < usable {
                self.tree.modify_box(inline_seg, BoxSlot::PADDING_RIGHT, offset, false);
                for float in &right {
                    self.tree.node_mut(*float).width_limit = Some(offset);
                }
                padding.right = Some(offset);
            }
        }

        if padding != FloatPadding::default() {
            log::debug!("Float padding on {}: {:?}.", inline_seg, padding);
        }
        padding
    }

    /// Bottom of the lowest text-bearing or centered node in the inline content.
    fn deepest_content_bottom(&self, members: &[NodeId]) -> Option<f32> {
        let mut deepest: Option<f32> = None;
        let mut stack: Vec<NodeId> = members.to_vec();
        while let Some(id) = stack.pop() {
            let node = &self.tree[id];
            if !node.visible {
                continue;
            }
            let flags = node.flags();
            if node.kind == NodeKind::Text
                || flags.intersects(NodeFlags::HAS_CONTENT | NodeFlags::CENTER_ALIGNED)
            {
                let bottom = self.tree.bounds(id).bottom();
                deepest = Some(deepest.map_or(bottom, |d| d.max(bottom)));
            }
            stack.extend(node.dom_children().iter().copied());
        }
        deepest
    }

    fn segment_if_any(
        &mut self,
        members: &[NodeId],
        extra: Alignment,
    ) -> Result<Option<NodeId>, LayoutError> {
        if members.is_empty() {
            return Ok(None);
        }
        self.segment(members, extra).map(Some)
    }

    /// Builds the node standing for one bucket.
    fn segment(&mut self, members: &[NodeId], extra: Alignment) -> Result<NodeId, LayoutError> {
        let tol = self.config.tolerance;
        let mut alignment = Alignment::SEGMENTED | extra;
        if members.iter().any(|m| self.tree[*m].has_percent_dimension()) {
            alignment |= Alignment::PERCENT;
        }
        if let [single] = members {
            self.tree.node_mut(*single).alignment |= alignment;
            return Ok(*single);
        }

        let linear = self.tree.linear_data(members, tol);
        if linear.linear_x || linear.linear_y {
            alignment |= if linear.linear_y {
                Alignment::VERTICAL
            } else {
                Alignment::HORIZONTAL
            };
            return Ok(self.group(NodeKind::Group, members, linear.container_type(), alignment));
        }

        let runs = scan_runs(self.tree, self.parent, members, &linear, self.config, false);
        if runs.len() <= 1 {
            let container = match runs.first().map(|run| run.axis) {
                Some(RunAxis::Horizontal) => ContainerType::Horizontal,
                Some(RunAxis::Vertical) => ContainerType::Vertical,
                _ => ContainerType::Constraint,
            };
            return Ok(self.group(NodeKind::Group, members, container, alignment));
        }

        let mut children = Vec::with_capacity(runs.len());
        for run in &runs {
            let child = match run.members.as_slice() {
                [single] => *single,
                run_members => {
                    let container = match run.axis {
                        RunAxis::Vertical => ContainerType::Vertical,
                        RunAxis::Horizontal => ContainerType::Horizontal,
                        RunAxis::Undetermined => self.tree.linear_data(run_members, tol).container_type(),
                    };
                    self.group(NodeKind::Group, run_members, container, run.alignment)
                }
            };
            children.push(child);
        }
        Ok(self.group(NodeKind::Group, &children, ContainerType::Vertical, alignment | Alignment::VERTICAL))
    }

    /// A single member, or a group with the container implied by the members' orientation.
    fn linear_group(&mut self, members: &[NodeId]) -> NodeId {
        if let [single] = members {
            return *single;
        }
        let tol = self.config.tolerance;
        let linear = self.tree.linear_data(members, tol);
        let axis = if linear.linear_y {
            RunAxis::Vertical
        } else if linear.linear_x {
            RunAxis::Horizontal
        } else {
            RunAxis::Undetermined
        };
        let alignment = run_alignment(self.tree, members, axis, tol);
        self.group(NodeKind::Group, members, linear.container_type(), alignment)
    }

    /// Wraps `children`; the wrapper takes over the spacing of `original` (or of the first
    /// child) and its place in the source order.
    fn wrap(&mut self, original: Option<NodeId>, children: Vec<NodeId>) -> Result<NodeId, LayoutError> {
        let head = original
            .or_else(|| children.first().copied())
            .ok_or_else(|| LayoutError::Generic(format!("Empty wrapper below {}.", self.parent)))?;
        let wrapper = self.group(
            NodeKind::Wrapper,
            &children,
            ContainerType::Vertical,
            Alignment::WRAPPER | Alignment::FLOAT_LAYOUT | Alignment::VERTICAL,
        );
        self.tree.reset_box(head, BoxSlot::MARGIN, Some(wrapper))?;
        self.tree.transfer_box(head, BoxSlot::PADDING, wrapper)?;
        self.tree.invalidate_geometry(wrapper);
        log::debug!("Wrapper {} takes over {} with {} children.", wrapper, head, children.len());
        Ok(wrapper)
    }

    fn group(
        &mut self,
        kind: NodeKind,
        children: &[NodeId],
        container: ContainerType,
        alignment: Alignment,
    ) -> NodeId {
        let template = children.first().copied().unwrap_or(self.parent);
        let id = self.tree.create_group(kind, template, children.to_vec());
        {
            let node = self.tree.node_mut(id);
            node.container_type = container;
            node.alignment = alignment;
            node.rendered = true;
        }
        let linear = self.tree.linear_data(children, self.config.tolerance);
        let mut descriptor =
            LayoutDescriptor::new(Some(self.parent), id, children.to_vec()).with_linear(&linear);
        descriptor.container_type = container;
        descriptor.alignment = alignment;
        self.descriptors.push(descriptor);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{block, inline, r, text, TreeFixture};

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    #[test]
    fn test_partition_splits_at_float_bottom() {
        let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 300.0));
        let f = fx.child(fx.root, block("div", r(0.0, 0.0, 60.0, 60.0)).float_left());
        let beside = fx.child(fx.root, text("beside", r(60.0, 0.0, 140.0, 20.0)));
        let g = fx.child(fx.root, block("div", r(140.0, 0.0, 60.0, 40.0)).float_right());
        let after = fx.child(fx.root, text("after", r(0.0, 70.0, 200.0, 20.0)));
        let tree = fx.finish();

        let buckets = partition(&tree, &[f, beside, g, after], &BTreeMap::new(), 0.5);
        assert_eq!(buckets.left_above, vec![f]);
        assert_eq!(buckets.right_above, vec![g]);
        assert_eq!(buckets.inline_above, vec![beside]);
        assert_eq!(buckets.inline_below, vec![after]);
    }

    #[test]
    fn test_partition_cleared_member_crosses() {
        let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 300.0));
        let f = fx.child(fx.root, block("div", r(0.0, 0.0, 60.0, 60.0)).float_left());
        let c = fx.child(fx.root, inline("span", r(60.0, 0.0, 40.0, 20.0)).clear(Clear::Left));
        let g = fx.child(fx.root, block("div", r(0.0, 60.0, 60.0, 60.0)).float_left());
        let tree = fx.finish();

        let cleared = tree.linear_data(&[f, c, g], 0.5).cleared;
        let buckets = partition(&tree, &[f, c, g], &cleared, 0.5);
        assert_eq!(buckets.left_above, vec![f]);
        assert_eq!(buckets.inline_below, vec![c]);
        assert_eq!(buckets.left_below, vec![g]);
    }

    #[test]
    fn test_partition_places_every_member_once() {
        let mut fx = TreeFixture::new(r(0.0, 0.0, 400.0, 400.0));
        let mut members = Vec::new();
        for i in 0..12 {
            let y = (i / 3) as f32 * 30.0;
            let x = (i % 3) as f32 * 100.0;
            let element = match i % 4 {
                0 => block("div", r(x, y, 80.0, 40.0)).float_left(),
                1 => text("t", r(x, y, 80.0, 20.0)),
                2 => block("div", r(x, y, 80.0, 50.0)).float_right(),
                _ => inline("span", r(x, y, 80.0, 20.0)),
            };
            members.push(fx.child(fx.root, element));
        }
        let tree = fx.finish();
        let cleared = tree.linear_data(&members, 0.5).cleared;
        let buckets = partition(&tree, &members, &cleared, 0.5);

        assert_eq!(buckets.len(), members.len());
        for member in &members {
            assert_eq!(buckets.iter().filter(|b| b == member).count(), 1);
        }
    }

    #[test]
    fn test_block_float_text_builds_wrapper() {
        let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 200.0));
        let p = fx.child(fx.root, block("p", r(0.0, 0.0, 200.0, 50.0)).margin([8.0, 0.0, 8.0, 0.0]));
        let f = fx.child(fx.root, block("div", r(0.0, 58.0, 60.0, 50.0)).float_left());
        let t = fx.child(fx.root, text("after", r(0.0, 120.0, 200.0, 20.0)));
        let mut tree = fx.finish();
        let root = tree.root().unwrap();
        let config = config();

        let mut reflow = FloatReflow::new(&mut tree, root, &config);
        let outcome = reflow.reflow(Some(p), &[f, t]).unwrap();
        let descriptors = reflow.into_descriptors();

        assert_eq!(outcome.buckets.left(), vec![f]);
        assert!(outcome.buckets.inline_above.is_empty());
        assert_eq!(outcome.buckets.inline_below, vec![t]);

        let wrapper = outcome.wrapper.expect("wrapper");
        assert_eq!(tree[wrapper].kind, NodeKind::Wrapper);
        assert_eq!(tree[wrapper].children(), &[p, f, t]);
        assert_eq!(tree[wrapper].child_index, tree[p].child_index);
        assert!(tree[wrapper].alignment.contains(Alignment::WRAPPER | Alignment::FLOAT_LAYOUT));
        assert_eq!(tree.box_owner(p, BoxSlot::MARGIN_TOP), wrapper);
        assert_eq!(tree.resolved(p, BoxSlot::MARGIN_TOP), 0.0);
        assert_eq!(tree.resolved(wrapper, BoxSlot::MARGIN_TOP), 8.0);
        assert_eq!(tree[p].actual_parent(), Some(root));
        assert!(descriptors.iter().any(|d| d.node == wrapper));
    }

    #[test]
    fn test_single_side_floats_pass_through() {
        let mut fx = TreeFixture::new(r(0.0, 0.0, 300.0, 200.0));
        let a = fx.child(fx.root, block("div", r(240.0, 0.0, 60.0, 60.0)).float_right());
        let b = fx.child(fx.root, block("div", r(180.0, 0.0, 60.0, 60.0)).float_right());
        let mut tree = fx.finish();
        let root = tree.root().unwrap();
        let config = config();

        let mut reflow = FloatReflow::new(&mut tree, root, &config);
        let outcome = reflow.reflow(None, &[a, b]).unwrap();
        assert!(outcome.wrapper.is_none());
        let node = &tree[outcome.node];
        assert!(node.alignment.contains(Alignment::RIGHT | Alignment::SEGMENTED));
        assert_eq!(node.children(), &[a, b]);
    }

    #[test]
    fn test_float_padding_insets_inline_content() {
        let mut fx = TreeFixture::new(r(0.0, 0.0, 300.0, 200.0));
        let f = fx.child(fx.root, block("div", r(0.0, 0.0, 80.0, 60.0)).float_left().margin([0.0, 10.0, 0.0, 0.0]));
        let t = fx.child(fx.root, text("wraps around", r(0.0, 0.0, 300.0, 40.0)).lines(2));
        let mut tree = fx.finish();
        let root = tree.root().unwrap();
        let config = config();

        let mut reflow = FloatReflow::new(&mut tree, root, &config);
        let outcome = reflow.reflow(None, &[f, t]).unwrap();

        assert_eq!(outcome.padding.left, Some(90.0));
        assert_eq!(outcome.padding.right, None);
        assert_eq!(tree.resolved(t, BoxSlot::PADDING_LEFT), 90.0);
        assert_eq!(tree[f].width_limit, Some(90.0));
        assert_eq!(tree[outcome.node].container_type, ContainerType::Frame);
    }

    #[test]
    fn test_float_padding_skips_offset_beyond_width() {
        let mut fx = TreeFixture::new(r(0.0, 0.0, 100.0, 200.0));
        let f = fx.child(fx.root, block("div", r(0.0, 0.0, 120.0, 60.0)).float_left());
        let t = fx.child(fx.root, text("squeezed", r(0.0, 0.0, 100.0, 20.0)));
        let mut tree = fx.finish();
        let root = tree.root().unwrap();
        let config = config();

        let mut reflow = FloatReflow::new(&mut tree, root, &config);
        let outcome = reflow.reflow(None, &[f, t]).unwrap();
        assert_eq!(outcome.padding, FloatPadding::default());
        assert_eq!(tree[f].width_limit, None);
    }

    #[test]
    fn test_vertical_reflow_splits_rows() {
        let mut fx = TreeFixture::new(r(0.0, 0.0, 200.0, 400.0));
        let f1 = fx.child(fx.root, block("div", r(0.0, 0.0, 60.0, 60.0)).float_left());
        let t1 = fx.child(fx.root, text("one", r(60.0, 0.0, 140.0, 20.0)));
        let p = fx.child(fx.root, block("p", r(0.0, 70.0, 200.0, 30.0)));
        let f2 = fx.child(fx.root, block("div", r(140.0, 100.0, 60.0, 60.0)).float_right());
        let t2 = fx.child(fx.root, text("two", r(0.0, 100.0, 140.0, 20.0)));
        let mut tree = fx.finish();
        let root = tree.root().unwrap();
        let config = config();

        let mut reflow = FloatReflow::new(&mut tree, root, &config);
        let outcome = reflow.reflow(None, &[f1, t1, p, f2, t2]).unwrap();

        assert_eq!(outcome.rows.len(), 2);
        let node = &tree[outcome.node];
        assert_eq!(node.container_type, ContainerType::Vertical);
        assert!(node.alignment.contains(Alignment::FLOAT_LAYOUT));
        assert_eq!(outcome.buckets.len(), 5);
    }
}
