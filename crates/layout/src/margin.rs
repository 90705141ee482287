//! Block margin collapsing, run once after traversal.
//!
//! The pass walks the render tree, so wrappers and groups synthesized by float reflow take
//! part as blocks carrying the margins they took over. Children are handled before their
//! parents so margins pulled up from a first or last child keep travelling outward. Every
//! adjustment either locks the losing register or is a `max` update, which makes a second
//! run a no-op.

use crate::config::LayoutConfig;
use crate::descriptor::ContainerType;
use crate::node::NodeFlags;
use crate::node_kind::NodeKind;
use crate::spacing::{BoxSlot, SetBoxOptions};
use crate::tree::NodeTree;
use crate::util::{collapse_values, half_leading};
use crate::LayoutError;
use boxflow_types::NodeId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollapseStats {
    pub collapsed: usize,
    pub hidden: usize,
    pub line_gaps: usize,
}

pub fn collapse_margins(
    tree: &mut NodeTree,
    config: &LayoutConfig,
) -> Result<CollapseStats, LayoutError> {
    let Some(root) = tree.root() else {
        return Ok(CollapseStats::default());
    };
    let mut pass = MarginCollapse {
        tree,
        config,
        root,
        stats: CollapseStats::default(),
    };
    pass.run();
    log::debug!(
        "Margin collapse: {} collapsed, {} hidden, {} line gaps.",
        pass.stats.collapsed,
        pass.stats.hidden,
        pass.stats.line_gaps
    );
    Ok(pass.stats)
}

struct MarginCollapse<'a> {
    tree: &'a mut NodeTree,
    config: &'a LayoutConfig,
    root: NodeId,
    stats: CollapseStats,
}

impl MarginCollapse<'_> {
    fn run(&mut self) {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.render_children(id));
        }
        for parent in order.into_iter().rev() {
            self.collapse_children(parent);
        }
    }

    fn collapse_children(&mut self, parent: NodeId) {
        if self.config.hide_inert_elements {
            self.hide_inert(parent);
        }
        if self.config.collapse_line_break_gaps {
            self.line_break_gaps(parent);
        }
        if self.config.collapse_margins {
            self.adjacent_siblings(parent);
            if parent != self.root && self.tree[parent].block_static() && self.stacks_vertically(parent) {
                self.first_child(parent);
                if self.tree[parent].style.height.is_auto() {
                    self.last_child(parent);
                }
            }
        }
    }

    /// Rendered children that take part in layout.
    fn render_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.tree[parent]
            .children()
            .iter()
            .copied()
            .filter(|c| {
                let node = &self.tree[*c];
                node.visible && !node.excluded && !node.style.display.is_hidden()
            })
            .collect()
    }

    /// Row-like groups place their children side by side; their edges are not shared with
    /// any single child.
    fn stacks_vertically(&self, id: NodeId) -> bool {
        !matches!(
            self.tree[id].container_type,
            ContainerType::Horizontal | ContainerType::Frame
        )
    }

    fn flow_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.render_children(parent)
            .into_iter()
            .filter(|c| {
                let node = &self.tree[*c];
                node.page_flow() && !node.floating() && !node.line_break()
            })
            .collect()
    }

    fn is_inert(&self, id: NodeId) -> bool {
        let node = &self.tree[id];
        node.kind == NodeKind::Element
            && node.in_flow()
            && self.tree.bounds(id).height <= 0.0
            && node.style.border.sanitized().is_zero()
            && self.tree.padding_spacing(id).iter().all(|p| *p == 0.0)
            && !node.flags().contains(NodeFlags::HAS_CONTENT)
            && self.tree.visible_dom_children(id).next().is_none()
    }

    /// Hides empty zero-height elements and hands their merged margin to the next block.
    fn hide_inert(&mut self, parent: NodeId) {
        let mut carried: Option<f32> = None;
        for child in self.flow_children(parent) {
            if self.is_inert(child) {
                let merged = collapse_values(
                    self.tree.resolved(child, BoxSlot::MARGIN_TOP),
                    self.tree.resolved(child, BoxSlot::MARGIN_BOTTOM),
                );
                carried = Some(collapse_values(carried.unwrap_or(0.0), merged));
                self.tree.hide(child);
                self.stats.hidden += 1;
                log::debug!("Hid inert element {} carrying {}.", child, merged);
                continue;
            }
            if let Some(value) = carried.take() {
                if self.tree[child].block_static() && !self.tree.is_locked(child, BoxSlot::MARGIN_TOP) {
                    let own = self.tree.resolved(child, BoxSlot::MARGIN_TOP);
                    self.tree
                        .assign_box(child, BoxSlot::MARGIN_TOP, collapse_values(own, value));
                }
            }
        }
    }

    /// Turns the vertical gap around a hard line break into spacing on one side of it.
    ///
    /// Line breaks never become render children, so this looks at source order.
    fn line_break_gaps(&mut self, parent: NodeId) {
        let tol = self.config.tolerance;
        let children: Vec<NodeId> = self.tree.visible_dom_children(parent).collect();
        for window in children.windows(3) {
            let [a, br, b] = [window[0], window[1], window[2]];
            if !self.tree[br].line_break()
                || !self.tree[a].inline_static()
                || !self.tree[b].inline_static()
            {
                continue;
            }
            let above = self.tree.bounds(a);
            let below = self.tree.bounds(b);
            let leading_a = half_leading(self.tree[a].style.line_height, above.height, self.tree[a].lines);
            let leading_b = half_leading(self.tree[b].style.line_height, below.height, self.tree[b].lines);
            let gap = below.top() - above.bottom() - leading_a - leading_b;
            if gap <= tol {
                continue;
            }
            let target = [(b, BoxSlot::MARGIN_TOP), (a, BoxSlot::MARGIN_BOTTOM), (a, BoxSlot::PADDING_BOTTOM)]
                .into_iter()
                .find(|(id, slot)| !self.tree.is_locked(*id, *slot) && !self.tree.is_delegated(*id, *slot));
            if let Some((id, slot)) = target {
                self.tree.set_box(id, slot, SetBoxOptions::adjust(gap).max());
                self.stats.line_gaps += 1;
            }
        }
    }

    fn adjacent_siblings(&mut self, parent: NodeId) {
        let children = self.flow_children(parent);
        if let Some(first) = children.first() {
            self.merge_through(*first);
        }
        for pair in children.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if !self.tree[previous].block_static() || !self.tree[current].block_static() {
                continue;
            }
            let above = self.bottom_contributor(previous);
            if self.merge_through(current) {
                self.fold_into_through(above, current);
                continue;
            }
            let below = self.top_contributor(current);
            if self.tree[above].style.border.sanitized().bottom != 0.0
                || self.tree[below].style.border.sanitized().top != 0.0
                || self.tree.is_locked(above, BoxSlot::MARGIN_BOTTOM)
                || self.tree.is_locked(below, BoxSlot::MARGIN_TOP)
            {
                continue;
            }
            let bottom = self.tree.resolved(above, BoxSlot::MARGIN_BOTTOM);
            let top = self.tree.resolved(below, BoxSlot::MARGIN_TOP);
            if bottom == 0.0 && top == 0.0 {
                continue;
            }
            if bottom >= 0.0 && top >= 0.0 {
                if bottom >= top {
                    self.reset(below, BoxSlot::MARGIN_TOP);
                } else {
                    self.reset(above, BoxSlot::MARGIN_BOTTOM);
                }
            } else {
                self.tree
                    .assign_box(above, BoxSlot::MARGIN_BOTTOM, collapse_values(bottom, top));
                self.reset(below, BoxSlot::MARGIN_TOP);
            }
            self.stats.collapsed += 1;
        }
    }

    /// A zero-height block whose top and bottom margins touch each other.
    fn collapses_through(&self, id: NodeId) -> bool {
        let node = &self.tree[id];
        if node.kind != NodeKind::Element || !node.block_static() {
            return false;
        }
        let border = node.style.border.sanitized();
        self.tree.bounds(id).height <= 0.0
            && border.top == 0.0
            && border.bottom == 0.0
            && self.tree.resolved(id, BoxSlot::PADDING_TOP) == 0.0
            && self.tree.resolved(id, BoxSlot::PADDING_BOTTOM) == 0.0
            && self.flow_children(id).is_empty()
    }

    /// Merges both margins of a collapse-through block onto its bottom slot. Returns whether
    /// anything was merged.
    fn merge_through(&mut self, id: NodeId) -> bool {
        if !self.collapses_through(id)
            || self.tree.is_locked(id, BoxSlot::MARGIN_TOP)
            || self.tree.is_locked(id, BoxSlot::MARGIN_BOTTOM)
        {
            return false;
        }
        let merged = collapse_values(
            self.tree.resolved(id, BoxSlot::MARGIN_TOP),
            self.tree.resolved(id, BoxSlot::MARGIN_BOTTOM),
        );
        self.reset(id, BoxSlot::MARGIN_TOP);
        self.tree.assign_box(id, BoxSlot::MARGIN_BOTTOM, merged);
        log::debug!("Merged margins of zero-height {} into {}.", id, merged);
        true
    }

    /// Collapses the bottom margin above a collapse-through block into the block's merged
    /// margin, which then meets the next sibling.
    fn fold_into_through(&mut self, above: NodeId, through: NodeId) {
        if self.tree[above].style.border.sanitized().bottom != 0.0
            || self.tree.is_locked(above, BoxSlot::MARGIN_BOTTOM)
        {
            return;
        }
        let bottom = self.tree.resolved(above, BoxSlot::MARGIN_BOTTOM);
        if bottom == 0.0 {
            return;
        }
        let merged = self.tree.resolved(through, BoxSlot::MARGIN_BOTTOM);
        self.tree
            .assign_box(through, BoxSlot::MARGIN_BOTTOM, collapse_values(bottom, merged));
        self.reset(above, BoxSlot::MARGIN_BOTTOM);
        self.stats.collapsed += 1;
    }

    fn first_child(&mut self, parent: NodeId) {
        let Some(child) = self.flow_children(parent).first().copied() else {
            return;
        };
        self.pull_up(parent, child, BoxSlot::MARGIN_TOP, BoxSlot::PADDING_TOP, |b| b.top);
    }

    fn last_child(&mut self, parent: NodeId) {
        let Some(child) = self.flow_children(parent).last().copied() else {
            return;
        };
        self.pull_up(parent, child, BoxSlot::MARGIN_BOTTOM, BoxSlot::PADDING_BOTTOM, |b| b.bottom);
    }

    /// Moves a child's edge margin onto its parent when nothing separates the two edges.
    fn pull_up(
        &mut self,
        parent: NodeId,
        child: NodeId,
        margin: BoxSlot,
        padding: BoxSlot,
        border: fn(&boxflow_style::Margins) -> f32,
    ) {
        if !self.tree[child].block_static() {
            return;
        }
        let parent_border = border(&self.tree[parent].style.border.sanitized());
        if parent_border != 0.0
            || self.tree.resolved(parent, padding) != 0.0
            || self.tree.is_locked(parent, margin)
            || self.tree.is_locked(child, margin)
        {
            return;
        }
        let inner = self.tree.resolved(child, margin);
        if inner == 0.0 {
            return;
        }
        let outer = self.tree.resolved(parent, margin);
        self.tree.assign_box(parent, margin, collapse_values(outer, inner));
        self.reset(child, margin);
        self.stats.collapsed += 1;
    }

    fn reset(&mut self, id: NodeId, slot: BoxSlot) {
        if self.tree.reset_box(id, slot, None).is_err() {
            log::warn!("Could not reset {:?} on {}.", slot, id);
        }
    }

    fn top_contributor(&self, id: NodeId) -> NodeId {
        self.contributor(id, BoxSlot::MARGIN_TOP, BoxSlot::PADDING_TOP, true)
    }

    fn bottom_contributor(&self, id: NodeId) -> NodeId {
        self.contributor(id, BoxSlot::MARGIN_BOTTOM, BoxSlot::PADDING_BOTTOM, false)
    }

    /// Walks through wrappers with nothing on the touching edge to the block that actually
    /// carries the margin.
    fn contributor(&self, id: NodeId, margin: BoxSlot, padding: BoxSlot, top: bool) -> NodeId {
        let mut current = id;
        loop {
            let border = self.tree[current].style.border.sanitized();
            let edge_border = if top { border.top } else { border.bottom };
            if self.tree.resolved(current, margin) != 0.0
                || edge_border != 0.0
                || self.tree.resolved(current, padding) != 0.0
                || self.tree.is_locked(current, margin)
            {
                return current;
            }
            if !self.stacks_vertically(current) {
                return current;
            }
            let children = self.flow_children(current);
            let next = if top { children.first() } else { children.last() };
            match next {
                Some(child) if self.tree[*child].block_static() => current = *child,
                _ => return current,
            }
        }
    }
}
