//! The box node record stored in the layout arena.

use crate::descriptor::{Alignment, ContainerType};
use crate::node_kind::NodeKind;
use bitflags::bitflags;
use boxflow_style::{Dimension, ElementStyle, Float};
use boxflow_types::{NodeId, Rect};
use std::cell::Cell;

bitflags! {
    /// Style-derived facts about a node, computed lazily and cached.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        const FLOATING = 1;
        const FLOAT_LEFT = 1 << 1;
        const FLOAT_RIGHT = 1 << 2;
        const BLOCK_STATIC = 1 << 3;
        const INLINE_STATIC = 1 << 4;
        const PAGE_FLOW = 1 << 5;
        const LINE_BREAK = 1 << 6;
        const BLOCK_LEVEL = 1 << 7;
        const INLINE_LEVEL = 1 << 8;
        const AUTO_POSITION = 1 << 9;
        const AUTO_MARGIN_CENTERED = 1 << 10;
        const PERCENT_WIDTH = 1 << 11;
        const PERCENT_HEIGHT = 1 << 12;
        const MULTILINE = 1 << 13;
        const PLAIN_TEXT = 1 << 14;
        /// Text, background or a visible border.
        const HAS_CONTENT = 1 << 15;
        /// Explicit pixel width and height.
        const FIXED_SIZE = 1 << 16;
        const CENTER_ALIGNED = 1 << 17;
    }
}

/// Result of the alignment predicate cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    LineBreak,
    OutOfFlow,
    Floating,
    Block,
    Inline,
}

#[derive(Debug, Default)]
pub(crate) struct GeometryCache {
    pub(crate) bounds: Cell<Option<Rect>>,
    pub(crate) content: Cell<Option<Rect>>,
    pub(crate) linear: Cell<Option<Rect>>,
}

impl GeometryCache {
    pub(crate) fn clear(&self) {
        self.bounds.set(None);
        self.content.set(None);
        self.linear.set(None);
    }
}

#[derive(Debug)]
pub struct BoxNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub tag: String,
    pub depth: usize,
    pub child_index: usize,
    pub style: ElementStyle,
    pub text: Option<String>,
    /// Rendered line count of the node's text content.
    pub lines: u32,

    // Structure
    pub(crate) parent: Option<NodeId>,
    pub(crate) actual_parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) dom_children: Vec<NodeId>,

    // Render state
    pub rendered: bool,
    pub visible: bool,
    pub excluded: bool,
    pub container_type: ContainerType,
    /// Set when an extension chose the container; traversal will not refine it.
    pub container_locked: bool,
    pub alignment: Alignment,
    pub width_limit: Option<f32>,

    // Box model
    pub(crate) raw_bounds: Rect,
    pub(crate) page_flow: Option<bool>,
    pub(crate) box_reset: [bool; 8],
    pub(crate) box_adjustment: [f32; 8],

    pub(crate) flags: Cell<Option<NodeFlags>>,
    pub(crate) cache: GeometryCache,
}

impl BoxNode {
    pub fn new(id: NodeId, tag: impl Into<String>, bounds: Rect, style: ElementStyle) -> Self {
        let tag = tag.into();
        Self {
            id,
            kind: NodeKind::from_tag(&tag),
            tag,
            depth: 0,
            child_index: 0,
            style,
            text: None,
            lines: 0,
            parent: None,
            actual_parent: None,
            children: Vec::new(),
            dom_children: Vec::new(),
            rendered: false,
            visible: true,
            excluded: false,
            container_type: ContainerType::Unresolved,
            container_locked: false,
            alignment: Alignment::UNKNOWN,
            width_limit: None,
            raw_bounds: bounds,
            page_flow: None,
            box_reset: [false; 8],
            box_adjustment: [0.0; 8],
            flags: Cell::new(None),
            cache: GeometryCache::default(),
        }
    }

    /// A node created by the engine to hold a run of siblings.
    pub(crate) fn synthesized(id: NodeId, kind: NodeKind, template: &BoxNode) -> Self {
        let tag = match kind {
            NodeKind::Wrapper => "#wrapper",
            _ => "#group",
        };
        let mut node = Self::new(id, tag, Rect::zero(), ElementStyle::block());
        node.depth = template.depth;
        node.child_index = template.child_index;
        node.actual_parent = template.actual_parent;
        node
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Parent in the source tree. Differs from `parent` once the node has been wrapped.
    pub fn actual_parent(&self) -> Option<NodeId> {
        self.actual_parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn dom_children(&self) -> &[NodeId] {
        &self.dom_children
    }

    pub fn raw_bounds(&self) -> Rect {
        self.raw_bounds
    }

    pub fn is_synthesized(&self) -> bool {
        self.kind.is_synthesized()
    }

    pub fn flags(&self) -> NodeFlags {
        if let Some(flags) = self.flags.get() {
            return flags;
        }
        let flags = self.compute_flags();
        self.flags.set(Some(flags));
        flags
    }

    /// Drops cached flags after the style was edited.
    pub fn invalidate_flags(&self) {
        self.flags.set(None);
    }

    fn compute_flags(&self) -> NodeFlags {
        let style = &self.style;
        let mut flags = NodeFlags::empty();

        if self.kind == NodeKind::LineBreak {
            flags |= NodeFlags::LINE_BREAK;
        }
        let page_flow = self.page_flow.unwrap_or_else(|| style.is_page_flow());
        if page_flow {
            flags |= NodeFlags::PAGE_FLOW;
        }
        if page_flow && style.float.is_floating() {
            flags |= NodeFlags::FLOATING;
            flags |= match style.float {
                Float::Right => NodeFlags::FLOAT_RIGHT,
                _ => NodeFlags::FLOAT_LEFT,
            };
        }
        if style.display.is_block_level() {
            flags |= NodeFlags::BLOCK_LEVEL;
        }
        if style.display.is_inline_level() || self.kind == NodeKind::Text {
            flags |= NodeFlags::INLINE_LEVEL;
        }
        let in_flow = page_flow && !flags.contains(NodeFlags::FLOATING);
        if in_flow && flags.contains(NodeFlags::BLOCK_LEVEL) {
            flags |= NodeFlags::BLOCK_STATIC;
        }
        if in_flow && flags.contains(NodeFlags::INLINE_LEVEL) {
            flags |= NodeFlags::INLINE_STATIC;
        }
        if style.inset.is_auto() {
            flags |= NodeFlags::AUTO_POSITION;
        }
        if style.auto_margin.is_centered() {
            flags |= NodeFlags::AUTO_MARGIN_CENTERED;
        }
        if style.width.is_percent() {
            flags |= NodeFlags::PERCENT_WIDTH;
        }
        if style.height.is_percent() {
            flags |= NodeFlags::PERCENT_HEIGHT;
        }
        if self.lines > 1 {
            flags |= NodeFlags::MULTILINE;
        }
        if self.kind == NodeKind::Text {
            flags |= NodeFlags::PLAIN_TEXT;
        }
        let has_text = self.text.as_deref().is_some_and(|t| !t.trim().is_empty());
        if has_text || style.background || !style.border.is_zero() {
            flags |= NodeFlags::HAS_CONTENT;
        }
        if matches!(style.width, Dimension::Px(_)) && matches!(style.height, Dimension::Px(_)) {
            flags |= NodeFlags::FIXED_SIZE;
        }
        if style.text_align == boxflow_style::TextAlign::Center || style.auto_margin.is_centered() {
            flags |= NodeFlags::CENTER_ALIGNED;
        }
        flags
    }

    /// Alignment predicate cascade: line break, out of flow, floating, block, inline.
    pub fn flow_kind(&self) -> FlowKind {
        let flags = self.flags();
        if flags.contains(NodeFlags::LINE_BREAK) {
            FlowKind::LineBreak
        } else if !flags.contains(NodeFlags::PAGE_FLOW) {
            FlowKind::OutOfFlow
        } else if flags.contains(NodeFlags::FLOATING) {
            FlowKind::Floating
        } else if flags.contains(NodeFlags::BLOCK_LEVEL) {
            FlowKind::Block
        } else {
            FlowKind::Inline
        }
    }

    pub fn line_break(&self) -> bool {
        self.flags().contains(NodeFlags::LINE_BREAK)
    }

    pub fn page_flow(&self) -> bool {
        self.flags().contains(NodeFlags::PAGE_FLOW)
    }

    pub fn floating(&self) -> bool {
        self.flags().contains(NodeFlags::FLOATING)
    }

    /// Float side, `Float::None` for non-floating nodes.
    pub fn float(&self) -> Float {
        let flags = self.flags();
        if flags.contains(NodeFlags::FLOAT_RIGHT) {
            Float::Right
        } else if flags.contains(NodeFlags::FLOAT_LEFT) {
            Float::Left
        } else {
            Float::None
        }
    }

    pub fn block_static(&self) -> bool {
        self.flags().contains(NodeFlags::BLOCK_STATIC)
    }

    pub fn inline_static(&self) -> bool {
        self.flags().contains(NodeFlags::INLINE_STATIC)
    }

    pub fn block_level(&self) -> bool {
        self.flags().contains(NodeFlags::BLOCK_LEVEL)
    }

    pub fn auto_position(&self) -> bool {
        self.flags().contains(NodeFlags::AUTO_POSITION)
    }

    pub fn percent_width(&self) -> bool {
        self.flags().contains(NodeFlags::PERCENT_WIDTH)
    }

    pub fn has_percent_dimension(&self) -> bool {
        self.flags()
            .intersects(NodeFlags::PERCENT_WIDTH | NodeFlags::PERCENT_HEIGHT)
    }

    /// Percentage width value, zero unless the width is a percentage.
    pub fn width_percent(&self) -> f32 {
        match self.style.width {
            Dimension::Percent(p) => p,
            _ => 0.0,
        }
    }

    /// In normal flow and neither floating nor out of flow.
    pub fn in_flow(&self) -> bool {
        matches!(self.flow_kind(), FlowKind::Block | FlowKind::Inline)
    }

    /// Eligible for run formation.
    pub fn is_rendered_candidate(&self) -> bool {
        self.visible && !self.rendered && !self.style.display.is_hidden()
    }
}
