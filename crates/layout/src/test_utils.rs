//! Fixture helpers shared by the layout unit tests.

use crate::builder::{attach, StyledElement};
use crate::tree::NodeTree;
use boxflow_types::{NodeId, Rect};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn block(tag: &str, bounds: Rect) -> StyledElement {
    StyledElement::block(tag, bounds)
}

pub fn inline(tag: &str, bounds: Rect) -> StyledElement {
    StyledElement::inline(tag, bounds)
}

pub fn text(content: &str, bounds: Rect) -> StyledElement {
    StyledElement::text(content, bounds)
}

pub fn line_break(bounds: Rect) -> StyledElement {
    StyledElement::line_break(bounds)
}

/// Incrementally builds a tree below a `body` root.
pub struct TreeFixture {
    pub tree: NodeTree,
    pub root: NodeId,
}

impl TreeFixture {
    pub fn new(bounds: Rect) -> Self {
        init_logger();
        let mut tree = NodeTree::new();
        let root = attach(&mut tree, None, &StyledElement::block("body", bounds));
        Self { tree, root }
    }

    pub fn child(&mut self, parent: NodeId, element: StyledElement) -> NodeId {
        attach(&mut self.tree, Some(parent), &element)
    }

    pub fn finish(self) -> NodeTree {
        self.tree
    }
}

pub fn r(x: f32, y: f32, width: f32, height: f32) -> Rect {
    Rect::new(x, y, width, height)
}
