//! Builds the node arena from the styled element tree handed over by the style resolver.

use crate::node::BoxNode;
use crate::tree::NodeTree;
use boxflow_style::{Clear, Dimension, Display, ElementStyle, Float, Position};
use boxflow_types::{NodeId, Rect};
use serde::{Deserialize, Serialize};

fn default_tag() -> String {
    "div".to_string()
}

/// One element of the styled input tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledElement {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub bounds: Rect,
    #[serde(flatten)]
    pub style: ElementStyle,
    #[serde(default, alias = "text", skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// Rendered line count. Estimated from the line height when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<u32>,
    /// Overrides the flow participation derived from `position`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_flow: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StyledElement>,
}

impl Default for StyledElement {
    fn default() -> Self {
        Self::new(default_tag(), Rect::zero())
    }
}

impl StyledElement {
    pub fn new(tag: impl Into<String>, bounds: Rect) -> Self {
        Self {
            tag: tag.into(),
            bounds,
            style: ElementStyle::default(),
            text_content: None,
            lines: None,
            page_flow: None,
            children: Vec::new(),
        }
    }

    pub fn block(tag: impl Into<String>, bounds: Rect) -> Self {
        Self::new(tag, bounds).display(Display::Block)
    }

    pub fn inline(tag: impl Into<String>, bounds: Rect) -> Self {
        Self::new(tag, bounds).display(Display::Inline)
    }

    /// A plain text run.
    pub fn text(content: impl Into<String>, bounds: Rect) -> Self {
        let mut element = Self::new("#text", bounds);
        element.text_content = Some(content.into());
        element
    }

    pub fn line_break(bounds: Rect) -> Self {
        Self::new("br", bounds)
    }

    pub fn with_child(mut self, child: StyledElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = StyledElement>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text_content = Some(content.into());
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.style.display = display;
        self
    }

    pub fn float_left(mut self) -> Self {
        self.style.float = Float::Left;
        self
    }

    pub fn float_right(mut self) -> Self {
        self.style.float = Float::Right;
        self
    }

    pub fn clear(mut self, clear: Clear) -> Self {
        self.style.clear = clear;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.style.position = position;
        self
    }

    /// `[top, right, bottom, left]`
    pub fn margin(mut self, margin: [f32; 4]) -> Self {
        self.style.margin = margin.into();
        self
    }

    pub fn padding(mut self, padding: [f32; 4]) -> Self {
        self.style.padding = padding.into();
        self
    }

    pub fn border(mut self, border: [f32; 4]) -> Self {
        self.style.border = border.into();
        self
    }

    pub fn width(mut self, width: Dimension) -> Self {
        self.style.width = width;
        self
    }

    pub fn height(mut self, height: Dimension) -> Self {
        self.style.height = height;
        self
    }

    pub fn percent_width(self, percent: f32) -> Self {
        self.width(Dimension::Percent(percent))
    }

    pub fn centered(mut self) -> Self {
        self.style.auto_margin.left = true;
        self.style.auto_margin.right = true;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.style.line_height = Some(line_height);
        self
    }

    pub fn lines(mut self, lines: u32) -> Self {
        self.lines = Some(lines);
        self
    }

    pub fn background(mut self) -> Self {
        self.style.background = true;
        self
    }

    fn estimated_lines(&self, bounds: &Rect) -> u32 {
        if let Some(lines) = self.lines {
            return lines;
        }
        let has_text = self
            .text_content
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if !has_text {
            return 0;
        }
        match self.style.line_height {
            Some(lh) if lh > 0.0 => ((bounds.height / lh).round() as u32).max(1),
            _ => 1,
        }
    }
}

/// Builds a fresh arena from `root`.
pub fn build_tree(root: &StyledElement) -> NodeTree {
    let mut tree = NodeTree::new();
    attach(&mut tree, None, root);
    log::debug!("Built node tree with {} nodes.", tree.len());
    tree
}

/// Adds `element` and its descendants under `parent`, returning the new node's id.
pub fn attach(tree: &mut NodeTree, parent: Option<NodeId>, element: &StyledElement) -> NodeId {
    let top = push_element(tree, parent, element);
    let mut stack: Vec<(NodeId, &StyledElement)> = vec![(top, element)];
    while let Some((id, current)) = stack.pop() {
        for child in &current.children {
            let child_id = push_element(tree, Some(id), child);
            stack.push((child_id, child));
        }
    }
    top
}

fn push_element(tree: &mut NodeTree, parent: Option<NodeId>, element: &StyledElement) -> NodeId {
    let bounds = if element.bounds.is_malformed() {
        log::warn!(
            "Malformed geometry on <{}>: {:?}. Substituting an empty rect.",
            element.tag,
            element.bounds
        );
        element.bounds.sanitized()
    } else {
        element.bounds
    };

    let mut style = element.style.clone();
    for (name, edges) in [
        ("margin", &mut style.margin),
        ("border", &mut style.border),
        ("padding", &mut style.padding),
    ] {
        let clean = edges.sanitized();
        if clean != *edges {
            log::warn!("Non-finite {} on <{}> replaced with zero.", name, element.tag);
            *edges = clean;
        }
    }
    for edge in [&mut style.border.top, &mut style.border.right, &mut style.border.bottom, &mut style.border.left] {
        *edge = edge.max(0.0);
    }

    let mut node = BoxNode::new(tree.next_id(), element.tag.clone(), bounds, style);
    node.text = element.text_content.clone();
    node.lines = element.estimated_lines(&bounds);
    node.page_flow = element.page_flow;
    if node.line_break() {
        node.excluded = true;
    }
    if !node.style.visible || node.style.display.is_hidden() {
        node.visible = false;
    }

    let id = tree.push(node);
    if let Some(parent) = parent {
        tree.append_dom_child(parent, id);
    }
    id
}
