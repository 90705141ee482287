//! Layout descriptors: the grouping of a run of siblings into one output container.

use bitflags::bitflags;
use boxflow_style::Clear;
use boxflow_types::NodeId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Output container kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerType {
    #[default]
    Unresolved,
    /// Fallback when nothing else could be decided.
    Plain,
    /// A node without rendered children.
    Leaf,
    /// A node with children whose arrangement is decided when they are traversed.
    Group,
    /// Layered container; children overlap (floats over reflowed text).
    Frame,
    Vertical,
    Horizontal,
    /// Children keep their absolute placement.
    Constraint,
}

impl ContainerType {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ContainerType::Unresolved)
    }

    /// Placeholder kinds that a later traversal may refine.
    pub fn is_provisional(&self) -> bool {
        matches!(self, ContainerType::Unresolved | ContainerType::Group)
    }
}

bitflags! {
    /// Alignment classification attached to descriptors and nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Alignment: u32 {
        const AUTO_LAYOUT = 1;
        const HORIZONTAL = 1 << 1;
        const VERTICAL = 1 << 2;
        const ABSOLUTE = 1 << 3;
        const BLOCK = 1 << 4;
        const SEGMENTED = 1 << 5;
        const COLUMN = 1 << 6;
        const FLOAT = 1 << 7;
        const FLOAT_LAYOUT = 1 << 8;
        const INLINE = 1 << 9;
        const RIGHT = 1 << 10;
        const SINGLE = 1 << 11;
        const EXTENDABLE = 1 << 12;
        const WRAPPER = 1 << 13;
        const PERCENT = 1 << 14;
    }
}

impl Alignment {
    pub const UNKNOWN: Alignment = Alignment::empty();

    /// Flag names in declaration order, for serialization and debugging.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl Serialize for Alignment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Float directions present in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FloatedSides {
    pub left: bool,
    pub right: bool,
}

impl FloatedSides {
    pub fn is_empty(&self) -> bool {
        !self.left && !self.right
    }

    pub fn both(&self) -> bool {
        self.left && self.right
    }
}

/// Orientation facts computed once for a list of siblings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearData {
    pub linear_x: bool,
    pub linear_y: bool,
    pub floated: FloatedSides,
    /// Members whose `clear` crossed at least one active float.
    pub cleared: BTreeMap<NodeId, Clear>,
}

impl LinearData {
    pub fn container_type(&self) -> ContainerType {
        if self.linear_y {
            ContainerType::Vertical
        } else if self.linear_x {
            ContainerType::Horizontal
        } else {
            ContainerType::Constraint
        }
    }
}

/// A named grouping of sibling nodes destined to become one output container.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDescriptor {
    pub parent: Option<NodeId>,
    pub node: NodeId,
    pub container_type: ContainerType,
    pub alignment: Alignment,
    pub children: Vec<NodeId>,
    item_count: Option<usize>,
    pub linear_x: bool,
    pub linear_y: bool,
    pub floated: FloatedSides,
    pub cleared: BTreeMap<NodeId, Clear>,
}

impl LayoutDescriptor {
    pub fn new(parent: Option<NodeId>, node: NodeId, children: Vec<NodeId>) -> Self {
        Self {
            parent,
            node,
            container_type: ContainerType::Unresolved,
            alignment: Alignment::UNKNOWN,
            children,
            item_count: None,
            linear_x: false,
            linear_y: false,
            floated: FloatedSides::default(),
            cleared: BTreeMap::new(),
        }
    }

    /// Copies orientation facts from a precomputed sibling analysis.
    pub fn with_linear(mut self, data: &LinearData) -> Self {
        self.linear_x = data.linear_x;
        self.linear_y = data.linear_y;
        self.floated = data.floated;
        self.cleared = data.cleared.clone();
        self
    }

    pub fn item_count(&self) -> usize {
        self.item_count.unwrap_or(self.children.len())
    }

    /// Overrides the member count for deferred groups whose children arrive later.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = Some(count);
    }

    pub fn is_float_layout(&self) -> bool {
        self.alignment.contains(Alignment::FLOAT_LAYOUT)
    }

    /// Container kind implied by the cached orientation.
    pub fn linear_container(&self) -> ContainerType {
        LinearData {
            linear_x: self.linear_x,
            linear_y: self.linear_y,
            floated: self.floated,
            cleared: BTreeMap::new(),
        }
        .container_type()
    }
}
