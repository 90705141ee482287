/// Represents the specific type of a box node.
///
/// Element nodes come from the styled input tree. Group and wrapper nodes are synthesized
/// by the engine while it partitions siblings into runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    LineBreak,
    Group,
    Wrapper,
}

impl NodeKind {
    /// Determines the `NodeKind` from an element tag name.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "#text" => NodeKind::Text,
            "br" | "BR" => NodeKind::LineBreak,
            "#group" => NodeKind::Group,
            "#wrapper" => NodeKind::Wrapper,
            _ => NodeKind::Element,
        }
    }

    /// Nodes created by the engine rather than the style resolver.
    pub fn is_synthesized(&self) -> bool {
        matches!(self, NodeKind::Group | NodeKind::Wrapper)
    }

    /// Returns a string representation, primarily for debugging or error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Element => "Element",
            NodeKind::Text => "Text",
            NodeKind::LineBreak => "LineBreak",
            NodeKind::Group => "Group",
            NodeKind::Wrapper => "Wrapper",
        }
    }
}
