//! Outer display type, float, clear and positioning keywords.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    Block,
    #[default]
    Inline,
    InlineBlock,
    ListItem,
    Table,
    InlineTable,
    TableRow,
    TableCell,
    Flex,
    InlineFlex,
    Grid,
    InlineGrid,
    Contents,
    None,
}

impl Display {
    /// Block-level outer display.
    pub fn is_block_level(&self) -> bool {
        matches!(
            self,
            Display::Block
                | Display::ListItem
                | Display::Table
                | Display::TableRow
                | Display::Flex
                | Display::Grid
        )
    }

    /// Inline-level outer display, including atomic inlines.
    pub fn is_inline_level(&self) -> bool {
        matches!(
            self,
            Display::Inline
                | Display::InlineBlock
                | Display::InlineTable
                | Display::InlineFlex
                | Display::InlineGrid
                | Display::TableCell
        )
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Display::None)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

impl Float {
    pub fn is_floating(&self) -> bool {
        !matches!(self, Float::None)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Clear {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl Clear {
    pub fn is_clearing(&self) -> bool {
        !matches!(self, Clear::None)
    }

    /// True when this clear value moves the box below floats on `side`.
    pub fn clears(&self, side: Float) -> bool {
        match (self, side) {
            (Clear::Both, Float::Left | Float::Right) => true,
            (Clear::Left, Float::Left) => true,
            (Clear::Right, Float::Right) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    /// Absolute and fixed boxes leave normal flow.
    pub fn is_out_of_flow(&self) -> bool {
        matches!(self, Position::Absolute | Position::Fixed)
    }
}
