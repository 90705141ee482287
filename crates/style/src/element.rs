//! The resolved per-element style record handed over by the style resolver.

use super::dimension::{AutoMargins, Dimension, Margins};
use super::display::{Clear, Display, Float, Position};
use super::text::TextAlign;
use serde::{Deserialize, Serialize};

/// Explicit `top`/`right`/`bottom`/`left` offsets of a positioned box.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Insets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
}

impl Insets {
    /// No offset was given on any side.
    pub fn is_auto(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyle {
    // Box generation
    pub display: Display,
    pub float: Float,
    pub clear: Clear,
    pub position: Position,
    pub inset: Insets,
    pub visible: bool,

    // Dimensions
    pub width: Dimension,
    pub height: Dimension,

    // Box model
    pub margin: Margins,
    pub border: Margins,
    pub padding: Margins,
    pub auto_margin: AutoMargins,

    // Text & paint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    pub text_align: TextAlign,
    pub background: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            display: Display::default(),
            float: Float::default(),
            clear: Clear::default(),
            position: Position::default(),
            inset: Insets::default(),
            visible: true,
            width: Dimension::Auto,
            height: Dimension::Auto,
            margin: Margins::default(),
            border: Margins::default(),
            padding: Margins::default(),
            auto_margin: AutoMargins::default(),
            line_height: None,
            text_align: TextAlign::default(),
            background: false,
        }
    }
}

impl ElementStyle {
    pub fn block() -> Self {
        Self {
            display: Display::Block,
            ..Default::default()
        }
    }

    pub fn inline() -> Self {
        Self::default()
    }

    /// Participates in normal flow (not absolutely or fixed positioned).
    pub fn is_page_flow(&self) -> bool {
        !self.position.is_out_of_flow()
    }

    pub fn has_percent_dimension(&self) -> bool {
        self.width.is_percent() || self.height.is_percent()
    }
}
