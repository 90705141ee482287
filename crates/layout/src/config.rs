use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Share of the container's content width that floated siblings must cover before a
    /// following block-level sibling is treated as intersecting the floats rather than
    /// flowing beside them.
    ///
    /// This is a heuristic threshold, not a geometric invariant. Lower values break
    /// block content out of float rows sooner.
    ///
    /// Defaults to `0.8`.
    pub float_intersect_ratio: f32,

    /// Accumulated percentage width at which a horizontal run wraps.
    ///
    /// Defaults to `100.0`.
    pub percent_limit: f32,

    /// Geometry comparison slack in pixels. Edges closer than this are treated as touching.
    ///
    /// Defaults to `0.5`.
    pub tolerance: f32,

    /// Hide zero-height elements with no border, background or content once their margins
    /// have been merged into the next sibling.
    ///
    /// Defaults to `true`.
    pub hide_inert_elements: bool,

    /// Convert the vertical gap around hard line breaks into margin or padding corrections.
    ///
    /// Defaults to `true`.
    pub collapse_line_break_gaps: bool,

    /// Run the margin collapse pass after traversal.
    ///
    /// Defaults to `true`.
    pub collapse_margins: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            float_intersect_ratio: 0.8,
            percent_limit: 100.0,
            tolerance: 0.5,
            hide_inert_elements: true,
            collapse_line_break_gaps: true,
            collapse_margins: true,
        }
    }
}
