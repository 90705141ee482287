use serde::{Deserialize, Serialize};

/// Tolerance used when comparing edges that come from independently rounded measurements.
pub const EDGE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true when any component is NaN/infinite or either dimension is negative.
    pub fn is_malformed(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite())
            || self.width < 0.0
            || self.height < 0.0
    }

    /// Replaces a malformed rect with a zero-sized rect anchored at the finite origin (if any).
    pub fn sanitized(self) -> Self {
        if !self.is_malformed() {
            return self;
        }
        let x = if self.x.is_finite() { self.x } else { 0.0 };
        let y = if self.y.is_finite() { self.y } else { 0.0 };
        Self::new(x, y, 0.0, 0.0)
    }

    /// Shrinks the rect by the given edge amounts. Negative amounts are ignored and the
    /// result never crosses itself, so the output is always contained in `self`.
    pub fn shrink(&self, top: f32, right: f32, bottom: f32, left: f32) -> Self {
        let (top, right, bottom, left) = (top.max(0.0), right.max(0.0), bottom.max(0.0), left.max(0.0));
        let width = (self.width - left - right).max(0.0);
        let height = (self.height - top - bottom).max(0.0);
        let x = (self.x + left).min(self.right());
        let y = (self.y + top).min(self.bottom());
        Self::new(x, y, width.min(self.right() - x), height.min(self.bottom() - y))
    }

    /// Grows the rect outward. Negative amounts are ignored so `self` is always contained
    /// in the output.
    pub fn grow(&self, top: f32, right: f32, bottom: f32, left: f32) -> Self {
        let (top, right, bottom, left) = (top.max(0.0), right.max(0.0), bottom.max(0.0), left.max(0.0));
        Self::new(
            self.x - left,
            self.y - top,
            self.width + left + right,
            self.height + top + bottom,
        )
    }

    /// Smallest rect covering both inputs.
    pub fn union(&self, other: &Rect) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    /// Edge-wise containment with a small tolerance.
    pub fn contains(&self, inner: &Rect) -> bool {
        inner.x >= self.x - EDGE_EPSILON
            && inner.y >= self.y - EDGE_EPSILON
            && inner.right() <= self.right() + EDGE_EPSILON
            && inner.bottom() <= self.bottom() + EDGE_EPSILON
    }

    /// True when the vertical extents of both rects overlap by more than `tolerance`.
    pub fn overlaps_vertically(&self, other: &Rect, tolerance: f32) -> bool {
        self.top() < other.bottom() - tolerance && other.top() < self.bottom() - tolerance
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

impl From<Rect> for Size {
    fn from(rect: Rect) -> Self {
        Self::new(rect.width, rect.height)
    }
}
