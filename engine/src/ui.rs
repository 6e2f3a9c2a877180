//! Layout and geometry primitives.
//!
//! `Rect` is pixel-space (integer) and used for HUD layout and axis-aligned fills. `Point2`
//! is the floating-point coordinate used by pointer input and shape geometry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance.
    pub fn distance(self, other: Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Returns the rectangle inset by `insets` (i.e. the inner content area).
    ///
    /// If insets exceed the rect size, the resulting width/height will saturate to 0.
    pub fn inset(&self, insets: Insets) -> Self {
        let w = self
            .w
            .saturating_sub(insets.left.saturating_add(insets.right));
        let h = self
            .h
            .saturating_sub(insets.top.saturating_add(insets.bottom));
        Self {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            w,
            h,
        }
    }

    /// Places a child of `size` inside this rect using the requested `anchor`.
    ///
    /// If `size` exceeds this rect, it is clamped to fit.
    pub fn place(&self, size: Size, anchor: Anchor) -> Self {
        let w = size.w.min(self.w);
        let h = size.h.min(self.h);

        let x = match anchor {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => self.x,
            Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => {
                self.x.saturating_add(self.w.saturating_sub(w) / 2)
            }
            Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => {
                self.x.saturating_add(self.w.saturating_sub(w))
            }
        };

        let y = match anchor {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => self.y,
            Anchor::CenterLeft | Anchor::Center | Anchor::CenterRight => {
                self.y.saturating_add(self.h.saturating_sub(h) / 2)
            }
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => {
                self.y.saturating_add(self.h.saturating_sub(h))
            }
        };

        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn all(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}
