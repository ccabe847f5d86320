// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Plain geometry value types used by the diagram layout.

/// A point on the canvas, with `y` growing downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Linearly interpolates between this point and another point
    pub fn lerp(self, other: Point, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns the size left after removing the given insets, never negative
    pub fn shrink(self, insets: Insets) -> Self {
        Self {
            width: (self.width - insets.horizontal_sum()).max(0.0),
            height: (self.height - insets.vertical_sum()).max(0.0),
        }
    }
}

/// An axis-aligned rectangle given by its top-left corner and its size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn width(self) -> f64 {
        self.width
    }

    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns the x-coordinate of the right edge
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    /// Returns the y-coordinate of the bottom edge
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Returns the top-left corner
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns true if the two rectangles share any interior area
    pub fn overlaps(self, other: Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Spacing on the four sides of a box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Insets {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f64 {
        self.top
    }

    pub fn right(self) -> f64 {
        self.right
    }

    pub fn bottom(self) -> f64 {
        self.bottom
    }

    pub fn left(self) -> f64 {
        self.left
    }

    pub fn horizontal_sum(self) -> f64 {
        self.left + self.right
    }

    pub fn vertical_sum(self) -> f64 {
        self.top + self.bottom
    }
}

/// A cubic Bézier curve segment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezier {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicBezier {
    pub fn new(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }

    /// Evaluates the curve at `t` in `[0, 1]` using de Casteljau's algorithm
    pub fn point_at(self, t: f64) -> Point {
        let a = self.start.lerp(self.control1, t);
        let b = self.control1.lerp(self.control2, t);
        let c = self.control2.lerp(self.end, t);
        let d = a.lerp(b, t);
        let e = b.lerp(c, t);
        d.lerp(e, t)
    }
}
