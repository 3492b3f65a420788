//! Points, sizes and rectangles shared by the layout and drawing code.
//!
//! - [`Point`] - a position
//! - [`Size`] - a width and height
//! - [`Bounds`] - an axis-aligned rectangle stored by its extents
//! - [`Insets`] - per-side padding
//!
//! # Coordinate Systems
//!
//! None of the types know which way the y axis points. Two spaces use them:
//!
//! ```text
//!   canvas space                 output space (SVG)
//!
//!    +Y                            (0,0) ────────► +X
//!     ▲                              │
//!     │                              │
//!     │                              ▼
//!   (0,0) ────────► +X              +Y
//! ```
//!
//! Canvas space is Cartesian, with data or unit-square coordinates. Output
//! space is what SVG expects, in pixels. The canvas of a composition converts
//! between them.

/// A position in either canvas or output space.
///
/// ```
/// # use cartouche_core::geometry::Point;
/// let alaska = Point::new(0.1, 0.2);
/// let label = alaska.midpoint(Point::new(0.5, 0.4));
/// assert_eq!(label, Point::new(0.3, 0.3));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    /// Component-wise `self - other`.
    pub fn sub_point(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// A rectangle of `size` centered on this point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::centered_at(self, size)
    }
}

/// Width and height of a panel, text run or artwork.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    pub fn area(self) -> f32 {
        self.width * self.height
    }

    /// Returns `width / height`, or `None` when the height is not positive.
    ///
    /// ```
    /// # use cartouche_core::geometry::Size;
    /// assert_eq!(Size::new(10.0, 5.0).aspect_ratio(), Some(2.0));
    /// assert_eq!(Size::new(10.0, 0.0).aspect_ratio(), None);
    /// ```
    pub fn aspect_ratio(self) -> Option<f32> {
        (self.height > 0.0).then(|| self.width / self.height)
    }

    /// Grows the size by the total inset on each axis.
    pub fn add_padding(self, insets: Insets) -> Self {
        Self::new(
            self.width + insets.left + insets.right,
            self.height + insets.top + insets.bottom,
        )
    }
}

/// An axis-aligned rectangle.
///
/// `min_y` is the bottom edge in canvas space and the top edge in output
/// space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from extents in `x_min, x_max, y_min, y_max` order.
    ///
    /// Inverted extents are kept as given; see [`Bounds::is_well_formed`].
    ///
    /// ```
    /// # use cartouche_core::geometry::Bounds;
    /// let inset = Bounds::from_extents(0.0, 4.0, 1.0, 3.0);
    /// assert_eq!((inset.width(), inset.height()), (4.0, 2.0));
    /// ```
    pub fn from_extents(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn centered_at(center: Point, size: Size) -> Self {
        let (dx, dy) = (size.width * 0.5, size.height * 0.5);
        Self::from_extents(center.x - dx, center.x + dx, center.y - dy, center.y + dy)
    }

    /// Creates bounds spanning `size` from the minimum corner `origin`.
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::from_extents(
            origin.x,
            origin.x + size.width,
            origin.y,
            origin.y + size.height,
        )
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(self) -> Point {
        self.point_at(0.5, 0.5)
    }

    /// Finite extents with `min < max` on both axes.
    pub fn is_well_formed(self) -> bool {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .into_iter()
            .all(f32::is_finite);
        finite && self.min_x < self.max_x && self.min_y < self.max_y
    }

    /// The point at fractions `(fx, fy)` of the way from the minimum corner
    /// to the maximum corner.
    ///
    /// ```
    /// # use cartouche_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_extents(0.0, 10.0, 0.0, 4.0);
    /// assert_eq!(bounds.point_at(0.5, 1.0), Point::new(5.0, 4.0));
    /// ```
    pub fn point_at(self, fx: f32, fy: f32) -> Point {
        Point::new(
            self.min_x + fx * self.width(),
            self.min_y + fy * self.height(),
        )
    }

    /// Whether `other` fits inside, letting each edge stick out by up to
    /// `tolerance`.
    pub fn contains_bounds(self, other: Bounds, tolerance: f32) -> bool {
        other.min_x + tolerance >= self.min_x
            && other.min_y + tolerance >= self.min_y
            && other.max_x - tolerance <= self.max_x
            && other.max_y - tolerance <= self.max_y
    }

    /// Moves every edge inward by its inset. `top` applies to `min_y`.
    pub fn shrink(self, insets: Insets) -> Self {
        Self::from_extents(
            self.min_x + insets.left,
            self.max_x - insets.right,
            self.min_y + insets.top,
            self.max_y - insets.bottom,
        )
    }
}

/// Padding on the four sides of a rectangle, in CSS order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn with_top(self, top: f32) -> Self {
        Self { top, ..self }
    }
}
