//! The output drawing surface of a composition.
//!
//! A [`Canvas`] pairs a [`CoordinateMode`], the coordinate system placements
//! are expressed in, with an [`OutputExtent`], the physical size of the
//! result. The canvas owns the mapping from canvas space (Cartesian, y up) to
//! output space (SVG user units in pixels, y down).
//!
//! ```
//! # use cartouche::canvas::{Canvas, OutputExtent, Unit};
//! # use cartouche::geometry::Point;
//! let canvas = Canvas::relative(OutputExtent::new(10.0, 6.0, Unit::In)).unwrap();
//! let top_left = canvas.to_output_point(Point::new(0.0, 1.0));
//! assert_eq!(top_left, Point::new(0.0, 0.0));
//! assert_eq!(canvas.output_size().width(), 960.0);
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use cartouche_core::geometry::{Bounds, Point, Size};

use crate::error::LayoutError;

/// CSS reference resolution used to convert physical units to pixels.
pub const PIXELS_PER_INCH: f32 = 96.0;

/// Physical unit of an [`OutputExtent`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Px,
    In,
    Cm,
    Mm,
}

impl Unit {
    /// Number of pixels in one unit.
    pub fn to_px(self) -> f32 {
        match self {
            Self::Px => 1.0,
            Self::In => PIXELS_PER_INCH,
            Self::Cm => PIXELS_PER_INCH / 2.54,
            Self::Mm => PIXELS_PER_INCH / 25.4,
        }
    }

    /// Suffix used for SVG length attributes.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::In => "in",
            Self::Cm => "cm",
            Self::Mm => "mm",
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "px" => Ok(Self::Px),
            "in" => Ok(Self::In),
            "cm" => Ok(Self::Cm),
            "mm" => Ok(Self::Mm),
            _ => Err(format!("unknown unit `{s}`")),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Physical width and height of the composed output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputExtent {
    width: f32,
    height: f32,
    unit: Unit,
}

impl OutputExtent {
    pub fn new(width: f32, height: f32, unit: Unit) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// The extent converted to pixels.
    pub fn to_px(&self) -> Size {
        Size::new(self.width * self.unit.to_px(), self.height * self.unit.to_px())
    }
}

/// Coordinate system that placements on a canvas are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateMode {
    /// Explicit data-space limits, as `(min, max)` pairs.
    AbsoluteDataSpace {
        x_limits: (f32, f32),
        y_limits: (f32, f32),
    },
    /// The unit square `[0, 1] x [0, 1]`. Panels may overflow it into the
    /// margins.
    RelativeUnitSquare,
}

/// Coordinate mode plus physical extent of a composition's output.
///
/// Read-only while placements are resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    mode: CoordinateMode,
    extent: OutputExtent,
}

impl Canvas {
    /// Creates a canvas over the unit square.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidCanvas`] if the extent is not strictly
    /// positive and finite.
    pub fn relative(extent: OutputExtent) -> Result<Self, LayoutError> {
        Self::new(CoordinateMode::RelativeUnitSquare, extent)
    }

    /// Creates a canvas over explicit data-space limits.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidCanvas`] if a limit pair is inverted,
    /// empty or not finite.
    pub fn absolute(
        x_limits: (f32, f32),
        y_limits: (f32, f32),
        extent: OutputExtent,
    ) -> Result<Self, LayoutError> {
        check_limits("x_limits", x_limits)?;
        check_limits("y_limits", y_limits)?;
        Self::new(
            CoordinateMode::AbsoluteDataSpace { x_limits, y_limits },
            extent,
        )
    }

    /// Creates a canvas, validating the extent.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidCanvas`] if the extent is not strictly
    /// positive and finite.
    pub fn new(mode: CoordinateMode, extent: OutputExtent) -> Result<Self, LayoutError> {
        for (field, value) in [("width", extent.width), ("height", extent.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidCanvas {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if let CoordinateMode::AbsoluteDataSpace { x_limits, y_limits } = mode {
            check_limits("x_limits", x_limits)?;
            check_limits("y_limits", y_limits)?;
        }
        Ok(Self { mode, extent })
    }

    pub fn mode(&self) -> CoordinateMode {
        self.mode
    }

    pub fn extent(&self) -> OutputExtent {
        self.extent
    }

    /// Returns `true` if placements may extend past the canvas bounds.
    pub fn allows_overflow(&self) -> bool {
        matches!(self.mode, CoordinateMode::RelativeUnitSquare)
    }

    /// The region spanned by the canvas, in canvas coordinates.
    pub fn bounds(&self) -> Bounds {
        match self.mode {
            CoordinateMode::AbsoluteDataSpace { x_limits, y_limits } => {
                Bounds::from_extents(x_limits.0, x_limits.1, y_limits.0, y_limits.1)
            }
            CoordinateMode::RelativeUnitSquare => Bounds::from_extents(0.0, 1.0, 0.0, 1.0),
        }
    }

    /// Output size in pixels.
    pub fn output_size(&self) -> Size {
        self.extent.to_px()
    }

    /// Pixels per canvas unit along x and y.
    pub fn scale(&self) -> (f32, f32) {
        let bounds = self.bounds();
        let output = self.output_size();
        (
            output.width() / bounds.width(),
            output.height() / bounds.height(),
        )
    }

    /// Converts a physical width/height ratio into the ratio of the same
    /// rectangle measured in canvas coordinates.
    ///
    /// Both ratios agree on equal-scaled canvases.
    pub fn canvas_aspect_ratio(&self, physical_ratio: f32) -> f32 {
        let (sx, sy) = self.scale();
        physical_ratio * sy / sx
    }

    /// Maps a canvas point to output space.
    pub fn to_output_point(&self, point: Point) -> Point {
        let bounds = self.bounds();
        let (sx, sy) = self.scale();
        Point::new(
            (point.x() - bounds.min_x()) * sx,
            (bounds.max_y() - point.y()) * sy,
        )
    }

    /// Maps canvas bounds to output space.
    ///
    /// The canvas top edge (`max_y`) becomes the output `min_y`.
    pub fn to_output_bounds(&self, bounds: Bounds) -> Bounds {
        let top_left = self.to_output_point(Point::new(bounds.min_x(), bounds.max_y()));
        let bottom_right = self.to_output_point(Point::new(bounds.max_x(), bounds.min_y()));
        Bounds::from_extents(
            top_left.x(),
            bottom_right.x(),
            top_left.y(),
            bottom_right.y(),
        )
    }
}

fn check_limits(field: &'static str, (min, max): (f32, f32)) -> Result<(), LayoutError> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(LayoutError::InvalidCanvas {
            field,
            reason: "must be finite".to_string(),
        });
    }
    if min >= max {
        return Err(LayoutError::InvalidCanvas {
            field,
            reason: format!("must be increasing, got ({min}, {max})"),
        });
    }
    Ok(())
}
