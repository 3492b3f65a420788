//! Placement requests and their resolution into canvas bounds.
//!
//! A [`Placement`] describes where a panel should go, either as absolute
//! bounds in canvas coordinates or as fractions of the canvas plus a
//! justification [`Anchor`]. [`resolve`] turns a placement into concrete
//! [`Bounds`], shrinking aspect-constrained panels to the largest rectangle
//! with the locked ratio that fits inside the request.
//!
//! ```
//! # use cartouche::canvas::{Canvas, OutputExtent, Unit};
//! # use cartouche::placement::{Placement, resolve_bounds};
//! let canvas = Canvas::relative(OutputExtent::new(10.0, 6.0, Unit::In)).unwrap();
//! let bounds = resolve_bounds(&canvas, None, &Placement::relative(0.05, 0.05, 0.26, 0.3)).unwrap();
//! assert!((bounds.width() - 0.26).abs() < 1e-6);
//! ```

use std::{fmt, str::FromStr};

use log::trace;
use serde::Deserialize;

use cartouche_core::geometry::{Bounds, Point, Size};

use crate::{canvas::Canvas, error::LayoutError, panel::Panel};

/// Relative tolerance used for containment checks.
const TOLERANCE: f32 = 1e-4;

/// One of nine reference points of a rectangle.
///
/// Used as the justification of relative placements (which point of the
/// rectangle `(x, y)` denotes) and as connector attachment points.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Anchor {
    #[default]
    BottomLeft,
    Bottom,
    BottomRight,
    Left,
    Center,
    Right,
    TopLeft,
    Top,
    TopRight,
}

impl Anchor {
    /// Horizontal position as a fraction of the width, from the left edge.
    pub fn horizontal_fraction(self) -> f32 {
        match self {
            Self::BottomLeft | Self::Left | Self::TopLeft => 0.0,
            Self::Bottom | Self::Center | Self::Top => 0.5,
            Self::BottomRight | Self::Right | Self::TopRight => 1.0,
        }
    }

    /// Vertical position as a fraction of the height, from the bottom edge.
    pub fn vertical_fraction(self) -> f32 {
        match self {
            Self::BottomLeft | Self::Bottom | Self::BottomRight => 0.0,
            Self::Left | Self::Center | Self::Right => 0.5,
            Self::TopLeft | Self::Top | Self::TopRight => 1.0,
        }
    }

    /// The anchor point on canvas-space `bounds`.
    pub fn point_on(self, bounds: Bounds) -> Point {
        bounds.point_at(self.horizontal_fraction(), self.vertical_fraction())
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::BottomLeft => "bottom-left",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottom-right",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::Top => "top",
            Self::TopRight => "top-right",
        }
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom" => Ok(Self::Bottom),
            "bottom-right" => Ok(Self::BottomRight),
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "top-left" => Ok(Self::TopLeft),
            "top" => Ok(Self::Top),
            "top-right" => Ok(Self::TopRight),
            _ => Err(format!("invalid anchor `{s}`")),
        }
    }
}

impl TryFrom<String> for Anchor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to position one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Explicit bounds in canvas coordinates.
    Absolute {
        x_min: f32,
        x_max: f32,
        y_min: f32,
        y_max: f32,
    },
    /// Fractions of the canvas extent. `(x, y)` is the position of the
    /// `justification` point of the placed rectangle.
    Relative {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        justification: Anchor,
    },
}

impl Placement {
    pub fn absolute(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self::Absolute {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Creates a relative placement justified at its bottom-left corner.
    pub fn relative(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::Relative {
            x,
            y,
            width,
            height,
            justification: Anchor::default(),
        }
    }

    /// Returns a copy with another justification.
    ///
    /// Absolute placements have no justification and are returned unchanged.
    pub fn with_justification(self, anchor: Anchor) -> Self {
        match self {
            Self::Relative {
                x,
                y,
                width,
                height,
                ..
            } => Self::Relative {
                x,
                y,
                width,
                height,
                justification: anchor,
            },
            absolute => absolute,
        }
    }
}

/// Resolves where `panel` goes on `canvas`.
///
/// # Errors
///
/// See [`resolve_bounds`].
pub fn resolve<C>(
    canvas: &Canvas,
    panel: &Panel<C>,
    placement: &Placement,
) -> Result<Bounds, LayoutError> {
    resolve_bounds(canvas, panel.intrinsic_aspect_ratio(), placement)
}

/// Resolves a placement into canvas-space bounds.
///
/// Without an aspect ratio the requested rectangle is returned as is. With
/// one, the result is the largest rectangle inside the request whose physical
/// width/height ratio equals `aspect_ratio`, anchored at the placement's
/// justification point (absolute placements anchor at the center).
///
/// # Errors
///
/// - [`LayoutError::InvalidPlacement`] for a non-positive or non-finite
///   aspect ratio, negative or non-finite relative fractions, inverted or
///   empty absolute bounds, and bounds outside a canvas that does not allow
///   overflow.
/// - [`LayoutError::AspectRatioConflict`] when an aspect-constrained panel
///   receives a zero-width or zero-height request.
pub fn resolve_bounds(
    canvas: &Canvas,
    aspect_ratio: Option<f32>,
    placement: &Placement,
) -> Result<Bounds, LayoutError> {
    if let Some(ratio) = aspect_ratio.filter(|ratio| !(ratio.is_finite() && *ratio > 0.0)) {
        return Err(LayoutError::invalid_placement(
            "intrinsic_aspect_ratio",
            format!("must be positive, got {ratio}"),
        ));
    }

    let (requested, anchor) = requested_bounds(canvas, placement)?;

    if requested.width() <= 0.0 || requested.height() <= 0.0 {
        let side = if requested.width() <= 0.0 {
            "width"
        } else {
            "height"
        };
        return Err(match aspect_ratio {
            Some(_) => LayoutError::aspect_conflict(format!(
                "requested {side} is zero, no rectangle with a locked aspect ratio fits"
            )),
            None => LayoutError::invalid_placement(side, "must be greater than zero"),
        });
    }

    if !canvas.allows_overflow() {
        let extent = canvas.bounds();
        let tolerance = TOLERANCE * extent.width().max(extent.height());
        if !extent.contains_bounds(requested, tolerance) {
            return Err(LayoutError::invalid_placement(
                "bounds",
                format!("{requested:?} exceed the canvas extent {extent:?}"),
            ));
        }
    }

    let Some(ratio) = aspect_ratio else {
        return Ok(requested);
    };

    let resolved = fit_aspect(requested, canvas.canvas_aspect_ratio(ratio), anchor)?;
    trace!(requested:?, resolved:?, ratio; "Aspect-constrained placement resolved");
    Ok(resolved)
}

/// Requested rectangle and the anchor its aspect correction pins.
fn requested_bounds(
    canvas: &Canvas,
    placement: &Placement,
) -> Result<(Bounds, Anchor), LayoutError> {
    match *placement {
        Placement::Absolute {
            x_min,
            x_max,
            y_min,
            y_max,
        } => {
            for (field, value) in [
                ("x_min", x_min),
                ("x_max", x_max),
                ("y_min", y_min),
                ("y_max", y_max),
            ] {
                if !value.is_finite() {
                    return Err(LayoutError::invalid_placement(field, "must be finite"));
                }
            }
            if x_min >= x_max {
                return Err(LayoutError::invalid_placement(
                    "x_min",
                    format!("must be less than `x_max` ({x_min} >= {x_max})"),
                ));
            }
            if y_min >= y_max {
                return Err(LayoutError::invalid_placement(
                    "y_min",
                    format!("must be less than `y_max` ({y_min} >= {y_max})"),
                ));
            }
            Ok((
                Bounds::from_extents(x_min, x_max, y_min, y_max),
                Anchor::Center,
            ))
        }
        Placement::Relative {
            x,
            y,
            width,
            height,
            justification,
        } => {
            for (field, value) in [("x", x), ("y", y), ("width", width), ("height", height)] {
                if !value.is_finite() {
                    return Err(LayoutError::invalid_placement(field, "must be finite"));
                }
                if value < 0.0 {
                    return Err(LayoutError::invalid_placement(
                        field,
                        format!("must not be negative, got {value}"),
                    ));
                }
            }

            let extent = canvas.bounds();
            let size = Size::new(width * extent.width(), height * extent.height());
            let anchor_point = extent.point_at(x, y);
            let min = Point::new(
                anchor_point.x() - justification.horizontal_fraction() * size.width(),
                anchor_point.y() - justification.vertical_fraction() * size.height(),
            );
            Ok((Bounds::from_origin(min, size), justification))
        }
    }
}

/// Largest rectangle inside `requested` with `width / height == ratio`,
/// keeping the `anchor` point of both rectangles in place.
fn fit_aspect(requested: Bounds, ratio: f32, anchor: Anchor) -> Result<Bounds, LayoutError> {
    let width = requested.width();
    let height = requested.height();

    // Shrink the width or shrink the height; keep whichever fits with the
    // larger area.
    let best = [Size::new(height * ratio, height), Size::new(width, width / ratio)]
        .into_iter()
        .filter(|size| {
            size.width() <= width * (1.0 + TOLERANCE) && size.height() <= height * (1.0 + TOLERANCE)
        })
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .map(|size| Size::new(size.width().min(width), size.height().min(height)));

    let Some(size) = best.filter(|size| size.area() > 0.0 && size.area().is_finite()) else {
        return Err(LayoutError::aspect_conflict(format!(
            "no positive-area rectangle with ratio {ratio} fits in {width}x{height}"
        )));
    };

    let min = Point::new(
        requested.min_x() + anchor.horizontal_fraction() * (width - size.width()),
        requested.min_y() + anchor.vertical_fraction() * (height - size.height()),
    );
    Ok(Bounds::from_origin(min, size))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::canvas::{OutputExtent, Unit};

    fn unit_canvas() -> Canvas {
        Canvas::relative(OutputExtent::new(100.0, 100.0, Unit::Px)).unwrap()
    }

    fn data_canvas() -> Canvas {
        Canvas::absolute((0.0, 10.0), (0.0, 6.0), OutputExtent::new(10.0, 6.0, Unit::In))
            .unwrap()
    }

    #[test]
    fn test_anchor_parsing_and_fractions() {
        assert_eq!("top-right".parse::<Anchor>().unwrap(), Anchor::TopRight);
        assert_eq!(Anchor::default(), Anchor::BottomLeft);
        assert_eq!(Anchor::Center.to_string(), "center");
        assert!("middle".parse::<Anchor>().is_err());

        assert_eq!(Anchor::TopRight.horizontal_fraction(), 1.0);
        assert_eq!(Anchor::TopRight.vertical_fraction(), 1.0);
        assert_eq!(Anchor::Left.vertical_fraction(), 0.5);
    }

    #[test]
    fn test_absolute_pass_through() {
        let bounds = resolve_bounds(
            &data_canvas(),
            None,
            &Placement::absolute(1.0, 4.0, 2.0, 5.0),
        )
        .unwrap();
        assert_eq!(bounds, Bounds::from_extents(1.0, 4.0, 2.0, 5.0));
    }

    #[test]
    fn test_inverted_absolute_bounds() {
        let err = resolve_bounds(
            &data_canvas(),
            None,
            &Placement::absolute(5.0, 0.0, 0.0, 1.0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidPlacement { field: "x_min", .. }
        ));
    }

    #[test]
    fn test_absolute_out_of_extent() {
        let err = resolve_bounds(
            &data_canvas(),
            None,
            &Placement::absolute(8.0, 12.0, 0.0, 1.0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidPlacement { field: "bounds", .. }
        ));
    }

    #[test]
    fn test_relative_overflow_allowed_on_unit_square() {
        let bounds = resolve_bounds(
            &unit_canvas(),
            None,
            &Placement::relative(0.9, 0.9, 0.3, 0.3),
        )
        .unwrap();
        assert_approx_eq!(f32, bounds.max_x(), 1.2, epsilon = 1e-6);
    }

    #[test]
    fn test_relative_justification() {
        let placement = Placement::relative(0.5, 0.5, 0.2, 0.4).with_justification(Anchor::Center);
        let bounds = resolve_bounds(&unit_canvas(), None, &placement).unwrap();

        assert_approx_eq!(f32, bounds.min_x(), 0.4, epsilon = 1e-6);
        assert_approx_eq!(f32, bounds.max_x(), 0.6, epsilon = 1e-6);
        assert_approx_eq!(f32, bounds.min_y(), 0.3, epsilon = 1e-6);
        assert_approx_eq!(f32, bounds.max_y(), 0.7, epsilon = 1e-6);
    }

    #[test]
    fn test_relative_on_data_canvas_scales_by_extent() {
        let bounds = resolve_bounds(
            &data_canvas(),
            None,
            &Placement::relative(0.5, 0.0, 0.5, 0.5),
        )
        .unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 5.0, epsilon = 1e-6);
        assert_approx_eq!(f32, bounds.width(), 5.0, epsilon = 1e-6);
        assert_approx_eq!(f32, bounds.height(), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_fraction_rejected() {
        let err = resolve_bounds(
            &unit_canvas(),
            None,
            &Placement::relative(-0.1, 0.0, 0.5, 0.5),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPlacement { field: "x", .. }));
    }

    #[test]
    fn test_invalid_aspect_ratio_rejected() {
        for ratio in [0.0, -1.0, f32::NAN] {
            let err = resolve_bounds(
                &unit_canvas(),
                Some(ratio),
                &Placement::relative(0.0, 0.0, 0.5, 0.5),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                LayoutError::InvalidPlacement {
                    field: "intrinsic_aspect_ratio",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_zero_size_request() {
        let placement = Placement::relative(0.1, 0.1, 0.0, 0.5);

        let err = resolve_bounds(&unit_canvas(), Some(1.5), &placement).unwrap_err();
        assert!(matches!(err, LayoutError::AspectRatioConflict { .. }));

        let err = resolve_bounds(&unit_canvas(), None, &placement).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidPlacement { field: "width", .. }
        ));
    }

    #[test]
    fn test_aspect_shrinks_width_and_keeps_justification() {
        // Wide request, tall panel: the width shrinks, pinned to the left
        let bounds = resolve_bounds(
            &data_canvas(),
            Some(0.5),
            &Placement::absolute(0.0, 10.0, 0.0, 4.0),
        )
        .unwrap();
        assert_approx_eq!(f32, bounds.width(), 2.0, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.height(), 4.0, epsilon = 1e-5);
        // Absolute placements stay centered
        assert_approx_eq!(f32, bounds.min_x(), 4.0, epsilon = 1e-5);

        let placement =
            Placement::relative(1.0, 1.0, 1.0, 0.5).with_justification(Anchor::TopRight);
        let bounds = resolve_bounds(&data_canvas(), Some(1.0), &placement).unwrap();
        assert_approx_eq!(f32, bounds.width(), 3.0, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.max_x(), 10.0, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.max_y(), 6.0, epsilon = 1e-5);
    }

    #[test]
    fn test_aspect_shrinks_height() {
        let bounds = resolve_bounds(
            &data_canvas(),
            Some(2.0),
            &Placement::relative(0.0, 0.0, 0.4, 1.0),
        )
        .unwrap();
        assert_approx_eq!(f32, bounds.width(), 4.0, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.height(), 2.0, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.min_y(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_aspect_is_physical_on_stretched_canvas() {
        // 10x6 inch output over the unit square: a physically square panel
        // is 0.6 canvas units wide per canvas unit of height.
        let canvas = Canvas::relative(OutputExtent::new(10.0, 6.0, Unit::In)).unwrap();
        let bounds =
            resolve_bounds(&canvas, Some(1.0), &Placement::relative(0.0, 0.0, 1.0, 1.0)).unwrap();

        let output = canvas.to_output_bounds(bounds);
        assert_approx_eq!(f32, output.width(), output.height(), epsilon = 1e-3);
        assert_approx_eq!(f32, bounds.width(), 0.6, epsilon = 1e-5);
    }

    #[test]
    fn test_resolve_uses_panel_ratio() {
        let panel = Panel::new("alaska", ()).with_aspect_ratio(0.5);
        let bounds = resolve(
            &data_canvas(),
            &panel,
            &Placement::absolute(0.0, 6.0, 0.0, 6.0),
        )
        .unwrap();
        assert_approx_eq!(f32, bounds.width() / bounds.height(), 0.5, epsilon = 1e-5);
    }
}
