//! Stroke definitions for frames and connectors.
//!
//! A [`StrokeDefinition`] bundles color, width, dash pattern, cap and join,
//! and the [`apply_stroke!`](crate::apply_stroke!) macro writes all of them
//! onto an SVG element at once.
//!
//! | Property | SVG attribute |
//! |----------|---------------|
//! | `color` | `stroke`, `stroke-opacity` |
//! | `width` | `stroke-width` |
//! | `style` | `stroke-dasharray` |
//! | `cap` | `stroke-linecap` |
//! | `join` | `stroke-linejoin` |
//!
//! ```
//! use cartouche_core::{color::Color, draw::StrokeDefinition};
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::dashed(Color::new("gray").unwrap(), 0.5);
//! let rect = cartouche_core::apply_stroke!(svg_element::Rectangle::new(), &stroke);
//! assert!(rect.to_string().contains("stroke-dasharray"));
//! ```

use std::str::FromStr;

use serde::Deserialize;

use crate::color::Color;

/// Line pattern of a stroke.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum StrokeStyle {
    /// Continuous line
    #[default]
    Solid,
    /// 5 unit dashes with 5 unit gaps
    Dashed,
    /// 2 unit dots with 3 unit gaps
    Dotted,
    /// Raw SVG dasharray such as `"10,5,2,5"`
    Custom(String),
}

impl StrokeStyle {
    /// Returns the SVG dasharray value, or `None` for solid lines.
    pub fn to_svg_value(&self) -> Option<&str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5"),
            Self::Dotted => Some("2,3"),
            Self::Custom(pattern) => Some(pattern.as_str()),
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "" => Err("stroke style must not be empty".to_string()),
            pattern => Ok(Self::Custom(pattern.to_string())),
        }
    }
}

impl TryFrom<String> for StrokeStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How line endpoints are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    /// Flat cap at the endpoint
    #[default]
    Butt,
    /// Half-disc beyond the endpoint
    Round,
    /// Half-square beyond the endpoint
    Square,
}

impl StrokeCap {
    /// Returns the SVG `stroke-linecap` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// How line corners are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeJoin {
    /// Sharp corner
    #[default]
    Miter,
    /// Rounded corner
    Round,
    /// Cut-off corner
    Bevel,
}

impl StrokeJoin {
    /// Returns the SVG `stroke-linejoin` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// Complete description of a stroke.
///
/// Defaults to a solid, 1 unit wide black line with butt caps and miter joins.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Creates a solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Alias of [`StrokeDefinition::new`] that reads better next to `dashed`.
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke.
    pub fn dashed(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the line pattern.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Returns the cap style.
    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    /// Returns the join style.
    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    /// Returns a copy with another color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Returns a copy with another width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Returns a copy with another line pattern.
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns a copy with another cap style.
    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    /// Returns a copy with another join style.
    pub fn with_join(mut self, join: StrokeJoin) -> Self {
        self.join = join;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            style: StrokeStyle::default(),
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
        }
    }
}

/// Applies every stroke attribute of a [`StrokeDefinition`] to an SVG element.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke = $stroke;
        let mut elem = $element
            .set("stroke", stroke.color().to_string())
            .set("stroke-opacity", stroke.color().alpha())
            .set("stroke-width", stroke.width())
            .set("stroke-linecap", stroke.cap().to_svg_value())
            .set("stroke-linejoin", stroke.join().to_svg_value());

        if let Some(dasharray) = stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
