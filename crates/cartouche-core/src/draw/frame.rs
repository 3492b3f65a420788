//! Rectangular frames drawn behind and around panels.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::Bounds,
};

/// Background fill and border of a rectangular region.
///
/// The fill is rendered to the [`Background`](RenderLayer::Background) layer
/// and the border to the [`Frame`](RenderLayer::Frame) layer, so a border is
/// never hidden by the content it surrounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameDefinition {
    fill: Option<Color>,
    stroke: Option<StrokeDefinition>,
    corner_radius: f32,
}

impl FrameDefinition {
    /// Creates a frame with neither fill nor border.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Returns a copy with another background fill.
    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    /// Returns a copy with another border stroke.
    pub fn with_stroke(mut self, stroke: Option<StrokeDefinition>) -> Self {
        self.stroke = stroke;
        self
    }

    /// Returns a copy with another corner radius.
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    /// Returns `true` if rendering would produce nothing.
    pub fn is_invisible(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }

    /// Renders the frame covering `bounds`, given in output space.
    pub fn render(&self, bounds: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let base = || {
            let mut rect = svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height());
            if self.corner_radius > 0.0 {
                rect = rect.set("rx", self.corner_radius);
            }
            rect
        };

        if let Some(fill) = self.fill {
            let rect = base()
                .set("fill", fill.to_string())
                .set("fill-opacity", fill.alpha())
                .set("stroke", "none");
            output.add_to_layer(RenderLayer::Background, Box::new(rect));
        }

        if let Some(stroke) = &self.stroke {
            let rect = crate::apply_stroke!(base().set("fill", "none"), stroke);
            output.add_to_layer(RenderLayer::Frame, Box::new(rect));
        }

        output
    }
}
