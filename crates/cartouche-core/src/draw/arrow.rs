//! Arrows for connector annotations.
//!
//! An [`Arrow`] pairs a shared [`ArrowDefinition`] (stroke, path style and
//! label text style) with an [`ArrowDirection`]. The [`ArrowDrawer`] renders
//! arrows and remembers which SVG markers they reference, so the marker
//! definitions can be emitted once per document.

use std::{collections::HashMap, fmt, rc::Rc, str};

use serde::Deserialize;
use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::Point,
};

/// Shape of the path between the two endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowStyle {
    /// One straight segment
    #[default]
    Straight,
    /// A cubic bezier arc
    Curved,
    /// Horizontal and vertical segments only
    Orthogonal,
}

impl str::FromStr for ArrowStyle {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Self::Straight),
            "curved" => Ok(Self::Curved),
            "orthogonal" => Ok(Self::Orthogonal),
            _ => Err("Invalid arrow style"),
        }
    }
}

/// Visual properties shared by arrows.
#[derive(Debug, Clone, Default)]
pub struct ArrowDefinition {
    stroke: StrokeDefinition,
    style: ArrowStyle,
    text: TextDefinition,
}

impl ArrowDefinition {
    /// Creates a straight arrow definition with the given stroke.
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self {
            stroke,
            ..Self::default()
        }
    }

    /// Returns the stroke.
    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Returns the path style.
    pub fn style(&self) -> ArrowStyle {
        self.style
    }

    /// Returns the text style used for labels.
    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    /// Returns a copy with another path style.
    pub fn with_style(mut self, style: ArrowStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns a copy with another label text style.
    pub fn with_text(mut self, text: TextDefinition) -> Self {
        self.text = text;
        self
    }
}

/// Which ends of an arrow carry a marker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ArrowDirection {
    /// `->`: marker at the destination
    #[default]
    Forward,
    /// `<-`: marker at the source
    Backward,
    /// `<->`: markers at both ends
    Bidirectional,
    /// `-`: no markers
    Plain,
}

impl ArrowDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "->",
            Self::Backward => "<-",
            Self::Bidirectional => "<->",
            Self::Plain => "-",
        }
    }
}

impl str::FromStr for ArrowDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "->" | "forward" => Ok(Self::Forward),
            "<-" | "backward" => Ok(Self::Backward),
            "<->" | "both" | "bidirectional" => Ok(Self::Bidirectional),
            "-" | "plain" | "none" => Ok(Self::Plain),
            _ => Err(format!("invalid arrow direction `{s}`")),
        }
    }
}

impl TryFrom<String> for ArrowDirection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ArrowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drawable arrow.
#[derive(Debug, Clone)]
pub struct Arrow {
    definition: Rc<ArrowDefinition>,
    direction: ArrowDirection,
}

impl Arrow {
    /// Creates a new arrow.
    pub fn new(definition: Rc<ArrowDefinition>, direction: ArrowDirection) -> Self {
        Self {
            definition,
            direction,
        }
    }

    /// Returns the shared definition.
    pub fn definition(&self) -> &ArrowDefinition {
        &self.definition
    }

    /// Returns the marker direction.
    pub fn direction(&self) -> ArrowDirection {
        self.direction
    }

    fn render_path(&self, source: Point, destination: Point) -> svg_element::Path {
        let path_data = path_data_for_style(source, destination, self.definition.style);

        let path = svg_element::Path::new()
            .set("d", path_data)
            .set("fill", "none");
        let mut path = crate::apply_stroke!(path, self.definition.stroke());

        let (start_marker, end_marker) = markers(self.direction, self.definition.stroke.color());
        if let Some(marker) = start_marker {
            path = path.set("marker-start", format!("url(#{marker})"));
        }
        if let Some(marker) = end_marker {
            path = path.set("marker-end", format!("url(#{marker})"));
        }

        path
    }
}

/// Renders arrows and collects the SVG markers they need.
#[derive(Debug, Default)]
pub struct ArrowDrawer {
    heads: HashMap<String, Color>,
    tails: HashMap<String, Color>,
}

impl ArrowDrawer {
    /// Draws an arrow between two output-space points.
    ///
    /// The path goes to the [`Connector`](RenderLayer::Connector) layer and the
    /// optional label, centered on the midpoint, to the
    /// [`Text`](RenderLayer::Text) layer.
    pub fn draw_arrow(
        &mut self,
        arrow: &Arrow,
        source: Point,
        destination: Point,
        label: Option<&str>,
    ) -> LayeredOutput {
        self.register_markers(arrow);

        let mut output = LayeredOutput::new();
        output.add_to_layer(
            RenderLayer::Connector,
            Box::new(arrow.render_path(source, destination)),
        );

        if let Some(label) = label.filter(|label| !label.is_empty()) {
            let text = Text::new(arrow.definition.text(), label);
            output.merge(text.render_to_layers(source.midpoint(destination)));
        }

        output
    }

    /// Returns `true` if no arrow with markers has been drawn yet.
    pub fn is_empty(&self) -> bool {
        self.heads.is_empty() && self.tails.is_empty()
    }

    /// Generates the `<defs>` element holding every marker drawn so far.
    pub fn draw_marker_definitions(&self) -> svg_element::Definitions {
        let mut heads: Vec<_> = self.heads.iter().collect();
        let mut tails: Vec<_> = self.tails.iter().collect();
        heads.sort_by(|a, b| a.0.cmp(b.0));
        tails.sort_by(|a, b| a.0.cmp(b.0));

        let defs = heads
            .into_iter()
            .fold(svg_element::Definitions::new(), |defs, (id, color)| {
                defs.add(marker_element(id, *color, "M 10 0 L 0 5 L 10 10 z", 1))
            });
        tails.into_iter().fold(defs, |defs, (id, color)| {
            defs.add(marker_element(id, *color, "M 0 0 L 10 5 L 0 10 z", 9))
        })
    }

    fn register_markers(&mut self, arrow: &Arrow) {
        let color = arrow.definition.stroke().color();
        let (head, tail) = markers(arrow.direction, color);
        if let Some(head) = head {
            self.heads.insert(head, color);
        }
        if let Some(tail) = tail {
            self.tails.insert(tail, color);
        }
    }
}

/// Returns the `(marker-start, marker-end)` ids for a direction and color.
fn markers(direction: ArrowDirection, color: Color) -> (Option<String>, Option<String>) {
    let start = || format!("arrow-start-{}", color.to_id_safe_string());
    let end = || format!("arrow-end-{}", color.to_id_safe_string());
    match direction {
        ArrowDirection::Forward => (None, Some(end())),
        ArrowDirection::Backward => (Some(start()), None),
        ArrowDirection::Bidirectional => (Some(start()), Some(end())),
        ArrowDirection::Plain => (None, None),
    }
}

fn marker_element(id: &str, color: Color, shape: &str, ref_x: i32) -> svg_element::Marker {
    svg_element::Marker::new()
        .set("id", id)
        .set("viewBox", "0 0 10 10")
        .set("refX", ref_x)
        .set("refY", 5)
        .set("markerWidth", 6)
        .set("markerHeight", 6)
        .set("orient", "auto")
        .add(
            svg_element::Path::new()
                .set("d", shape)
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha()),
        )
}

fn path_data_for_style(start: Point, end: Point, style: ArrowStyle) -> String {
    match style {
        ArrowStyle::Straight => format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()),
        ArrowStyle::Curved => {
            let ctrl1 = Point::new(
                start.x() + (end.x() - start.x()) / 4.0,
                start.y() - (end.y() - start.y()) / 2.0,
            );
            let ctrl2 = Point::new(
                end.x() - (end.x() - start.x()) / 4.0,
                end.y() + (start.y() - end.y()) / 2.0,
            );
            format!(
                "M {} {} C {} {}, {} {}, {} {}",
                start.x(),
                start.y(),
                ctrl1.x(),
                ctrl1.y(),
                ctrl2.x(),
                ctrl2.y(),
                end.x(),
                end.y()
            )
        }
        ArrowStyle::Orthogonal => {
            let delta = end.sub_point(start).abs();
            let mid = start.midpoint(end);
            // Leave along the dominant axis
            let (first, second) = if delta.x() > delta.y() {
                (mid.with_y(start.y()), mid.with_y(end.y()))
            } else {
                (mid.with_x(start.x()), mid.with_x(end.x()))
            };
            format!(
                "M {} {} L {} {} L {} {} L {} {}",
                start.x(),
                start.y(),
                first.x(),
                first.y(),
                second.x(),
                second.y(),
                end.x(),
                end.y()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_arrow(direction: ArrowDirection) -> Arrow {
        let stroke = StrokeDefinition::new(Color::new("red").unwrap(), 1.5);
        Arrow::new(Rc::new(ArrowDefinition::new(stroke)), direction)
    }

    #[test]
    fn test_arrow_style_from_str() {
        assert_eq!("straight".parse::<ArrowStyle>().unwrap(), ArrowStyle::Straight);
        assert_eq!("curved".parse::<ArrowStyle>().unwrap(), ArrowStyle::Curved);
        assert_eq!(
            "orthogonal".parse::<ArrowStyle>().unwrap(),
            ArrowStyle::Orthogonal
        );
        assert!("wavy".parse::<ArrowStyle>().is_err());
    }

    #[test]
    fn test_arrow_direction_from_str_and_display() {
        for (text, direction) in [
            ("->", ArrowDirection::Forward),
            ("<-", ArrowDirection::Backward),
            ("<->", ArrowDirection::Bidirectional),
            ("-", ArrowDirection::Plain),
        ] {
            assert_eq!(text.parse::<ArrowDirection>().unwrap(), direction);
            assert_eq!(direction.to_string(), text);
        }
        assert_eq!(
            "both".parse::<ArrowDirection>().unwrap(),
            ArrowDirection::Bidirectional
        );
        assert!(">>".parse::<ArrowDirection>().is_err());
    }

    #[test]
    fn test_straight_path_data() {
        let path = path_data_for_style(
            Point::new(10.0, 20.0),
            Point::new(100.0, 50.0),
            ArrowStyle::Straight,
        );
        assert_eq!(path, "M 10 20 L 100 50");
    }

    #[test]
    fn test_orthogonal_path_goes_horizontal_first_when_wide() {
        let path = path_data_for_style(
            Point::new(0.0, 0.0),
            Point::new(100.0, 10.0),
            ArrowStyle::Orthogonal,
        );
        assert_eq!(path, "M 0 0 L 50 0 L 50 10 L 100 10");
    }

    #[test]
    fn test_draw_arrow_registers_markers() {
        let mut drawer = ArrowDrawer::default();
        assert!(drawer.is_empty());

        let output = drawer.draw_arrow(
            &red_arrow(ArrowDirection::Bidirectional),
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            None,
        );
        assert_eq!(output.len(), 1);
        assert!(!drawer.is_empty());

        let defs = drawer.draw_marker_definitions().to_string();
        assert!(defs.contains("arrow-start-"));
        assert!(defs.contains("arrow-end-"));
    }

    #[test]
    fn test_plain_arrow_has_no_markers() {
        let mut drawer = ArrowDrawer::default();
        let output = drawer.draw_arrow(
            &red_arrow(ArrowDirection::Plain),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            None,
        );

        assert!(drawer.is_empty());
        let svg: String = output.render().iter().map(|n| n.to_string()).collect();
        assert!(!svg.contains("marker-end"));
    }

    #[test]
    fn test_draw_arrow_with_label_adds_text() {
        let mut drawer = ArrowDrawer::default();
        let output = drawer.draw_arrow(
            &red_arrow(ArrowDirection::Forward),
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Some("Alaska"),
        );

        let svg: String = output.render().iter().map(|n| n.to_string()).collect();
        assert!(svg.contains("Alaska"));
        assert!(svg.contains("data-layer=\"text\""));
    }
}
