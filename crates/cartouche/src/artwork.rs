//! Reference panel content and its renderer.
//!
//! [`Artwork`] is the content type used by scene files: either pre-rendered
//! SVG markup (a map produced by some other tool) or a labeled placeholder.
//! [`ArtworkRenderer`] implements [`Renderer`] for it.

use log::debug;
use svg::{
    node::{Blob, element as svg_element},
    parser::Event,
};

use cartouche_core::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Bounds, Size},
};

use crate::compose::Renderer;

/// Pre-rendered SVG markup with a known intrinsic size.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgArtwork {
    markup: String,
    size: Size,
}

impl SvgArtwork {
    /// Parses SVG markup and reads its intrinsic size from the root element.
    ///
    /// The size comes from the `viewBox`, falling back to the `width` and
    /// `height` attributes.
    ///
    /// # Errors
    ///
    /// Returns a message if the markup has no `<svg>` root or no usable size.
    pub fn parse(markup: &str) -> Result<Self, String> {
        let start = markup
            .find("<svg")
            .ok_or_else(|| "no <svg> element found".to_string())?;
        let markup = &markup[start..];

        let parser = svg::read(markup).map_err(|err| err.to_string())?;
        for event in parser {
            match event {
                Event::Tag(name, _, attributes) if name == "svg" => {
                    let view_box = attributes.get("viewBox").map(|value| value.to_string());
                    let width = attributes.get("width").map(|value| value.to_string());
                    let height = attributes.get("height").map(|value| value.to_string());

                    let size = intrinsic_size(view_box.as_deref(), width.as_deref(), height.as_deref())?;
                    debug!(width = size.width(), height = size.height(); "SVG artwork parsed");
                    return Ok(Self {
                        markup: markup.trim_end().to_string(),
                        size,
                    });
                }
                Event::Error(err) => return Err(err.to_string()),
                _ => {}
            }
        }

        Err("no <svg> element found".to_string())
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Intrinsic size in the artwork's own user units.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// Size from a `viewBox` or from plain `width`/`height` attributes.
fn intrinsic_size(
    view_box: Option<&str>,
    width: Option<&str>,
    height: Option<&str>,
) -> Result<Size, String> {
    if let Some(view_box) = view_box {
        let values: Vec<f32> = view_box
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|err| format!("invalid viewBox `{view_box}`: {err}"))?;
        return match values.as_slice() {
            [_, _, width, height] if *width > 0.0 && *height > 0.0 => Ok(Size::new(*width, *height)),
            _ => Err(format!("invalid viewBox `{view_box}`")),
        };
    }

    let length = |value: Option<&str>, name: &str| -> Result<f32, String> {
        let value = value.ok_or_else(|| format!("missing `viewBox` and `{name}`"))?;
        value
            .trim()
            .trim_end_matches("px")
            .parse::<f32>()
            .ok()
            .filter(|length| *length > 0.0)
            .ok_or_else(|| format!("invalid {name} `{value}`"))
    };
    Ok(Size::new(length(width, "width")?, length(height, "height")?))
}

/// Content of a panel in a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Artwork {
    /// Embedded SVG markup, scaled into the panel.
    Svg(SvgArtwork),
    /// A filled rectangle with a centered label.
    Placeholder { label: String, fill: Option<Color> },
}

impl Artwork {
    /// Parses SVG markup into artwork.
    ///
    /// # Errors
    ///
    /// See [`SvgArtwork::parse`].
    pub fn svg(markup: &str) -> Result<Self, String> {
        SvgArtwork::parse(markup).map(Self::Svg)
    }

    pub fn placeholder(label: impl Into<String>) -> Self {
        Self::Placeholder {
            label: label.into(),
            fill: None,
        }
    }
}

/// Draws [`Artwork`] into panel bounds.
#[derive(Debug, Clone)]
pub struct ArtworkRenderer {
    label: TextDefinition,
    outline: StrokeDefinition,
}

impl ArtworkRenderer {
    pub fn new(label: TextDefinition) -> Self {
        Self {
            label,
            outline: StrokeDefinition::dashed(Color::default().with_alpha(0.4), 1.0),
        }
    }
}

impl Default for ArtworkRenderer {
    fn default() -> Self {
        Self::new(TextDefinition::default())
    }
}

impl Renderer<Artwork> for ArtworkRenderer {
    fn size_hint(&self, content: &Artwork) -> Option<Size> {
        match content {
            Artwork::Svg(svg) => Some(svg.size()),
            Artwork::Placeholder { .. } => None,
        }
    }

    fn draw(&self, content: &Artwork, target: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        match content {
            Artwork::Svg(svg) => {
                let size = svg.size();
                let viewport = svg_element::SVG::new()
                    .set("x", target.min_x())
                    .set("y", target.min_y())
                    .set("width", target.width())
                    .set("height", target.height())
                    .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
                    .set("preserveAspectRatio", "xMidYMid meet")
                    .add(Blob::new(svg.markup()));
                output.add_to_layer(RenderLayer::Content, Box::new(viewport));
            }
            Artwork::Placeholder { label, fill } => {
                let rect = apply_stroke!(
                    svg_element::Rectangle::new()
                        .set("x", target.min_x())
                        .set("y", target.min_y())
                        .set("width", target.width())
                        .set("height", target.height()),
                    &self.outline
                );
                let rect = match fill {
                    Some(fill) => rect
                        .set("fill", fill.to_string())
                        .set("fill-opacity", fill.alpha()),
                    None => rect.set("fill", "#eeeeee"),
                };
                output.add_to_layer(RenderLayer::Content, Box::new(rect));

                if !label.is_empty() {
                    let text = Text::new(&self.label, label);
                    output.merge(text.render_to_layers(target.center()));
                }
            }
        }

        output
    }
}
