//! Text for panel titles and connector labels.
//!
//! - [`TextDefinition`] - reusable font and color settings
//! - [`Text`] - a measurable, drawable string using a [`TextDefinition`]
//!
//! Text sizes are measured with `cosmic-text` against the fonts installed on
//! the system, so layout can reserve room for titles before drawing them.
//!
//! ```
//! # use cartouche_core::draw::{TextDefinition, Text};
//! let style = TextDefinition::new().with_font_size(14);
//! let title = Text::new(&style, "Contiguous United States");
//! assert!(title.calculate_size().width() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Insets, Point, Size},
};

/// Font and color settings for text.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `12` |
/// | Text color | `None` (SVG default, black) |
/// | Background color | `None` |
/// | Padding | `2` on all sides |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
    background_color: Option<Color>,
    padding: Insets,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with another font family.
    pub fn with_font_family(mut self, family: &str) -> Self {
        self.font_family = family.to_string();
        self
    }

    /// Returns a copy with another font size, in points.
    pub fn with_font_size(mut self, size: u16) -> Self {
        self.font_size = size;
        self
    }

    /// Returns a copy with another text color.
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Returns a copy with a background color; `None` draws no background.
    pub fn with_background_color(mut self, color: Option<Color>) -> Self {
        self.background_color = color;
        self
    }

    /// Returns a copy with other padding around the text.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Returns the font family.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Returns the text color, if set.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns the background color, if set.
    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    /// Returns the padding around the text.
    pub fn padding(&self) -> Insets {
        self.padding
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12,
            color: None,
            background_color: None,
            padding: Insets::uniform(2.0),
        }
    }
}

/// A string paired with the [`TextDefinition`] that styles it.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    /// Creates a new text element.
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    /// Returns the text content.
    pub fn content(&self) -> &str {
        self.content
    }

    /// Size of the text including padding.
    pub fn calculate_size(&self) -> Size {
        self.measure().add_padding(self.definition.padding())
    }

    fn measure(&self) -> Size {
        TEXT_MEASURER
            .get_or_init(TextMeasurer::new)
            .measure(self.content, self.definition)
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let lines: Vec<&str> = self.content.lines().collect();
        if lines.is_empty() {
            return output;
        }

        let measured = self.measure();
        let line_height = measured.height() / lines.len() as f32;
        let first_line_y = position.y() - measured.height() / 2.0 + line_height / 2.0;

        let mut element = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", first_line_y)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());

        if let Some(color) = self.definition.color() {
            element = element
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
        }

        for (idx, line) in lines.into_iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { line_height };
            element = element.add(
                svg_element::TSpan::new("")
                    .set("x", position.x())
                    .set("dy", dy)
                    .add(SvgText::new(line)),
            );
        }

        if let Some(background) = self.definition.background_color() {
            let bounds = position.to_bounds(self.calculate_size());
            let rect = svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("fill", background.to_string())
                .set("fill-opacity", background.alpha())
                .set("rx", 2.0);
            output.add_to_layer(RenderLayer::Background, Box::new(rect));
        }

        output.add_to_layer(RenderLayer::Text, Box::new(element));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

/// Shared font system used to measure text.
struct TextMeasurer {
    font_system: Mutex<FontSystem>,
}

impl TextMeasurer {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Measures `text` by shaping it with the requested font.
    ///
    /// Falls back to an average glyph width estimate when no layout runs are
    /// produced (for example when no fonts are installed).
    fn measure(&self, text: &str, definition: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        // Points to pixels at 96 dpi
        let font_size_px = f32::from(definition.font_size()) * 1.33;
        let metrics = Metrics::new(font_size_px, font_size_px * 1.2);

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        buffer.set_size(None, None);

        let attrs = Attrs::new().family(Family::Name(definition.font_family()));
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let (width, lines) = buffer
            .layout_runs()
            .fold((0.0f32, 0usize), |(width, lines), run| {
                let run_width = run.glyphs.last().map_or(0.0, |glyph| glyph.x + glyph.w);
                (width.max(run_width), lines + 1)
            });

        if lines == 0 || width == 0.0 {
            let line_count = text.lines().count().max(1);
            let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
            return Size::new(
                longest as f32 * font_size_px * 0.55,
                line_count as f32 * metrics.line_height,
            );
        }

        Size::new(width, lines as f32 * metrics.line_height)
    }
}

static TEXT_MEASURER: OnceLock<TextMeasurer> = OnceLock::new();
