//! Configuration types for composition rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Missing fields fall back to their defaults.
//!
//! - [`AppConfig`] - Top-level configuration combining canvas and style settings.
//! - [`CanvasConfig`] - Default output extent for scenes that do not set one.
//! - [`StyleConfig`] - Default panel theme, connector stroke and background.
//!
//! # Example
//!
//! ```
//! # use cartouche::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [canvas]
//!     width = 10
//!     height = 6
//!     unit = "in"
//!
//!     [style]
//!     background_color = "white"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.canvas().extent().to_px().width(), 960.0);
//! assert!(config.style().background_color().unwrap().is_some());
//! ```

use serde::Deserialize;

use cartouche_core::{
    color::Color,
    draw::{
        ArrowDefinition, FrameDefinition, StrokeCap, StrokeDefinition, StrokeJoin, TextDefinition,
    },
    geometry::Insets,
};

use crate::{
    canvas::{OutputExtent, Unit},
    panel::Theme,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Canvas configuration section.
    #[serde(default)]
    canvas: CanvasConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(canvas: CanvasConfig, style: StyleConfig) -> Self {
        Self { canvas, style }
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Default output extent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: f32,
    height: f32,
    unit: Unit,
}

impl CanvasConfig {
    pub fn new(width: f32, height: f32, unit: Unit) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }

    /// The configured extent as an [`OutputExtent`].
    pub fn extent(&self) -> OutputExtent {
        OutputExtent::new(self.width, self.height, self.unit)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            unit: Unit::Px,
        }
    }
}

/// Visual styling configuration.
///
/// Colors are kept as strings and parsed on access, so an invalid color is
/// reported when it is used rather than when the file is loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Fill of the whole canvas.
    background_color: Option<String>,
    /// Default panel background.
    panel_fill: Option<String>,
    /// Default panel border color. No border when unset.
    frame_color: Option<String>,
    frame_width: f32,
    /// Space between the panel border and its content.
    panel_padding: f32,
    title_font_family: String,
    title_font_size: u16,
    connector_color: String,
    connector_width: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            panel_fill: None,
            frame_color: Some("#333333".to_string()),
            frame_width: 1.0,
            panel_padding: 4.0,
            title_font_family: "sans-serif".to_string(),
            title_font_size: 14,
            connector_color: "#333333".to_string(),
            connector_width: 1.5,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_optional_color(self.background_color.as_deref())
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Builds the default panel [`Theme`].
    ///
    /// # Errors
    ///
    /// Returns an error if the panel fill or frame color cannot be parsed.
    pub fn theme(&self) -> Result<Theme, String> {
        let fill = parse_optional_color(self.panel_fill.as_deref())
            .map_err(|err| format!("Invalid panel fill in config: {err}"))?;
        let stroke = parse_optional_color(self.frame_color.as_deref())
            .map_err(|err| format!("Invalid frame color in config: {err}"))?
            .filter(|_| self.frame_width > 0.0)
            .map(|color| StrokeDefinition::solid(color, self.frame_width));

        let frame = FrameDefinition::new().with_fill(fill).with_stroke(stroke);
        let title = TextDefinition::new()
            .with_font_family(&self.title_font_family)
            .with_font_size(self.title_font_size);

        Ok(Theme::new(
            frame,
            title,
            Insets::uniform(self.panel_padding.max(0.0)),
        ))
    }

    /// Builds the default connector [`ArrowDefinition`].
    ///
    /// # Errors
    ///
    /// Returns an error if the connector color cannot be parsed.
    pub fn connector_definition(&self) -> Result<ArrowDefinition, String> {
        let color = Color::new(&self.connector_color)
            .map_err(|err| format!("Invalid connector color in config: {err}"))?;
        let stroke = StrokeDefinition::solid(color, self.connector_width)
            .with_cap(StrokeCap::Round)
            .with_join(StrokeJoin::Round);
        Ok(ArrowDefinition::new(stroke))
    }

}

fn parse_optional_color(color: Option<&str>) -> Result<Option<Color>, String> {
    color.map(Color::new).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(
            config.canvas().extent(),
            OutputExtent::new(800.0, 600.0, Unit::Px)
        );
        assert_eq!(config.style().background_color(), Ok(None));

        let theme = config.style().theme().unwrap();
        assert!(theme.frame().fill().is_none());
        assert_eq!(theme.frame().stroke().map(|s| s.width()), Some(1.0));
        assert_eq!(theme.title().font_size(), 14);
        assert_eq!(theme.padding(), Insets::uniform(4.0));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            frame_width = 0
            title_font_size = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.canvas().extent().width(), 800.0);
        let theme = config.style().theme().unwrap();
        assert!(theme.frame().stroke().is_none());
        assert_eq!(theme.title().font_size(), 20);
        assert_eq!(
            config.style().connector_definition().unwrap().stroke().width(),
            1.5
        );
    }

    #[test]
    fn test_invalid_colors_are_reported() {
        let config: AppConfig = toml::from_str(
            r#"
            [style]
            background_color = "not-a-color"
            connector_color = "also-wrong"
            "#,
        )
        .unwrap();

        let err = config.style().background_color().unwrap_err();
        assert!(err.contains("background color"));
        assert!(config.style().connector_definition().is_err());
    }

    #[test]
    fn test_connector_definition() {
        let definition = StyleConfig::default().connector_definition().unwrap();
        assert_eq!(definition.stroke().width(), 1.5);
        assert_eq!(definition.stroke().cap(), StrokeCap::Round);
        assert_eq!(definition.stroke().join(), StrokeJoin::Round);
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [canvas]
            unit = "furlong"
            "#,
        );
        assert!(result.is_err());
    }
}
