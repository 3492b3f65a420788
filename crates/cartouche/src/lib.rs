//! Cartouche - composition and layout for multi-panel and inset maps.
//!
//! Cartouche places independently rendered panels (a main map, insets, a
//! legend) on a shared canvas, keeps their aspect ratios, arranges panels in
//! weighted grids and draws connectors between them. Panel content is opaque:
//! any type works as long as a [`compose::Renderer`] can draw it.
//!
//! The [`CompositionBuilder`] covers the common path from a TOML scene file to
//! an SVG document. The layout stages are public for direct use:
//!
//! - [`canvas`] - coordinate modes and output extent
//! - [`placement`] - resolving placements into bounds
//! - [`grid`] - weighted grid arrangement
//! - [`compose`] - drawing a batch of panels and connectors

pub mod artwork;
pub mod canvas;
pub mod compose;
pub mod config;
pub mod connector;
pub mod export;
pub mod grid;
pub mod panel;
pub mod placement;
pub mod scene;

mod error;

pub use cartouche_core::{color, draw, geometry, identifier};

pub use error::{CartoucheError, LayoutError};

use std::path::Path;

use log::{debug, info};

use artwork::ArtworkRenderer;
use compose::{Composition, Compositor};
use config::AppConfig;
use export::{Exporter, svg::SvgExporter};
use scene::Scene;

/// Builder for parsing and rendering scenes.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use cartouche::{CompositionBuilder, config::AppConfig};
///
/// let source = r#"
/// [[panels]]
/// id = "main"
/// placement = { x = 0.0, y = 0.0, width = 1.0, height = 1.0 }
/// "#;
///
/// let builder = CompositionBuilder::new(AppConfig::default());
/// let scene = builder.parse(source, Path::new(".")).expect("Failed to parse");
/// let svg = builder.render_svg(&scene).expect("Failed to render");
/// println!("{svg}");
/// ```
#[derive(Default)]
pub struct CompositionBuilder {
    config: AppConfig,
}

impl CompositionBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse scene source into a [`Scene`].
    ///
    /// SVG files referenced by the scene are read relative to `base_dir`.
    ///
    /// # Errors
    ///
    /// See [`Scene::from_toml`].
    pub fn parse(&self, source: &str, base_dir: &Path) -> Result<Scene, CartoucheError> {
        info!("Parsing scene");
        let scene = Scene::from_toml(source, base_dir, &self.config)?;
        debug!("Scene parsed successfully");
        Ok(scene)
    }

    /// Lay out and draw a scene.
    ///
    /// # Errors
    ///
    /// Returns [`CartoucheError::Layout`] if a placement or connector cannot be
    /// resolved, or [`CartoucheError::Config`] for invalid configured styles.
    pub fn compose(&self, scene: &Scene) -> Result<Composition, CartoucheError> {
        let theme = self
            .config
            .style()
            .theme()
            .map_err(CartoucheError::Config)?;
        let renderer = ArtworkRenderer::new(theme.title().clone());

        let composition = Compositor::new(&renderer)
            .with_background(scene.background())
            .compose(scene.canvas(), &scene.placed(), scene.connectors())?;
        Ok(composition)
    }

    /// Render a scene to an SVG string.
    ///
    /// # Errors
    ///
    /// See [`CompositionBuilder::compose`].
    pub fn render_svg(&self, scene: &Scene) -> Result<String, CartoucheError> {
        let composition = self.compose(scene)?;
        let svg = composition.to_svg_document().to_string();
        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }

    /// Render a scene and write it as an SVG file.
    ///
    /// # Errors
    ///
    /// Layout errors as for [`CompositionBuilder::compose`], and
    /// [`CartoucheError::Export`] if the file cannot be written.
    pub fn write_svg(&self, scene: &Scene, path: impl AsRef<Path>) -> Result<(), CartoucheError> {
        let composition = self.compose(scene)?;
        SvgExporter::new(path).export(&composition)?;
        Ok(())
    }
}
