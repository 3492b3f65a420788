//! TOML scene files.
//!
//! A scene names a canvas, its panels, how they are placed and the connectors
//! drawn between them:
//!
//! ```toml
//! [canvas]
//! width = 10
//! height = 6
//! unit = "in"
//!
//! [[panels]]
//! id = "mainland"
//! svg = "maps/mainland.svg"
//! lock_aspect = true
//! placement = { x = 0.0, y = 0.0, width = 1.0, height = 1.0 }
//!
//! [[panels]]
//! id = "alaska"
//! title = "Alaska"
//! placeholder = "AK"
//! placement = { x = 0.02, y = 0.02, width = 0.25, height = 0.25 }
//!
//! [[connectors]]
//! from = { panel = "alaska", anchor = "right" }
//! to = { x = 0.3, y = 0.15 }
//! ```
//!
//! A `[grid]` table may place panels instead of per-panel placements. Every
//! panel is placed exactly one way.

use std::{collections::HashMap, fs, path::Path, rc::Rc};

use log::{debug, info, warn};
use serde::Deserialize;

use cartouche_core::{
    color::Color,
    draw::{ArrowDefinition, ArrowDirection, ArrowStyle, StrokeStyle},
    identifier::Id,
};

use crate::{
    artwork::{Artwork, ArtworkRenderer},
    canvas::{Canvas, OutputExtent, Unit},
    compose::Renderer,
    config::AppConfig,
    connector::{Connector, Endpoint},
    error::CartoucheError,
    grid::{self, Alignment, GridLines, GridSpec},
    panel::{Panel, Theme},
    placement::{Anchor, Placement},
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    #[serde(default)]
    canvas: CanvasSection,
    #[serde(default)]
    panels: Vec<PanelSection>,
    grid: Option<GridSection>,
    #[serde(default)]
    connectors: Vec<ConnectorSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CanvasSection {
    width: Option<f32>,
    height: Option<f32>,
    unit: Option<Unit>,
    x_limits: Option<(f32, f32)>,
    y_limits: Option<(f32, f32)>,
    background: Option<Color>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PanelSection {
    id: Id,
    title: Option<String>,
    svg: Option<String>,
    inline: Option<String>,
    placeholder: Option<String>,
    fill: Option<Color>,
    aspect_ratio: Option<f32>,
    #[serde(default)]
    lock_aspect: bool,
    placement: Option<PlacementSection>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlacementSection {
    Absolute {
        x_min: f32,
        x_max: f32,
        y_min: f32,
        y_max: f32,
    },
    Relative {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        #[serde(default)]
        anchor: Anchor,
    },
}

impl From<PlacementSection> for Placement {
    fn from(section: PlacementSection) -> Self {
        match section {
            PlacementSection::Absolute {
                x_min,
                x_max,
                y_min,
                y_max,
            } => Placement::absolute(x_min, x_max, y_min, y_max),
            PlacementSection::Relative {
                x,
                y,
                width,
                height,
                anchor,
            } => Placement::relative(x, y, width, height).with_justification(anchor),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    rows: Option<usize>,
    columns: Option<usize>,
    panels: Vec<Id>,
    relative_sizes: Option<Vec<f32>>,
    #[serde(default)]
    alignment: Alignment,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConnectorSection {
    from: EndpointSection,
    to: EndpointSection,
    style: Option<ArrowStyle>,
    #[serde(default)]
    direction: ArrowDirection,
    color: Option<Color>,
    width: Option<f32>,
    /// Dash pattern: `solid`, `dashed`, `dotted` or a raw dasharray.
    line: Option<StrokeStyle>,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EndpointSection {
    Panel {
        panel: Id,
        #[serde(default = "center_anchor")]
        anchor: Anchor,
    },
    Point {
        x: f32,
        y: f32,
    },
}

fn center_anchor() -> Anchor {
    Anchor::Center
}

impl From<EndpointSection> for Endpoint {
    fn from(section: EndpointSection) -> Self {
        match section {
            EndpointSection::Panel { panel, anchor } => Endpoint::panel(panel, anchor),
            EndpointSection::Point { x, y } => Endpoint::point(x, y),
        }
    }
}

/// A parsed scene, ready to be composed.
#[derive(Debug)]
pub struct Scene {
    canvas: Canvas,
    background: Option<Color>,
    panels: Vec<Panel<Artwork>>,
    placements: Vec<(usize, Placement)>,
    connectors: Vec<Connector>,
}

impl Scene {
    /// Parses a scene from TOML source.
    ///
    /// SVG files named by panels are read relative to `base_dir`. Values the
    /// scene leaves out come from `config`.
    ///
    /// # Errors
    ///
    /// - [`CartoucheError::Scene`] for TOML syntax or schema errors.
    /// - [`CartoucheError::InvalidScene`] for inconsistent panels or unreadable artwork.
    /// - [`CartoucheError::Layout`] for an invalid canvas or grid.
    /// - [`CartoucheError::Config`] for invalid colors in `config`.
    pub fn from_toml(src: &str, base_dir: &Path, config: &AppConfig) -> Result<Self, CartoucheError> {
        let file: SceneFile =
            toml::from_str(src).map_err(|err| CartoucheError::new_scene_error(err, src))?;

        let canvas = build_canvas(&file.canvas, config)?;
        let background = match file.canvas.background {
            Some(color) => Some(color),
            None => config.style().background_color().map_err(CartoucheError::Config)?,
        };

        let theme = Rc::new(config.style().theme().map_err(CartoucheError::Config)?);
        let connector_definition = config
            .style()
            .connector_definition()
            .map_err(CartoucheError::Config)?;

        let renderer = ArtworkRenderer::default();
        let mut panels = Vec::with_capacity(file.panels.len());
        let mut own_placements = Vec::with_capacity(file.panels.len());
        for mut section in file.panels {
            own_placements.push(section.placement.take().map(Placement::from));
            panels.push(build_panel(section, base_dir, &theme, &renderer)?);
        }

        let has_own_placement: Vec<bool> = own_placements.iter().map(Option::is_some).collect();
        let mut placements_by_panel: Vec<Vec<Placement>> = own_placements
            .into_iter()
            .map(|placement| placement.into_iter().collect())
            .collect();

        if let Some(grid) = &file.grid {
            let indices: HashMap<Id, usize> = panels
                .iter()
                .enumerate()
                .rev()
                .map(|(idx, panel)| (panel.id(), idx))
                .collect();

            let spec = build_grid(grid)?;
            let arranged = grid::arrange(&spec, &canvas)?;
            debug!(cells = arranged.len(), alignment:% = spec.alignment(); "Grid arranged");

            for (id, placement) in spec.panels().iter().zip(arranged) {
                let idx = *indices.get(id).ok_or_else(|| {
                    CartoucheError::InvalidScene(format!("grid references unknown panel `{id}`"))
                })?;
                if has_own_placement[idx] {
                    return Err(CartoucheError::InvalidScene(format!(
                        "panel `{id}` has both a placement and a grid cell"
                    )));
                }
                placements_by_panel[idx].push(placement);
            }
        }

        let mut placements = Vec::new();
        for (idx, panel_placements) in placements_by_panel.into_iter().enumerate() {
            if panel_placements.is_empty() {
                return Err(CartoucheError::InvalidScene(format!(
                    "panel `{}` has no placement",
                    panels[idx].id()
                )));
            }
            placements.extend(panel_placements.into_iter().map(|placement| (idx, placement)));
        }

        let connectors = file
            .connectors
            .into_iter()
            .map(|section| build_connector(section, &connector_definition))
            .collect();

        let scene = Self {
            canvas,
            background,
            panels,
            placements,
            connectors,
        };
        info!(
            panels = scene.panels.len(),
            placements = scene.placements.len(),
            connectors = scene.connectors.len();
            "Scene parsed"
        );
        Ok(scene)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Canvas fill, from the scene or the configuration.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn panels(&self) -> &[Panel<Artwork>] {
        &self.panels
    }

    /// Panels with their placements, in paint order.
    pub fn placed(&self) -> Vec<(&Panel<Artwork>, Placement)> {
        self.placements
            .iter()
            .map(|(idx, placement)| (&self.panels[*idx], *placement))
            .collect()
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }
}

fn build_canvas(section: &CanvasSection, config: &AppConfig) -> Result<Canvas, CartoucheError> {
    let defaults = config.canvas().extent();
    let extent = OutputExtent::new(
        section.width.unwrap_or(defaults.width()),
        section.height.unwrap_or(defaults.height()),
        section.unit.unwrap_or(defaults.unit()),
    );

    let canvas = match (section.x_limits, section.y_limits) {
        (Some(x_limits), Some(y_limits)) => Canvas::absolute(x_limits, y_limits, extent)?,
        (None, None) => Canvas::relative(extent)?,
        _ => {
            return Err(CartoucheError::InvalidScene(
                "canvas needs both `x_limits` and `y_limits`, or neither".to_string(),
            ));
        }
    };
    debug!(mode:? = canvas.mode(), extent:? = canvas.extent(); "Canvas configured");
    Ok(canvas)
}

fn build_panel(
    section: PanelSection,
    base_dir: &Path,
    theme: &Rc<Theme>,
    renderer: &impl Renderer<Artwork>,
) -> Result<Panel<Artwork>, CartoucheError> {
    let id = section.id;
    let invalid = |reason: String| CartoucheError::InvalidScene(format!("panel `{id}`: {reason}"));

    let artwork = match (section.svg, section.inline, section.placeholder) {
        (Some(path), None, None) => {
            let path = base_dir.join(path);
            let markup = fs::read_to_string(&path)
                .map_err(|err| invalid(format!("cannot read `{}`: {err}", path.display())))?;
            Artwork::svg(&markup).map_err(&invalid)?
        }
        (None, Some(markup), None) => Artwork::svg(&markup).map_err(&invalid)?,
        (None, None, Some(label)) => Artwork::Placeholder {
            label,
            fill: section.fill,
        },
        (None, None, None) => Artwork::Placeholder {
            label: id.to_string(),
            fill: section.fill,
        },
        _ => {
            return Err(invalid(
                "only one of `svg`, `inline` and `placeholder` may be set".to_string(),
            ));
        }
    };

    let aspect_ratio = match (section.aspect_ratio, section.lock_aspect) {
        (Some(ratio), _) => Some(ratio),
        (None, true) => Some(renderer.aspect_ratio(&artwork).ok_or_else(|| {
            invalid("`lock_aspect` needs artwork with an intrinsic size".to_string())
        })?),
        (None, false) => None,
    };

    let mut panel = Panel::new(id, artwork).with_theme(Rc::clone(theme));
    if let Some(ratio) = aspect_ratio {
        panel = panel.with_aspect_ratio(ratio);
    }
    if let Some(title) = section.title {
        panel = panel.with_title(title);
    }
    Ok(panel)
}

fn build_grid(section: &GridSection) -> Result<GridSpec, CartoucheError> {
    let lines = match (section.rows, section.columns) {
        (Some(rows), None) => GridLines::Rows(rows),
        (None, Some(columns)) => GridLines::Columns(columns),
        _ => {
            return Err(CartoucheError::InvalidScene(
                "grid needs exactly one of `rows` and `columns`".to_string(),
            ));
        }
    };

    let mut spec = GridSpec::new(section.panels.iter().copied(), lines)
        .with_alignment(section.alignment);
    if let Some(sizes) = &section.relative_sizes {
        spec = spec.with_relative_sizes(sizes.clone());
    }
    Ok(spec)
}

fn build_connector(section: ConnectorSection, defaults: &ArrowDefinition) -> Connector {
    let mut stroke = defaults.stroke().clone();
    if let Some(color) = section.color {
        stroke = stroke.with_color(color);
    }
    if let Some(width) = section.width {
        if width <= 0.0 {
            warn!(width = width; "Ignoring non-positive connector width");
        } else {
            stroke = stroke.with_width(width);
        }
    }
    if let Some(line) = section.line {
        stroke = stroke.with_style(line);
    }

    let definition = ArrowDefinition::new(stroke)
        .with_style(section.style.unwrap_or(defaults.style()))
        .with_text(defaults.text().clone());

    let connector = Connector::new(section.from.into(), section.to.into(), Rc::new(definition))
        .with_direction(section.direction);
    match section.label {
        Some(label) => connector.with_label(label),
        None => connector,
    }
}
