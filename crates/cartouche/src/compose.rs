//! Composition of placed panels and connectors into one output.
//!
//! [`Compositor::compose`] works in two phases:
//!
//! 1. **Validation.** Every placement is resolved and every connector end is
//!    looked up. The first failure aborts the whole batch.
//! 2. **Drawing.** Panels are drawn through the [`Renderer`] in the order
//!    supplied (later panels occlude earlier ones), then connectors on top.
//!
//! The result is an immutable [`Composition`] ready to be exported.

use indexmap::IndexMap;
use log::{debug, info, trace};
use svg::node::element as svg_element;

use cartouche_core::{
    color::Color,
    draw::{ArrowDrawer, Drawable, LayeredOutput, RenderLayer, Text},
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{
    canvas::{Canvas, OutputExtent},
    connector::Connector,
    error::LayoutError,
    panel::Panel,
    placement::{self, Placement},
};

/// Draws panel content of type `C`.
///
/// The compositor never looks inside panel content; it only asks the
/// renderer to draw it into a target rectangle given in output space.
pub trait Renderer<C> {
    /// Natural size of the content, if it has one.
    fn size_hint(&self, _content: &C) -> Option<Size> {
        None
    }

    /// Width over height of the natural size, if the content has one.
    fn aspect_ratio(&self, content: &C) -> Option<f32> {
        self.size_hint(content).and_then(Size::aspect_ratio)
    }

    /// Draws `content` so that it covers `target`.
    fn draw(&self, content: &C, target: Bounds) -> LayeredOutput;
}

/// Where a panel ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPanel {
    id: Id,
    canvas_bounds: Bounds,
    output_bounds: Bounds,
}

impl ResolvedPanel {
    pub fn id(&self) -> Id {
        self.id
    }

    /// Bounds in canvas coordinates.
    pub fn canvas_bounds(&self) -> Bounds {
        self.canvas_bounds
    }

    /// Bounds in output coordinates.
    pub fn output_bounds(&self) -> Bounds {
        self.output_bounds
    }
}

/// End points of a drawn connector, in output coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConnector {
    source: Point,
    destination: Point,
}

impl ResolvedConnector {
    pub fn source(&self) -> Point {
        self.source
    }

    pub fn destination(&self) -> Point {
        self.destination
    }
}

/// The immutable result of a composition.
#[derive(Debug, Clone)]
pub struct Composition {
    extent: OutputExtent,
    body: svg_element::Group,
    definitions: Option<svg_element::Definitions>,
    panels: Vec<ResolvedPanel>,
    connectors: Vec<ResolvedConnector>,
}

impl Composition {
    /// Physical extent of the output.
    pub fn extent(&self) -> OutputExtent {
        self.extent
    }

    /// Output size in pixels.
    pub fn size(&self) -> Size {
        self.extent.to_px()
    }

    /// Placed panels, in paint order.
    pub fn panels(&self) -> &[ResolvedPanel] {
        &self.panels
    }

    /// First placement of the panel named `id`.
    pub fn panel(&self, id: impl Into<Id>) -> Option<&ResolvedPanel> {
        let id = id.into();
        self.panels.iter().find(|panel| panel.id == id)
    }

    /// Drawn connectors, in input order.
    pub fn connectors(&self) -> &[ResolvedConnector] {
        &self.connectors
    }

    /// Builds a standalone SVG document.
    ///
    /// `width` and `height` carry the physical unit while the `viewBox`
    /// spans the output size in pixels.
    pub fn to_svg_document(&self) -> svg::Document {
        let size = self.size();
        let unit = self.extent.unit().suffix();

        let mut doc = svg::Document::new()
            .set("width", format!("{}{unit}", self.extent.width()))
            .set("height", format!("{}{unit}", self.extent.height()))
            .set(
                "viewBox",
                format!("0 0 {} {}", size.width(), size.height()),
            );

        if let Some(definitions) = &self.definitions {
            doc = doc.add(definitions.clone());
        }

        doc.add(self.body.clone())
    }
}

/// Draws batches of placed panels with a [`Renderer`].
#[derive(Debug)]
pub struct Compositor<'r, R> {
    renderer: &'r R,
    background: Option<Color>,
}

impl<'r, R> Compositor<'r, R> {
    pub fn new(renderer: &'r R) -> Self {
        Self {
            renderer,
            background: None,
        }
    }

    /// Fills the whole canvas before any panel is drawn.
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    /// Composes `placed` panels and `connectors` on `canvas`.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidPlacement`] or [`LayoutError::AspectRatioConflict`]
    ///   from resolving a placement, tagged with the panel index.
    /// - [`LayoutError::UnknownPanelReference`] when a connector names a panel
    ///   that is not part of `placed`.
    pub fn compose<C>(
        &self,
        canvas: &Canvas,
        placed: &[(&Panel<C>, Placement)],
        connectors: &[Connector],
    ) -> Result<Composition, LayoutError>
    where
        R: Renderer<C>,
    {
        info!(panels = placed.len(), connectors = connectors.len(); "Composing panels");

        // Validate the whole batch before drawing anything
        let resolved = placed
            .iter()
            .enumerate()
            .map(|(idx, (panel, placement))| {
                placement::resolve(canvas, panel, placement).map_err(|err| err.at_panel(idx))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_id: IndexMap<Id, Bounds> = IndexMap::with_capacity(placed.len());
        for ((panel, _), bounds) in placed.iter().zip(&resolved) {
            by_id.entry(panel.id()).or_insert(*bounds);
        }

        let endpoints = connectors
            .iter()
            .enumerate()
            .map(|(idx, connector)| locate_connector(idx, connector, &by_id))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(panels = by_id.len(); "Batch validated");

        let mut output = LayeredOutput::new();

        let size = canvas.output_size();
        if let Some(background) = self.background {
            let rect = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", size.width())
                .set("height", size.height())
                .set("fill", background.to_string())
                .set("fill-opacity", background.alpha());
            output.add_to_layer(RenderLayer::Background, Box::new(rect));
        }

        let mut panels = Vec::with_capacity(placed.len());
        for ((panel, _), canvas_bounds) in placed.iter().zip(resolved) {
            let output_bounds = canvas.to_output_bounds(canvas_bounds);
            trace!(panel = panel.id().to_string(), bounds:? = output_bounds; "Drawing panel");

            let group = self
                .draw_panel(panel, output_bounds)
                .render_group(&panel.id().to_string());
            output.add_to_layer(RenderLayer::Content, Box::new(group));

            panels.push(ResolvedPanel {
                id: panel.id(),
                canvas_bounds,
                output_bounds,
            });
        }

        let mut arrow_drawer = ArrowDrawer::default();
        let mut drawn_connectors = Vec::with_capacity(connectors.len());
        for (connector, (source, destination)) in connectors.iter().zip(endpoints) {
            let source = canvas.to_output_point(source);
            let destination = canvas.to_output_point(destination);
            output.merge(arrow_drawer.draw_arrow(
                &connector.arrow(),
                source,
                destination,
                connector.label(),
            ));
            drawn_connectors.push(ResolvedConnector {
                source,
                destination,
            });
        }

        let body = output
            .render()
            .into_iter()
            .fold(svg_element::Group::new(), |group, node| group.add(node));
        let definitions = (!arrow_drawer.is_empty()).then(|| arrow_drawer.draw_marker_definitions());

        info!(
            width = size.width(),
            height = size.height();
            "Composition complete"
        );

        Ok(Composition {
            extent: canvas.extent(),
            body,
            definitions,
            panels,
            connectors: drawn_connectors,
        })
    }

    fn draw_panel<C>(&self, panel: &Panel<C>, bounds: Bounds) -> LayeredOutput
    where
        R: Renderer<C>,
    {
        let mut output = panel.theme().frame().render(bounds);

        let (title_band, content_bounds) = panel.layout_in(bounds);
        output.merge(self.renderer.draw(panel.content(), content_bounds));

        if let (Some(band), Some(title)) = (title_band, panel.title()) {
            let text = Text::new(panel.theme().title(), title);
            output.merge(text.render_to_layers(band.center()));
        }

        output
    }
}

/// Composes with a default [`Compositor`].
///
/// # Errors
///
/// See [`Compositor::compose`].
pub fn compose<C, R: Renderer<C>>(
    canvas: &Canvas,
    placed: &[(&Panel<C>, Placement)],
    connectors: &[Connector],
    renderer: &R,
) -> Result<Composition, LayoutError> {
    Compositor::new(renderer).compose(canvas, placed, connectors)
}

fn locate_connector(
    idx: usize,
    connector: &Connector,
    panels: &IndexMap<Id, Bounds>,
) -> Result<(Point, Point), LayoutError> {
    let lookup = |id: Id| panels.get(&id).copied();
    connector
        .source()
        .locate(lookup)
        .zip(connector.destination().locate(lookup))
        .ok_or_else(|| LayoutError::UnknownPanelReference {
            connector: idx,
            panel: connector
                .panel_references()
                .find(|id| !panels.contains_key(id))
                .map(|id| id.to_string())
                .unwrap_or_default(),
        })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use cartouche_core::draw::ArrowDefinition;

    use super::*;
    use crate::{canvas::Unit, connector::Endpoint, placement::Anchor};

    /// Records every draw call and emits a marker rectangle.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<(&'static str, Bounds)>>,
    }

    impl Renderer<&'static str> for RecordingRenderer {
        fn draw(&self, content: &&'static str, target: Bounds) -> LayeredOutput {
            self.calls.borrow_mut().push((*content, target));
            let mut output = LayeredOutput::new();
            output.add_to_layer(
                RenderLayer::Content,
                Box::new(svg_element::Rectangle::new().set("id", *content)),
            );
            output
        }
    }

    fn canvas() -> Canvas {
        Canvas::relative(OutputExtent::new(100.0, 50.0, Unit::Px)).unwrap()
    }

    fn arrow() -> Rc<ArrowDefinition> {
        Rc::new(ArrowDefinition::default())
    }

    #[test]
    fn test_compose_draws_panels_in_order() {
        let renderer = RecordingRenderer::default();
        let a = Panel::new("a", "first");
        let b = Panel::new("b", "second");

        let composition = compose(
            &canvas(),
            &[
                (&a, Placement::relative(0.0, 0.0, 1.0, 1.0)),
                (&b, Placement::relative(0.5, 0.5, 0.5, 0.5)),
            ],
            &[],
            &renderer,
        )
        .unwrap();

        let calls = renderer.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "first");
        assert_eq!(calls[1].1, Bounds::from_extents(50.0, 100.0, 0.0, 25.0));

        let svg = composition.to_svg_document().to_string();
        let first = svg.find("id=\"first\"").unwrap();
        let second = svg.find("id=\"second\"").unwrap();
        assert!(first < second, "later panels paint on top");
        assert!(svg.contains("data-panel=\"a\""));
    }

    #[test]
    fn test_compose_is_all_or_nothing() {
        let renderer = RecordingRenderer::default();
        let a = Panel::new("a", "first");
        let b = Panel::new("b", "second");

        let err = compose(
            &canvas(),
            &[
                (&a, Placement::relative(0.0, 0.0, 1.0, 1.0)),
                (&b, Placement::absolute(0.5, 0.1, 0.0, 1.0)),
            ],
            &[],
            &renderer,
        )
        .unwrap_err();

        assert_eq!(err.panel(), Some(1));
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_unknown_connector_reference() {
        let renderer = RecordingRenderer::default();
        let a = Panel::new("a", "first");
        let b = Panel::new("b", "second");
        let connectors = [
            Connector::new(
                Endpoint::panel("a", Anchor::Right),
                Endpoint::panel("b", Anchor::Left),
                arrow(),
            ),
            Connector::new(
                Endpoint::panel("a", Anchor::Right),
                Endpoint::panel("C", Anchor::Left),
                arrow(),
            ),
        ];

        let err = compose(
            &canvas(),
            &[
                (&a, Placement::relative(0.0, 0.0, 0.5, 1.0)),
                (&b, Placement::relative(0.5, 0.0, 0.5, 1.0)),
            ],
            &connectors,
            &renderer,
        )
        .unwrap_err();

        assert_eq!(
            err,
            LayoutError::UnknownPanelReference {
                connector: 1,
                panel: "C".to_string()
            }
        );
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_unknown_connector_source_is_named() {
        let renderer = RecordingRenderer::default();
        let a = Panel::new("a", "first");
        let connectors = [Connector::new(
            Endpoint::panel("ghost", Anchor::Center),
            Endpoint::panel("a", Anchor::Left),
            arrow(),
        )];

        let err = compose(
            &canvas(),
            &[(&a, Placement::relative(0.0, 0.0, 0.5, 1.0))],
            &connectors,
            &renderer,
        )
        .unwrap_err();

        assert_eq!(
            err,
            LayoutError::UnknownPanelReference {
                connector: 0,
                panel: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_connectors_attach_to_panel_anchors() {
        let renderer = RecordingRenderer::default();
        let a = Panel::new("a", "first");
        let b = Panel::new("b", "second");
        let connectors = [Connector::new(
            Endpoint::panel("a", Anchor::Right),
            Endpoint::point(0.75, 1.0),
            arrow(),
        )
        .with_label("to b")];

        let composition = compose(
            &canvas(),
            &[
                (&a, Placement::relative(0.0, 0.0, 0.5, 1.0)),
                (&b, Placement::relative(0.5, 0.0, 0.5, 1.0)),
            ],
            &connectors,
            &renderer,
        )
        .unwrap();

        let drawn = composition.connectors()[0];
        assert_eq!(drawn.source(), Point::new(50.0, 25.0));
        assert_eq!(drawn.destination(), Point::new(75.0, 0.0));

        let svg = composition.to_svg_document().to_string();
        assert!(svg.contains("marker-end"));
        assert!(svg.contains("to b"));
        assert!(svg.find("data-layer=\"content\"") < svg.find("data-layer=\"connector\""));
    }

    #[test]
    fn test_composition_document_size_and_panels() {
        let renderer = RecordingRenderer::default();
        let a = Panel::new("a", "first");
        let canvas = Canvas::relative(OutputExtent::new(10.0, 6.0, Unit::In)).unwrap();

        let composition = Compositor::new(&renderer)
            .with_background(Some(Color::new("white").unwrap()))
            .compose(&canvas, &[(&a, Placement::relative(0.0, 0.0, 1.0, 1.0))], &[])
            .unwrap();

        assert_eq!(composition.size(), Size::new(960.0, 576.0));
        assert_eq!(
            composition.panel("a").unwrap().output_bounds(),
            Bounds::from_extents(0.0, 960.0, 0.0, 576.0)
        );
        assert!(composition.panel("missing").is_none());

        let svg = composition.to_svg_document().to_string();
        assert!(svg.contains("width=\"10in\""));
        assert!(svg.contains("viewBox=\"0 0 960 576\""));
        assert!(svg.contains("data-layer=\"background\""));
        assert!(!svg.contains("<defs"));
    }

    #[test]
    fn test_same_panel_placed_twice() {
        let renderer = RecordingRenderer::default();
        let a = Panel::new("a", "first");

        let composition = compose(
            &canvas(),
            &[
                (&a, Placement::relative(0.0, 0.0, 1.0, 1.0)),
                (&a, Placement::relative(0.7, 0.7, 0.2, 0.2)),
            ],
            &[],
            &renderer,
        )
        .unwrap();

        assert_eq!(composition.panels().len(), 2);
        assert_eq!(renderer.calls.borrow().len(), 2);
    }
}
