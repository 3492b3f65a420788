//! Layer-based rendering for SVG output.
//!
//! Drawables push SVG nodes into a [`LayeredOutput`] tagged with a
//! [`RenderLayer`]. Rendering sorts the nodes by layer with a stable sort, so
//! nodes within the same layer keep their insertion order. The compositor
//! relies on that: panels are inserted in call order and therefore paint in
//! call order.
//!
//! # Example
//!
//! ```
//! # use cartouche_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::Rectangle;
//! let mut output = LayeredOutput::new();
//!
//! output.add_to_layer(RenderLayer::Background, Box::new(Rectangle::new().set("fill", "white")));
//! output.add_to_layer(RenderLayer::Text, Box::new(svg::node::element::Text::new("Alaska")));
//!
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, from bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas and panel backgrounds
    Background,
    /// Panel artwork
    Content,
    /// Borders drawn around panels
    Frame,
    /// Connector arrows linking panels
    Connector,
    /// Titles and labels
    Text,
}

impl RenderLayer {
    /// Returns a human-readable name for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Content => "content",
            Self::Frame => "frame",
            Self::Connector => "connector",
            Self::Text => "text",
        }
    }
}

/// SVG nodes grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends all nodes of `other`, keeping their order after existing nodes.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of nodes across all layers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes a `<g data-layer="...">` element. Layers
    /// are emitted bottom to top.
    pub fn render(mut self) -> Vec<SvgNode> {
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current: Option<(RenderLayer, svg_element::Group)> = None;

        for (layer, node) in self.items {
            current = match current {
                Some((current_layer, group)) if current_layer == layer => {
                    Some((layer, group.add(node)))
                }
                previous => {
                    if let Some((_, group)) = previous {
                        result.push(Box::new(group) as SvgNode);
                    }
                    let group = svg_element::Group::new()
                        .set("data-layer", layer.name())
                        .add(node);
                    Some((layer, group))
                }
            };
        }

        if let Some((_, group)) = current {
            result.push(Box::new(group) as SvgNode);
        }

        result
    }

    /// Renders all layers into a single `<g>` element with the given attributes.
    ///
    /// Used to isolate one panel's layers so that it paints as a unit.
    pub fn render_group(self, id: &str) -> svg_element::Group {
        self.render()
            .into_iter()
            .fold(svg_element::Group::new().set("data-panel", id), |group, node| {
                group.add(node)
            })
    }
}
