//! Drawing primitives for composed output.
//!
//! Everything that ends up in an SVG composition is built from the types in
//! this module: strokes, arrows for connectors, text for titles and labels,
//! frames around panels, and the [`LayeredOutput`] that keeps z-order.
//!
//! # Layer-Based Rendering
//!
//! Drawables render to one or more [`RenderLayer`]s, which are ordered during
//! final SVG generation.

mod arrow;
mod frame;
mod layer;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDefinition, ArrowDirection, ArrowDrawer, ArrowStyle};
pub use frame::FrameDefinition;
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle};
pub use text::{Text, TextDefinition};

use crate::geometry::{Point, Size};

/// Trait for elements that can be rendered to SVG layers.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable, centered on `position`, to one or more layers.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size of this drawable.
    fn size(&self) -> Size;
}
