//! Connector annotations linking points and panels.
//!
//! Connectors are decorative arrows drawn after every panel has been placed.
//! Each end is either a fixed canvas point or an [`Anchor`] on the resolved
//! bounds of a named panel, e.g. from the right edge of an overview map to
//! the left edge of an inset.

use std::rc::Rc;

use cartouche_core::{
    draw::{Arrow, ArrowDefinition, ArrowDirection},
    geometry::{Bounds, Point},
    identifier::Id,
};

use crate::placement::Anchor;

/// One end of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    /// A fixed point in canvas coordinates.
    Point(Point),
    /// An anchor on the resolved bounds of a panel.
    Panel { id: Id, anchor: Anchor },
}

impl Endpoint {
    pub fn point(x: f32, y: f32) -> Self {
        Self::Point(Point::new(x, y))
    }

    pub fn panel(id: impl Into<Id>, anchor: Anchor) -> Self {
        Self::Panel {
            id: id.into(),
            anchor,
        }
    }

    /// The referenced panel, if any.
    pub fn panel_id(&self) -> Option<Id> {
        match self {
            Self::Point(_) => None,
            Self::Panel { id, .. } => Some(*id),
        }
    }

    /// Canvas position of this end, looking panels up with `lookup`.
    ///
    /// Returns `None` when the referenced panel is unknown.
    pub(crate) fn locate(&self, lookup: impl Fn(Id) -> Option<Bounds>) -> Option<Point> {
        match *self {
            Self::Point(point) => Some(point),
            Self::Panel { id, anchor } => lookup(id).map(|bounds| anchor.point_on(bounds)),
        }
    }
}

/// A directional arrow between two endpoints, with an optional label.
#[derive(Debug, Clone)]
pub struct Connector {
    source: Endpoint,
    destination: Endpoint,
    definition: Rc<ArrowDefinition>,
    direction: ArrowDirection,
    label: Option<String>,
}

impl Connector {
    /// Creates a forward arrow from `source` to `destination`.
    pub fn new(source: Endpoint, destination: Endpoint, definition: Rc<ArrowDefinition>) -> Self {
        Self {
            source,
            destination,
            definition,
            direction: ArrowDirection::default(),
            label: None,
        }
    }

    pub fn with_direction(mut self, direction: ArrowDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn source(&self) -> &Endpoint {
        &self.source
    }

    pub fn destination(&self) -> &Endpoint {
        &self.destination
    }

    pub fn direction(&self) -> ArrowDirection {
        self.direction
    }

    /// The drawable arrow, sharing this connector's definition.
    pub fn arrow(&self) -> Arrow {
        Arrow::new(Rc::clone(&self.definition), self.direction)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Panels referenced by either end.
    pub fn panel_references(&self) -> impl Iterator<Item = Id> + '_ {
        [self.source.panel_id(), self.destination.panel_id()]
            .into_iter()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_locate_point() {
        let endpoint = Endpoint::point(0.2, 0.3);
        assert_eq!(endpoint.locate(|_| None), Some(Point::new(0.2, 0.3)));
        assert_eq!(endpoint.panel_id(), None);
    }

    #[test]
    fn test_endpoint_locate_panel_anchor() {
        let bounds = Bounds::from_extents(0.0, 2.0, 0.0, 4.0);
        let endpoint = Endpoint::panel("alaska", Anchor::Right);

        let located = endpoint.locate(|id| (id == "alaska").then_some(bounds));
        assert_eq!(located, Some(Point::new(2.0, 2.0)));

        let missing = Endpoint::panel("hawaii", Anchor::Top).locate(|_| None);
        assert_eq!(missing, None);
    }

    #[test]
    fn test_connector_references_and_builders() {
        let connector = Connector::new(
            Endpoint::panel("mainland", Anchor::Left),
            Endpoint::panel("alaska", Anchor::Right),
            Rc::new(ArrowDefinition::default()),
        )
        .with_direction(ArrowDirection::Bidirectional)
        .with_label("Alaska");

        let refs: Vec<Id> = connector.panel_references().collect();
        assert_eq!(refs, vec![Id::new("mainland"), Id::new("alaska")]);
        assert_eq!(connector.direction(), ArrowDirection::Bidirectional);
        assert_eq!(connector.arrow().direction(), ArrowDirection::Bidirectional);
        assert_eq!(connector.label(), Some("Alaska"));
    }
}
