//! Panels: independently produced artifacts placed into a composition.
//!
//! A [`Panel`] owns opaque content (whatever the [`Renderer`] of the
//! composition knows how to draw), an optional intrinsic aspect ratio and its
//! [`Theme`]. Panels are never mutated by the layout code, so the same panel
//! can take part in any number of compositions.
//!
//! [`Renderer`]: crate::compose::Renderer

use std::rc::Rc;

use cartouche_core::{
    draw::{FrameDefinition, Text, TextDefinition},
    geometry::{Bounds, Insets},
    identifier::Id,
};

/// Visual decoration applied to a panel.
///
/// Themes are explicit values handed to each panel rather than process-wide
/// state; [`StyleConfig::theme`](crate::config::StyleConfig::theme) builds
/// the default one from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    frame: FrameDefinition,
    title: TextDefinition,
    padding: Insets,
}

impl Theme {
    pub fn new(frame: FrameDefinition, title: TextDefinition, padding: Insets) -> Self {
        Self {
            frame,
            title,
            padding,
        }
    }

    /// Background fill and border.
    pub fn frame(&self) -> &FrameDefinition {
        &self.frame
    }

    /// Text style of the panel title.
    pub fn title(&self) -> &TextDefinition {
        &self.title
    }

    /// Space between the panel bounds and its content.
    pub fn padding(&self) -> Insets {
        self.padding
    }
}

/// A self-contained visual artifact with opaque content.
#[derive(Debug, Clone)]
pub struct Panel<C> {
    id: Id,
    content: C,
    intrinsic_aspect_ratio: Option<f32>,
    title: Option<String>,
    theme: Rc<Theme>,
}

impl<C> Panel<C> {
    /// Creates a freely stretchable panel with the default theme.
    pub fn new(id: impl Into<Id>, content: C) -> Self {
        Self {
            id: id.into(),
            content,
            intrinsic_aspect_ratio: None,
            title: None,
            theme: Rc::default(),
        }
    }

    /// Locks the physical width/height ratio of the panel.
    ///
    /// The ratio is validated when the panel is placed.
    pub fn with_aspect_ratio(mut self, ratio: f32) -> Self {
        self.intrinsic_aspect_ratio = Some(ratio);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_theme(mut self, theme: Rc<Theme>) -> Self {
        self.theme = theme;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn intrinsic_aspect_ratio(&self) -> Option<f32> {
        self.intrinsic_aspect_ratio
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Splits the panel's output bounds into the title band and the content
    /// area.
    ///
    /// The title band sits at the top of `bounds`. It is dropped when it would
    /// leave no room for content.
    pub(crate) fn layout_in(&self, bounds: Bounds) -> (Option<Bounds>, Bounds) {
        let inner = bounds.shrink(self.theme.padding);
        let inner = if inner.is_well_formed() { inner } else { bounds };

        let Some(title) = self.title.as_deref().filter(|title| !title.is_empty()) else {
            return (None, inner);
        };

        let title_height = Text::new(&self.theme.title, title).calculate_size().height();
        if title_height >= inner.height() {
            return (None, inner);
        }

        let band = Bounds::from_extents(
            inner.min_x(),
            inner.max_x(),
            inner.min_y(),
            inner.min_y() + title_height,
        );
        let content = inner.shrink(Insets::default().with_top(title_height));
        (Some(band), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_builders() {
        let theme = Rc::new(Theme::new(
            FrameDefinition::default(),
            TextDefinition::default(),
            Insets::uniform(4.0),
        ));
        let panel = Panel::new("alaska", "content")
            .with_aspect_ratio(0.42)
            .with_title("Alaska")
            .with_theme(Rc::clone(&theme));

        assert_eq!(panel.id(), "alaska");
        assert_eq!(*panel.content(), "content");
        assert_eq!(panel.intrinsic_aspect_ratio(), Some(0.42));
        assert_eq!(panel.title(), Some("Alaska"));
        assert_eq!(panel.theme().padding(), Insets::uniform(4.0));
    }

    #[test]
    fn test_layout_without_title_uses_padding() {
        let theme = Theme::new(
            FrameDefinition::default(),
            TextDefinition::default(),
            Insets::uniform(5.0),
        );
        let panel = Panel::new("a", ()).with_theme(Rc::new(theme));
        let (title, content) = panel.layout_in(Bounds::from_extents(0.0, 100.0, 0.0, 50.0));

        assert!(title.is_none());
        assert_eq!(content, Bounds::from_extents(5.0, 95.0, 5.0, 45.0));
    }

    #[test]
    fn test_layout_with_title_reserves_top_band() {
        let panel = Panel::new("a", ()).with_title("Hawaii");
        let bounds = Bounds::from_extents(0.0, 200.0, 0.0, 200.0);
        let (title, content) = panel.layout_in(bounds);

        let title = title.expect("title band");
        assert_eq!(title.min_y(), 0.0);
        assert_eq!(title.max_y(), content.min_y());
        assert_eq!(content.max_y(), 200.0);
    }

    #[test]
    fn test_layout_drops_title_when_too_small() {
        let panel = Panel::new("a", ()).with_title("Hawaii");
        let (title, content) = panel.layout_in(Bounds::from_extents(0.0, 200.0, 0.0, 2.0));

        assert!(title.is_none());
        assert_eq!(content.height(), 2.0);
    }
}
