//! Error types for Cartouche operations.
//!
//! [`LayoutError`] is raised by the layout core (placement resolution, grid
//! arrangement and composition). [`CartoucheError`] wraps it together with the
//! failures of the surrounding surfaces: scene parsing, I/O and export.

use std::io;

use thiserror::Error;

/// Errors raised while resolving placements, arranging grids or composing.
///
/// Every variant carries enough context (panel or connector index, offending
/// field) for the caller to correct the input. A composition fails as a whole
/// on the first error; nothing is drawn for a batch containing an invalid
/// entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid placement{}: `{field}` {reason}", panel_suffix(.panel))]
    InvalidPlacement {
        panel: Option<usize>,
        field: &'static str,
        reason: String,
    },

    #[error("invalid grid specification: `{field}` {reason}")]
    InvalidGridSpec { field: &'static str, reason: String },

    #[error("connector {connector} references unknown panel `{panel}`")]
    UnknownPanelReference { connector: usize, panel: String },

    #[error("aspect ratio conflict{}: {reason}", panel_suffix(.panel))]
    AspectRatioConflict {
        panel: Option<usize>,
        reason: String,
    },

    #[error("invalid canvas: `{field}` {reason}")]
    InvalidCanvas { field: &'static str, reason: String },
}

fn panel_suffix(panel: &Option<usize>) -> String {
    panel.map(|idx| format!(" for panel {idx}")).unwrap_or_default()
}

impl LayoutError {
    pub(crate) fn invalid_placement(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidPlacement {
            panel: None,
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn aspect_conflict(reason: impl Into<String>) -> Self {
        Self::AspectRatioConflict {
            panel: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_grid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidGridSpec {
            field,
            reason: reason.into(),
        }
    }

    /// Attaches the index of the panel that caused this error.
    ///
    /// Variants not tied to a panel are returned unchanged.
    pub fn at_panel(self, idx: usize) -> Self {
        match self {
            Self::InvalidPlacement { field, reason, .. } => Self::InvalidPlacement {
                panel: Some(idx),
                field,
                reason,
            },
            Self::AspectRatioConflict { reason, .. } => Self::AspectRatioConflict {
                panel: Some(idx),
                reason,
            },
            other => other,
        }
    }

    /// Returns the index of the offending panel, if known.
    pub fn panel(&self) -> Option<usize> {
        match self {
            Self::InvalidPlacement { panel, .. } | Self::AspectRatioConflict { panel, .. } => {
                *panel
            }
            _ => None,
        }
    }
}

/// The main error type for Cartouche operations.
///
/// # Diagnostic Variants
///
/// The `Scene` variant keeps the TOML error together with the scene source, so
/// the error's span can be rendered as a labeled snippet.
#[derive(Debug, Error)]
pub enum CartoucheError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Scene { err: toml::de::Error, src: String },

    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for CartoucheError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl CartoucheError {
    /// Create a new `Scene` error with the associated source text.
    pub fn new_scene_error(err: toml::de::Error, src: impl Into<String>) -> Self {
        Self::Scene {
            err,
            src: src.into(),
        }
    }
}
