//! Export of finished compositions.
//!
//! The [`Exporter`] trait is the last stage of the pipeline:
//!
//! ```text
//! Scene file
//!     ↓ parse
//! Panels + placements + connectors
//!     ↓ compose
//! Composition
//!     ↓ export (this module)
//! Output file
//! ```
//!
//! [`svg::SvgExporter`] is the built-in backend. [`Error`] converts into
//! [`CartoucheError::Export`] at the crate boundary.
//!
//! [`CartoucheError::Export`]: crate::CartoucheError::Export

/// SVG export backend.
pub mod svg;

use thiserror::Error;

use crate::compose::Composition;

/// Abstraction for composition export backends.
pub trait Exporter {
    /// Writes `composition` in the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the composition cannot be converted, or
    /// [`Error::Io`] if writing the output fails.
    fn export(&mut self, composition: &Composition) -> Result<(), Error>;
}

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
