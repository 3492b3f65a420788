use std::path::{Path, PathBuf};

use log::{debug, error, info};

use super::{Error, Exporter};
use crate::compose::Composition;

/// Writes compositions as standalone SVG documents.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    path: PathBuf,
}

impl SvgExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, doc: &::svg::Document) -> Result<(), Error> {
        debug!(path:? = self.path; "Writing SVG document");
        ::svg::save(&self.path, doc).map_err(|err| {
            error!(path:? = self.path, err:%; "Failed to write SVG");
            Error::Io(err)
        })?;
        info!(path:? = self.path; "SVG exported");
        Ok(())
    }
}

impl Exporter for SvgExporter {
    fn export(&mut self, composition: &Composition) -> Result<(), Error> {
        let size = composition.size();
        if !(size.width() > 0.0 && size.height() > 0.0) {
            return Err(Error::Render(format!(
                "output size {}x{} is empty",
                size.width(),
                size.height()
            )));
        }

        self.write_document(&composition.to_svg_document())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        artwork::{Artwork, ArtworkRenderer},
        canvas::{Canvas, OutputExtent, Unit},
        compose::compose,
        panel::Panel,
        placement::Placement,
    };

    #[test]
    fn test_export_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.svg");

        let canvas = Canvas::relative(OutputExtent::new(4.0, 3.0, Unit::In)).unwrap();
        let panel = Panel::new("main", Artwork::placeholder("Mainland"));
        let composition = compose(
            &canvas,
            &[(&panel, Placement::relative(0.0, 0.0, 1.0, 1.0))],
            &[],
            &ArtworkRenderer::default(),
        )
        .unwrap();

        let mut exporter = SvgExporter::new(&path);
        exporter.export(&composition).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("width=\"4in\""));
        assert!(written.contains("viewBox=\"0 0 384 288\""));
        assert!(written.contains("Mainland"));
    }

    #[test]
    fn test_export_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("map.svg");

        let canvas = Canvas::relative(OutputExtent::new(10.0, 10.0, Unit::Px)).unwrap();
        let panel = Panel::new("main", Artwork::placeholder(""));
        let composition = compose(
            &canvas,
            &[(&panel, Placement::relative(0.0, 0.0, 1.0, 1.0))],
            &[],
            &ArtworkRenderer::default(),
        )
        .unwrap();

        let err = SvgExporter::new(&path).export(&composition).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
