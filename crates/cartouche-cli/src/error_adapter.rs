//! Error adapter for converting CartoucheError to miette diagnostics.
//!
//! Scene syntax errors carry the scene source and a byte span, and are
//! rendered as labeled snippets. Every other error is reported with a code
//! naming the failing stage.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use cartouche::{CartoucheError, LayoutError};

/// Adapter for a TOML scene error with its source.
pub struct SceneDiagnosticAdapter<'a> {
    err: &'a toml::de::Error,
    src: &'a str,
}

impl<'a> SceneDiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(err: &'a toml::de::Error, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for SceneDiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneDiagnosticAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for SceneDiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid scene file")
    }
}

impl std::error::Error for SceneDiagnosticAdapter<'_> {}

impl MietteDiagnostic for SceneDiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("cartouche::scene"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        let span = SourceSpan::new(span.start.into(), span.len());
        let label = LabeledSpan::new_primary_with_span(Some(self.err.message().to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        // Without a span the message would otherwise be lost
        self.err
            .span()
            .is_none()
            .then(|| Box::new(self.err.message()) as Box<dyn fmt::Display>)
    }
}

/// Adapter for [`CartoucheError`] variants without source spans.
pub struct ErrorAdapter<'a>(pub &'a CartoucheError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CartoucheError::Io(_) => "cartouche::io",
            CartoucheError::Scene { .. } | CartoucheError::InvalidScene(_) => "cartouche::scene",
            CartoucheError::Layout(_) => "cartouche::layout",
            CartoucheError::Config(_) => "cartouche::config",
            CartoucheError::Export(_) => "cartouche::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            CartoucheError::Layout(LayoutError::UnknownPanelReference { .. }) => {
                "connectors may only reference panels placed in the same scene"
            }
            CartoucheError::Layout(LayoutError::AspectRatioConflict { .. }) => {
                "give the panel a non-zero width and height, or drop its aspect ratio"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A scene error with source location information.
    Diagnostic(SceneDiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`CartoucheError`] into a list of reportable errors.
pub fn to_reportables(err: &CartoucheError) -> Vec<Reportable<'_>> {
    match err {
        CartoucheError::Scene { err, src } => {
            vec![Reportable::Diagnostic(SceneDiagnosticAdapter::new(err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use cartouche::CompositionBuilder;

    use super::*;

    fn scene_error(src: &str) -> CartoucheError {
        CompositionBuilder::default()
            .parse(src, Path::new("."))
            .unwrap_err()
    }

    #[test]
    fn test_scene_error_has_span_label() {
        let src = "[canvas]\nwidth = \"wide\"\n";
        let err = scene_error(src);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.code().unwrap().to_string(), "cartouche::scene");
                let labels: Vec<_> = d.labels().unwrap().collect();
                assert_eq!(labels.len(), 1);
                assert!(labels[0].primary());
                assert!(labels[0].offset() >= src.find("width").unwrap());
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_layout_error_code_and_help() {
        let err = CartoucheError::Layout(LayoutError::UnknownPanelReference {
            connector: 0,
            panel: "C".to_string(),
        });

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.code().unwrap().to_string(), "cartouche::layout");
                assert!(e.help().is_some());
                assert_eq!(
                    e.to_string(),
                    "Layout error: connector 0 references unknown panel `C`"
                );
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_config_error_code() {
        let err = CartoucheError::Config("bad color".to_string());
        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "cartouche::config");
        assert!(reportables[0].help().is_none());
    }
}
