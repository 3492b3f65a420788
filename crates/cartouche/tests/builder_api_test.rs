//! Integration tests for the CompositionBuilder API

use std::{fs, path::Path};

use cartouche::{CartoucheError, CompositionBuilder, LayoutError, config::AppConfig};

const TWO_PANELS: &str = r##"
    [canvas]
    width = 400
    height = 200

    [[panels]]
    id = "main"
    title = "Overview"
    placement = { x = 0.0, y = 0.0, width = 1.0, height = 1.0 }

    [[panels]]
    id = "inset"
    placeholder = "Detail"
    fill = "#a6cee3"
    placement = { x = 0.7, y = 0.05, width = 0.25, height = 0.4 }

    [[connectors]]
    from = { panel = "main", anchor = "center" }
    to = { panel = "inset", anchor = "left" }
"##;

#[test]
fn test_builder_api_exists() {
    let _builder = CompositionBuilder::default();
}

#[test]
fn test_render_simple_scene() {
    let builder = CompositionBuilder::default();
    let scene = builder
        .parse(TWO_PANELS, Path::new("."))
        .expect("Failed to parse scene");
    let svg = builder.render_svg(&scene).expect("Failed to render scene");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("data-panel=\"main\""));
    assert!(svg.contains("data-panel=\"inset\""));
    assert!(svg.contains("Overview"));
    assert!(svg.contains("viewBox=\"0 0 400 200\""));
}

#[test]
fn test_compose_reports_resolved_geometry() {
    let builder = CompositionBuilder::default();
    let scene = builder.parse(TWO_PANELS, Path::new(".")).unwrap();
    let composition = builder.compose(&scene).unwrap();

    let inset = composition.panel("inset").unwrap();
    let bounds = inset.output_bounds();
    assert!((bounds.min_x() - 280.0).abs() < 1e-3);
    assert!((bounds.max_y() - 190.0).abs() < 1e-3);
    assert_eq!(composition.connectors().len(), 1);
}

#[test]
fn test_parse_invalid_syntax_returns_error() {
    let builder = CompositionBuilder::default();
    let result = builder.parse("this is not a scene", Path::new("."));
    assert!(matches!(result, Err(CartoucheError::Scene { .. })));
}

#[test]
fn test_layout_error_surfaces_from_render() {
    let source = r#"
        [[panels]]
        id = "bad"
        placement = { x_min = 0.6, x_max = 0.2, y_min = 0.0, y_max = 1.0 }
    "#;

    let builder = CompositionBuilder::default();
    let scene = builder.parse(source, Path::new(".")).unwrap();
    let err = builder.render_svg(&scene).unwrap_err();
    assert!(matches!(
        err,
        CartoucheError::Layout(LayoutError::InvalidPlacement { panel: Some(0), .. })
    ));
}

#[test]
fn test_builder_with_config() {
    let config: AppConfig = toml::from_str(
        r##"
        [canvas]
        width = 3
        height = 2
        unit = "cm"

        [style]
        background_color = "#fafafa"
        "##,
    )
    .unwrap();

    let builder = CompositionBuilder::new(config);
    let scene = builder
        .parse(
            r#"
            [[panels]]
            id = "only"
            placement = { x = 0.0, y = 0.0, width = 1.0, height = 1.0 }
            "#,
            Path::new("."),
        )
        .unwrap();
    let svg = builder.render_svg(&scene).unwrap();
    assert!(svg.contains("width=\"3cm\""));
    assert!(svg.contains("data-layer=\"background\""));
}

#[test]
fn test_write_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.svg");

    let builder = CompositionBuilder::default();
    let scene = builder.parse(TWO_PANELS, Path::new(".")).unwrap();
    builder.write_svg(&scene, &path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("data-panel=\"inset\""));
}

#[test]
fn test_builder_reusability() {
    let builder = CompositionBuilder::default();
    let first = builder.parse(TWO_PANELS, Path::new(".")).unwrap();
    let second = builder.parse(TWO_PANELS, Path::new(".")).unwrap();

    let svg1 = builder.render_svg(&first).unwrap();
    let svg2 = builder.render_svg(&second).unwrap();
    assert_eq!(svg1, svg2, "Rendering is deterministic");
}
