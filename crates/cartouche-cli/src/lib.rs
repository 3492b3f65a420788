//! CLI logic for the Cartouche map composition tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use cartouche::{CartoucheError, CompositionBuilder};

/// Run the Cartouche CLI application
///
/// Reads the scene file, composes it and writes the resulting SVG to the
/// output file. SVG artwork named by the scene is resolved relative to the
/// scene file's directory.
///
/// # Errors
///
/// Returns `CartoucheError` for I/O, configuration, scene, layout or export
/// failures.
pub fn run(args: &Args) -> Result<(), CartoucheError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let input = Path::new(&args.input);
    let source = fs::read_to_string(input)?;
    let base_dir = input.parent().unwrap_or_else(|| Path::new("."));

    let builder = CompositionBuilder::new(app_config);
    let scene = builder.parse(&source, base_dir)?;
    builder.write_svg(&scene, &args.output)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
