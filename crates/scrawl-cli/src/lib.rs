//! CLI logic for the scrawl diagram renderer.
//!
//! Thin driver around the `scrawl` library: read a source file, infer the
//! notation, render to completion by pumping the scheduler, and export
//! through a sink pointed at the output directory.

mod args;
mod config;

pub use args::{Args, Format};

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::info;
use thiserror::Error;

use scrawl::{
    Diagram, RenderPhase,
    export::{DirectorySink, RASTER_FILENAME, VECTOR_FILENAME},
    source::{DiagramSource, Notation},
};

/// Errors surfaced to the CLI user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(
        "cannot determine notation for `{0}`: use a .graph or .process \
         extension or pass --notation"
    )]
    UnknownNotation(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("export failed, see the log for details")]
    Export,
}

/// Run the scrawl CLI application.
///
/// Reads the input file, renders it to completion, and writes the
/// requested export next to `args.output`.
///
/// # Errors
///
/// Returns `CliError` for I/O failures, configuration problems, an
/// undeterminable notation, a rejected source, or a failed export.
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Rendering diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source_text = fs::read_to_string(&args.input)?;
    let notation = resolve_notation(args)?;
    let format = resolve_format(args);

    let out_path = PathBuf::from(&args.output);
    let out_dir = out_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let style = app_config.style().clone().with_sketch(
        args.sketch || app_config.style().sketch_enabled(),
    );
    let app_config = scrawl::config::AppConfig::new(style, app_config.pan_zoom().clone());

    let mut diagram = Diagram::with_sink(app_config, Box::new(DirectorySink::new(&out_dir)));
    diagram.render(DiagramSource::new(notation, source_text));
    diagram.run_until_idle();

    if diagram.phase() != RenderPhase::Ready {
        return Err(CliError::Render(format!(
            "the {} engine rejected the source",
            notation.name()
        )));
    }

    let fixed_name = match format {
        Format::Svg => {
            diagram.export_vector().ok_or(CliError::Export)?;
            VECTOR_FILENAME
        }
        Format::Png => {
            diagram.export_raster().ok_or(CliError::Export)?;
            RASTER_FILENAME
        }
    };

    // The sink writes under its fixed filename; honor the requested name
    if out_path.file_name().and_then(|name| name.to_str()) != Some(fixed_name) {
        fs::rename(out_dir.join(fixed_name), &out_path)?;
    }

    info!(output_file = args.output; "Diagram exported successfully");

    Ok(())
}

/// Picks the notation from `--notation`, falling back to the input file
/// extension.
fn resolve_notation(args: &Args) -> Result<Notation, CliError> {
    if let Some(notation) = &args.notation {
        return Notation::from_str(notation).map_err(|_| {
            CliError::UnknownNotation(notation.clone())
        });
    }
    match Path::new(&args.input).extension().and_then(|ext| ext.to_str()) {
        Some("graph") => Ok(Notation::Graph),
        Some("process") => Ok(Notation::Process),
        _ => Err(CliError::UnknownNotation(args.input.clone())),
    }
}

/// Picks the format from `--format`, falling back to the output file
/// extension (SVG unless it ends in `.png`).
fn resolve_format(args: &Args) -> Format {
    if let Some(format) = args.format {
        return format;
    }
    match Path::new(&args.output).extension().and_then(|ext| ext.to_str()) {
        Some("png") => Format::Png,
        _ => Format::Svg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str, output: &str) -> Args {
        Args {
            input: input.to_string(),
            output: output.to_string(),
            format: None,
            notation: None,
            sketch: false,
            config: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_notation_from_extension() {
        assert_eq!(
            resolve_notation(&args("flow.graph", "out.svg")).unwrap(),
            Notation::Graph
        );
        assert_eq!(
            resolve_notation(&args("flow.process", "out.svg")).unwrap(),
            Notation::Process
        );
        assert!(resolve_notation(&args("flow.txt", "out.svg")).is_err());
    }

    #[test]
    fn test_notation_flag_overrides_extension() {
        let mut cli_args = args("flow.graph", "out.svg");
        cli_args.notation = Some("process".to_string());
        assert_eq!(resolve_notation(&cli_args).unwrap(), Notation::Process);
    }

    #[test]
    fn test_format_from_output_extension() {
        assert_eq!(resolve_format(&args("a.graph", "out.png")), Format::Png);
        assert_eq!(resolve_format(&args("a.graph", "out.svg")), Format::Svg);
        assert_eq!(resolve_format(&args("a.graph", "out")), Format::Svg);
    }
}
