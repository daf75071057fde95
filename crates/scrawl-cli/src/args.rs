//! Command-line argument definitions for the scrawl CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the export
//! format, notation selection, configuration file loading, and logging
//! verbosity.

use clap::{Parser, ValueEnum};

/// Export format for the rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Vector SVG markup
    Svg,
    /// Raster PNG with a white background
    Png,
}

/// Command-line arguments for the scrawl diagram renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram source file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file
    #[arg(short, long, default_value = "diagram.svg")]
    pub output: String,

    /// Export format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Source notation; inferred from the input extension
    /// (.graph / .process) when omitted
    #[arg(short, long)]
    pub notation: Option<String>,

    /// Apply the hand-drawn sketch style
    #[arg(long)]
    pub sketch: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
