//! Configuration types for diagram rendering.
//!
//! This module provides the configuration structures supplied by the
//! surrounding shell. All types implement [`serde::Deserialize`] for
//! loading from external sources (the CLI loads them from TOML).
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style and pan/zoom settings.
//! - [`StyleConfig`] - Sketch/pan-zoom flags and category colors; changing it drives a re-render.
//! - [`CategoryColorsConfig`] - Raw category color strings, resolved to [`CategoryColors`] on access.
//! - [`PanZoomConfig`] - Viewport interaction options.
//!
//! # Example
//!
//! ```
//! # use scrawl::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().category_colors().is_ok());
//! ```

use serde::Deserialize;

use scrawl_core::{color::Color, geometry::Size};

/// Top-level configuration combining style and pan/zoom settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Pan/zoom configuration section.
    #[serde(default)]
    pan_zoom: PanZoomConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified style and pan/zoom
    /// configurations.
    pub fn new(style: StyleConfig, pan_zoom: PanZoomConfig) -> Self {
        Self { style, pan_zoom }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the pan/zoom configuration.
    pub fn pan_zoom(&self) -> &PanZoomConfig {
        &self.pan_zoom
    }
}

/// Style settings supplied by the shell.
///
/// A change to any field starts a new render cycle or an in-place style
/// pass, depending on what changed (see the lifecycle documentation).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StyleConfig {
    /// Whether the hand-drawn sketch style is applied after render.
    #[serde(default)]
    sketch_enabled: bool,

    /// Whether pan/zoom interaction is bound after render.
    #[serde(default)]
    pan_zoom_enabled: bool,

    /// Category fill colors for Process notation.
    #[serde(default)]
    category_colors: CategoryColorsConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            sketch_enabled: false,
            pan_zoom_enabled: false,
            category_colors: CategoryColorsConfig::default(),
        }
    }
}

impl StyleConfig {
    pub fn sketch_enabled(&self) -> bool {
        self.sketch_enabled
    }

    pub fn pan_zoom_enabled(&self) -> bool {
        self.pan_zoom_enabled
    }

    /// Returns a copy with sketch styling toggled.
    pub fn with_sketch(mut self, enabled: bool) -> Self {
        self.sketch_enabled = enabled;
        self
    }

    /// Returns a copy with pan/zoom interaction toggled.
    pub fn with_pan_zoom(mut self, enabled: bool) -> Self {
        self.pan_zoom_enabled = enabled;
        self
    }

    /// Returns a copy with the given category color strings.
    pub fn with_category_colors(mut self, colors: CategoryColorsConfig) -> Self {
        self.category_colors = colors;
        self
    }

    /// Resolves the configured category color strings.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending string when a configured
    /// color cannot be parsed.
    pub fn category_colors(&self) -> Result<CategoryColors, String> {
        self.category_colors.resolve()
    }
}

/// Raw category color strings, as configured by the shell.
///
/// Defaults match the reference palette: amber tasks, light-blue events,
/// light-green gateways.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryColorsConfig {
    #[serde(default = "default_task_color")]
    task: String,

    #[serde(default = "default_event_color")]
    event: String,

    #[serde(default = "default_gateway_color")]
    gateway: String,
}

fn default_task_color() -> String {
    "#FFC107".to_string()
}

fn default_event_color() -> String {
    "#03A9F4".to_string()
}

fn default_gateway_color() -> String {
    "#8BC34A".to_string()
}

impl Default for CategoryColorsConfig {
    fn default() -> Self {
        Self {
            task: default_task_color(),
            event: default_event_color(),
            gateway: default_gateway_color(),
        }
    }
}

impl CategoryColorsConfig {
    /// Creates a config from explicit color strings.
    pub fn new(
        task: impl Into<String>,
        event: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            task: task.into(),
            event: event.into(),
            gateway: gateway.into(),
        }
    }

    /// Parses the configured strings into a [`CategoryColors`] palette.
    pub fn resolve(&self) -> Result<CategoryColors, String> {
        Ok(CategoryColors {
            task: Color::new(&self.task).map_err(|err| format!("task color: {err}"))?,
            event: Color::new(&self.event).map_err(|err| format!("event color: {err}"))?,
            gateway: Color::new(&self.gateway).map_err(|err| format!("gateway color: {err}"))?,
        })
    }
}

/// Resolved category fill palette used by the colorization engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryColors {
    task: Color,
    event: Color,
    gateway: Color,
}

impl CategoryColors {
    pub fn task(&self) -> Color {
        self.task
    }

    pub fn event(&self) -> Color {
        self.event
    }

    pub fn gateway(&self) -> Color {
        self.gateway
    }
}

impl Default for CategoryColors {
    fn default() -> Self {
        CategoryColorsConfig::default()
            .resolve()
            .expect("default category colors are valid CSS colors")
    }
}

/// Pan/zoom interaction options.
///
/// Defaults follow the reference implementation: zoom bounds 0.1..10,
/// wheel sensitivity 0.4, pan speed 0.3, fit and center on activation,
/// double-click zoom enabled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PanZoomConfig {
    #[serde(default = "default_min_zoom")]
    min_zoom: f32,

    #[serde(default = "default_max_zoom")]
    max_zoom: f32,

    #[serde(default = "default_zoom_sensitivity")]
    zoom_sensitivity: f32,

    #[serde(default = "default_pan_speed")]
    pan_speed: f32,

    #[serde(default = "default_true")]
    fit: bool,

    #[serde(default = "default_true")]
    center: bool,

    #[serde(default = "default_true")]
    double_click_zoom: bool,

    #[serde(default = "default_viewport_width")]
    viewport_width: f32,

    #[serde(default = "default_viewport_height")]
    viewport_height: f32,
}

fn default_min_zoom() -> f32 {
    0.1
}

fn default_max_zoom() -> f32 {
    10.0
}

fn default_zoom_sensitivity() -> f32 {
    0.4
}

fn default_pan_speed() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_viewport_width() -> f32 {
    800.0
}

fn default_viewport_height() -> f32 {
    600.0
}

impl Default for PanZoomConfig {
    fn default() -> Self {
        Self {
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            zoom_sensitivity: default_zoom_sensitivity(),
            pan_speed: default_pan_speed(),
            fit: true,
            center: true,
            double_click_zoom: true,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl PanZoomConfig {
    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn zoom_sensitivity(&self) -> f32 {
        self.zoom_sensitivity
    }

    pub fn pan_speed(&self) -> f32 {
        self.pan_speed
    }

    pub fn fit(&self) -> bool {
        self.fit
    }

    pub fn center(&self) -> bool {
        self.center
    }

    pub fn double_click_zoom(&self) -> bool {
        self.double_click_zoom
    }

    pub fn viewport(&self) -> Size {
        Size::new(self.viewport_width, self.viewport_height)
    }
}
