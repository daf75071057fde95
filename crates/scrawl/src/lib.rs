//! Diagram rendering with a race-safe lifecycle, hand-drawn sketch
//! styling, category colorization, pan/zoom, and SVG/PNG export.
//!
//! The shell owns a [`Diagram`] handle, feeds it a [`DiagramSource`], and
//! drives the cooperative scheduler by pumping virtual time. The layout
//! engine materializes its surface at some later tick; the lifecycle
//! controller polls for readiness on a fixed cadence and discards stale
//! cycles, so rapid edits always converge on the latest source.
//!
//! # Example
//!
//! ```
//! use scrawl::{Diagram, config::AppConfig};
//! use scrawl::source::{DiagramSource, Notation};
//!
//! let mut diagram = Diagram::new(AppConfig::default());
//! diagram.render(DiagramSource::new(Notation::Graph, "A-->B; A-->C"));
//! diagram.run_until_idle();
//!
//! assert!(diagram.surface().is_some());
//! ```

pub mod colorize;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod panzoom;
pub mod scheduler;
pub mod sketch;
pub mod source;

mod lifecycle;

use std::{cell::Ref, rc::Rc, time::Duration};

use log::{debug, error};

use scrawl_core::{
    geometry::Point,
    surface::{Element, ElementId, RenderedSurface},
};

use crate::{
    config::AppConfig,
    export::{DirectorySink, PresentationSink},
    layout::{GraphEngine, LayoutEngine, ProcessEngine},
    scheduler::Scheduler,
    source::DiagramSource,
};

pub use crate::config::StyleConfig;
pub use crate::error::ScrawlError;
pub use crate::lifecycle::{POLL_INTERVAL, RenderPhase};

/// The public diagram handle owned by the surrounding shell.
///
/// Rendering is asynchronous: [`render`](Self::render) starts a cycle and
/// returns immediately; the surface materializes while the shell pumps the
/// scheduler. Export and view operations silently no-op (returning `None`)
/// before the first successful render, and log-and-return-`None` on
/// failure — the shell never sees a panic.
pub struct Diagram {
    scheduler: Scheduler,
    lifecycle: lifecycle::Lifecycle,
    sink: Box<dyn PresentationSink>,
}

impl Diagram {
    /// Creates a diagram with the built-in engines and a sink writing to
    /// the current directory.
    pub fn new(config: AppConfig) -> Self {
        Self::with_sink(config, Box::new(DirectorySink::new(".")))
    }

    /// Creates a diagram delivering exports and views to a custom sink.
    pub fn with_sink(config: AppConfig, sink: Box<dyn PresentationSink>) -> Self {
        let engines: Vec<Rc<dyn LayoutEngine>> =
            vec![Rc::new(GraphEngine), Rc::new(ProcessEngine)];
        Self {
            scheduler: Scheduler::new(),
            lifecycle: lifecycle::Lifecycle::new(
                config.style().clone(),
                config.pan_zoom().clone(),
                engines,
            ),
            sink,
        }
    }

    /// Registers a layout engine, replacing any engine already registered
    /// for the same notation.
    pub fn add_engine(&mut self, engine: Rc<dyn LayoutEngine>) {
        self.lifecycle.add_engine(engine);
    }

    /// Starts a new render cycle for the source, superseding any cycle in
    /// flight. Returns the cycle id.
    pub fn render(&mut self, source: DiagramSource) -> u64 {
        self.lifecycle.render(&mut self.scheduler, source)
    }

    /// Applies a style change. Where possible the current surface is
    /// updated in place; a replace-mode sketch toggle-off starts a fresh
    /// cycle.
    pub fn set_style(&mut self, style: StyleConfig) {
        self.lifecycle.set_style(&mut self.scheduler, style);
    }

    /// Advances virtual time, running due lifecycle callbacks.
    pub fn pump(&mut self, dt: Duration) {
        self.scheduler.advance(dt);
    }

    /// Runs the scheduler until no callbacks remain, completing any render
    /// cycle in flight.
    pub fn run_until_idle(&mut self) {
        self.scheduler.run_until_idle();
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> RenderPhase {
        self.lifecycle.phase()
    }

    /// The currently visible surface, if any render has completed.
    pub fn surface(&self) -> Option<Ref<'_, RenderedSurface>> {
        self.lifecycle.surface()
    }

    /// Adds an element to the live surface. It appears immediately and is
    /// colorized one scheduler tick later (Process notation only).
    ///
    /// Returns `None` when no surface is ready.
    pub fn notify_element_added(&mut self, element: Element) -> Option<ElementId> {
        self.lifecycle
            .notify_element_added(&mut self.scheduler, element)
    }

    /// Pans the viewport by a screen-space delta. No-op unless pan/zoom is
    /// bound.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.lifecycle.pan_by(dx, dy);
    }

    /// Zooms by wheel notches anchored at a viewport point. No-op unless
    /// pan/zoom is bound.
    pub fn zoom_at(&mut self, anchor: Point, steps: f32) {
        self.lifecycle.zoom_at(anchor, steps);
    }

    /// Handles a double-click gesture. No-op unless pan/zoom is bound.
    pub fn double_click(&mut self, anchor: Point) {
        self.lifecycle.double_click(anchor);
    }

    /// Serializes the surface to SVG and saves it through the sink.
    ///
    /// Returns the markup, or `None` before the first successful render or
    /// on a logged failure.
    pub fn export_vector(&self) -> Option<String> {
        let surface = self.ready_surface()?;
        match export::export_vector(&surface, self.sink.as_ref()) {
            Ok(markup) => Some(markup),
            Err(err) => {
                error!(err:?; "Vector export failed");
                None
            }
        }
    }

    /// Rasterizes the surface to a white-background PNG and saves it
    /// through the sink.
    ///
    /// Returns the PNG bytes, or `None` before the first successful render
    /// or on a logged failure.
    pub fn export_raster(&self) -> Option<Vec<u8>> {
        let surface = self.ready_surface()?;
        match export::export_raster(&surface, self.sink.as_ref()) {
            Ok(png) => Some(png),
            Err(err) => {
                error!(err:?; "Raster export failed");
                None
            }
        }
    }

    /// Opens a one-time snapshot of the live surface as a self-contained
    /// HTML page.
    pub fn open_fullscreen(&self, title: &str) -> Option<()> {
        let surface = self.ready_surface()?;
        match export::open_view(&surface, self.sink.as_ref(), title) {
            Ok(()) => Some(()),
            Err(err) => {
                error!(err:?; "Fullscreen view failed");
                None
            }
        }
    }

    /// Re-renders the current source and style through a fresh, detached
    /// pipeline and opens the result as a self-contained HTML page.
    ///
    /// The view shares no live state with this handle.
    pub fn open_standalone_view(&self, title: &str) -> Option<()> {
        let source = self.lifecycle.source()?;
        let detached = lifecycle::Lifecycle::new(
            self.lifecycle.style(),
            self.lifecycle.pan_zoom_config(),
            self.lifecycle.engines(),
        );
        let mut scheduler = Scheduler::new();
        detached.render(&mut scheduler, source);
        scheduler.run_until_idle();

        let surface = detached.take_surface()?;
        match export::open_view(&surface, self.sink.as_ref(), title) {
            Ok(()) => Some(()),
            Err(err) => {
                error!(err:?; "Standalone view failed");
                None
            }
        }
    }

    fn ready_surface(&self) -> Option<Ref<'_, RenderedSurface>> {
        let surface = self.lifecycle.surface();
        if surface.is_none() {
            debug!("Surface not ready, skipping export operation");
        }
        surface
    }
}

impl Drop for Diagram {
    fn drop(&mut self) {
        self.lifecycle.teardown();
    }
}
