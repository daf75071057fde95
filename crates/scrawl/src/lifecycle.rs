//! Render lifecycle coordination.
//!
//! Rendering is inherently racy: the layout engine materializes its
//! surface at an unknown later time, and the shell may issue a new render
//! before the previous one completes. The controller makes this safe with
//! a monotonically increasing cycle id. Every render bumps it; every
//! deferred callback (readiness poll, deferred colorize) carries the id it
//! was scheduled under and discards itself when the current id has moved
//! on. A stale cycle therefore never mutates a newer surface.
//!
//! Readiness is probed on a fixed 100 ms cadence rather than signalled:
//! the engine seam only promises that the surface materializes eventually,
//! so the poll re-schedules itself until the job resolves or the cycle is
//! superseded.
//!
//! On readiness, post-processing runs in fixed order: hide branding
//! elements, colorize (Process only), apply the sketch transform when
//! enabled, bind pan/zoom when enabled. On failure the error is logged and
//! the previously rendered surface stays visible, with the phase back at
//! idle.

use std::{cell::RefCell, rc::Rc, time::Duration};

use log::{debug, error, info, warn};

use scrawl_core::surface::{Element, ElementId, ElementRole, RenderedSurface};

use crate::{
    colorize,
    config::{PanZoomConfig, StyleConfig},
    layout::{JobStatus, LayoutEngine, LayoutJob},
    panzoom::PanZoomController,
    scheduler::Scheduler,
    sketch::{self, SketchMode, SketchRemoval},
    source::{DiagramSource, Notation},
};

/// Fixed readiness poll cadence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// No cycle in flight. A previously rendered surface may still be
    /// visible.
    Idle,
    /// A layout job is in flight and being polled.
    Rendering,
    /// The current surface corresponds to the most recent render call.
    Ready,
}

struct Shared {
    cycle: u64,
    phase: RenderPhase,
    style: StyleConfig,
    engines: Vec<Rc<dyn LayoutEngine>>,
    panzoom: PanZoomController,
    /// The source of the current cycle, kept for style-driven re-renders
    /// and detached view pipelines.
    source: Option<DiagramSource>,
    job: Option<Box<dyn LayoutJob>>,
    surface: Option<RenderedSurface>,
}

impl Shared {
    fn engine_for(&self, notation: Notation) -> Option<Rc<dyn LayoutEngine>> {
        self.engines
            .iter()
            .find(|engine| engine.notation() == notation)
            .map(Rc::clone)
    }

    /// Post-processing for a freshly materialized surface, in fixed order.
    fn complete(&mut self, mut surface: RenderedSurface, notation: Notation) {
        for element in surface.elements_mut() {
            if element.role() == ElementRole::Branding {
                element.set_hidden(true);
            }
        }

        if notation == Notation::Process {
            match self.style.category_colors() {
                Ok(colors) => {
                    colorize::colorize_surface(&mut surface, &colors);
                }
                Err(message) => warn!(message; "Skipping colorization, bad color config"),
            }
        }

        if self.style.sketch_enabled() {
            let mode = SketchMode::for_notation(notation);
            let outcome = sketch::apply_sketch(&mut surface, mode, self.cycle);
            debug!(sketched = outcome.sketched(); "Applied sketch styling");
        }

        if self.style.pan_zoom_enabled() {
            self.panzoom.enable(&mut surface);
        }

        self.surface = Some(surface);
        self.phase = RenderPhase::Ready;
        info!(cycle = self.cycle; "Render cycle complete");
    }
}

/// The lifecycle controller. Cheap to clone into deferred callbacks.
pub(crate) struct Lifecycle {
    shared: Rc<RefCell<Shared>>,
}

impl Lifecycle {
    pub(crate) fn new(
        style: StyleConfig,
        pan_zoom: PanZoomConfig,
        engines: Vec<Rc<dyn LayoutEngine>>,
    ) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                cycle: 0,
                phase: RenderPhase::Idle,
                style,
                engines,
                panzoom: PanZoomController::new(pan_zoom),
                source: None,
                job: None,
                surface: None,
            })),
        }
    }

    pub(crate) fn add_engine(&self, engine: Rc<dyn LayoutEngine>) {
        let mut shared = self.shared.borrow_mut();
        let notation = engine.notation();
        shared.engines.retain(|existing| existing.notation() != notation);
        shared.engines.push(engine);
    }

    pub(crate) fn phase(&self) -> RenderPhase {
        self.shared.borrow().phase
    }

    pub(crate) fn style(&self) -> StyleConfig {
        self.shared.borrow().style.clone()
    }

    pub(crate) fn source(&self) -> Option<DiagramSource> {
        self.shared.borrow().source.clone()
    }

    pub(crate) fn engines(&self) -> Vec<Rc<dyn LayoutEngine>> {
        self.shared.borrow().engines.clone()
    }

    pub(crate) fn pan_zoom_config(&self) -> PanZoomConfig {
        self.shared.borrow().panzoom.config().clone()
    }

    /// Read access to the current surface, when one exists.
    pub(crate) fn surface(&self) -> Option<std::cell::Ref<'_, RenderedSurface>> {
        std::cell::Ref::filter_map(self.shared.borrow(), |shared| shared.surface.as_ref()).ok()
    }

    /// Removes and returns the current surface. Used by detached
    /// pipelines, which render once and hand the result over.
    pub(crate) fn take_surface(&self) -> Option<RenderedSurface> {
        self.shared.borrow_mut().surface.take()
    }

    /// Starts a new render cycle, superseding any cycle in flight.
    ///
    /// Returns the new cycle id. The surface materializes later, under the
    /// scheduler's readiness polls; until then the previous surface stays
    /// visible.
    pub(crate) fn render(&self, scheduler: &mut Scheduler, source: DiagramSource) -> u64 {
        let mut shared = self.shared.borrow_mut();
        shared.cycle += 1;
        let cycle = shared.cycle;

        let Some(engine) = shared.engine_for(source.notation()) else {
            error!(notation = source.notation().name(); "No layout engine for notation");
            shared.phase = RenderPhase::Idle;
            shared.job = None;
            return cycle;
        };

        debug!(cycle, notation = source.notation().name(); "Render cycle started");
        shared.phase = RenderPhase::Rendering;
        shared.job = Some(engine.start(&source));
        shared.source = Some(source);
        drop(shared);

        self.schedule_poll(scheduler, cycle);
        cycle
    }

    fn schedule_poll(&self, scheduler: &mut Scheduler, cycle: u64) {
        let shared = Rc::clone(&self.shared);
        scheduler.schedule_after(POLL_INTERVAL, move |scheduler| {
            poll_tick(shared, scheduler, cycle);
        });
    }

    /// Applies a style change, re-using the rendered surface where
    /// possible.
    ///
    /// In-place: sketch toggle-on, overlay sketch toggle-off, pan/zoom
    /// toggles, category color changes. Only a replace-mode sketch
    /// toggle-off forces a full new cycle.
    pub(crate) fn set_style(&self, scheduler: &mut Scheduler, style: StyleConfig) {
        let mut guard = self.shared.borrow_mut();
        let shared = &mut *guard;
        let previous = std::mem::replace(&mut shared.style, style.clone());

        // Nothing rendered yet: the new style applies to the next cycle
        let Some(notation) = shared.source.as_ref().map(DiagramSource::notation) else {
            return;
        };
        let Some(surface) = shared.surface.as_mut() else {
            return;
        };
        let cycle = shared.cycle;
        let mut needs_rerender = false;

        if notation == Notation::Process
            && style.category_colors().ok() != previous.category_colors().ok()
        {
            match style.category_colors() {
                Ok(colors) => {
                    colorize::colorize_surface(surface, &colors);
                }
                Err(message) => warn!(message; "Skipping recolorization, bad color config"),
            }
        }

        match (previous.sketch_enabled(), style.sketch_enabled()) {
            (false, true) => {
                let outcome =
                    sketch::apply_sketch(surface, SketchMode::for_notation(notation), cycle);
                debug!(sketched = outcome.sketched(); "Applied sketch styling in place");
            }
            (true, false) => {
                match sketch::remove_sketch(surface, SketchMode::for_notation(notation)) {
                    SketchRemoval::Removed(removed) => {
                        debug!(removed; "Removed sketch overlay in place");
                    }
                    SketchRemoval::RequiresRerender => needs_rerender = true,
                }
            }
            _ => {}
        }

        match (previous.pan_zoom_enabled(), style.pan_zoom_enabled()) {
            (false, true) => shared.panzoom.enable(surface),
            (true, false) => shared.panzoom.disable(surface),
            _ => {}
        }

        drop(guard);
        if needs_rerender {
            if let Some(source) = self.source() {
                debug!("Sketch removal needs a fresh surface, starting new cycle");
                self.render(scheduler, source);
            }
        }
    }

    /// Adds a late element to the surface and defers its colorization by
    /// one scheduler tick, cycle-checked.
    ///
    /// Returns the assigned id, or `None` when no surface is ready.
    pub(crate) fn notify_element_added(
        &self,
        scheduler: &mut Scheduler,
        element: Element,
    ) -> Option<ElementId> {
        let mut guard = self.shared.borrow_mut();
        let shared = &mut *guard;
        if shared.phase != RenderPhase::Ready {
            debug!("Ignoring element notification, no surface ready");
            return None;
        }
        let surface = shared.surface.as_mut()?;
        let notation = shared.source.as_ref().map(DiagramSource::notation)?;

        let id = surface.push(element);
        debug!(element = id.to_string(); "Element added to live surface");
        if notation != Notation::Process {
            return Some(id);
        }

        let cycle = shared.cycle;
        drop(guard);

        // The element's visual subtree settles one tick after insertion
        let shared = Rc::clone(&self.shared);
        scheduler.schedule_after(Duration::ZERO, move |_| {
            let mut shared = shared.borrow_mut();
            if shared.cycle != cycle {
                debug!(cycle; "Discarding stale colorize for added element");
                return;
            }
            let colors = match shared.style.category_colors() {
                Ok(colors) => colors,
                Err(message) => {
                    warn!(message; "Skipping colorization of added element");
                    return;
                }
            };
            if let Some(surface) = shared.surface.as_mut() {
                colorize::colorize_added_element(surface, id, &colors);
            }
        });
        Some(id)
    }

    /// Forwards a pan gesture to the controller.
    pub(crate) fn pan_by(&self, dx: f32, dy: f32) {
        let mut guard = self.shared.borrow_mut();
        let shared = &mut *guard;
        if let Some(surface) = shared.surface.as_mut() {
            shared.panzoom.pan_by(surface, dx, dy);
        }
    }

    /// Forwards a zoom gesture to the controller.
    pub(crate) fn zoom_at(&self, anchor: scrawl_core::geometry::Point, steps: f32) {
        let mut guard = self.shared.borrow_mut();
        let shared = &mut *guard;
        if let Some(surface) = shared.surface.as_mut() {
            shared.panzoom.zoom_at(surface, anchor, steps);
        }
    }

    /// Forwards a double-click gesture to the controller.
    pub(crate) fn double_click(&self, anchor: scrawl_core::geometry::Point) {
        let mut guard = self.shared.borrow_mut();
        let shared = &mut *guard;
        if let Some(surface) = shared.surface.as_mut() {
            shared.panzoom.double_click(surface, anchor);
        }
    }

    /// Tears the lifecycle down: supersedes any in-flight cycle so pending
    /// polls discard themselves, drops the job, and unbinds pan/zoom.
    pub(crate) fn teardown(&self) {
        let mut guard = self.shared.borrow_mut();
        let shared = &mut *guard;
        shared.cycle += 1;
        shared.job = None;
        if let Some(surface) = shared.surface.as_mut() {
            shared.panzoom.disable(surface);
        }
        shared.phase = RenderPhase::Idle;
        debug!("Lifecycle torn down");
    }
}

fn poll_tick(shared_rc: Rc<RefCell<Shared>>, scheduler: &mut Scheduler, cycle: u64) {
    let mut shared = shared_rc.borrow_mut();
    if shared.cycle != cycle {
        debug!(cycle, current = shared.cycle; "Discarding stale readiness poll");
        return;
    }
    let Some(job) = shared.job.as_mut() else {
        return;
    };

    match job.poll() {
        JobStatus::Pending => {
            drop(shared);
            let shared = Rc::clone(&shared_rc);
            scheduler.schedule_after(POLL_INTERVAL, move |scheduler| {
                poll_tick(shared, scheduler, cycle);
            });
        }
        JobStatus::Ready(surface) => {
            shared.job = None;
            let notation = shared
                .source
                .as_ref()
                .map(DiagramSource::notation)
                .unwrap_or(Notation::Graph);
            shared.complete(surface, notation);
        }
        JobStatus::Failed(message) => {
            shared.job = None;
            shared.phase = RenderPhase::Idle;
            error!(cycle, message; "Layout failed, keeping previous surface");
        }
    }
}
