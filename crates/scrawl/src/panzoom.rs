//! Viewport pan/zoom control.
//!
//! A [`PanZoomController`] owns at most one binding at a time. Enabling it
//! against a surface computes the initial fit-and-center transform and
//! writes it onto the surface; enabling again replaces the binding rather
//! than stacking a second one. Disabling clears both the binding and the
//! surface transform, and is a no-op when nothing is bound.
//!
//! All zoom operations clamp the scale to the configured range and keep
//! the anchor point stationary on screen.

use log::debug;

use scrawl_core::{
    geometry::{Bounds, Point},
    surface::{RenderedSurface, ViewTransform},
};

use crate::config::PanZoomConfig;

/// An active pan/zoom binding: the current transform plus the geometry it
/// was fitted against.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Binding {
    transform: ViewTransform,
}

/// Pan/zoom state machine for one diagram viewport.
#[derive(Debug, Clone)]
pub struct PanZoomController {
    config: PanZoomConfig,
    binding: Option<Binding>,
}

impl PanZoomController {
    pub fn new(config: PanZoomConfig) -> Self {
        Self {
            config,
            binding: None,
        }
    }

    pub fn config(&self) -> &PanZoomConfig {
        &self.config
    }

    /// Whether a binding is currently active.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// The current transform, when bound.
    pub fn transform(&self) -> Option<ViewTransform> {
        self.binding.map(|binding| binding.transform)
    }

    /// Binds the controller to the surface, computing the initial
    /// transform from the content bounds and the configured viewport.
    ///
    /// A prior binding is replaced, never stacked.
    pub fn enable(&mut self, surface: &mut RenderedSurface) {
        let replaced = self.binding.is_some();
        let transform = self.initial_transform(surface.intrinsic_bounds());
        self.binding = Some(Binding { transform });
        surface.set_view_transform(Some(transform));
        debug!(
            replaced,
            scale = transform.scale();
            "Pan/zoom binding activated"
        );
    }

    /// Unbinds the controller and clears the surface transform. Does
    /// nothing when no binding is active.
    pub fn disable(&mut self, surface: &mut RenderedSurface) {
        if self.binding.take().is_some() {
            surface.set_view_transform(None);
            debug!("Pan/zoom binding released");
        }
    }

    /// Pans by a screen-space delta, scaled by the configured pan speed.
    pub fn pan_by(&mut self, surface: &mut RenderedSurface, dx: f32, dy: f32) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        let speed = self.config.pan_speed();
        let transform = binding.transform;
        binding.transform = ViewTransform::new(
            transform.scale(),
            transform.tx() + dx * speed,
            transform.ty() + dy * speed,
        );
        surface.set_view_transform(Some(binding.transform));
    }

    /// Zooms by `steps` wheel notches anchored at a viewport point.
    ///
    /// Positive steps zoom in. Each notch multiplies the scale by
    /// `1 + sensitivity`; the result is clamped to the configured range
    /// and the anchor point stays fixed on screen.
    pub fn zoom_at(&mut self, surface: &mut RenderedSurface, anchor: Point, steps: f32) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        let transform = binding.transform;
        let target = transform.scale() * (1.0 + self.config.zoom_sensitivity()).powf(steps);
        let clamped = target.clamp(self.config.min_zoom(), self.config.max_zoom());
        let ratio = clamped / transform.scale();

        binding.transform = ViewTransform::new(
            clamped,
            anchor.x() - ratio * (anchor.x() - transform.tx()),
            anchor.y() - ratio * (anchor.y() - transform.ty()),
        );
        surface.set_view_transform(Some(binding.transform));
    }

    /// Handles a double-click: one zoom-in step at the click point, when
    /// the gesture is enabled.
    pub fn double_click(&mut self, surface: &mut RenderedSurface, anchor: Point) {
        if self.config.double_click_zoom() {
            self.zoom_at(surface, anchor, 1.0);
        }
    }

    /// Computes the activation transform: fit the content into the
    /// viewport, then center it, per the configured flags.
    fn initial_transform(&self, content: Bounds) -> ViewTransform {
        let viewport = self.config.viewport();
        let size = content.size();

        let scale = if self.config.fit() && !size.is_empty() {
            (viewport.width() / size.width())
                .min(viewport.height() / size.height())
                .clamp(self.config.min_zoom(), self.config.max_zoom())
        } else {
            1.0
        };

        let (tx, ty) = if self.config.center() {
            (
                viewport.width() / 2.0 - content.center().x() * scale,
                viewport.height() / 2.0 - content.center().y() * scale,
            )
        } else {
            (-content.min().x() * scale, -content.min().y() * scale)
        };

        ViewTransform::new(scale, tx, ty)
    }
}
