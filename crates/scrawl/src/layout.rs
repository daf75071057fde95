//! Layout engines: notation text in, rendered surface out.
//!
//! The engines are external collaborators from the renderer's point of
//! view: the lifecycle controller only sees the [`LayoutEngine`] /
//! [`LayoutJob`] seam. A job's completion is not synchronously observable;
//! the controller probes it on a fixed cadence and discards the result if
//! the cycle has been superseded in the meantime.
//!
//! Two built-in engines cover the supported notations:
//!
//! - [`GraphEngine`] for the directed-graph notation (`A-->B` edge lists)
//! - [`ProcessEngine`] for the process-flow notation (tasks, events,
//!   gateways, flows)

mod graph;
mod process;

pub use graph::GraphEngine;
pub use process::ProcessEngine;

use scrawl_core::surface::RenderedSurface;

use crate::source::{DiagramSource, Notation};

/// Result of probing a layout job for readiness.
pub enum JobStatus {
    /// The surface has not materialized yet; probe again later.
    Pending,
    /// The finished surface. The job is exhausted after returning this.
    Ready(RenderedSurface),
    /// The engine rejected the source. The job is exhausted.
    Failed(String),
}

/// One in-flight layout run. Dropping the job cancels it.
pub trait LayoutJob {
    /// Probes the job. Once `Ready` or `Failed` has been returned the job
    /// is exhausted and keeps reporting `Pending`.
    fn poll(&mut self) -> JobStatus;
}

/// Converts notation text into a rendered surface, asynchronously.
pub trait LayoutEngine {
    /// The notation this engine understands.
    fn notation(&self) -> Notation;

    /// Starts a layout run for the given source.
    fn start(&self, source: &DiagramSource) -> Box<dyn LayoutJob>;
}

/// A job whose work runs on the first probe.
///
/// The built-in engines parse and lay out lazily here, so from the
/// controller's perspective the surface materializes between `start` and
/// some later poll, as it would with a real out-of-process engine.
pub(crate) struct DeferredJob {
    work: Option<Box<dyn FnOnce() -> Result<RenderedSurface, String>>>,
}

impl DeferredJob {
    pub(crate) fn new(work: impl FnOnce() -> Result<RenderedSurface, String> + 'static) -> Self {
        Self {
            work: Some(Box::new(work)),
        }
    }
}

impl LayoutJob for DeferredJob {
    fn poll(&mut self) -> JobStatus {
        match self.work.take() {
            Some(work) => match work() {
                Ok(surface) => JobStatus::Ready(surface),
                Err(message) => JobStatus::Failed(message),
            },
            None => JobStatus::Pending,
        }
    }
}
