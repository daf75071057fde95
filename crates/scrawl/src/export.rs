//! Export and view service.
//!
//! Everything that touches the environment — files on disk, a browser
//! view — goes through the injected [`PresentationSink`] capability, so
//! the library itself stays free of ambient side effects. [`DirectorySink`]
//! writes into a directory; [`MemorySink`] captures output in memory for
//! tests and embedders.
//!
//! All operations here are read-only with respect to the surface: a
//! serialization run never mutates element state, so exporting twice with
//! no intervening edits produces byte-identical output.

mod page;
mod raster;
mod vector;

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::info;
use thiserror::Error;

use scrawl_core::surface::RenderedSurface;

pub use page::standalone_page;
pub use raster::rasterize_png;
pub use vector::serialize;

/// Fixed filename for vector exports.
pub const VECTOR_FILENAME: &str = "diagram.svg";

/// Fixed filename for raster exports.
pub const RASTER_FILENAME: &str = "diagram.png";

/// Errors produced while serializing or delivering an export.
#[derive(Debug, Error)]
pub enum Error {
    /// The serialized vector markup was rejected by the raster parser.
    #[error("SVG parse error: {0}")]
    SvgParse(#[from] resvg::usvg::Error),

    /// The surface rasterizes to a zero-sized canvas.
    #[error("raster canvas has zero size")]
    EmptyCanvas,

    #[error("PNG encoding failed: {0}")]
    PngEncode(String),

    /// The sink failed to store or open the output.
    #[error("sink error: {0}")]
    Sink(#[from] io::Error),
}

/// Capability for delivering rendered output to the environment.
pub trait PresentationSink {
    /// Stores a named file.
    fn save_file(&self, name: &str, bytes: &[u8]) -> io::Result<()>;

    /// Presents a self-contained HTML page to the user.
    fn open_view(&self, title: &str, html: &str) -> io::Result<()>;
}

/// Sink that writes files into a directory. Views are written as HTML
/// files next to the exports; their path is logged for the user to open.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl PresentationSink for DirectorySink {
    fn save_file(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.directory)?;
        fs::write(self.directory.join(name), bytes)
    }

    fn open_view(&self, title: &str, html: &str) -> io::Result<()> {
        let name = format!("{}.html", slug(title));
        self.save_file(&name, html.as_bytes())?;
        info!(
            path = self.directory.join(&name).display().to_string();
            "View written, open it in a browser"
        );
        Ok(())
    }
}

fn slug(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if slug.is_empty() { "view".to_string() } else { slug }
}

/// In-memory sink for tests and embedders.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    views: RefCell<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes stored under a filename, if any.
    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(name).cloned()
    }

    /// Returns the opened views as (title, html) pairs.
    pub fn views(&self) -> Vec<(String, String)> {
        self.views.borrow().clone()
    }
}

impl PresentationSink for MemorySink {
    fn save_file(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.files.borrow_mut().insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn open_view(&self, title: &str, html: &str) -> io::Result<()> {
        self.views
            .borrow_mut()
            .push((title.to_string(), html.to_string()));
        Ok(())
    }
}

/// Serializes the surface to SVG and saves it as [`VECTOR_FILENAME`].
///
/// Returns the markup that was saved.
pub fn export_vector(
    surface: &RenderedSurface,
    sink: &dyn PresentationSink,
) -> Result<String, Error> {
    let markup = vector::serialize(surface);
    sink.save_file(VECTOR_FILENAME, markup.as_bytes())?;
    info!(file = VECTOR_FILENAME, bytes = markup.len(); "Exported vector diagram");
    Ok(markup)
}

/// Rasterizes the surface to a white-background PNG and saves it as
/// [`RASTER_FILENAME`].
///
/// Returns the encoded PNG bytes.
pub fn export_raster(
    surface: &RenderedSurface,
    sink: &dyn PresentationSink,
) -> Result<Vec<u8>, Error> {
    let markup = vector::serialize(surface);
    let png = raster::rasterize_png(&markup)?;
    sink.save_file(RASTER_FILENAME, &png)?;
    info!(file = RASTER_FILENAME, bytes = png.len(); "Exported raster diagram");
    Ok(png)
}

/// Wraps the surface's serialization in a self-contained HTML page and
/// hands it to the sink. The page is a one-time snapshot.
pub fn open_view(
    surface: &RenderedSurface,
    sink: &dyn PresentationSink,
    title: &str,
) -> Result<(), Error> {
    let html = page::standalone_page(title, &vector::serialize(surface));
    sink.open_view(title, &html)?;
    info!(title; "Opened diagram view");
    Ok(())
}

#[cfg(test)]
mod tests {
    use scrawl_core::{
        geometry::{Point, Size},
        surface::{Element, ElementRole, Primitive, ViewTransform},
    };

    use super::*;

    fn sample_surface() -> RenderedSurface {
        let mut surface = RenderedSurface::new();
        surface.push(Element::new(
            Primitive::Rectangle {
                origin: Point::new(0.0, 0.0),
                size: Size::new(120.0, 40.0),
                corner_radius: 0.0,
            },
            ElementRole::Shape,
        ));
        surface.push(
            Element::new(
                Primitive::Path {
                    data: "M 120 20 L 180 20".to_string(),
                },
                ElementRole::Connector,
            )
            .with_arrow_marker(),
        );
        surface.push(Element::new(
            Primitive::Text {
                anchor: Point::new(60.0, 20.0),
                content: "node".to_string(),
            },
            ElementRole::Label,
        ));
        surface
    }

    #[test]
    fn test_export_vector_is_idempotent() {
        let surface = sample_surface();
        let sink = MemorySink::new();

        let first = export_vector(&surface, &sink).unwrap();
        let second = export_vector(&surface, &sink).unwrap();

        assert_eq!(first, second);
        assert_eq!(sink.file(VECTOR_FILENAME).unwrap(), first.as_bytes());
    }

    #[test]
    fn test_export_raster_produces_png() {
        let surface = sample_surface();
        let sink = MemorySink::new();

        let png = export_raster(&surface, &sink).unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(sink.file(RASTER_FILENAME).unwrap(), png);
    }

    #[test]
    fn test_hidden_elements_are_skipped() {
        let mut surface = sample_surface();
        let watermark = surface.push(Element::new(
            Primitive::Text {
                anchor: Point::new(100.0, 100.0),
                content: "watermark".to_string(),
            },
            ElementRole::Branding,
        ));
        surface
            .element_mut(watermark)
            .unwrap()
            .set_hidden(true);

        let markup = serialize(&surface);
        assert!(!markup.contains("watermark"));
    }

    #[test]
    fn test_view_transform_on_root_group() {
        let mut surface = sample_surface();
        surface.set_view_transform(Some(ViewTransform::new(2.0, 5.0, -3.0)));

        let markup = serialize(&surface);
        assert!(markup.contains("translate(5 -3) scale(2)"));
    }

    #[test]
    fn test_open_view_wraps_markup_in_page() {
        let surface = sample_surface();
        let sink = MemorySink::new();

        open_view(&surface, &sink, "My Diagram").unwrap();

        let views = sink.views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].0, "My Diagram");
        assert!(views[0].1.contains("<svg"));
        assert!(views[0].1.contains("<title>My Diagram</title>"));
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let directory = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(directory.path());
        let surface = sample_surface();

        export_vector(&surface, &sink).unwrap();

        let written = std::fs::read_to_string(directory.path().join(VECTOR_FILENAME)).unwrap();
        assert!(written.contains("<svg"));
    }

    #[test]
    fn test_view_slug() {
        assert_eq!(slug("My Diagram!"), "my-diagram-");
        assert_eq!(slug(""), "view");
    }
}
