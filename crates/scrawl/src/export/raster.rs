//! PNG rasterization of serialized vector output.
//!
//! The vector markup is re-parsed rather than rendered from the surface
//! directly, so the raster image is guaranteed to match what a vector
//! export of the same surface shows.

use log::debug;
use resvg::{tiny_skia, usvg};

use super::Error;

/// Rasterizes SVG markup to PNG bytes at its intrinsic size.
///
/// The canvas is filled white before rendering; SVG has no background, and
/// a transparent PNG reads as black in many viewers.
///
/// # Errors
///
/// Fails when the markup does not parse, the intrinsic size is zero, or
/// PNG encoding fails.
pub fn rasterize_png(markup: &str) -> Result<Vec<u8>, Error> {
    let tree = usvg::Tree::from_str(markup, &usvg::Options::default())?;

    let size = tree.size().to_int_size();
    let mut pixmap =
        tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(Error::EmptyCanvas)?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    debug!(width = size.width(), height = size.height(); "Rasterized surface");

    pixmap
        .encode_png()
        .map_err(|err| Error::PngEncode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect x="0" y="0" width="20" height="10" fill="red"/>
    </svg>"#;

    #[test]
    fn test_rasterize_minimal_markup() {
        let png = rasterize_png(MINIMAL).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        assert!(matches!(
            rasterize_png("not svg at all"),
            Err(Error::SvgParse(_))
        ));
    }
}
