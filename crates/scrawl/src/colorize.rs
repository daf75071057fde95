//! Category-driven colorization of Process-notation surfaces.
//!
//! Every element is matched against the category taxonomy in fixed
//! priority order — Task, then Event, then Gateway; first match wins.
//! A matched element gets its category's configured fill and a fixed dark
//! outline; an unmatched element keeps its default styling untouched.
//!
//! Elements added after the initial pass (process editors allow live
//! additions) arrive through the lifecycle's notification channel and are
//! recolorized individually, one scheduler tick after insertion, so the
//! element's visual subtree exists before styling is applied.

use log::debug;

use scrawl_core::{
    color::Color,
    surface::{Element, ElementCategory, ElementId, RenderedSurface},
};

use crate::config::CategoryColors;

/// The fixed outline color applied to every categorized element.
fn outline_color() -> Color {
    Color::new("#000").expect("'#000' is a valid CSS color")
}

/// Returns the configured fill for an element, in fixed priority order.
///
/// `Generic` elements (and everything in Graph notation) match nothing.
fn category_fill(element: &Element, colors: &CategoryColors) -> Option<Color> {
    match element.category() {
        ElementCategory::Task => Some(colors.task()),
        ElementCategory::Event => Some(colors.event()),
        ElementCategory::Gateway => Some(colors.gateway()),
        ElementCategory::Generic => None,
    }
}

/// Applies category colors to a single element.
///
/// Returns `true` when the element was categorized and styled.
pub fn colorize_element(element: &mut Element, colors: &CategoryColors) -> bool {
    match category_fill(element, colors) {
        Some(fill) => {
            element.set_fill(Some(fill));
            element.set_stroke(Some(outline_color()));
            true
        }
        None => false,
    }
}

/// Applies category colors to every element of the surface.
///
/// Returns the number of elements styled.
pub fn colorize_surface(surface: &mut RenderedSurface, colors: &CategoryColors) -> usize {
    let mut styled = 0;
    for element in surface.elements_mut() {
        if colorize_element(element, colors) {
            styled += 1;
        }
    }
    debug!(styled; "Colorized surface");
    styled
}

/// Applies category colors to one late-added element, by id.
///
/// Missing ids are ignored: the element may belong to a surface that was
/// superseded between notification and this deferred pass.
pub fn colorize_added_element(
    surface: &mut RenderedSurface,
    id: ElementId,
    colors: &CategoryColors,
) {
    if let Some(element) = surface.element_mut(id) {
        let styled = colorize_element(element, colors);
        debug!(element = id.to_string(), styled; "Colorized added element");
    }
}
