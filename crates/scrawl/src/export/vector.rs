//! Surface-to-SVG serialization.
//!
//! Elements are collected into layer groups (z-order from the layer enum),
//! the pan/zoom view transform is applied to the root group, and hidden
//! elements are skipped entirely. The output is deterministic: element
//! iteration follows insertion order and the markup writer emits sorted
//! attributes.

use svg::Document;
use svg::node::element as svg_element;

use scrawl_core::{
    layer::{LayeredOutput, SvgNode},
    surface::{Element, Primitive, RenderedSurface},
};

const ARROW_MARKER_ID: &str = "arrowhead";
const DEFAULT_STROKE_WIDTH: f32 = 2.0;
const LABEL_FONT_SIZE: f32 = 12.0;

/// Serializes a surface to SVG markup.
pub fn serialize(surface: &RenderedSurface) -> String {
    document(surface).to_string()
}

fn document(surface: &RenderedSurface) -> Document {
    let bounds = surface.intrinsic_bounds();
    let size = bounds.size();

    let mut layers = LayeredOutput::new();
    for element in surface.elements().filter(|element| !element.is_hidden()) {
        layers.add_to_layer(element.layer(), element_node(element));
    }

    let mut root = svg_element::Group::new();
    if let Some(transform) = surface.view_transform() {
        root = root.set("transform", transform.to_svg_attribute());
    }
    for node in layers.render() {
        root = root.add(node);
    }

    Document::new()
        .set(
            "viewBox",
            (bounds.min().x(), bounds.min().y(), size.width(), size.height()),
        )
        .set("width", size.width())
        .set("height", size.height())
        .add(arrow_definitions())
        .add(root)
}

/// The shared arrowhead marker, referenced by connector paths.
fn arrow_definitions() -> svg_element::Definitions {
    svg_element::Definitions::new().add(
        svg_element::Marker::new()
            .set("id", ARROW_MARKER_ID)
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 7)
            .set("markerHeight", 7)
            .set("orient", "auto-start-reverse")
            .add(
                svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", "#000"),
            ),
    )
}

fn element_node(element: &Element) -> SvgNode {
    match element.primitive() {
        Primitive::Rectangle {
            origin,
            size,
            corner_radius,
        } => {
            let mut node = svg_element::Rectangle::new()
                .set("x", origin.x())
                .set("y", origin.y())
                .set("width", size.width())
                .set("height", size.height());
            if *corner_radius > 0.0 {
                node = node.set("rx", *corner_radius);
            }
            Box::new(style_shape(node, element))
        }
        Primitive::Circle { center, radius } => Box::new(style_shape(
            svg_element::Circle::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("r", *radius),
            element,
        )),
        Primitive::Ellipse { center, rx, ry } => Box::new(style_shape(
            svg_element::Ellipse::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("rx", *rx)
                .set("ry", *ry),
            element,
        )),
        Primitive::Polygon { points } => {
            let points: Vec<String> = points
                .iter()
                .map(|point| format!("{},{}", point.x(), point.y()))
                .collect();
            Box::new(style_shape(
                svg_element::Polygon::new().set("points", points.join(" ")),
                element,
            ))
        }
        Primitive::Path { data } => {
            let mut node = svg_element::Path::new().set("d", data.as_str());
            if element.has_arrow_marker() {
                node = node.set("marker-end", format!("url(#{ARROW_MARKER_ID})"));
            }
            Box::new(style_shape(node, element))
        }
        Primitive::Text { anchor, content } => Box::new(
            svg_element::Text::new(content.as_str())
                .set("x", anchor.x())
                .set("y", anchor.y())
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", LABEL_FONT_SIZE)
                .set("fill", &element.fill().unwrap_or_default()),
        ),
    }
}

/// Applies fill, stroke, and stroke width with the documented defaults:
/// black stroke, no fill.
fn style_shape<T: svg::Node>(mut node: T, element: &Element) -> T {
    match element.fill() {
        Some(fill) => node.assign("fill", &fill),
        None => node.assign("fill", "none"),
    }
    node.assign("stroke", &element.stroke().unwrap_or_default());
    node.assign(
        "stroke-width",
        element.stroke_width().unwrap_or(DEFAULT_STROKE_WIDTH),
    );
    node
}
