//! Layer-based rendering system for SVG output.
//!
//! This module provides a type-safe layer system so surface serialization
//! can emit SVG elements in a fixed z-order regardless of the order elements
//! were added to the surface.
//!
//! # Overview
//!
//! - [`RenderLayer`]: An enum defining available rendering layers in order
//! - [`LayeredOutput`]: A structure for collecting SVG nodes by layer
//!
//! The sketch overlay is the topmost layer: overlay-mode sketch artifacts
//! always render above the primitives they were derived from.

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Defines the rendering layers for SVG output.
///
/// Layers are rendered from bottom to top in the order defined by variant
/// declaration. The `Ord` derive uses declaration order, so the first
/// variant renders first (bottom) and the last renders last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Background fills - renders first
    Background,
    /// Main diagram shapes - default layer
    Content,
    /// Connectors and flow arrows between shapes
    Connector,
    /// Text labels
    Label,
    /// Overlay-mode sketch artifacts - renders last, on top
    SketchOverlay,
}

impl RenderLayer {
    /// Returns a human-readable name for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Content => "content",
            Self::Connector => "connector",
            Self::Label => "label",
            Self::SketchOverlay => "sketch-overlay",
        }
    }
}

/// Represents SVG nodes grouped by rendering layer.
///
/// This struct collects SVG nodes and organizes them by layer. When
/// rendered, nodes are emitted in layer order (bottom to top), ensuring
/// correct z-ordering.
///
/// # Example
///
/// ```
/// # use scrawl_core::layer::{RenderLayer, LayeredOutput};
/// # use svg::node::element::Rectangle;
///
/// let mut output = LayeredOutput::new();
///
/// output.add_to_layer(RenderLayer::SketchOverlay, Box::new(Rectangle::new()));
/// output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
///
/// // Content renders before the sketch overlay regardless of add order
/// let svg_nodes = output.render();
/// assert_eq!(svg_nodes.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    ///
    /// Nodes are appended to the layer in the order they are added.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes an SVG `<g>` element with a
    /// `data-layer` attribute identifying the layer. Empty layers are
    /// skipped. Layers are rendered from bottom to top based on the `Ord`
    /// implementation of `RenderLayer`.
    pub fn render(mut self) -> Vec<SvgNode> {
        // Stable sort keeps insertion order within a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut batches: Vec<(RenderLayer, Vec<SvgNode>)> = Vec::new();
        for (layer, node) in self.items {
            match batches.last_mut() {
                Some((current, nodes)) if *current == layer => nodes.push(node),
                _ => batches.push((layer, vec![node])),
            }
        }

        batches
            .into_iter()
            .map(|(layer, nodes)| {
                let mut group = svg_element::Group::new().set("data-layer", layer.name());
                for node in nodes {
                    group = group.add(node);
                }
                Box::new(group) as SvgNode
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::Rectangle;

    #[test]
    fn test_layered_output_new() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
    }

    #[test]
    fn test_layered_output_add_to_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
        assert!(!output.is_empty());
    }

    #[test]
    fn test_layered_output_render_groups_per_layer() {
        let mut output = LayeredOutput::new();

        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Connector, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::SketchOverlay, Box::new(Rectangle::new()));

        let svg_nodes = output.render();
        assert_eq!(svg_nodes.len(), 3);
    }

    #[test]
    fn test_layered_output_render_merges_same_layer() {
        let mut output = LayeredOutput::new();

        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));

        let svg_nodes = output.render();
        assert_eq!(svg_nodes.len(), 1);
    }

    #[test]
    fn test_sketch_overlay_renders_last() {
        let mut output = LayeredOutput::new();

        output.add_to_layer(RenderLayer::SketchOverlay, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Background, Box::new(Rectangle::new()));

        let svg_nodes = output.render();
        let rendered: Vec<String> = svg_nodes.iter().map(|node| node.to_string()).collect();

        assert!(rendered[0].contains("data-layer=\"background\""));
        assert!(rendered[1].contains("data-layer=\"sketch-overlay\""));
    }
}
