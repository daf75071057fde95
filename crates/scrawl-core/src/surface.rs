//! The rendered surface model.
//!
//! A [`RenderedSurface`] is the geometric output of one completed render
//! cycle: an insertion-ordered registry of [`Element`]s, each wrapping one
//! drawing [`Primitive`] with styling, a z-order layer, and an optional
//! semantic category. Surfaces are produced fresh by a layout engine every
//! cycle and wholly discarded when superseded — they are never diffed.
//!
//! Sketch artifacts are ordinary elements: overlay-mode artifacts live on
//! [`RenderLayer::SketchOverlay`] with [`Element::sketch_of`] pointing at
//! the element they were derived from, and are removed by dropping that
//! layer. Replace-mode artifacts substitute the original primitive in
//! place, keeping the element id.

use indexmap::IndexMap;
use log::debug;

use crate::{
    color::Color,
    geometry::{Bounds, Point, Size},
    layer::RenderLayer,
    path::{self, PathDataError},
};

/// Margin added around the merged element bounds when computing the
/// intrinsic surface bounds.
const BOUNDS_MARGIN: f32 = 10.0;

/// Approximate glyph advance used to size text bounds. Labels do not
/// participate in layout, so a fixed metric is sufficient.
const TEXT_ADVANCE: f32 = 7.2;
const TEXT_HEIGHT: f32 = 14.0;

/// Identifier of an element within one surface.
///
/// Ids are assigned by the surface on insertion and are unique within that
/// surface only; a superseding render cycle starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Returns the raw id value, used to derive per-element sketch seeds.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Semantic classification of a Process-notation element.
///
/// The category is resolved once, when the layout engine creates the
/// element, and drives the fill color during colorization. It is
/// meaningless for Graph notation, where every element is `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    Task,
    Event,
    Gateway,
    Generic,
}

/// Structural role of an element on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// A diagram node shape
    Shape,
    /// A connector or flow arrow between shapes
    Connector,
    /// A text label
    Label,
    /// Third-party branding overlay, hidden after render
    Branding,
}

/// One geometric drawing unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rectangle {
        origin: Point,
        size: Size,
        corner_radius: f32,
    },
    Circle {
        center: Point,
        radius: f32,
    },
    Ellipse {
        center: Point,
        rx: f32,
        ry: f32,
    },
    Polygon {
        points: Vec<Point>,
    },
    Path {
        data: String,
    },
    Text {
        anchor: Point,
        content: String,
    },
}

impl Primitive {
    /// Parses a polygon from an SVG point string such as
    /// `"10,0 20,10 10,20 0,10"`.
    ///
    /// # Errors
    ///
    /// Returns an error when a coordinate pair is malformed or fewer than
    /// three vertices are present.
    pub fn polygon_from_point_string(points: &str) -> Result<Self, String> {
        let mut parsed = Vec::new();
        for pair in points.split_whitespace() {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| format!("malformed point `{pair}`"))?;
            let x: f32 = x.trim().parse().map_err(|_| format!("malformed point `{pair}`"))?;
            let y: f32 = y.trim().parse().map_err(|_| format!("malformed point `{pair}`"))?;
            parsed.push(Point::new(x, y));
        }
        if parsed.len() < 3 {
            return Err(format!(
                "polygon needs at least 3 vertices, got {}",
                parsed.len()
            ));
        }
        Ok(Self::Polygon { points: parsed })
    }

    /// Returns the name of this primitive kind, for logs and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
            Self::Polygon { .. } => "polygon",
            Self::Path { .. } => "path",
            Self::Text { .. } => "text",
        }
    }

    /// Computes the bounding box of this primitive.
    ///
    /// Path bounds are derived from the parsed command coordinates; control
    /// points are included, which slightly over-approximates curved
    /// strokes. A path whose data cannot be parsed reports a degenerate
    /// bounds at the origin.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Rectangle { origin, size, .. } => Bounds::from_origin_size(*origin, *size),
            Self::Circle { center, radius } => {
                Bounds::from_center_size(*center, Size::new(radius * 2.0, radius * 2.0))
            }
            Self::Ellipse { center, rx, ry } => {
                Bounds::from_center_size(*center, Size::new(rx * 2.0, ry * 2.0))
            }
            Self::Polygon { points } => bounds_of_points(points.iter().copied()),
            Self::Path { data } => match path_points(data) {
                Ok(points) => bounds_of_points(points.into_iter()),
                Err(_) => Bounds::default(),
            },
            Self::Text { anchor, content } => {
                let width = content.chars().count() as f32 * TEXT_ADVANCE;
                Bounds::from_center_size(
                    Point::new(anchor.x(), anchor.y() - TEXT_HEIGHT / 2.0),
                    Size::new(width, TEXT_HEIGHT),
                )
            }
        }
    }
}

fn path_points(data: &str) -> Result<Vec<Point>, PathDataError> {
    let commands = path::parse_path_data(data)?;
    Ok(commands.iter().flat_map(|command| command.points()).collect())
}

fn bounds_of_points(points: impl Iterator<Item = Point>) -> Bounds {
    let mut bounds: Option<Bounds> = None;
    for point in points {
        let point_bounds = Bounds::new(point, point);
        bounds = Some(match bounds {
            Some(existing) => existing.merge(&point_bounds),
            None => point_bounds,
        });
    }
    bounds.unwrap_or_default()
}

/// One element of a rendered surface: a primitive plus styling and
/// semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    primitive: Primitive,
    role: ElementRole,
    category: ElementCategory,
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: Option<f32>,
    layer: RenderLayer,
    hidden: bool,
    sketch_of: Option<ElementId>,
    arrow_marker: bool,
}

impl Element {
    /// Creates a new element for the given primitive and role.
    ///
    /// The id is a placeholder until the element is pushed onto a surface;
    /// the category defaults to `Generic`, the layer to the role's natural
    /// layer.
    pub fn new(primitive: Primitive, role: ElementRole) -> Self {
        let layer = match role {
            ElementRole::Shape | ElementRole::Branding => RenderLayer::Content,
            ElementRole::Connector => RenderLayer::Connector,
            ElementRole::Label => RenderLayer::Label,
        };
        Self {
            id: ElementId(0),
            primitive,
            role,
            category: ElementCategory::Generic,
            fill: None,
            stroke: None,
            stroke_width: None,
            layer,
            hidden: false,
            sketch_of: None,
            arrow_marker: false,
        }
    }

    /// Sets the semantic category, resolved at element creation.
    pub fn with_category(mut self, category: ElementCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the fill color.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Sets the stroke color.
    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Sets the stroke width.
    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Moves the element to the given render layer.
    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Marks this element as a sketch artifact derived from `source`.
    pub fn with_sketch_of(mut self, source: ElementId) -> Self {
        self.sketch_of = Some(source);
        self
    }

    /// Marks this element as carrying an arrowhead marker.
    pub fn with_arrow_marker(mut self) -> Self {
        self.arrow_marker = true;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Substitutes the primitive in place, keeping id and styling.
    /// Used by the replace-mode sketch transform.
    pub fn replace_primitive(&mut self, primitive: Primitive) {
        self.primitive = primitive;
    }

    pub fn role(&self) -> ElementRole {
        self.role
    }

    pub fn category(&self) -> ElementCategory {
        self.category
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn set_fill(&mut self, fill: Option<Color>) {
        self.fill = fill;
    }

    pub fn stroke(&self) -> Option<Color> {
        self.stroke
    }

    pub fn set_stroke(&mut self, stroke: Option<Color>) {
        self.stroke = stroke;
    }

    pub fn stroke_width(&self) -> Option<f32> {
        self.stroke_width
    }

    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Hides the element from serialization without removing it.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Returns the source element id when this is an overlay sketch
    /// artifact.
    pub fn sketch_of(&self) -> Option<ElementId> {
        self.sketch_of
    }

    pub fn has_arrow_marker(&self) -> bool {
        self.arrow_marker
    }

    pub fn bounds(&self) -> Bounds {
        self.primitive.bounds()
    }
}

/// Pan/zoom viewport transform applied to the surface root on
/// serialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f32,
    tx: f32,
    ty: f32,
}

impl ViewTransform {
    pub fn new(scale: f32, tx: f32, ty: f32) -> Self {
        Self { scale, tx, ty }
    }

    /// Identity transform: no pan, 1:1 zoom.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn scale(self) -> f32 {
        self.scale
    }

    pub fn tx(self) -> f32 {
        self.tx
    }

    pub fn ty(self) -> f32 {
        self.ty
    }

    /// Returns the SVG `transform` attribute value for this transform.
    pub fn to_svg_attribute(self) -> String {
        format!("translate({} {}) scale({})", self.tx, self.ty, self.scale)
    }
}

/// The geometric output of one completed render cycle.
///
/// # Examples
///
/// ```
/// # use scrawl_core::surface::{Element, ElementRole, Primitive, RenderedSurface};
/// # use scrawl_core::geometry::{Point, Size};
/// let mut surface = RenderedSurface::new();
/// let id = surface.push(Element::new(
///     Primitive::Rectangle {
///         origin: Point::new(0.0, 0.0),
///         size: Size::new(120.0, 40.0),
///         corner_radius: 0.0,
///     },
///     ElementRole::Shape,
/// ));
/// assert!(surface.element(id).is_some());
/// assert_eq!(surface.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RenderedSurface {
    elements: IndexMap<ElementId, Element>,
    next_id: u64,
    view_transform: Option<ViewTransform>,
}

impl RenderedSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element, assigning its id. Insertion order is the z-order
    /// within the element's layer.
    pub fn push(&mut self, mut element: Element) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        element.id = id;
        self.elements.insert(id, element);
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Iterates elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.values_mut()
    }

    /// Ids of all elements, in insertion order.
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.elements.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Counts elements with the given role, hidden ones excluded.
    pub fn count_role(&self, role: ElementRole) -> usize {
        self.elements
            .values()
            .filter(|element| element.role() == role && !element.is_hidden())
            .count()
    }

    /// Removes every element on the given layer, preserving the order of
    /// the rest. Returns the number of removed elements.
    pub fn remove_layer(&mut self, layer: RenderLayer) -> usize {
        let before = self.elements.len();
        self.elements.retain(|_, element| element.layer() != layer);
        let removed = before - self.elements.len();
        if removed > 0 {
            debug!(layer = layer.name(), removed; "Removed surface layer");
        }
        removed
    }

    /// The intrinsic bounds of the surface: the merge of all visible
    /// element bounds plus a fixed margin.
    pub fn intrinsic_bounds(&self) -> Bounds {
        let mut bounds: Option<Bounds> = None;
        for element in self.elements.values() {
            if element.is_hidden() {
                continue;
            }
            let element_bounds = element.bounds();
            bounds = Some(match bounds {
                Some(existing) => existing.merge(&element_bounds),
                None => element_bounds,
            });
        }
        bounds.unwrap_or_default().expand(BOUNDS_MARGIN)
    }

    pub fn view_transform(&self) -> Option<ViewTransform> {
        self.view_transform
    }

    pub fn set_view_transform(&mut self, transform: Option<ViewTransform>) {
        self.view_transform = transform;
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn rectangle(x: f32, y: f32, w: f32, h: f32) -> Primitive {
        Primitive::Rectangle {
            origin: Point::new(x, y),
            size: Size::new(w, h),
            corner_radius: 0.0,
        }
    }

    #[test]
    fn test_push_assigns_distinct_ids() {
        let mut surface = RenderedSurface::new();
        let a = surface.push(Element::new(rectangle(0.0, 0.0, 10.0, 10.0), ElementRole::Shape));
        let b = surface.push(Element::new(rectangle(20.0, 0.0, 10.0, 10.0), ElementRole::Shape));
        assert_ne!(a, b);
        assert_eq!(surface.element(a).unwrap().id(), a);
    }

    #[test]
    fn test_polygon_from_point_string() {
        let polygon = Primitive::polygon_from_point_string("10,0 20,10 10,20 0,10").unwrap();
        match polygon {
            Primitive::Polygon { ref points } => {
                assert_eq!(points.len(), 4);
                assert_approx_eq!(f32, points[1].x(), 20.0);
            }
            ref other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_polygon_from_point_string_rejects_malformed() {
        assert!(Primitive::polygon_from_point_string("10,0 20").is_err());
        assert!(Primitive::polygon_from_point_string("10,0 20,10").is_err());
    }

    #[test]
    fn test_primitive_bounds_circle() {
        let bounds = Primitive::Circle {
            center: Point::new(50.0, 50.0),
            radius: 18.0,
        }
        .bounds();
        assert_approx_eq!(f32, bounds.min().x(), 32.0);
        assert_approx_eq!(f32, bounds.max().y(), 68.0);
    }

    #[test]
    fn test_primitive_bounds_path() {
        let bounds = Primitive::Path {
            data: "M 0 10 L 100 40".to_string(),
        }
        .bounds();
        assert_approx_eq!(f32, bounds.min().y(), 10.0);
        assert_approx_eq!(f32, bounds.max().x(), 100.0);
    }

    #[test]
    fn test_remove_layer_only_touches_that_layer() {
        let mut surface = RenderedSurface::new();
        let base = surface.push(Element::new(rectangle(0.0, 0.0, 10.0, 10.0), ElementRole::Shape));
        surface.push(
            Element::new(
                Primitive::Path {
                    data: "M 0 0 L 10 10".to_string(),
                },
                ElementRole::Shape,
            )
            .with_layer(RenderLayer::SketchOverlay)
            .with_sketch_of(base),
        );

        assert_eq!(surface.len(), 2);
        assert_eq!(surface.remove_layer(RenderLayer::SketchOverlay), 1);
        assert_eq!(surface.len(), 1);
        assert!(surface.element(base).is_some());
    }

    #[test]
    fn test_intrinsic_bounds_skips_hidden() {
        let mut surface = RenderedSurface::new();
        surface.push(Element::new(rectangle(0.0, 0.0, 10.0, 10.0), ElementRole::Shape));
        let far = surface.push(Element::new(
            rectangle(500.0, 500.0, 10.0, 10.0),
            ElementRole::Branding,
        ));
        surface.element_mut(far).unwrap().set_hidden(true);

        let bounds = surface.intrinsic_bounds();
        assert!(bounds.max().x() < 100.0);
    }

    #[test]
    fn test_view_transform_attribute() {
        let transform = ViewTransform::new(2.0, 5.0, -3.0);
        assert_eq!(transform.to_svg_attribute(), "translate(5 -3) scale(2)");
    }
}
