//! Hand-drawn sketch synthesis.
//!
//! Converts surface primitives into rough, hand-drawn-looking strokes.
//! Geometry is preserved — only the rendering style changes. Each eligible
//! primitive maps to a sketch path built from its own geometry:
//!
//! | primitive | sketch geometry source |
//! |-----------|------------------------|
//! | rectangle | x, y, width, height |
//! | circle | center, diameter |
//! | ellipse | center, 2·rx, 2·ry |
//! | polygon | ordered vertex list |
//! | path | existing path-data commands (arrow markers included) |
//!
//! Two mutually exclusive modes exist, selected by notation:
//!
//! - **Overlay** (Process): sketch paths are appended to the dedicated
//!   overlay layer on top of the surface, originals intact. Removal drops
//!   the overlay layer and is fully reversible.
//! - **Replace** (Graph): the sketch path substitutes the original
//!   primitive in place. Removal requires a full new render cycle, since
//!   the original primitive no longer exists.
//!
//! Unsupported primitive kinds (text) are left unmodified; a diagnostic is
//! recorded, not an error. Each element's jitter is seeded from its id, so
//! re-applying after a clear reproduces the same strokes.

use log::{debug, warn};
use rand::{RngExt, SeedableRng, rngs::StdRng};

use scrawl_core::{
    color::Color,
    geometry::Point,
    layer::RenderLayer,
    path::{PathCommand, emit_path_data, parse_path_data},
    surface::{Element, ElementId, Primitive, RenderedSurface},
};

use crate::source::Notation;

/// Samples per pass when approximating an ellipse as a polyline.
const ELLIPSE_STEPS: usize = 16;

/// Samples used to approximate curved shapes for hachure clipping.
const HACHURE_SHAPE_STEPS: usize = 24;

/// Bow scale: quadratic bow grows with segment length over this divisor.
const BOW_LENGTH_DIVISOR: f32 = 200.0;

/// How the sketch output attaches to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchMode {
    /// Append artifacts to the overlay layer, originals intact.
    Overlay,
    /// Substitute artifacts for the originals, in place.
    Replace,
}

impl SketchMode {
    /// The mode used for a notation: overlay for Process, replace for
    /// Graph.
    pub fn for_notation(notation: Notation) -> Self {
        match notation {
            Notation::Process => Self::Overlay,
            Notation::Graph => Self::Replace,
        }
    }
}

/// Hatched fill texture parameters (replace mode only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HachureOptions {
    angle_degrees: f32,
    gap: f32,
}

impl HachureOptions {
    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }
}

/// Style parameters for sketch synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchOptions {
    roughness: f32,
    bowing: f32,
    hachure: Option<HachureOptions>,
    default_fill: Option<Color>,
}

impl SketchOptions {
    /// Overlay-mode preset: higher roughness and bowing, no texture fill.
    pub fn overlay() -> Self {
        Self {
            roughness: 2.8,
            bowing: 1.5,
            hachure: None,
            default_fill: None,
        }
    }

    /// Replace-mode preset: lower roughness and bowing, angled hachure
    /// fill, pale default fill for elements that had none.
    pub fn replace() -> Self {
        Self {
            roughness: 1.5,
            bowing: 1.0,
            hachure: Some(HachureOptions {
                angle_degrees: 120.0,
                gap: 3.0,
            }),
            default_fill: Some(Color::new("skyblue").expect("'skyblue' is a valid CSS color")),
        }
    }

    /// The preset for a mode.
    pub fn for_mode(mode: SketchMode) -> Self {
        match mode {
            SketchMode::Overlay => Self::overlay(),
            SketchMode::Replace => Self::replace(),
        }
    }
}

/// A primitive the sketch engine skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchDiagnostic {
    element: ElementId,
    kind: &'static str,
}

impl SketchDiagnostic {
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The primitive kind that had no sketch mapping.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

/// Result of one sketch pass over a surface.
#[derive(Debug, Default)]
pub struct SketchOutcome {
    sketched: usize,
    diagnostics: Vec<SketchDiagnostic>,
}

impl SketchOutcome {
    /// Number of primitives that received a sketch equivalent.
    pub fn sketched(&self) -> usize {
        self.sketched
    }

    /// Primitives skipped for lack of a mapping.
    pub fn diagnostics(&self) -> &[SketchDiagnostic] {
        &self.diagnostics
    }
}

/// Result of removing sketch output from a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchRemoval {
    /// Overlay artifacts were dropped; the surface is back to its
    /// pre-sketch state.
    Removed(usize),
    /// Replace-mode output cannot be reversed in place; the caller must
    /// start a full new render cycle.
    RequiresRerender,
}

/// Applies the sketch transform to every eligible primitive.
///
/// The surface must not already carry sketch output for this mode; the
/// lifecycle clears prior output before re-applying. Overlay artifacts
/// present on the surface are never sketched again.
pub fn apply_sketch(surface: &mut RenderedSurface, mode: SketchMode, seed: u64) -> SketchOutcome {
    let options = SketchOptions::for_mode(mode);
    let mut outcome = SketchOutcome::default();

    for id in surface.element_ids() {
        let element = surface
            .element(id)
            .expect("snapshot ids are present during the pass");

        if element.is_hidden() || element.sketch_of().is_some() {
            continue;
        }

        let mut rng = element_rng(seed, id);
        let sketched = match synthesize(element.primitive(), &options, &mut rng) {
            Synthesis::Sketch(commands) => commands,
            Synthesis::Keep => continue,
            Synthesis::Unsupported(kind) => {
                debug!(element = id.to_string(), kind; "No sketch mapping for primitive");
                outcome.diagnostics.push(SketchDiagnostic { element: id, kind });
                continue;
            }
        };
        let data = emit_path_data(&sketched);

        match mode {
            SketchMode::Overlay => {
                let source = surface.element(id).expect("element still present");
                let stroke = source.stroke().unwrap_or_default();
                let artifact = Element::new(
                    Primitive::Path { data },
                    source.role(),
                )
                .with_layer(RenderLayer::SketchOverlay)
                .with_sketch_of(id)
                .with_stroke(stroke);
                surface.push(artifact);
            }
            SketchMode::Replace => {
                let element = surface.element_mut(id).expect("element still present");
                element.replace_primitive(Primitive::Path { data });
                if element.stroke().is_none() {
                    element.set_stroke(Some(Color::default()));
                }
                if element.fill().is_none() {
                    element.set_fill(options.default_fill);
                }
            }
        }
        outcome.sketched += 1;
    }

    if !outcome.diagnostics.is_empty() {
        warn!(
            skipped = outcome.diagnostics.len();
            "Sketch transform skipped primitives without a mapping"
        );
    }

    outcome
}

/// Removes sketch output from the surface.
pub fn remove_sketch(surface: &mut RenderedSurface, mode: SketchMode) -> SketchRemoval {
    match mode {
        SketchMode::Overlay => SketchRemoval::Removed(surface.remove_layer(RenderLayer::SketchOverlay)),
        SketchMode::Replace => SketchRemoval::RequiresRerender,
    }
}

fn element_rng(seed: u64, id: ElementId) -> StdRng {
    StdRng::seed_from_u64(seed ^ id.value().wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

enum Synthesis {
    Sketch(Vec<PathCommand>),
    /// The element stays untouched (path data the jitter pass cannot
    /// re-coordinate).
    Keep,
    Unsupported(&'static str),
}

/// Maps one primitive to its sketch commands.
fn synthesize(primitive: &Primitive, options: &SketchOptions, rng: &mut StdRng) -> Synthesis {
    let commands = match primitive {
        Primitive::Rectangle { origin, size, .. } => {
            let corners = vec![
                *origin,
                Point::new(origin.x() + size.width(), origin.y()),
                Point::new(origin.x() + size.width(), origin.y() + size.height()),
                Point::new(origin.x(), origin.y() + size.height()),
            ];
            sketch_closed_shape(&corners, options, rng)
        }
        Primitive::Circle { center, radius } => {
            let mut commands = rough_ellipse(*center, *radius, *radius, options, rng);
            commands.extend(hachure_for_ellipse(*center, *radius, *radius, options, rng));
            commands
        }
        Primitive::Ellipse { center, rx, ry } => {
            let mut commands = rough_ellipse(*center, *rx, *ry, options, rng);
            commands.extend(hachure_for_ellipse(*center, *rx, *ry, options, rng));
            commands
        }
        Primitive::Polygon { points } => sketch_closed_shape(points, options, rng),
        Primitive::Path { data } => match parse_path_data(data) {
            Ok(commands) => rough_path(&commands, options, rng),
            Err(err) => {
                // No coordinates to jitter; keep the original data intact
                debug!(error = err.to_string(); "Keeping unparsed path data as-is");
                return Synthesis::Keep;
            }
        },
        Primitive::Text { .. } => return Synthesis::Unsupported(primitive.kind_name()),
    };
    Synthesis::Sketch(commands)
}

/// Sketches a closed vertex list: jittered double-stroke edges plus the
/// hachure fill when the options ask for one.
fn sketch_closed_shape(
    points: &[Point],
    options: &SketchOptions,
    rng: &mut StdRng,
) -> Vec<PathCommand> {
    let mut commands = rough_polygon(points, options, rng);
    if let Some(hachure) = options.hachure {
        commands.extend(hachure_lines(points, hachure, rng));
    }
    commands
}

fn jitter(rng: &mut StdRng, amount: f32) -> f32 {
    if amount <= 0.0 {
        return 0.0;
    }
    rng.random_range(-amount..amount)
}

fn jitter_point(point: Point, rng: &mut StdRng, amount: f32) -> Point {
    Point::new(point.x() + jitter(rng, amount), point.y() + jitter(rng, amount))
}

/// One hand-drawn line: two passes, each a quadratic with jittered
/// endpoints and a midpoint bowed away from the chord.
fn rough_line(a: Point, b: Point, options: &SketchOptions, rng: &mut StdRng) -> Vec<PathCommand> {
    let mut commands = Vec::with_capacity(4);
    let length = b.sub_point(a).hypot();
    let perpendicular = b.sub_point(a).perpendicular_unit();

    for pass in 0..2 {
        // The second pass hews closer to the true line
        let offset = options.roughness * if pass == 0 { 1.0 } else { 0.6 };

        let start = jitter_point(a, rng, offset);
        let end = jitter_point(b, rng, offset);

        let bow = options.bowing * length / BOW_LENGTH_DIVISOR * rng.random_range(-1.0..1.0f32);
        let control = jitter_point(
            start.midpoint(end).add_point(perpendicular.scale(bow)),
            rng,
            offset,
        );

        commands.push(PathCommand::MoveTo(start));
        commands.push(PathCommand::QuadTo(control, end));
    }

    commands
}

/// Sketches a closed polygon edge by edge.
fn rough_polygon(points: &[Point], options: &SketchOptions, rng: &mut StdRng) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    for (index, &point) in points.iter().enumerate() {
        let next = points[(index + 1) % points.len()];
        commands.extend(rough_line(point, next, options, rng));
    }
    commands
}

/// Sketches an ellipse as two jittered polyline passes.
fn rough_ellipse(
    center: Point,
    rx: f32,
    ry: f32,
    options: &SketchOptions,
    rng: &mut StdRng,
) -> Vec<PathCommand> {
    let mut commands = Vec::new();

    for pass in 0..2 {
        let offset = options.roughness * if pass == 0 { 1.0 } else { 0.6 };
        let phase: f32 = rng.random_range(0.0..std::f32::consts::TAU);

        let mut first = None;
        for step in 0..ELLIPSE_STEPS {
            let angle = phase + step as f32 / ELLIPSE_STEPS as f32 * std::f32::consts::TAU;
            let point = Point::new(
                center.x() + (rx + jitter(rng, offset)) * angle.cos(),
                center.y() + (ry + jitter(rng, offset)) * angle.sin(),
            );
            match first {
                None => {
                    first = Some(point);
                    commands.push(PathCommand::MoveTo(point));
                }
                Some(_) => commands.push(PathCommand::LineTo(point)),
            }
        }
        if let Some(first) = first {
            commands.push(PathCommand::LineTo(first));
        }
    }

    commands
}

/// Re-draws existing path commands with sketch jitter. Line segments get
/// the full double-stroke treatment; curves keep their control points with
/// mild endpoint jitter.
fn rough_path(
    original: &[PathCommand],
    options: &SketchOptions,
    rng: &mut StdRng,
) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut cursor = Point::default();

    for command in original {
        match *command {
            PathCommand::MoveTo(point) => {
                cursor = point;
                commands.push(PathCommand::MoveTo(jitter_point(point, rng, options.roughness)));
            }
            PathCommand::LineTo(point) => {
                commands.extend(rough_line(cursor, point, options, rng));
                cursor = point;
            }
            PathCommand::QuadTo(control, point) => {
                commands.push(PathCommand::QuadTo(
                    jitter_point(control, rng, options.roughness),
                    jitter_point(point, rng, options.roughness),
                ));
                cursor = point;
            }
            PathCommand::CubicTo(control1, control2, point) => {
                commands.push(PathCommand::CubicTo(
                    jitter_point(control1, rng, options.roughness),
                    jitter_point(control2, rng, options.roughness),
                    jitter_point(point, rng, options.roughness),
                ));
                cursor = point;
            }
            PathCommand::Close => commands.push(PathCommand::Close),
        }
    }

    commands
}

/// Hachure fill for elliptical shapes: clip lines against a sampled
/// polygon approximation.
fn hachure_for_ellipse(
    center: Point,
    rx: f32,
    ry: f32,
    options: &SketchOptions,
    rng: &mut StdRng,
) -> Vec<PathCommand> {
    let Some(hachure) = options.hachure else {
        return Vec::new();
    };
    let polygon: Vec<Point> = (0..HACHURE_SHAPE_STEPS)
        .map(|step| {
            let angle = step as f32 / HACHURE_SHAPE_STEPS as f32 * std::f32::consts::TAU;
            Point::new(center.x() + rx * angle.cos(), center.y() + ry * angle.sin())
        })
        .collect();
    hachure_lines(&polygon, hachure, rng)
}

/// Computes angled hatch lines clipped to a polygon.
///
/// The polygon is rotated so the hatch direction becomes horizontal,
/// scanned with horizontal lines at the gap spacing, and each clipped
/// segment is rotated back. Even-odd pairing of the edge intersections
/// handles non-convex outlines.
fn hachure_lines(
    polygon: &[Point],
    options: HachureOptions,
    rng: &mut StdRng,
) -> Vec<PathCommand> {
    if polygon.len() < 3 {
        return Vec::new();
    }

    let angle = options.angle_degrees.to_radians();
    let (sin, cos) = angle.sin_cos();
    let rotate = |p: Point| Point::new(p.x() * cos + p.y() * sin, -p.x() * sin + p.y() * cos);
    let rotate_back = |p: Point| Point::new(p.x() * cos - p.y() * sin, p.x() * sin + p.y() * cos);

    let rotated: Vec<Point> = polygon.iter().map(|&p| rotate(p)).collect();

    let min_y = rotated.iter().map(|p| p.y()).fold(f32::INFINITY, f32::min);
    let max_y = rotated.iter().map(|p| p.y()).fold(f32::NEG_INFINITY, f32::max);

    let mut commands = Vec::new();
    let mut y = min_y + options.gap / 2.0;

    while y < max_y {
        // Intersect the scanline with every polygon edge
        let mut crossings = Vec::new();
        for (index, &point) in rotated.iter().enumerate() {
            let next = rotated[(index + 1) % rotated.len()];
            let (y0, y1) = (point.y(), next.y());
            if (y0 <= y && y1 > y) || (y1 <= y && y0 > y) {
                let t = (y - y0) / (y1 - y0);
                crossings.push(point.x() + t * (next.x() - point.x()));
            }
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).expect("crossings are finite"));

        for pair in crossings.chunks_exact(2) {
            let start = rotate_back(Point::new(pair[0], y));
            let end = rotate_back(Point::new(pair[1], y));
            // A light wobble keeps the hatching hand-drawn
            commands.push(PathCommand::MoveTo(jitter_point(start, rng, 0.5)));
            commands.push(PathCommand::LineTo(jitter_point(end, rng, 0.5)));
        }

        y += options.gap;
    }

    commands
}
