//! Built-in layout engine for the process-flow notation.
//!
//! One declaration per line: `task NAME`, `event NAME`, `gateway NAME`, or
//! `flow A -> B`; `#` starts a comment. Steps are laid out left-to-right
//! in declaration order. Every step's semantic category is resolved here,
//! at element creation, and tagged on the element; the colorization engine
//! only reads the tag.
//!
//! The surface also carries a branding watermark element, mirroring the
//! overlay the real process engine injects; the lifecycle controller hides
//! it after render.

use indexmap::IndexMap;
use log::debug;

use scrawl_core::{
    geometry::{Point, Size},
    surface::{Element, ElementCategory, ElementRole, Primitive, RenderedSurface},
};

use super::{DeferredJob, LayoutEngine, LayoutJob};
use crate::source::{DiagramSource, Notation};

const SLOT_WIDTH: f32 = 160.0;
const ROW_CENTER_Y: f32 = 100.0;
const MARGIN: f32 = 40.0;
const TASK_WIDTH: f32 = 100.0;
const TASK_HEIGHT: f32 = 60.0;
const TASK_CORNER_RADIUS: f32 = 8.0;
const EVENT_RADIUS: f32 = 18.0;
const GATEWAY_HALF_DIAGONAL: f32 = 25.0;

/// Layout engine for process listings.
#[derive(Debug, Default)]
pub struct ProcessEngine;

impl LayoutEngine for ProcessEngine {
    fn notation(&self) -> Notation {
        Notation::Process
    }

    fn start(&self, source: &DiagramSource) -> Box<dyn LayoutJob> {
        let text = source.text().to_string();
        Box::new(DeferredJob::new(move || {
            let parsed = parse(&text)?;
            build_surface(&parsed)
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    Task,
    Event,
    Gateway,
}

impl StepKind {
    fn category(self) -> ElementCategory {
        match self {
            Self::Task => ElementCategory::Task,
            Self::Event => ElementCategory::Event,
            Self::Gateway => ElementCategory::Gateway,
        }
    }
}

struct ParsedProcess {
    /// Steps in declaration order: (kind, name).
    steps: Vec<(StepKind, String)>,
    /// Flows as indices into `steps`.
    flows: Vec<(usize, usize)>,
}

fn parse(text: &str) -> Result<ParsedProcess, String> {
    let mut step_index: IndexMap<String, usize> = IndexMap::new();
    let mut steps = Vec::new();
    let mut flows = Vec::new();

    for line in text.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let (keyword, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| format!("malformed line `{line}`"))?;
        let rest = rest.trim();

        let kind = match keyword {
            "task" => Some(StepKind::Task),
            "event" => Some(StepKind::Event),
            "gateway" => Some(StepKind::Gateway),
            "flow" => None,
            other => return Err(format!("unknown keyword `{other}`")),
        };

        match kind {
            Some(kind) => {
                if rest.is_empty() {
                    return Err(format!("missing name in `{line}`"));
                }
                if step_index.contains_key(rest) {
                    return Err(format!("duplicate step `{rest}`"));
                }
                step_index.insert(rest.to_string(), steps.len());
                steps.push((kind, rest.to_string()));
            }
            None => {
                let (from, to) = rest
                    .split_once("->")
                    .ok_or_else(|| format!("malformed flow `{line}`: expected `flow A -> B`"))?;
                let from = lookup_step(&step_index, from.trim())?;
                let to = lookup_step(&step_index, to.trim())?;
                flows.push((from, to));
            }
        }
    }

    if steps.is_empty() {
        return Err("source declares no steps".to_string());
    }

    debug!(steps = steps.len(), flows = flows.len(); "Parsed process source");

    Ok(ParsedProcess { steps, flows })
}

fn lookup_step(index: &IndexMap<String, usize>, name: &str) -> Result<usize, String> {
    index
        .get(name)
        .copied()
        .ok_or_else(|| format!("flow references undeclared step `{name}`"))
}

/// Half the horizontal extent of a step's shape, used to trim flow paths
/// at shape boundaries.
fn half_extent(kind: StepKind) -> f32 {
    match kind {
        StepKind::Task => TASK_WIDTH / 2.0,
        StepKind::Event => EVENT_RADIUS,
        StepKind::Gateway => GATEWAY_HALF_DIAGONAL,
    }
}

fn build_surface(parsed: &ParsedProcess) -> Result<RenderedSurface, String> {
    let mut surface = RenderedSurface::new();
    let mut centers = Vec::with_capacity(parsed.steps.len());

    for (slot, (kind, name)) in parsed.steps.iter().enumerate() {
        let center = Point::new(
            MARGIN + slot as f32 * SLOT_WIDTH + SLOT_WIDTH / 2.0,
            ROW_CENTER_Y,
        );
        centers.push(center);

        let primitive = match kind {
            StepKind::Task => Primitive::Rectangle {
                origin: Point::new(center.x() - TASK_WIDTH / 2.0, center.y() - TASK_HEIGHT / 2.0),
                size: Size::new(TASK_WIDTH, TASK_HEIGHT),
                corner_radius: TASK_CORNER_RADIUS,
            },
            StepKind::Event => Primitive::Circle {
                center,
                radius: EVENT_RADIUS,
            },
            StepKind::Gateway => gateway_diamond(center)?,
        };

        surface.push(Element::new(primitive, ElementRole::Shape).with_category(kind.category()));
        surface.push(Element::new(
            Primitive::Text {
                anchor: Point::new(center.x(), center.y() + 55.0),
                content: name.clone(),
            },
            ElementRole::Label,
        ));
    }

    for &(from, to) in &parsed.flows {
        let (from_kind, _) = parsed.steps[from];
        let (to_kind, _) = parsed.steps[to];
        let direction = if centers[to].x() >= centers[from].x() {
            1.0
        } else {
            -1.0
        };
        let start = Point::new(
            centers[from].x() + direction * half_extent(from_kind),
            centers[from].y(),
        );
        let end = Point::new(
            centers[to].x() - direction * half_extent(to_kind),
            centers[to].y(),
        );

        surface.push(
            Element::new(
                Primitive::Path {
                    data: format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()),
                },
                ElementRole::Connector,
            )
            .with_arrow_marker(),
        );
    }

    // Watermark in the bottom-right corner, below the label row
    let bounds = surface.intrinsic_bounds();
    surface.push(Element::new(
        Primitive::Text {
            anchor: Point::new(bounds.max().x() - 60.0, bounds.max().y() + 20.0),
            content: "powered by scrawl".to_string(),
        },
        ElementRole::Branding,
    ));

    Ok(surface)
}

/// Builds the gateway diamond by formatting and re-parsing an SVG point
/// string, the same representation the markup uses for polygons.
fn gateway_diamond(center: Point) -> Result<Primitive, String> {
    let d = GATEWAY_HALF_DIAGONAL;
    let points = format!(
        "{},{} {},{} {},{} {},{}",
        center.x(),
        center.y() - d,
        center.x() + d,
        center.y(),
        center.x(),
        center.y() + d,
        center.x() - d,
        center.y(),
    );
    Primitive::polygon_from_point_string(&points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::JobStatus;
    use crate::source::DiagramSource;

    const BASIC: &str = "event Start\ntask Checkout\ngateway Paid\nflow Start -> Checkout\nflow Checkout -> Paid\n";

    fn render(text: &str) -> Result<RenderedSurface, String> {
        let engine = ProcessEngine;
        let mut job = engine.start(&DiagramSource::new(Notation::Process, text));
        match job.poll() {
            JobStatus::Ready(surface) => Ok(surface),
            JobStatus::Failed(message) => Err(message),
            JobStatus::Pending => panic!("built-in job resolves on first poll"),
        }
    }

    #[test]
    fn test_basic_listing() {
        let surface = render(BASIC).unwrap();
        assert_eq!(surface.count_role(ElementRole::Shape), 3);
        assert_eq!(surface.count_role(ElementRole::Connector), 2);
        assert_eq!(surface.count_role(ElementRole::Branding), 1);
    }

    #[test]
    fn test_categories_resolved_at_creation() {
        let surface = render(BASIC).unwrap();
        let categories: Vec<ElementCategory> = surface
            .elements()
            .filter(|element| element.role() == ElementRole::Shape)
            .map(|element| element.category())
            .collect();
        assert_eq!(
            categories,
            vec![
                ElementCategory::Event,
                ElementCategory::Task,
                ElementCategory::Gateway
            ]
        );
    }

    #[test]
    fn test_gateway_is_polygon_from_point_string() {
        let surface = render("gateway Only").unwrap();
        let shape = surface
            .elements()
            .find(|element| element.role() == ElementRole::Shape)
            .unwrap();
        assert!(matches!(shape.primitive(), Primitive::Polygon { points } if points.len() == 4));
    }

    #[test]
    fn test_flow_to_undeclared_step_fails() {
        let err = render("task A\nflow A -> B").unwrap_err();
        assert!(err.contains("undeclared step"));
    }

    #[test]
    fn test_unknown_keyword_fails() {
        let err = render("job A").unwrap_err();
        assert!(err.contains("unknown keyword"));
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let surface = render("# comment\n\ntask A # trailing\n").unwrap();
        assert_eq!(surface.count_role(ElementRole::Shape), 1);
    }

    #[test]
    fn test_duplicate_step_fails() {
        let err = render("task A\ntask A").unwrap_err();
        assert!(err.contains("duplicate step"));
    }
}
