//! End-to-end pipeline behavior through the public `Diagram` handle.

use std::{cell::RefCell, collections::VecDeque, io, rc::Rc, time::Duration};

use scrawl::{
    Diagram, RenderPhase,
    config::{AppConfig, CategoryColorsConfig, PanZoomConfig, StyleConfig},
    export::{MemorySink, PresentationSink, RASTER_FILENAME, VECTOR_FILENAME},
    layout::{JobStatus, LayoutEngine, LayoutJob},
    panzoom::PanZoomController,
    source::{DiagramSource, Notation},
};
use scrawl_core::{
    color::Color,
    geometry::{Point, Size},
    surface::{Element, ElementCategory, ElementRole, Primitive, RenderedSurface},
};

/// Sink handle that stays inspectable after the diagram takes ownership.
#[derive(Clone, Default)]
struct SharedSink(Rc<MemorySink>);

impl PresentationSink for SharedSink {
    fn save_file(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.0.save_file(name, bytes)
    }

    fn open_view(&self, title: &str, html: &str) -> io::Result<()> {
        self.0.open_view(title, html)
    }
}

fn diagram(style: StyleConfig) -> (Diagram, SharedSink) {
    let sink = SharedSink::default();
    let config = AppConfig::new(style, PanZoomConfig::default());
    (Diagram::with_sink(config, Box::new(sink.clone())), sink)
}

fn rendered(style: StyleConfig, notation: Notation, text: &str) -> (Diagram, SharedSink) {
    let (mut diagram, sink) = diagram(style);
    diagram.render(DiagramSource::new(notation, text));
    diagram.run_until_idle();
    assert_eq!(diagram.phase(), RenderPhase::Ready);
    (diagram, sink)
}

const FAN_OUT: &str = "A-->B; A-->C";

#[test]
fn sketch_removal_plus_fresh_render_restores_topology() {
    let (plain, _) = rendered(StyleConfig::default(), Notation::Graph, FAN_OUT);
    let (mut sketched, _) = rendered(
        StyleConfig::default().with_sketch(true),
        Notation::Graph,
        FAN_OUT,
    );

    // Replace-mode removal forces the fresh cycle itself
    sketched.set_style(StyleConfig::default());
    sketched.run_until_idle();

    let plain_surface = plain.surface().unwrap();
    let restored = sketched.surface().unwrap();

    for role in [ElementRole::Shape, ElementRole::Connector, ElementRole::Label] {
        assert_eq!(restored.count_role(role), plain_surface.count_role(role));
    }
    assert_eq!(
        restored
            .elements()
            .filter(|e| matches!(e.primitive(), Primitive::Rectangle { .. }))
            .count(),
        3
    );
}

#[test]
fn categorized_elements_get_exactly_their_configured_color() {
    let style = StyleConfig::default().with_category_colors(CategoryColorsConfig::new(
        "#FFC107", "#03A9F4", "#8BC34A",
    ));
    let (diagram, _) = rendered(
        style,
        Notation::Process,
        "task Checkout\nevent Start\ngateway Paid",
    );

    let surface = diagram.surface().unwrap();
    let expected = [
        (ElementCategory::Task, "#FFC107"),
        (ElementCategory::Event, "#03A9F4"),
        (ElementCategory::Gateway, "#8BC34A"),
    ];
    for (category, color) in expected {
        let element = surface
            .elements()
            .find(|e| e.category() == category)
            .unwrap();
        assert_eq!(element.fill(), Some(Color::new(color).unwrap()));
        assert_eq!(element.stroke(), Some(Color::new("#000").unwrap()));
    }

    // Uncategorized elements keep their defaults
    for element in surface.elements() {
        if element.category() == ElementCategory::Generic
            && element.role() == ElementRole::Connector
        {
            assert_eq!(element.fill(), None);
        }
    }
}

#[test]
fn vector_export_is_byte_identical_without_edits() {
    let (diagram, sink) = rendered(
        StyleConfig::default().with_sketch(true),
        Notation::Graph,
        FAN_OUT,
    );

    let first = diagram.export_vector().unwrap();
    let saved_first = sink.0.file(VECTOR_FILENAME).unwrap();
    let second = diagram.export_vector().unwrap();

    assert_eq!(first, second);
    assert_eq!(saved_first, sink.0.file(VECTOR_FILENAME).unwrap());
}

#[test]
fn pan_zoom_binding_never_stacks() {
    let mut controller = PanZoomController::new(PanZoomConfig::default());
    let mut surface = RenderedSurface::new();
    surface.push(Element::new(
        Primitive::Rectangle {
            origin: Point::new(0.0, 0.0),
            size: Size::new(200.0, 100.0),
            corner_radius: 0.0,
        },
        ElementRole::Shape,
    ));

    controller.enable(&mut surface);
    controller.enable(&mut surface);
    assert!(controller.is_bound());

    controller.disable(&mut surface);
    assert!(!controller.is_bound());
    controller.enable(&mut surface);
    assert!(controller.is_bound());
    assert!(surface.view_transform().is_some());
}

/// Engine whose first job stays pending across several polls, so a second
/// edit can overtake it.
struct StaggeredEngine {
    pending_polls: RefCell<VecDeque<u32>>,
}

struct StaggeredJob {
    remaining: u32,
    text: String,
}

impl LayoutJob for StaggeredJob {
    fn poll(&mut self) -> JobStatus {
        if self.remaining > 0 {
            self.remaining -= 1;
            return JobStatus::Pending;
        }
        let mut surface = RenderedSurface::new();
        surface.push(Element::new(
            Primitive::Text {
                anchor: Point::new(0.0, 0.0),
                content: self.text.clone(),
            },
            ElementRole::Label,
        ));
        JobStatus::Ready(surface)
    }
}

impl LayoutEngine for StaggeredEngine {
    fn notation(&self) -> Notation {
        Notation::Graph
    }

    fn start(&self, source: &DiagramSource) -> Box<dyn LayoutJob> {
        Box::new(StaggeredJob {
            remaining: self.pending_polls.borrow_mut().pop_front().unwrap_or(0),
            text: source.text().to_string(),
        })
    }
}

#[test]
fn second_edit_wins_over_slower_first_edit() {
    let (mut diagram, _) = diagram(StyleConfig::default());
    diagram.add_engine(Rc::new(StaggeredEngine {
        pending_polls: RefCell::new(VecDeque::from([4, 0])),
    }));

    diagram.render(DiagramSource::new(Notation::Graph, "first edit"));
    diagram.pump(Duration::from_millis(50));
    diagram.render(DiagramSource::new(Notation::Graph, "second edit"));
    diagram.run_until_idle();

    assert_eq!(diagram.phase(), RenderPhase::Ready);
    let surface = diagram.surface().unwrap();
    let labels: Vec<&str> = surface
        .elements()
        .filter_map(|e| match e.primitive() {
            Primitive::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["second edit"]);
}

#[test]
fn sketch_changes_drawing_commands_but_not_counts() {
    let (plain, _) = rendered(StyleConfig::default(), Notation::Graph, FAN_OUT);
    let (sketched, _) = rendered(
        StyleConfig::default().with_sketch(true),
        Notation::Graph,
        FAN_OUT,
    );

    let plain_surface = plain.surface().unwrap();
    let sketched_surface = sketched.surface().unwrap();

    assert_eq!(plain_surface.count_role(ElementRole::Shape), 3);
    assert_eq!(plain_surface.count_role(ElementRole::Connector), 2);
    assert_eq!(
        sketched_surface.count_role(ElementRole::Shape),
        plain_surface.count_role(ElementRole::Shape)
    );
    assert_eq!(
        sketched_surface.count_role(ElementRole::Connector),
        plain_surface.count_role(ElementRole::Connector)
    );

    // Plain edges are straight lines; sketched ones carry curve commands
    let connector_data = |surface: &RenderedSurface| -> String {
        surface
            .elements()
            .filter(|e| e.role() == ElementRole::Connector)
            .filter_map(|e| match e.primitive() {
                Primitive::Path { data } => Some(data.clone()),
                _ => None,
            })
            .collect()
    };
    assert!(!connector_data(&plain_surface).contains('Q'));
    assert!(connector_data(&sketched_surface).contains('Q'));
}

#[test]
fn raster_export_saves_png_through_sink() {
    let (diagram, sink) = rendered(StyleConfig::default(), Notation::Process, "task A\nevent B");

    let png = diagram.export_raster().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(sink.0.file(RASTER_FILENAME).unwrap(), png);
}

#[test]
fn export_before_first_render_is_a_silent_noop() {
    let (fresh, sink) = diagram(StyleConfig::default());

    assert!(fresh.export_vector().is_none());
    assert!(fresh.export_raster().is_none());
    assert!(fresh.open_fullscreen("early").is_none());
    assert!(fresh.open_standalone_view("early").is_none());
    assert!(sink.0.file(VECTOR_FILENAME).is_none());
    assert!(sink.0.views().is_empty());
}

#[test]
fn standalone_view_reproduces_style_without_sharing_state() {
    let (diagram, sink) = rendered(
        StyleConfig::default().with_sketch(true),
        Notation::Process,
        "task A\nevent B\nflow A -> B",
    );

    diagram.open_standalone_view("order flow").unwrap();

    let views = sink.0.views();
    assert_eq!(views.len(), 1);
    let (title, html) = &views[0];
    assert_eq!(title, "order flow");
    assert!(html.contains("<svg"));
    // The detached pipeline re-applied colorization
    let task_fill = Color::new("#FFC107").unwrap().to_string();
    assert!(html.contains(&task_fill));

    // The live surface is untouched by the detached render
    assert_eq!(diagram.phase(), RenderPhase::Ready);
    assert!(diagram.surface().is_some());
}
