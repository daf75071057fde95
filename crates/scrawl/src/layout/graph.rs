//! Built-in layout engine for the directed-graph notation.
//!
//! The notation is an edge list: statements separated by `;` or newlines,
//! each of the form `A-->B`. An optional `graph` header line is accepted
//! and ignored. Nodes are laid out in BFS ranks top-to-bottom; every edge
//! becomes one straight path with an arrowhead marker.

use indexmap::IndexMap;
use log::debug;

use scrawl_core::{
    geometry::{Bounds, Point, Size},
    surface::{Element, ElementRole, Primitive, RenderedSurface},
};

use super::{DeferredJob, LayoutEngine, LayoutJob};
use crate::source::{DiagramSource, Notation};

const NODE_WIDTH: f32 = 120.0;
const NODE_HEIGHT: f32 = 40.0;
const HORIZONTAL_GAP: f32 = 60.0;
const VERTICAL_GAP: f32 = 80.0;
const MARGIN: f32 = 40.0;

fn node_size() -> Size {
    Size::new(NODE_WIDTH, NODE_HEIGHT)
}

/// Layout engine for `A-->B` edge lists.
#[derive(Debug, Default)]
pub struct GraphEngine;

impl LayoutEngine for GraphEngine {
    fn notation(&self) -> Notation {
        Notation::Graph
    }

    fn start(&self, source: &DiagramSource) -> Box<dyn LayoutJob> {
        let text = source.text().to_string();
        Box::new(DeferredJob::new(move || {
            let parsed = parse(&text)?;
            Ok(build_surface(&parsed))
        }))
    }
}

struct ParsedGraph {
    /// Node names in first-seen order.
    nodes: Vec<String>,
    /// Edges as indices into `nodes`.
    edges: Vec<(usize, usize)>,
}

fn parse(text: &str) -> Result<ParsedGraph, String> {
    let mut node_index: IndexMap<String, usize> = IndexMap::new();
    let mut edges = Vec::new();

    let statements = text
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|statement| !statement.is_empty());

    for statement in statements {
        // Accept and ignore a mermaid-style header line
        if statement.starts_with("graph ") || statement == "graph" {
            continue;
        }

        let (from, to) = statement
            .split_once("-->")
            .ok_or_else(|| format!("malformed statement `{statement}`: expected `A-->B`"))?;

        let from = validate_node_name(from)?;
        let to = validate_node_name(to)?;

        let from = intern(&mut node_index, from);
        let to = intern(&mut node_index, to);
        edges.push((from, to));
    }

    if node_index.is_empty() {
        return Err("source contains no nodes".to_string());
    }

    debug!(nodes = node_index.len(), edges = edges.len(); "Parsed graph source");

    Ok(ParsedGraph {
        nodes: node_index.into_keys().collect(),
        edges,
    })
}

fn validate_node_name(raw: &str) -> Result<&str, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("empty node name".to_string());
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(format!("invalid node name `{name}`"));
    }
    Ok(name)
}

fn intern(nodes: &mut IndexMap<String, usize>, name: &str) -> usize {
    if let Some(&index) = nodes.get(name) {
        return index;
    }
    let index = nodes.len();
    nodes.insert(name.to_string(), index);
    index
}

/// Assigns each node a BFS rank starting from the in-degree-zero roots.
///
/// Cycles are tolerated: any node unreachable from a root is seeded as a
/// root of its own when encountered.
fn assign_ranks(parsed: &ParsedGraph) -> Vec<usize> {
    let node_count = parsed.nodes.len();
    let mut in_degree = vec![0usize; node_count];
    for &(_, to) in &parsed.edges {
        in_degree[to] += 1;
    }

    let mut rank = vec![usize::MAX; node_count];
    let mut queue: std::collections::VecDeque<usize> = (0..node_count)
        .filter(|&node| in_degree[node] == 0)
        .collect();
    for &root in &queue {
        rank[root] = 0;
    }

    let mut next_unvisited = 0;
    loop {
        while let Some(node) = queue.pop_front() {
            for &(from, to) in &parsed.edges {
                if from == node && rank[to] == usize::MAX {
                    rank[to] = rank[node] + 1;
                    queue.push_back(to);
                }
            }
        }

        // Pure cycles have no root; seed the first unvisited node
        match (next_unvisited..node_count).find(|&node| rank[node] == usize::MAX) {
            Some(node) => {
                rank[node] = 0;
                next_unvisited = node + 1;
                queue.push_back(node);
            }
            None => break,
        }
    }

    rank
}

fn build_surface(parsed: &ParsedGraph) -> RenderedSurface {
    let ranks = assign_ranks(parsed);
    let mut column_counts: Vec<usize> = Vec::new();
    let mut centers = Vec::with_capacity(parsed.nodes.len());

    for node in 0..parsed.nodes.len() {
        let rank = ranks[node];
        if column_counts.len() <= rank {
            column_counts.resize(rank + 1, 0);
        }
        let column = column_counts[rank];
        column_counts[rank] += 1;

        centers.push(Point::new(
            MARGIN + column as f32 * (NODE_WIDTH + HORIZONTAL_GAP) + NODE_WIDTH / 2.0,
            MARGIN + rank as f32 * (NODE_HEIGHT + VERTICAL_GAP) + NODE_HEIGHT / 2.0,
        ));
    }

    let mut surface = RenderedSurface::new();

    for (node, name) in parsed.nodes.iter().enumerate() {
        let bounds = Bounds::from_center_size(centers[node], node_size());
        surface.push(Element::new(
            Primitive::Rectangle {
                origin: bounds.min(),
                size: node_size(),
                corner_radius: 0.0,
            },
            ElementRole::Shape,
        ));
        surface.push(Element::new(
            Primitive::Text {
                anchor: centers[node],
                content: name.clone(),
            },
            ElementRole::Label,
        ));
    }

    for &(from, to) in &parsed.edges {
        let start = rectangle_boundary_point(centers[from], node_size(), centers[to]);
        let end = rectangle_boundary_point(centers[to], node_size(), centers[from]);
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

    surface
}

/// Finds where the ray from a rectangle's center toward `target` crosses
/// the rectangle boundary. Falls back to the center for degenerate rays.
fn rectangle_boundary_point(center: Point, size: Size, target: Point) -> Point {
    let direction = target.sub_point(center);
    let length = direction.hypot();
    if length < 0.001 {
        return center;
    }

    let half_width = size.width() / 2.0;
    let half_height = size.height() / 2.0;

    // Scale the ray so the larger normalized component reaches the boundary
    let scale_x = if direction.x() != 0.0 {
        half_width / direction.x().abs()
    } else {
        f32::INFINITY
    };
    let scale_y = if direction.y() != 0.0 {
        half_height / direction.y().abs()
    } else {
        f32::INFINITY
    };
    let scale = scale_x.min(scale_y);

    center.add_point(direction.scale(scale))
}
