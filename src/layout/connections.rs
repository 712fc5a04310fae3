//! Connector generation between columns and along rows

use super::geometry::{ConnectorKind, ConnectorPath, Point};
use super::types::{CompositeConnection, LayoutConfig, NodeColumn, NodeInfo};

/// Cubic bezier handle length for a quarter circle of radius 1
const KAPPA: f64 = 0.552_284_749_8;

/// Build connections between adjacent visible columns and between
/// consecutive nodes of each row.
///
/// Columns whose top stage was skipped are not connected directly; their
/// top nodes are carried to the next visible column and routed around.
pub fn create_connections(
    columns: &[NodeColumn<'_>],
    config: &LayoutConfig,
) -> Vec<CompositeConnection> {
    let mut connections = Vec::new();
    let mut sources: Vec<&NodeInfo<'_>> = Vec::new();
    let mut skipped: Vec<&NodeInfo<'_>> = Vec::new();

    for column in columns {
        if column.is_skipped() {
            skipped.extend(column.top_node());
            continue;
        }

        if !sources.is_empty() {
            let destinations: Vec<&NodeInfo<'_>> =
                column.rows.iter().filter_map(|row| row.first()).collect();
            let paths = if skipped.is_empty() {
                basic_paths(&sources, &destinations, column.has_branch_labels, config)
            } else {
                skipping_paths(&sources, &destinations, &skipped, column.has_branch_labels, config)
            };
            connections.push(CompositeConnection {
                source_nodes: keys(&sources),
                destination_nodes: keys(&destinations),
                skipped_nodes: keys(&skipped),
                has_branch_labels: column.has_branch_labels,
                paths,
            });
        }

        for row in &column.rows {
            for pair in row.windows(2) {
                let (left, right) = (&pair[0], &pair[1]);
                connections.push(CompositeConnection {
                    source_nodes: vec![left.key.clone()],
                    destination_nodes: vec![right.key.clone()],
                    skipped_nodes: Vec::new(),
                    has_branch_labels: false,
                    paths: vec![straight(left, right, ConnectorKind::Straight, config)],
                });
            }
        }

        sources = column.rows.iter().filter_map(|row| row.last()).collect();
        skipped.clear();
    }

    connections
}

fn keys(nodes: &[&NodeInfo<'_>]) -> Vec<String> {
    nodes.iter().map(|node| node.key.clone()).collect()
}

fn right_edge(node: &NodeInfo<'_>, config: &LayoutConfig) -> Point {
    Point::new(node.x + node.radius(config), node.y)
}

fn left_edge(node: &NodeInfo<'_>, config: &LayoutConfig) -> Point {
    Point::new(node.x - node.radius(config), node.y)
}

fn rightmost_x(nodes: &[&NodeInfo<'_>]) -> f64 {
    nodes.iter().map(|node| node.x).fold(f64::MIN, f64::max)
}

fn leftmost_x(nodes: &[&NodeInfo<'_>]) -> f64 {
    nodes.iter().map(|node| node.x).fold(f64::MAX, f64::min)
}

/// Direct links: one primary link between the first rows, then a curve per
/// extra source row (into the first destination) and per extra destination
/// row (out of the first source).
fn basic_paths(
    sources: &[&NodeInfo<'_>],
    destinations: &[&NodeInfo<'_>],
    has_branch_labels: bool,
    config: &LayoutConfig,
) -> Vec<ConnectorPath> {
    let (Some(first_source), Some(first_destination)) = (sources.first(), destinations.first())
    else {
        return Vec::new();
    };

    let mut mid_x = (rightmost_x(sources) + leftmost_x(destinations)) / 2.0;
    if has_branch_labels {
        // Keep the curves clear of the branch label text
        mid_x -= config.sequential_stages_label_offset;
    }

    let mut paths = Vec::with_capacity(sources.len() + destinations.len() - 1);
    paths.push(curved(first_source, first_destination, mid_x, config));
    for source in &sources[1..] {
        paths.push(curved(source, first_destination, mid_x, config));
    }
    for destination in &destinations[1..] {
        paths.push(curved(first_source, destination, mid_x, config));
    }
    paths
}

/// Links that bypass skipped columns: ghost lines through each skipped node,
/// a detour curve between the first rows, and the usual branch curves for
/// any extra rows, bent close to their own column.
fn skipping_paths(
    sources: &[&NodeInfo<'_>],
    destinations: &[&NodeInfo<'_>],
    skipped: &[&NodeInfo<'_>],
    has_branch_labels: bool,
    config: &LayoutConfig,
) -> Vec<ConnectorPath> {
    let (Some(first_source), Some(first_destination)) = (sources.first(), destinations.first())
    else {
        return Vec::new();
    };

    let mut paths = Vec::with_capacity(skipped.len() + sources.len() + destinations.len() + 1);
    let mut left = *first_source;
    for &node in skipped {
        paths.push(straight(left, node, ConnectorKind::Ghost, config));
        left = node;
    }
    paths.push(straight(left, first_destination, ConnectorKind::Ghost, config));
    paths.push(skip_curve(first_source, first_destination, config));

    let half_spacing = config.node_spacing_h / 2.0;
    let mid_out = rightmost_x(sources) + half_spacing;
    for source in &sources[1..] {
        paths.push(curved(source, first_destination, mid_out, config));
    }

    let mut mid_in = leftmost_x(destinations) - half_spacing;
    if has_branch_labels {
        mid_in -= config.sequential_stages_label_offset;
    }
    for destination in &destinations[1..] {
        paths.push(curved(first_source, destination, mid_in, config));
    }
    paths
}

fn straight(
    left: &NodeInfo<'_>,
    right: &NodeInfo<'_>,
    kind: ConnectorKind,
    config: &LayoutConfig,
) -> ConnectorPath {
    let prefix = match kind {
        ConnectorKind::Ghost => "g",
        _ => "c",
    };
    ConnectorPath::new(
        format!("{prefix}_{}_{}", left.key, right.key),
        kind,
        right_edge(left, config),
    )
    .line_to(left_edge(right, config))
}

/// Horizontal run to `mid_x`, a vertical run to the other row with rounded
/// corners, then horizontal into the destination. Same-row nodes get a
/// straight line.
fn curved(
    left: &NodeInfo<'_>,
    right: &NodeInfo<'_>,
    mid_x: f64,
    config: &LayoutConfig,
) -> ConnectorPath {
    let start = right_edge(left, config);
    let end = left_edge(right, config);
    if start.y == end.y {
        return straight(left, right, ConnectorKind::Straight, config);
    }

    let mid_x = mid_x.max(start.x).min(end.x);
    let direction = (end.y - start.y).signum();
    let radius = config
        .curve_radius
        .min(mid_x - start.x)
        .min(end.x - mid_x)
        .min((end.y - start.y).abs() / 2.0)
        .max(0.0);
    let handle = radius * KAPPA;

    ConnectorPath::new(
        format!("c_{}_{}", left.key, right.key),
        ConnectorKind::Branch,
        start,
    )
    .line_to(Point::new(mid_x - radius, start.y))
    .cubic_to(
        Point::new(mid_x - radius + handle, start.y),
        Point::new(mid_x, start.y + direction * (radius - handle)),
        Point::new(mid_x, start.y + direction * radius),
    )
    .line_to(Point::new(mid_x, end.y - direction * radius))
    .cubic_to(
        Point::new(mid_x, end.y - direction * (radius - handle)),
        Point::new(mid_x + radius - handle, end.y),
        Point::new(mid_x + radius, end.y),
    )
    .line_to(end)
}

/// Dip half a row below the skipped nodes and come back up in front of the
/// destination.
fn skip_curve(left: &NodeInfo<'_>, right: &NodeInfo<'_>, config: &LayoutConfig) -> ConnectorPath {
    let start = right_edge(left, config);
    let end = left_edge(right, config);

    let skip_height = config.node_spacing_v * 0.5;
    let control_upper = config.curve_radius * 1.54;
    let control_lower = skip_height * 0.257;
    let inflection = skip_height * 0.414;
    let bottom = start.y.max(end.y) + skip_height;

    let descent_start = start.x + config.curve_radius;
    let ascent_end = end.x - config.curve_radius;
    let mut descent_end = descent_start + control_upper + inflection;
    let mut ascent_start = ascent_end - control_upper - inflection;
    if descent_end > ascent_start {
        let middle = (descent_start + ascent_end) / 2.0;
        descent_end = middle;
        ascent_start = middle;
    }

    ConnectorPath::new(
        format!("s_{}_{}", left.key, right.key),
        ConnectorKind::Skip,
        start,
    )
    .line_to(Point::new(descent_start, start.y))
    .cubic_to(
        Point::new(descent_start + control_upper, start.y),
        Point::new(descent_end - control_lower, bottom),
        Point::new(descent_end, bottom),
    )
    .line_to(Point::new(ascent_start, bottom))
    .cubic_to(
        Point::new(ascent_start + control_lower, bottom),
        Point::new(ascent_end - control_upper, end.y),
        Point::new(ascent_end, end.y),
    )
    .line_to(end)
}
