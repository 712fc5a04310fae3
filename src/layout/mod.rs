//! Graph layout for pipeline runs
//!
//! Converts a stage forest into positioned columns of nodes, connector
//! geometry and label placements. The pass is a pure function of its inputs:
//! 1. Column construction (containers dissolve into their descendants)
//! 2. Optional folding of overflow columns into a counter node
//! 3. Left-to-right coordinate sweep
//! 4. Label placement (skipped entirely in collapsed mode)
//! 5. Connections, routed around skipped columns

mod columns;
mod connections;
mod geometry;
mod labels;
mod positioning;
mod types;


use tracing::trace;

use crate::models::stage::StageRecord;

pub use columns::{create_node_columns, fold_overflow, ColumnPlan, NodePlan, MAX_VISIBLE_COLUMNS};
pub use connections::create_connections;
pub use geometry::{ConnectorKind, ConnectorPath, Point, Segment};
pub use labels::{create_big_labels, create_branch_labels, create_small_labels};
pub use positioning::position_nodes;
pub use types::{
    CompositeConnection, GraphLabels, LayoutConfig, NodeColumn, NodeInfo, NodeKind, NodeLabel,
    PlaceholderKind, PositionedGraph,
};

/// Lay out a stage forest between synthetic start and end markers.
///
/// `collapsed` folds columns past [`MAX_VISIBLE_COLUMNS`] into a counter
/// node and omits every label.
pub fn layout_graph<'a>(
    stages: &'a [StageRecord],
    config: &LayoutConfig,
    collapsed: bool,
    labels: &GraphLabels,
) -> PositionedGraph<'a> {
    let mut stage_columns = create_node_columns(stages);
    if collapsed {
        stage_columns = fold_overflow(stage_columns);
    }

    let mut plans = Vec::with_capacity(stage_columns.len() + 2);
    plans.push(ColumnPlan::start(labels));
    plans.extend(stage_columns);
    plans.push(ColumnPlan::end(labels));

    let node_columns = position_nodes(plans, config);

    let (big_labels, small_labels, branch_labels) = if collapsed {
        (Vec::new(), Vec::new(), Vec::new())
    } else {
        (
            create_big_labels(&node_columns, config),
            create_small_labels(&node_columns),
            create_branch_labels(&node_columns),
        )
    };
    let connections = create_connections(&node_columns, config);

    let mut measured_width: f64 = 0.0;
    let mut measured_height: f64 = 0.0;
    for node in node_columns.iter().flat_map(NodeColumn::nodes) {
        measured_width = measured_width.max(node.x + config.node_spacing_h / 2.0);
        measured_height = measured_height.max(node.y + config.yp_start);
    }

    trace!(
        columns = node_columns.len(),
        connections = connections.len(),
        measured_width,
        measured_height,
        "laid out graph"
    );

    PositionedGraph {
        node_columns,
        connections,
        big_labels,
        small_labels,
        branch_labels,
        measured_width,
        measured_height,
    }
}
