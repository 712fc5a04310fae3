//! Left-to-right coordinate sweep over planned columns

use super::columns::ColumnPlan;
use super::types::{LayoutConfig, NodeColumn};

/// Share of the column spacing used next to start/end markers
const PLACEHOLDER_SPACING_FACTOR: f64 = 0.7;

/// Assign coordinates to every planned node.
///
/// Columns advance by `node_spacing_h` from the previous column's rightmost
/// node, or by a reduced step next to markers. Rows stack from `yp_start`;
/// rows shorter than the widest row are centered against it.
pub fn position_nodes<'a>(plans: Vec<ColumnPlan<'a>>, config: &LayoutConfig) -> Vec<NodeColumn<'a>> {
    let mut columns = Vec::with_capacity(plans.len());
    let mut x = config.node_spacing_h / 2.0;
    let mut previous_top_is_placeholder = false;

    for (index, plan) in plans.into_iter().enumerate() {
        let top_is_placeholder = plan.top_node().is_some_and(|node| node.is_placeholder());
        let top_is_counter = plan.top_node().is_some_and(|node| node.is_counter());

        if index > 0 {
            x += if top_is_counter {
                config.node_spacing_h
            } else if previous_top_is_placeholder || top_is_placeholder {
                config.node_spacing_h * PLACEHOLDER_SPACING_FACTOR
            } else {
                config.node_spacing_h
            };
        }

        let start_x = x;
        let xp_start = if plan.has_branch_labels {
            x + config.sequential_stages_label_offset
        } else {
            x
        };

        let widest_row = plan.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut max_x = xp_start;
        let mut y = config.yp_start;
        let mut rows = Vec::with_capacity(plan.rows.len());

        for row in plan.rows {
            debug_assert!(!row.is_empty(), "layout rows must hold at least one node");
            let centering = (widest_row - row.len()) as f64 * config.parallel_spacing_h / 2.0;
            let mut xp = xp_start + centering;
            let mut nodes = Vec::with_capacity(row.len());
            for node in row {
                max_x = max_x.max(xp);
                nodes.push(node.place(xp, y));
                xp += config.parallel_spacing_h;
            }
            rows.push(nodes);
            y += config.node_spacing_v;
        }

        columns.push(NodeColumn {
            top_stage: plan.top_stage,
            rows,
            center_x: (xp_start + max_x) / 2.0,
            start_x,
            has_branch_labels: plan.has_branch_labels,
        });

        x = max_x;
        previous_top_is_placeholder = top_is_placeholder;
    }

    columns
}
