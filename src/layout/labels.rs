//! Label placement for columns, nested nodes and named branches

use super::types::{LayoutConfig, NodeColumn, NodeLabel};

/// One label per column at its center, naming the column's top stage.
pub fn create_big_labels(columns: &[NodeColumn<'_>], config: &LayoutConfig) -> Vec<NodeLabel> {
    columns
        .iter()
        .filter_map(|column| {
            let top_node = column.top_node()?;
            let text = column
                .top_stage
                .map_or_else(|| top_node.name.clone(), |stage| stage.name.clone());
            let x = if column.has_branch_labels {
                column.center_x + config.sequential_stages_label_offset / 2.0
            } else {
                column.center_x
            };
            Some(NodeLabel {
                key: format!("l_b_{}", top_node.key),
                text,
                x,
                y: top_node.y,
                node_key: top_node.key.clone(),
            })
        })
        .collect()
}

/// Labels for every stage node that is not its column's top stage.
pub fn create_small_labels(columns: &[NodeColumn<'_>]) -> Vec<NodeLabel> {
    let mut labels = Vec::new();
    for column in columns {
        let top_id = column.top_stage.map(|stage| stage.id.as_str());
        for node in column.nodes() {
            let Some(stage) = node.stage() else {
                continue;
            };
            if Some(stage.id.as_str()) == top_id {
                continue;
            }
            labels.push(NodeLabel {
                key: format!("l_s_{}", node.key),
                text: node.name.clone(),
                x: node.x,
                y: node.y,
                node_key: node.key.clone(),
            });
        }
    }
    labels
}

/// Branch names at the left edge of columns with named branches.
pub fn create_branch_labels(columns: &[NodeColumn<'_>]) -> Vec<NodeLabel> {
    columns
        .iter()
        .filter(|column| column.has_branch_labels)
        .flat_map(|column| {
            column.rows.iter().filter_map(move |row| {
                let first = row.first()?;
                let name = first.seq_container_name?;
                Some(NodeLabel {
                    key: format!("l_br_{}", first.key),
                    text: name.to_string(),
                    x: column.start_x,
                    y: first.y,
                    node_key: first.key.clone(),
                })
            })
        })
        .collect()
}
