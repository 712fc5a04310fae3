use serde::{Deserialize, Serialize};

use super::geometry::ConnectorPath;
use crate::models::stage::StageRecord;

/// Spacing and radius constants for a layout pass.
///
/// Supplied by the caller; the layout engine has no built-in values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between columns
    pub node_spacing_h: f64,
    /// Horizontal distance between nodes inside one row
    pub parallel_spacing_h: f64,
    /// Vertical distance between rows
    pub node_spacing_v: f64,
    pub node_radius: f64,
    /// Radius of start/end/counter markers
    pub terminal_radius: f64,
    pub curve_radius: f64,
    pub connector_stroke_width: f64,
    pub label_offset_v: f64,
    pub small_label_offset_v: f64,
    /// Y of the first row
    pub yp_start: f64,
    /// Extra space reserved before columns that carry branch labels
    pub sequential_stages_label_offset: f64,
}

/// Display names for the synthetic start and end markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphLabels {
    pub start: String,
    pub end: String,
}

/// Synthetic node with no stage behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaceholderKind<'a> {
    Start,
    End,
    /// Stands in for columns folded away in collapsed mode
    Counter { stages: Vec<&'a StageRecord> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum NodeKind<'a> {
    Stage(&'a StageRecord),
    Placeholder(PlaceholderKind<'a>),
}

/// A positioned node. Built once its coordinates are known and never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo<'a> {
    pub key: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub kind: NodeKind<'a>,
    /// Name of the parallel branch this node runs in, if the branch is named
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq_container_name: Option<&'a str>,
}

impl<'a> NodeInfo<'a> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::Placeholder(_))
    }

    pub fn is_counter(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Placeholder(PlaceholderKind::Counter { .. })
        )
    }

    pub fn stage(&self) -> Option<&'a StageRecord> {
        match self.kind {
            NodeKind::Stage(stage) => Some(stage),
            NodeKind::Placeholder(_) => None,
        }
    }

    /// Drawn radius: markers are smaller than stage nodes
    pub fn radius(&self, config: &LayoutConfig) -> f64 {
        if self.is_placeholder() {
            config.terminal_radius
        } else {
            config.node_radius
        }
    }
}

/// One column of the graph. Each row is one parallel branch, read top to
/// bottom; nodes within a row run left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeColumn<'a> {
    /// Stage the column was built from; `None` for synthetic columns
    #[serde(skip)]
    pub top_stage: Option<&'a StageRecord>,
    pub rows: Vec<Vec<NodeInfo<'a>>>,
    pub center_x: f64,
    /// Left edge before the branch label offset; branch labels anchor here
    pub start_x: f64,
    pub has_branch_labels: bool,
}

impl<'a> NodeColumn<'a> {
    pub fn top_node(&self) -> Option<&NodeInfo<'a>> {
        self.rows.first().and_then(|row| row.first())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeInfo<'a>> {
        self.rows.iter().flatten()
    }

    pub fn is_skipped(&self) -> bool {
        self.top_stage
            .is_some_and(|stage| stage.state == crate::models::stage::StageState::Skipped)
    }
}

/// An edge group between adjacent visible columns, or between two
/// consecutive nodes of a row. Nodes are referenced by key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeConnection {
    pub source_nodes: Vec<String>,
    pub destination_nodes: Vec<String>,
    /// Skipped columns' top nodes that the connector routes around
    pub skipped_nodes: Vec<String>,
    pub has_branch_labels: bool,
    pub paths: Vec<ConnectorPath>,
}

/// Text anchored at a point; the renderer applies the vertical offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLabel {
    pub key: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub node_key: String,
}

/// Complete layout output. Coordinates are top-left-origin pixels inside a
/// `measured_width` by `measured_height` space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedGraph<'a> {
    pub node_columns: Vec<NodeColumn<'a>>,
    pub connections: Vec<CompositeConnection>,
    pub big_labels: Vec<NodeLabel>,
    pub small_labels: Vec<NodeLabel>,
    pub branch_labels: Vec<NodeLabel>,
    pub measured_width: f64,
    pub measured_height: f64,
}

impl<'a> PositionedGraph<'a> {
    pub fn nodes(&self) -> impl Iterator<Item = &NodeInfo<'a>> {
        self.node_columns.iter().flat_map(NodeColumn::nodes)
    }

    pub fn node(&self, key: &str) -> Option<&NodeInfo<'a>> {
        self.nodes().find(|node| node.key == key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }
}
