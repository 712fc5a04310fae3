//! Column construction: turns the stage forest into rows of unpositioned nodes

use super::types::{GraphLabels, NodeInfo, NodeKind, PlaceholderKind};
use crate::models::stage::StageRecord;

/// Columns shown in full before the rest fold into a counter node
pub const MAX_VISIBLE_COLUMNS: usize = 13;

/// A node whose position is not known yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePlan<'a> {
    pub key: String,
    pub name: String,
    pub kind: NodeKind<'a>,
    pub seq_container_name: Option<&'a str>,
}

impl<'a> NodePlan<'a> {
    fn for_stage(stage: &'a StageRecord, seq_container_name: Option<&'a str>) -> Self {
        Self {
            key: format!("n_{}", stage.id),
            name: stage.name.clone(),
            kind: NodeKind::Stage(stage),
            seq_container_name,
        }
    }

    fn placeholder(key: &str, name: String, kind: PlaceholderKind<'a>) -> Self {
        Self {
            key: key.to_string(),
            name,
            kind: NodeKind::Placeholder(kind),
            seq_container_name: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::Placeholder(_))
    }

    pub fn is_counter(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Placeholder(PlaceholderKind::Counter { .. })
        )
    }

    pub(crate) fn place(self, x: f64, y: f64) -> NodeInfo<'a> {
        NodeInfo {
            key: self.key,
            name: self.name,
            x,
            y,
            kind: self.kind,
            seq_container_name: self.seq_container_name,
        }
    }
}

/// A column whose nodes have not been positioned yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan<'a> {
    pub top_stage: Option<&'a StageRecord>,
    pub rows: Vec<Vec<NodePlan<'a>>>,
    pub has_branch_labels: bool,
}

impl<'a> ColumnPlan<'a> {
    fn synthetic(node: NodePlan<'a>) -> Self {
        Self {
            top_stage: None,
            rows: vec![vec![node]],
            has_branch_labels: false,
        }
    }

    pub fn start(labels: &GraphLabels) -> Self {
        Self::synthetic(NodePlan::placeholder(
            "start-node",
            labels.start.clone(),
            PlaceholderKind::Start,
        ))
    }

    pub fn end(labels: &GraphLabels) -> Self {
        Self::synthetic(NodePlan::placeholder(
            "end-node",
            labels.end.clone(),
            PlaceholderKind::End,
        ))
    }

    pub fn top_node(&self) -> Option<&NodePlan<'a>> {
        self.rows.first().and_then(|row| row.first())
    }
}

/// Build one column per top-level stage.
///
/// A stage without children becomes a single-node column. A stage with
/// children draws no node of its own and dissolves into its descendants:
/// each child becomes one row holding its chain of sequential descendants,
/// and a parallel child becomes one row per branch.
pub fn create_node_columns(stages: &[StageRecord]) -> Vec<ColumnPlan<'_>> {
    stages
        .iter()
        .map(|top_stage| {
            let rows = if top_stage.has_children() {
                container_rows(top_stage)
            } else {
                vec![vec![NodePlan::for_stage(top_stage, None)]]
            };
            let has_branch_labels = rows
                .iter()
                .flatten()
                .any(|node| node.seq_container_name.is_some());

            ColumnPlan {
                top_stage: Some(top_stage),
                rows,
                has_branch_labels,
            }
        })
        .collect()
}

fn container_rows(container: &StageRecord) -> Vec<Vec<NodePlan<'_>>> {
    if container.is_parallel_container() {
        return container.children.iter().map(branch_row).collect();
    }

    // One row per child; a parallel child adds a row per branch instead
    let mut rows = Vec::with_capacity(container.children.len());
    for child in &container.children {
        if child.is_parallel_container() {
            rows.extend(child.children.iter().map(branch_row));
        } else {
            rows.push(
                chain(child)
                    .into_iter()
                    .map(|stage| NodePlan::for_stage(stage, None))
                    .collect(),
            );
        }
    }
    rows
}

/// One parallel branch as a row. A branch that has its own sequential
/// stages is named after the branch.
fn branch_row(branch: &StageRecord) -> Vec<NodePlan<'_>> {
    let stages = chain(branch);
    let seq_container_name = match stages.as_slice() {
        [only] if std::ptr::eq(*only, branch) => None,
        _ => Some(branch.name.as_str()),
    };
    stages
        .into_iter()
        .map(|stage| NodePlan::for_stage(stage, seq_container_name))
        .collect()
}

/// Sequential descendants of `stage` in execution order. Descent stops at
/// leaves and at nested parallel containers, which stand for themselves.
fn chain(stage: &StageRecord) -> Vec<&StageRecord> {
    if !stage.has_children() || stage.is_parallel_container() {
        return vec![stage];
    }
    stage.children.iter().flat_map(chain).collect()
}

/// Fold middle columns beyond [`MAX_VISIBLE_COLUMNS`] into one counter node
/// whose payload lists the folded columns' top stages.
pub fn fold_overflow(mut columns: Vec<ColumnPlan<'_>>) -> Vec<ColumnPlan<'_>> {
    if columns.len() <= MAX_VISIBLE_COLUMNS {
        return columns;
    }

    let folded: Vec<&StageRecord> = columns
        .drain(MAX_VISIBLE_COLUMNS..)
        .filter_map(|column| column.top_stage)
        .collect();
    let name = format!("+{}", folded.len());
    columns.push(ColumnPlan::synthetic(NodePlan::placeholder(
        "counter-node",
        name,
        PlaceholderKind::Counter { stages: folded },
    )));
    columns
}
