//! Display-ready projections of sequences and trace steps
//!
//! Nothing here draws. The functions turn model state into ordered visual
//! nodes and label text that any front end (the TUI panes, or tests) can lay
//! out. Every value node carries its logical position, so a removal gesture
//! on a node never has to reverse-engineer it from the layout.

use crate::model::{logical_position, SequenceModel, StructureKind};
use crate::replay::StepView;
use crate::trace::StepRecord;

/// One element of a rendered structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualNode {
    Value {
        text: String,
        position: usize,
        is_top: bool,
    },
    /// Arrow between two list nodes
    Connector,
}

impl VisualNode {
    pub fn is_value(&self) -> bool {
        matches!(self, VisualNode::Value { .. })
    }
}

/// A rendered structure instance from one trace step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancePanel {
    pub name: String,
    pub title: String,
    pub nodes: Vec<VisualNode>,
    /// Shown instead of the nodes when the instance is empty
    pub empty_label: Option<&'static str>,
}

/// Text labels around the structure pane for the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepHeader {
    pub step_info: String,
    pub current_line: String,
    pub description: String,
}

/// Label shown when there is no trace at all
pub const NO_DATA_LABEL: &str = "No data to visualize.";

/// Project a sequence of values as a structure of `kind`
pub fn project_values<S: AsRef<str>>(values: &[S], kind: StructureKind) -> Vec<VisualNode> {
    let top = values.len().checked_sub(1);
    let mut nodes = Vec::with_capacity(values.len() * 2);

    for (position, value) in values.iter().enumerate() {
        if kind == StructureKind::List && position > 0 {
            nodes.push(VisualNode::Connector);
        }
        nodes.push(VisualNode::Value {
            text: value.as_ref().to_string(),
            position,
            is_top: kind == StructureKind::Stack && Some(position) == top,
        });
    }
    nodes
}

/// Project an authoring surface's model
pub fn project_sequence(model: &SequenceModel) -> Vec<VisualNode> {
    project_values(&model.values(), model.kind())
}

/// Logical position of the visual node at `visual_index`, if it is a value.
///
/// Uses the tag on the node when available and falls back to the
/// interleaving rule otherwise.
pub fn position_at(nodes: &[VisualNode], visual_index: usize) -> Option<usize> {
    match nodes.get(visual_index)? {
        VisualNode::Value { position, .. } => Some(*position),
        VisualNode::Connector => Some(logical_position(visual_index)),
    }
}

/// Placeholder for an empty instance of `kind`
pub fn empty_instance_label(kind: StructureKind) -> &'static str {
    match kind {
        StructureKind::List => "Empty List",
        StructureKind::Stack => "Empty Stack",
    }
}

/// Placeholder for a step that tracks no instances yet
pub fn no_instances_label(kind: StructureKind) -> String {
    format!("No {} instances created yet.", kind.class_name())
}

/// Panel title: `ll: [10, 20]`, plus the size for stacks
pub fn instance_title(name: &str, values: &[String], kind: StructureKind) -> String {
    let joined = values.join(", ");
    match kind {
        StructureKind::List => format!("{}: [{}]", name, joined),
        StructureKind::Stack => format!("{}: [{}] (size: {})", name, joined, values.len()),
    }
}

/// Project every instance recorded at one step, in engine order
pub fn project_step(record: &StepRecord, kind: StructureKind) -> Vec<InstancePanel> {
    record
        .instances()
        .iter()
        .map(|(name, values)| InstancePanel {
            name: name.clone(),
            title: instance_title(name, values, kind),
            nodes: project_values(values, kind),
            empty_label: values.is_empty().then(|| empty_instance_label(kind)),
        })
        .collect()
}

/// Header text for the current replay view
pub fn step_header(view: &StepView<'_>) -> StepHeader {
    match view {
        StepView::Nothing => StepHeader {
            step_info: "Step 0 of 0".to_string(),
            current_line: "Current Line: -".to_string(),
            description: "Steps will appear here".to_string(),
        },
        StepView::Step {
            index,
            total,
            record,
        } => StepHeader {
            step_info: format!("Step {} of {}", index + 1, total),
            current_line: format!(
                "Current Line: {} | Code: {}",
                record.line_number(),
                record.code_text()
            ),
            description: format!("{}. {}", index + 1, record.description()),
        },
    }
}
