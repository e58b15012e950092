//! Structure pane rendering for replay steps and build surfaces
//!
//! Lists are drawn left to right with arrows between nodes:
//! ```text
//! ll: [10, 30]
//! [10] → [30]
//! ```
//! Stacks are drawn bottom to top, with the top value highlighted.

use crate::model::StructureKind;
use crate::render::{self, InstancePanel, StepHeader, VisualNode};
use crate::replay::StepView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn node_style(is_top: bool, is_selected: bool) -> Style {
    let style = if is_top {
        Style::default()
            .fg(DEFAULT_THEME.top_node)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.node)
    };
    if is_selected {
        style
            .bg(DEFAULT_THEME.selection_bg)
            .add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

/// Lines for a projected structure; `selected` is a visual index
pub fn structure_lines(
    nodes: &[VisualNode],
    kind: StructureKind,
    selected: Option<usize>,
) -> Vec<Line<'static>> {
    match kind {
        StructureKind::List => {
            let spans: Vec<Span<'static>> = nodes
                .iter()
                .enumerate()
                .map(|(visual, node)| match node {
                    VisualNode::Connector => {
                        Span::styled(" → ", Style::default().fg(DEFAULT_THEME.comment))
                    }
                    VisualNode::Value { text, is_top, .. } => Span::styled(
                        format!("[{}]", text),
                        node_style(*is_top, selected == Some(visual)),
                    ),
                })
                .collect();
            vec![Line::from(spans)]
        }
        StructureKind::Stack => nodes
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(visual, node)| match node {
                VisualNode::Value { text, is_top, .. } => {
                    let mut spans = vec![Span::styled(
                        format!("│ {:^8} │", text),
                        node_style(*is_top, selected == Some(visual)),
                    )];
                    if *is_top {
                        spans.push(Span::styled(
                            " ← top",
                            Style::default().fg(DEFAULT_THEME.comment),
                        ));
                    }
                    Some(Line::from(spans))
                }
                VisualNode::Connector => None,
            })
            .chain(std::iter::once(Line::from(Span::styled(
                "└──────────┘",
                Style::default().fg(DEFAULT_THEME.comment),
            ))))
            .collect(),
    }
}

fn panel_items(panel: &InstancePanel, kind: StructureKind) -> Vec<ListItem<'static>> {
    let mut items = vec![ListItem::new(Line::from(Span::styled(
        panel.title.clone(),
        Style::default()
            .fg(DEFAULT_THEME.function)
            .add_modifier(Modifier::BOLD),
    )))];

    match panel.empty_label {
        Some(label) => items.push(
            ListItem::new(format!("  {}", label)).style(Style::default().fg(DEFAULT_THEME.comment)),
        ),
        None => items.extend(
            structure_lines(&panel.nodes, kind, None)
                .into_iter()
                .map(|line| {
                    let mut spans = vec![Span::raw("  ")];
                    spans.extend(line.spans);
                    ListItem::new(Line::from(spans))
                }),
        ),
    }
    items.push(ListItem::new(""));
    items
}

/// Render the replay visualization for the current step
pub fn render_replay_pane(
    frame: &mut Frame,
    area: Rect,
    view: &StepView<'_>,
    kind: StructureKind,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Visualization ", is_focused);
    let header: StepHeader = render::step_header(view);

    let mut items = vec![
        ListItem::new(header.step_info).style(
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ),
        ListItem::new(header.current_line).style(Style::default().fg(DEFAULT_THEME.secondary)),
        ListItem::new(header.description).style(Style::default().fg(DEFAULT_THEME.fg)),
        ListItem::new(""),
    ];

    match view {
        StepView::Nothing => items.push(
            ListItem::new(render::NO_DATA_LABEL).style(Style::default().fg(DEFAULT_THEME.comment)),
        ),
        StepView::Step { record, .. } => {
            let panels = render::project_step(record, kind);
            if panels.is_empty() {
                items.push(
                    ListItem::new(render::no_instances_label(kind))
                        .style(Style::default().fg(DEFAULT_THEME.comment)),
                );
            }
            for panel in &panels {
                items.extend(panel_items(panel, kind));
            }
        }
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let max_scroll = items.len().saturating_sub(visible_height);
    *scroll_offset = (*scroll_offset).min(max_scroll);

    let visible: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();
    frame.render_widget(List::new(visible).block(block), area);
}

/// Render the palette of values available for dropping
pub fn render_palette(frame: &mut Frame, area: Rect, palette: &[String]) {
    let block = pane_block(" Palette ", false);
    let mut spans = Vec::new();
    for (i, value) in palette.iter().enumerate().take(9) {
        spans.push(Span::styled(
            format!(" {} ", i + 1),
            Style::default().bg(DEFAULT_THEME.comment).fg(ratatui::style::Color::Black),
        ));
        spans.push(Span::styled(
            format!(" {}  ", value),
            Style::default().fg(DEFAULT_THEME.node),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render a build surface with the current selection
pub fn render_surface_pane(
    frame: &mut Frame,
    area: Rect,
    nodes: &[VisualNode],
    kind: StructureKind,
    selected: Option<usize>,
    is_focused: bool,
) {
    let title = match kind {
        StructureKind::List => " Canvas ",
        StructureKind::Stack => " Stack ",
    };
    let block = pane_block(title, is_focused);

    if nodes.is_empty() {
        let paragraph = Paragraph::new(format!(
            "(empty {}: press 1-9 to drop a value)",
            kind.noun()
        ))
        .block(block)
        .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let paragraph = Paragraph::new(structure_lines(nodes, kind, selected))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_list_line() {
        let nodes = render::project_values(&["10", "30"], StructureKind::List);
        let lines = structure_lines(&nodes, StructureKind::List, None);
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "[10] → [30]");
    }

    #[test]
    fn test_stack_is_drawn_top_first() {
        let nodes = render::project_values(&["10", "20"], StructureKind::Stack);
        let lines = structure_lines(&nodes, StructureKind::Stack, None);
        assert_eq!(lines.len(), 3);
        assert!(text(&lines[0]).contains("20"));
        assert!(text(&lines[0]).ends_with("← top"));
        assert!(text(&lines[1]).contains("10"));
    }
}
