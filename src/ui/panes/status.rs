//! Status bar rendering with keybindings and state indicators

use crate::replay::NavControls;
use crate::ui::app::Mode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the status bar shows
pub struct StatusRenderData<'a> {
    pub mode: Mode,
    pub message: &'a str,
    /// Current step and total, `None` when there is no trace
    pub step: Option<(usize, usize)>,
    pub controls: NavControls,
    pub is_playing: bool,
    pub is_running: bool,
    /// The last applied run ended in an engine error
    pub run_failed: bool,
}

fn keybinds(mode: Mode) -> &'static [(&'static str, &'static str)] {
    match mode {
        Mode::Replay => &[
            (" ←/→ ", " step "),
            (" r ", " run "),
            (" ⎵ ", " play "),
            (" ↵ / ⌫ ", " end/start "),
            (" m ", " build "),
            ("q", " quit "),
        ],
        Mode::Build => &[
            (" 1-9 ", " drop "),
            (" ←/→ ", " select "),
            (" d ", " remove "),
            (" c ", " clear "),
            (" m ", " replay "),
            ("q", " quit "),
        ],
    }
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData<'_>) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let step_text = match (data.mode, data.step) {
        (Mode::Build, _) => " BUILD ".to_string(),
        (Mode::Replay, Some((current, total))) => format!(" Step {}/{} ", current + 1, total),
        (Mode::Replay, None) => " Step 0/0 ".to_string(),
    };

    let is_error = data.run_failed;
    let left_spans = vec![
        Span::styled(
            step_text,
            Style::default()
                .bg(if is_error {
                    DEFAULT_THEME.error
                } else if data.mode == Mode::Build {
                    DEFAULT_THEME.secondary
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in keybinds(data.mode).iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(*key, key_style));
        right_spans.push(Span::styled(*desc, desc_style));
    }

    let badge = |text: &'static str, bg: Color| {
        Span::styled(
            text,
            Style::default()
                .bg(bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };

    if data.mode == Mode::Replay {
        let indicator = if data.is_running {
            Some(badge(" ⏳ RUNNING ", DEFAULT_THEME.secondary))
        } else if data.is_playing {
            Some(badge(" ▶ PLAYING ", DEFAULT_THEME.secondary))
        } else if data.step.is_some() && !data.controls.next {
            Some(badge(" END ", DEFAULT_THEME.error))
        } else if data.step.is_some() && !data.controls.prev {
            Some(badge(" START ", DEFAULT_THEME.success))
        } else {
            None
        };
        if let Some(span) = indicator {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(span);
        }
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
